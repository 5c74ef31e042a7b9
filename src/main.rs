//! JavaScript/JScript obfuscator.
//!
//! Processes a script through 4 phases:
//!
//! 1. **Parse**: build a syntax tree with SWC (aborts on unrecoverable errors)
//! 2. **Collect**: find function declarations, single-declarator variables
//!    and string literals in initializer or argument position
//! 3. **Plan**: give every name a random token of the same length
//! 4. **Rewrite**: substitute names and encode literals as
//!    `String.fromCharCode.apply(null, [...])`
//!
//! Renaming is best effort and not scope-aware; check the output runs.

mod collect;
mod encode;
mod logging;
mod parse;
mod rewrite;
mod token;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use rewrite::Strategy;
use token::TokenGenerator;

#[derive(Parser)]
#[command(name = "jsmask", about = "JavaScript/JScript obfuscator")]
struct Cli {
    /// Script to obfuscate
    input: PathBuf,

    /// Write to this file instead of stdout
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Seed for token generation (reproducible output)
    #[arg(long)]
    seed: Option<u64>,

    /// How substitutions are located in the source
    #[arg(long, value_enum, default_value_t = StrategyArg::Textual)]
    strategy: StrategyArg,

    /// Log more to stderr (repeatable)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum StrategyArg {
    /// Whole-word substitution over the text
    Textual,
    /// Substitution at syntax tree positions
    Ranged,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Textual => Strategy::Textual,
            StrategyArg::Ranged => Strategy::Ranged,
        }
    }
}

/// Pipeline configuration for [`obfuscate`].
struct ObfuscateConfig {
    strategy: Strategy,
    seed: Option<u64>,
}

/// Parse, collect, plan and rewrite `source`. `path` is used in messages only.
fn obfuscate(source: &str, path: &Path, config: &ObfuscateConfig) -> Result<String> {
    let parsed = parse::parse_script(source, path)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    let candidates = collect::collect(&parsed);
    debug!(
        functions = candidates.functions.len(),
        variables = candidates.variables.len(),
        literals = candidates.literals.len(),
        "collected candidates"
    );
    for decl in candidates.functions.iter().chain(&candidates.variables) {
        trace!(name = %decl.name, category = ?decl.category, at = ?parsed.range(decl.span), "declaration");
    }
    for literal in &candidates.literals {
        trace!(raw = %literal.raw, at = ?parsed.range(literal.span), "literal");
    }

    let mut tokens = TokenGenerator::seeded(config.seed);
    let renames = rewrite::build_rename_map(&candidates, &mut tokens);
    for rename in &renames {
        trace!(name = %rename.name, token = %rename.token, "rename");
    }

    Ok(rewrite::rewrite(&parsed, &candidates, &renames, config.strategy))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let source = fs::read_to_string(&cli.input)
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;

    let config = ObfuscateConfig {
        strategy: cli.strategy.into(),
        seed: cli.seed,
    };
    let result = obfuscate(&source, &cli.input, &config)?;

    match &cli.output {
        Some(output) => fs::write(output, &result)
            .with_context(|| format!("Failed to write {}", output.display()))?,
        None => println!("{result}"),
    }

    Ok(())
}
