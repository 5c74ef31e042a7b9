//! Applies the rename map and literal encodings to the source text.
//!
//! Two strategies:
//!
//! - **Textual** (default): every whole-word occurrence of a name is replaced
//!   across the whole buffer, longest names first; then every occurrence of a
//!   literal's raw text. Variables keep their spelling where they appear as a
//!   property name (`obj.name`) or object key (`{ name: ... }`). Names also
//!   get replaced inside strings and comments, which can break a literal's
//!   later match. That is accepted behavior for this strategy.
//! - **Ranged**: edits are taken from identifier and string-literal nodes of
//!   the tree, so strings, comments and property names are never touched.
//!
//! A leading byte order mark is carried over to the output unchanged.

use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;
use swc_ecma_ast::{AssignPatProp, Expr, Ident, Lit, Prop};
use swc_ecma_visit::{Visit, VisitWith};

use crate::collect::{Candidates, Category, LiteralCandidate};
use crate::encode::encode;
use crate::parse::ParsedScript;
use crate::token::TokenGenerator;

/// Maximal runs of identifier-continuation characters. A name matches only
/// when it is an entire run, which gives word-boundary semantics.
static RE_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w$\x{200C}\x{200D}]+").unwrap());

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strategy {
    #[default]
    Textual,
    Ranged,
}

/// One entry of the rename map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub name: String,
    pub token: String,
    pub category: Category,
}

/// Assign a same-length token to every function and variable name.
///
/// Entries come out longest name first; ties keep discovery order with
/// functions ahead of variables. A name declared both ways keeps its first
/// (function) entry.
pub fn build_rename_map<R: Rng>(
    candidates: &Candidates,
    tokens: &mut TokenGenerator<R>,
) -> Vec<Rename> {
    let mut seen = HashSet::new();
    let mut renames: Vec<Rename> = candidates
        .functions
        .iter()
        .chain(&candidates.variables)
        .filter(|c| seen.insert(c.name.as_str()))
        .map(|c| Rename {
            name: c.name.clone(),
            token: tokens.generate(c.name.chars().count()),
            category: c.category,
        })
        .collect();
    renames.sort_by(|a, b| b.name.chars().count().cmp(&a.name.chars().count()));
    renames
}

/// Produce the obfuscated text of `parsed`.
pub fn rewrite(
    parsed: &ParsedScript,
    candidates: &Candidates,
    renames: &[Rename],
    strategy: Strategy,
) -> String {
    let text = match strategy {
        Strategy::Textual => rewrite_textual(parsed.source(), renames, &candidates.literals),
        Strategy::Ranged => rewrite_ranged(parsed, renames, &candidates.literals),
    };
    format!("{}{text}", parsed.bom())
}

/// Global whole-word substitution over the buffer.
pub fn rewrite_textual(source: &str, renames: &[Rename], literals: &[LiteralCandidate]) -> String {
    let mut text = source.to_string();
    for rename in renames {
        let keep_properties = rename.category == Category::Variable;
        text = replace_word(&text, &rename.name, &rename.token, keep_properties);
    }
    // Longest raw first so a literal is never replaced inside a longer one
    let mut literals: Vec<&LiteralCandidate> = literals.iter().collect();
    literals.sort_by(|a, b| b.raw.len().cmp(&a.raw.len()));
    for literal in literals {
        text = text.replace(&literal.raw, &encode(&literal.units));
    }
    text
}

/// Replace every whole-word `name` in `text` with `token`.
///
/// With `keep_properties`, occurrences in property-name or object-key
/// position are left alone.
pub fn replace_word(text: &str, name: &str, token: &str, keep_properties: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in RE_WORD.find_iter(text) {
        if m.as_str() != name {
            continue;
        }
        let before = &text[..m.start()];
        let after = &text[m.end()..];
        if keep_properties && (is_member_property(before) || is_object_key(before, after)) {
            continue;
        }
        out.push_str(&text[last..m.start()]);
        out.push_str(token);
        last = m.end();
    }
    out.push_str(&text[last..]);
    out
}

/// `obj.name` or `obj?.name`, but not a `...name` spread.
fn is_member_property(before: &str) -> bool {
    let before = before.trim_end();
    before.ends_with('.') && !before.ends_with("...")
}

/// `{ name: ... }` or `, name: ...`. A `?` before rules out ternaries, and a
/// `{` that opens a block makes `name:` a statement label.
fn is_object_key(before: &str, after: &str) -> bool {
    if !after.trim_start().starts_with(':') {
        return false;
    }
    let before = before.trim_end();
    match before.strip_suffix('{') {
        Some(outer) => !opens_block(outer),
        None => before.ends_with(','),
    }
}

/// Whether a `{` following `before` starts a block rather than an object
/// literal.
fn opens_block(before: &str) -> bool {
    let before = before.trim_end();
    if before.is_empty() || before.ends_with([')', ';', '{', '}']) || before.ends_with("=>") {
        return true;
    }
    RE_WORD.find_iter(before).last().is_some_and(|m| {
        m.end() == before.len() && matches!(m.as_str(), "else" | "do" | "try" | "finally")
    })
}

/// Position-indexed substitution driven by the tree's spans.
pub fn rewrite_ranged(
    parsed: &ParsedScript,
    renames: &[Rename],
    literals: &[LiteralCandidate],
) -> String {
    let mut edits = EditCollector {
        parsed,
        tokens: renames
            .iter()
            .map(|r| (r.name.as_str(), r.token.as_str()))
            .collect(),
        literals: literals
            .iter()
            .map(|l| (l.raw.as_str(), encode(&l.units)))
            .collect(),
        edits: Vec::new(),
    };
    parsed.script.visit_with(&mut edits);
    apply_edits(parsed.source(), edits.edits)
}

/// Apply non-overlapping edits, back to front so earlier offsets stay valid.
fn apply_edits(source: &str, mut edits: Vec<(Range<usize>, String)>) -> String {
    edits.sort_by(|a, b| b.0.start.cmp(&a.0.start));
    let mut text = source.to_string();
    for (range, replacement) in edits {
        text.replace_range(range, &replacement);
    }
    text
}

struct EditCollector<'a> {
    parsed: &'a ParsedScript,
    tokens: HashMap<&'a str, &'a str>,
    literals: HashMap<&'a str, String>,
    edits: Vec<(Range<usize>, String)>,
}

impl Visit for EditCollector<'_> {
    // Property names and object keys are `IdentName` nodes, so they never
    // reach this method.
    fn visit_ident(&mut self, ident: &Ident) {
        if let Some(token) = self.tokens.get(&*ident.sym) {
            self.edits
                .push((self.parsed.range(ident.span), token.to_string()));
        }
    }

    fn visit_prop(&mut self, prop: &Prop) {
        // `{ a }` would silently become `{ tok }`; spell the key out
        if let Prop::Shorthand(ident) = prop {
            if let Some(token) = self.tokens.get(&*ident.sym) {
                self.edits.push((
                    self.parsed.range(ident.span),
                    format!("{}: {token}", ident.sym),
                ));
            }
            return;
        }
        prop.visit_children_with(self);
    }

    fn visit_assign_pat_prop(&mut self, prop: &AssignPatProp) {
        // `var { a } = o` binds property `a`; renaming it would read `o.tok`
        if let Some(token) = self.tokens.get(&*prop.key.sym) {
            self.edits.push((
                self.parsed.range(prop.key.span),
                format!("{}: {token}", prop.key.sym),
            ));
        }
        if let Some(value) = &prop.value {
            self.visit_expr(value);
        }
    }

    fn visit_expr(&mut self, expr: &Expr) {
        if let Expr::Lit(Lit::Str(s)) = expr {
            let range = self.parsed.range(s.span);
            if let Some(encoded) = self.literals.get(&self.parsed.source()[range.clone()]) {
                self.edits.push((range, encoded.clone()));
            }
            return;
        }
        expr.visit_children_with(self);
    }
}
