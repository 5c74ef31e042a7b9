//! JavaScript parsing via SWC.
//!
//! Sources are parsed as classic scripts (JScript hosts have no modules).
//! The parser recovers from minor syntax errors on its own; those are logged
//! and the tree is kept. Anything it cannot recover from is a [`ParseError`]
//! and no output is produced.

use std::ops::Range;
use std::path::Path;

use swc_common::{sync::Lrc, BytePos, FileName, SourceMap, Span, Spanned};
use swc_ecma_ast::{EsVersion, Script};
use swc_ecma_parser::{lexer::Lexer, EsSyntax, Parser, StringInput, Syntax};
use thiserror::Error;

/// Unrecoverable syntax error, positioned 1-based.
#[derive(Error, Debug)]
#[error("{file}:{line}:{column}: {message}")]
pub struct ParseError {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

const BOM: char = '\u{feff}';

/// A parsed script together with the text it was parsed from.
pub struct ParsedScript {
    pub script: Script,
    source: String,
    base: BytePos,
    bom: bool,
}

impl ParsedScript {
    /// The text that was parsed, without a leading byte order mark.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The byte order mark the input started with, or `""`.
    pub fn bom(&self) -> &'static str {
        if self.bom {
            "\u{feff}"
        } else {
            ""
        }
    }

    /// Byte range of `span` within [`Self::source`].
    pub fn range(&self, span: Span) -> Range<usize> {
        let start = (span.lo.0 - self.base.0) as usize;
        let end = (span.hi.0 - self.base.0) as usize;
        start..end
    }

    /// Source text covered by `span`.
    pub fn text(&self, span: Span) -> &str {
        &self.source[self.range(span)]
    }
}

/// Parse `source` as a script. `path` is only used for diagnostics.
pub fn parse_script(source: &str, path: &Path) -> Result<ParsedScript, ParseError> {
    // SWC skips a BOM without counting it in spans
    let (source, bom) = match source.strip_prefix(BOM) {
        Some(rest) => (rest, true),
        None => (source, false),
    };

    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(
        Lrc::new(FileName::Real(path.to_path_buf())),
        source.to_string(),
    );

    let lexer = Lexer::new(
        Syntax::Es(EsSyntax::default()),
        EsVersion::EsNext,
        StringInput::from(&*fm),
        None,
    );
    let mut parser = Parser::new_from(lexer);
    let result = parser.parse_script();

    for e in parser.take_errors() {
        let loc = cm.lookup_char_pos(e.span().lo);
        tracing::warn!(
            line = loc.line,
            column = loc.col_display + 1,
            "recovered from syntax error: {}",
            e.kind().msg()
        );
    }

    let script = result.map_err(|e| {
        let loc = cm.lookup_char_pos(e.span().lo);
        ParseError {
            file: path.display().to_string(),
            line: loc.line,
            column: loc.col_display + 1,
            message: e.kind().msg().into_owned(),
        }
    })?;

    Ok(ParsedScript {
        script,
        source: source.to_string(),
        base: fm.start_pos,
        bom,
    })
}
