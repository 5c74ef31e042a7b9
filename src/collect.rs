//! Candidate discovery over the parsed script.
//!
//! Walks statements recursively and records three kinds of candidates:
//!
//! - function declarations
//! - variable declarations with exactly one declarator (`var a = ...`;
//!   `var a, b` is skipped entirely)
//! - string literals used as such a declaration's initializer, as arguments of
//!   a `new` initializer, or as arguments of a call statement
//!
//! The walk matches every statement shape explicitly, so a new `Stmt` variant
//! in the parser shows up here as a compile error rather than a silent skip.

use std::collections::HashSet;

use swc_common::Span;
use swc_ecma_ast::{Decl, Expr, ExprOrSpread, Ident, Lit, Pat, Stmt, Str, VarDecl};

use crate::encode::decode_literal;
use crate::parse::ParsedScript;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Function,
    Variable,
}

/// A declared name eligible for renaming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameCandidate {
    pub name: String,
    pub span: Span,
    pub category: Category,
}

/// A string literal eligible for encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralCandidate {
    /// Source text including the quotes.
    pub raw: String,
    /// Decoded value as UTF-16 code units. May hold lone surrogates.
    pub units: Vec<u16>,
    pub span: Span,
}

/// Candidates in discovery order. Names are unique per category, literals are
/// unique by raw text.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Candidates {
    pub functions: Vec<NameCandidate>,
    pub variables: Vec<NameCandidate>,
    pub literals: Vec<LiteralCandidate>,
}

/// Collect all candidates from `parsed`.
pub fn collect(parsed: &ParsedScript) -> Candidates {
    let mut collector = Collector {
        parsed,
        candidates: Candidates::default(),
        seen_functions: HashSet::new(),
        seen_variables: HashSet::new(),
        seen_literals: HashSet::new(),
    };
    collector.visit_stmts(&parsed.script.body);
    collector.candidates
}

struct Collector<'a> {
    parsed: &'a ParsedScript,
    candidates: Candidates,
    seen_functions: HashSet<String>,
    seen_variables: HashSet<String>,
    seen_literals: HashSet<String>,
}

impl Collector<'_> {
    fn visit_stmts(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.visit_stmt(stmt);
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Decl(decl) => self.visit_decl(decl),
            // foo("bar");
            Stmt::Expr(expr_stmt) => {
                if let Expr::Call(call) = &*expr_stmt.expr {
                    self.string_args(&call.args);
                }
            }
            Stmt::Block(block) => self.visit_stmts(&block.stmts),
            Stmt::Try(try_stmt) => {
                self.visit_stmts(&try_stmt.block.stmts);
                if let Some(handler) = &try_stmt.handler {
                    self.visit_stmts(&handler.body.stmts);
                }
                if let Some(finalizer) = &try_stmt.finalizer {
                    self.visit_stmts(&finalizer.stmts);
                }
            }
            Stmt::If(if_stmt) => {
                self.visit_stmt(&if_stmt.cons);
                if let Some(alt) = &if_stmt.alt {
                    self.visit_stmt(alt);
                }
            }
            Stmt::Switch(switch) => {
                for case in &switch.cases {
                    self.visit_stmts(&case.cons);
                }
            }
            Stmt::While(s) => self.visit_stmt(&s.body),
            Stmt::DoWhile(s) => self.visit_stmt(&s.body),
            Stmt::For(s) => self.visit_stmt(&s.body),
            Stmt::ForIn(s) => self.visit_stmt(&s.body),
            Stmt::ForOf(s) => self.visit_stmt(&s.body),
            Stmt::Labeled(s) => self.visit_stmt(&s.body),
            Stmt::With(s) => self.visit_stmt(&s.body),
            Stmt::Return(_)
            | Stmt::Throw(_)
            | Stmt::Break(_)
            | Stmt::Continue(_)
            | Stmt::Empty(_)
            | Stmt::Debugger(_) => {}
        }
    }

    fn visit_decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Fn(fn_decl) => {
                self.push_name(&fn_decl.ident, Category::Function);
                if let Some(body) = &fn_decl.function.body {
                    self.visit_stmts(&body.stmts);
                }
            }
            Decl::Var(var) => self.visit_var(var),
            Decl::Class(_)
            | Decl::Using(_)
            | Decl::TsInterface(_)
            | Decl::TsTypeAlias(_)
            | Decl::TsEnum(_)
            | Decl::TsModule(_) => {}
        }
    }

    fn visit_var(&mut self, var: &VarDecl) {
        let [declarator] = var.decls.as_slice() else {
            return;
        };
        // Destructuring patterns have no single name to rename
        let Pat::Ident(binding) = &declarator.name else {
            return;
        };
        self.push_name(&binding.id, Category::Variable);

        match declarator.init.as_deref() {
            // var x = "a";
            Some(Expr::Lit(Lit::Str(s))) => self.push_literal(s),
            // var x = new Object("a");
            Some(Expr::New(new)) => {
                if let Some(args) = &new.args {
                    self.string_args(args);
                }
            }
            _ => {}
        }
    }

    fn string_args(&mut self, args: &[ExprOrSpread]) {
        for arg in args {
            if arg.spread.is_some() {
                continue;
            }
            if let Expr::Lit(Lit::Str(s)) = &*arg.expr {
                self.push_literal(s);
            }
        }
    }

    fn push_name(&mut self, ident: &Ident, category: Category) {
        let name = ident.sym.to_string();
        let (seen, out) = match category {
            Category::Function => (&mut self.seen_functions, &mut self.candidates.functions),
            Category::Variable => (&mut self.seen_variables, &mut self.candidates.variables),
        };
        if seen.insert(name.clone()) {
            out.push(NameCandidate {
                name,
                span: ident.span,
                category,
            });
        }
    }

    fn push_literal(&mut self, s: &Str) {
        let raw = self.parsed.text(s.span).to_string();
        if self.seen_literals.insert(raw.clone()) {
            self.candidates.literals.push(LiteralCandidate {
                raw: raw.clone(),
                units: decode_literal(&raw).unwrap_or_else(|| s.value.encode_utf16().collect()),
                span: s.span,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_script;

    fn utf16(value: &str) -> Vec<u16> {
        value.encode_utf16().collect()
    }
    use std::path::Path;

    fn candidates(source: &str) -> Candidates {
        let parsed = parse_script(source, Path::new("test.js")).unwrap();
        collect(&parsed)
    }

    fn names(list: &[NameCandidate]) -> Vec<&str> {
        list.iter().map(|c| c.name.as_str()).collect()
    }

    fn raws(list: &[LiteralCandidate]) -> Vec<&str> {
        list.iter().map(|c| c.raw.as_str()).collect()
    }

    #[test]
    fn collects_all_three_kinds() {
        let c = candidates(r#"var a = "hi"; function f(){ console.log(a); }"#);
        assert_eq!(names(&c.functions), vec!["f"]);
        assert_eq!(names(&c.variables), vec!["a"]);
        assert_eq!(raws(&c.literals), vec![r#""hi""#]);
        assert_eq!(c.literals[0].units, utf16("hi"));
        assert_eq!(c.functions[0].category, Category::Function);
        assert_eq!(c.variables[0].category, Category::Variable);
    }

    #[test]
    fn skips_multi_declarator() {
        let c = candidates(r#"var a, b = "x";"#);
        assert!(c.variables.is_empty());
        assert!(c.literals.is_empty());
    }

    #[test]
    fn skips_numeric_literals() {
        let c = candidates("var x, y = 5; var z = 7; f(1, true, null);");
        assert_eq!(names(&c.variables), vec!["z"]);
        assert!(c.literals.is_empty());
    }

    #[test]
    fn declaration_without_initializer() {
        let c = candidates("var x; let y = compute();");
        assert_eq!(names(&c.variables), vec!["x", "y"]);
        assert!(c.literals.is_empty());
    }

    #[test]
    fn constructor_string_arguments() {
        let c = candidates(r#"var o = new ActiveXObject("WScript.Shell", 1, 'two');"#);
        assert_eq!(names(&c.variables), vec!["o"]);
        assert_eq!(raws(&c.literals), vec![r#""WScript.Shell""#, "'two'"]);
        assert_eq!(c.literals[1].units, utf16("two"));
    }

    #[test]
    fn call_statement_arguments() {
        let c = candidates(r#"WScript.Echo("a", x, ...rest); alert('b');"#);
        assert_eq!(raws(&c.literals), vec![r#""a""#, "'b'"]);
    }

    #[test]
    fn ignores_non_call_expression_statements() {
        let c = candidates(r#"x = "s"; y = f("t");"#);
        assert!(c.literals.is_empty());
    }

    #[test]
    fn ignores_spread_and_non_string_initializers() {
        let c = candidates(r#"var a = ("p"); var b = g("q"); f(...["r"]);"#);
        assert_eq!(names(&c.variables), vec!["a", "b"]);
        assert!(c.literals.is_empty());
    }

    #[test]
    fn recurses_into_compound_statements() {
        let src = r#"
try {
  var inTry = "t";
} catch (e) {
  var inCatch = "c";
} finally {
  var inFinally = "f";
}
if (x) { var inIf = 1; } else var inElse = 2;
for (var i = 0; i < 3; i++) { log("loop"); }
while (x) { var inWhile; }
do { var inDo; } while (x);
for (var k in o) { var inForIn; }
switch (x) { case 1: var inCase = "s"; }
outer: { var inLabel; }
{ var inBlock; }
"#;
        let c = candidates(src);
        assert_eq!(
            names(&c.variables),
            vec![
                "inTry", "inCatch", "inFinally", "inIf", "inElse", "inWhile", "inDo", "inForIn",
                "inCase", "inLabel", "inBlock"
            ]
        );
        assert_eq!(
            raws(&c.literals),
            vec![r#""t""#, r#""c""#, r#""f""#, r#""loop""#, r#""s""#]
        );
    }

    #[test]
    fn visits_function_bodies() {
        let c = candidates(r#"function outer() { var inner = "v"; function nested() {} }"#);
        assert_eq!(names(&c.functions), vec!["outer", "nested"]);
        assert_eq!(names(&c.variables), vec!["inner"]);
        assert_eq!(raws(&c.literals), vec![r#""v""#]);
    }

    #[test]
    fn leaf_statements_end_recursion() {
        let c = candidates(r#"function f() { return g("no"); } class K { m() { var hidden; } }"#);
        assert_eq!(names(&c.functions), vec!["f"]);
        assert!(c.variables.is_empty());
        assert!(c.literals.is_empty());
    }

    #[test]
    fn skips_destructuring() {
        let c = candidates("var { a } = o; var [b] = list;");
        assert!(c.variables.is_empty());
    }

    #[test]
    fn deduplicates_by_name_and_raw() {
        let c = candidates(r#"var a = "x"; var a = "x"; f("x"); f('x');"#);
        assert_eq!(names(&c.variables), vec!["a"]);
        assert_eq!(raws(&c.literals), vec![r#""x""#, "'x'"]);
    }

    #[test]
    fn same_name_in_both_categories() {
        let c = candidates("function f() {} var f = 1;");
        assert_eq!(names(&c.functions), vec!["f"]);
        assert_eq!(names(&c.variables), vec!["f"]);
    }

    #[test]
    fn collection_is_idempotent() {
        let src = r#"var a = "1"; function b() { try { c("2"); } finally { var d; } }"#;
        let parsed = parse_script(src, Path::new("test.js")).unwrap();
        assert_eq!(collect(&parsed), collect(&parsed));
    }

    #[test]
    fn literal_value_is_decoded() {
        let c = candidates(r#"f("a\tb\x41");"#);
        assert_eq!(c.literals[0].raw, r#""a\tb\x41""#);
        assert_eq!(c.literals[0].units, utf16("a\tbA"));
    }

    #[test]
    fn lone_surrogate_escape_is_kept() {
        let c = candidates(r#"f("\uD800x"); var s = '\uDFFF';"#);
        assert_eq!(raws(&c.literals), vec![r#""\uD800x""#, r"'\uDFFF'"]);
        assert_eq!(c.literals[0].units, vec![0xd800, 0x78]);
        assert_eq!(c.literals[1].units, vec![0xdfff]);
    }
}
