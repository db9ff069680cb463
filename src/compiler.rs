use std::io::Write;
use crate::ast;
use crate::errors::ParseError;
use crate::hir::{ModuleBuilder, TranslationUnit};
use crate::lexer::Lexer;
use crate::parser::Parser;

/// ソース全体を構文解析する。構文エラーは1行の診断として `diagnostics` に書かれる
pub fn parse_source(source: &str, diagnostics: &mut dyn Write) -> Result<ast::Root, ParseError> {
    let root = Parser::new(Lexer::new(source), diagnostics).parse_root()?;
    tracing::debug!(items = root.items.len(), "parsed");
    Ok(root)
}

/// 構文解析してHIRへ下ろす。下ろす段階は失敗しない
pub fn compile(source: &str, diagnostics: &mut dyn Write) -> Result<TranslationUnit, ParseError> {
    let root = parse_source(source, diagnostics)?;
    let mut unit = TranslationUnit::new();
    root.lower(&mut ModuleBuilder::root(&mut unit));
    tracing::debug!(
        functions = unit.functions.len(),
        unresolved = unit.unresolved().len(),
        "lowered to HIR"
    );
    Ok(unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_collects_unresolved_names() {
        let mut sink = Vec::new();
        let unit = compile("fn main() -> unit { print; y }", &mut sink).unwrap();
        assert!(sink.is_empty());
        assert_eq!(
            unit.unresolved_names().collect::<Vec<_>>(),
            ["unit", "print", "y"]
        );
    }

    #[test]
    fn test_compile_stops_at_syntax_error() {
        let mut sink = Vec::new();
        let result = compile("fn main() unit { }", &mut sink);
        assert!(result.is_err());
        assert_eq!(String::from_utf8(sink).unwrap().lines().count(), 1);
    }
}
