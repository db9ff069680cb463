mod expression;

use std::io::Write;
use std::rc::Rc;
use crate::ast::{Argument, BlockExpression, DeclarationFunction, Module, Root, TopLevel};
use crate::errors::{ParseError, SyntaxError};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

pub type ParseResult<T> = Result<T, ParseError>;

/// 再帰下降の構文解析器
///
/// 最初の構文エラーで1行の診断を `diagnostics` に書き出して中断する。
/// 途中まで組み立てた木は `?` で捨てられる。
pub struct Parser<'src, 'sink> {
    lexer: Lexer<'src>,
    diagnostics: &'sink mut dyn Write,
}

impl<'src, 'sink> Parser<'src, 'sink> {
    pub fn new(lexer: Lexer<'src>, diagnostics: &'sink mut dyn Write) -> Self {
        Self { lexer, diagnostics }
    }

    /// ファイル終端まで最上位の宣言を読む
    pub fn parse_root(&mut self) -> ParseResult<Root> {
        let mut root = Root::default();
        while !self.lexer.peek_token().is(TokenKind::EndOfFile) {
            root.items.push(self.parse_top_level()?);
        }
        Ok(root)
    }

    pub fn parse_top_level(&mut self) -> ParseResult<TopLevel> {
        let token = self.lexer.peek_token();
        match token.keyword() {
            Some(TokenKind::Module) => self.parse_module().map(TopLevel::Module),
            Some(TokenKind::Fn) => self.parse_function().map(TopLevel::Function),
            _ => self.error("top level declaration", token),
        }
    }

    /// `module name { top_level* }`
    pub fn parse_module(&mut self) -> ParseResult<Module> {
        self.lexer.consume_token();
        let name = self.expect_identifier("module name")?;
        self.expect(TokenKind::LeftBrace, "{")?;
        let mut items = Vec::new();
        while !self.lexer.peek_token().is(TokenKind::RightBrace) {
            items.push(self.parse_top_level()?);
        }
        self.lexer.consume_token();
        Ok(Module { name, items })
    }

    /// `fn name(arg: type, ...) -> type { ... }`
    pub fn parse_function(&mut self) -> ParseResult<DeclarationFunction> {
        self.lexer.consume_token();
        let name = self.expect_identifier("function name")?;
        self.expect(TokenKind::LeftParen, "(")?;
        let mut arguments = Vec::new();
        if self.lexer.peek_token().is(TokenKind::RightParen) {
            self.lexer.consume_token();
        } else {
            loop {
                arguments.push(self.parse_argument()?);
                let token = self.lexer.get_token();
                match token.kind {
                    TokenKind::Comma => continue,
                    TokenKind::RightParen => break,
                    _ => return self.error(", or )", token),
                }
            }
        }
        self.expect(TokenKind::Arrow, "->")?;
        let return_type = self.expect_identifier("return type")?;
        let body = self.parse_block()?;
        Ok(DeclarationFunction { name, arguments, return_type, body })
    }

    pub fn parse_argument(&mut self) -> ParseResult<Argument> {
        let name = self.expect_identifier("argument name")?;
        self.expect(TokenKind::Colon, ":")?;
        let type_name = self.expect_identifier("argument type")?;
        Ok(Argument { name, type_name })
    }

    /// `{ expression }`
    pub fn parse_block(&mut self) -> ParseResult<BlockExpression> {
        self.expect(TokenKind::LeftBrace, "{")?;
        let inner = self.parse_expression()?;
        self.expect(TokenKind::RightBrace, "}")?;
        Ok(BlockExpression { inner: Box::new(inner) })
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> ParseResult<Token> {
        let token = self.lexer.get_token();
        if token.is(kind) {
            Ok(token)
        } else {
            self.error(expected, token)
        }
    }

    fn expect_identifier(&mut self, expected: &str) -> ParseResult<Rc<str>> {
        match self.lexer.get_token().identifier() {
            Ok(name) => Ok(name),
            Err(token) => self.error(expected, token),
        }
    }

    /// 診断を1行書いて中断する
    fn error<T>(&mut self, expected: &str, found: Token) -> ParseResult<T> {
        let error = SyntaxError::new(expected, found);
        writeln!(self.diagnostics, "{}", error)?;
        tracing::debug!(%error, "parse aborted");
        Err(error.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> (ParseResult<Root>, String) {
        let mut sink = Vec::new();
        let result = Parser::new(Lexer::new(source), &mut sink).parse_root();
        (result, String::from_utf8(sink).unwrap())
    }

    fn diagnostic(source: &str) -> String {
        let (result, diagnostics) = parse(source);
        assert!(result.is_err(), "{source} should not parse");
        diagnostics
    }

    #[test]
    fn test_empty_source() {
        let (result, diagnostics) = parse("  \n ");
        assert!(result.unwrap().items.is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_function() {
        let (result, diagnostics) = parse("fn id(x: int) -> int { x }");
        let root = result.unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(root.items.len(), 1);
        let TopLevel::Function(function) = &root.items[0] else {
            panic!("expected function, got {:?}", root.items[0]);
        };
        assert_eq!(&*function.name, "id");
        assert_eq!(function.arguments, vec![Argument { name: "x".into(), type_name: "int".into() }]);
        assert_eq!(&*function.return_type, "int");
        assert_eq!(format!("{:?}", function.body), "{ x }");
    }

    #[test]
    fn test_function_arguments() {
        let (result, _) = parse("fn add(a: int, b: int, c: float) -> int { a + b }");
        let root = result.unwrap();
        assert_eq!(format!("{:?}", root), "fn add(a: int, b: int, c: float) -> int { (a + b) }");
    }

    #[test]
    fn test_empty_body_is_nop() {
        let (result, _) = parse("fn f() -> unit { }");
        let root = result.unwrap();
        let TopLevel::Function(function) = &root.items[0] else {
            panic!("expected function");
        };
        assert!(function.arguments.is_empty());
        assert!(function.body.inner.is_nop());
    }

    #[test]
    fn test_nested_modules() {
        let (result, diagnostics) = parse("module a { fn f() -> unit { } module b { } } fn g() -> int { 1 }");
        let root = result.unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(root.items.len(), 2);
        let TopLevel::Module(module) = &root.items[0] else {
            panic!("expected module, got {:?}", root.items[0]);
        };
        assert_eq!(&*module.name, "a");
        assert_eq!(module.items.len(), 2);
        assert!(matches!(&module.items[1], TopLevel::Module(inner) if &*inner.name == "b" && inner.items.is_empty()));
        assert!(matches!(&root.items[1], TopLevel::Function(function) if &*function.name == "g"));
    }

    #[test]
    fn test_missing_arrow() {
        assert_eq!(
            diagnostic("fn f() int { 1 }"),
            "Expected ->, got Token{ type: IDENTIFIER, value: int }\n"
        );
    }

    #[test]
    fn test_top_level_must_be_declaration() {
        assert_eq!(
            diagnostic("let x"),
            "Expected top level declaration, got Token{ type: IDENTIFIER, value: let }\n"
        );
    }

    #[test]
    fn test_unclosed_module() {
        assert_eq!(
            diagnostic("module m { fn f() -> int { 1 }"),
            "Expected top level declaration, got Token{ type: END_OF_FILE, value:  }\n"
        );
    }

    #[test]
    fn test_argument_errors() {
        assert_eq!(
            diagnostic("fn f(x int) -> int { x }"),
            "Expected :, got Token{ type: IDENTIFIER, value: int }\n"
        );
        assert_eq!(
            diagnostic("fn f(x: int y: int) -> int { x }"),
            "Expected , or ), got Token{ type: IDENTIFIER, value: y }\n"
        );
        assert_eq!(
            diagnostic("fn f(1) -> int { 1 }"),
            "Expected argument name, got Token{ type: NUMBER, value: 1 }\n"
        );
    }

    #[test]
    fn test_missing_closing_brace() {
        assert_eq!(
            diagnostic("fn f() -> int { 1 2 }"),
            "Expected }, got Token{ type: NUMBER, value: 2 }\n"
        );
    }

    #[test]
    fn test_lexical_error_reaches_diagnostic() {
        assert_eq!(
            diagnostic("fn f() -> char { 'ab' }"),
            "Expected }, got Token{ type: ERROR, value: Expected ' }\n"
        );
    }

    #[test]
    fn test_error_is_syntax() {
        let (result, _) = parse("module { }");
        let error = result.unwrap_err();
        let syntax = error.syntax().unwrap();
        assert_eq!(syntax.expected, "module name");
        assert_eq!(syntax.found, Token::new(TokenKind::LeftBrace, "{"));
    }
}
