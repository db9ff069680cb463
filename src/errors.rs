use std::io;
use thiserror::Error;
use crate::token::Token;

/// 字句解析のエラー
///
/// トークン列とは別の経路には流れない。字句解析器がエラートークンか
/// `OTHER` トークンに変換する。
#[derive(Error, Debug, Clone, Default, PartialEq, Eq)]
pub enum LexError {
    #[default]
    #[error("Unrecognized character")]
    Unrecognized,
    #[error("Expected '")]
    UnterminatedChar,
    #[error("Expected \"")]
    UnterminatedString,
}

/// 期待したものと実際のトークンの食い違い
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Expected {expected}, got {found}")]
pub struct SyntaxError {
    pub expected: String,
    pub found: Token,
}

impl SyntaxError {
    pub fn new(expected: impl Into<String>, found: Token) -> Self {
        SyntaxError { expected: expected.into(), found }
    }
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error("failed to write diagnostic: {0}")]
    Sink(#[from] io::Error),
}

impl ParseError {
    pub fn syntax(&self) -> Option<&SyntaxError> {
        match self {
            ParseError::Syntax(error) => Some(error),
            ParseError::Sink(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    #[test]
    fn test_syntax_error_message() {
        let error = SyntaxError::new("->", Token::new(TokenKind::LeftBrace, "{"));
        assert_eq!(error.to_string(), "Expected ->, got Token{ type: LEFT_BRACE, value: { }");
    }

    #[test]
    fn test_lex_error_messages() {
        assert_eq!(LexError::UnterminatedChar.to_string(), "Expected '");
        assert_eq!(LexError::UnterminatedString.to_string(), "Expected \"");
    }
}
