use std::fmt;
use std::rc::Rc;
use logos::Logos;
use crate::errors::LexError;

/// トークンの種類
///
/// 演算子・区切り文字は logos による最長一致で切り出される。
/// キーワードの種類は表に存在するが字句解析器は生成しない。
/// 識別子の形をした語はすべて [`TokenKind::Identifier`] になり、
/// キーワードは構文解析器が [`TokenKind::keyword`] で文脈的に判定する。
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[logos(error = LexError)]
#[logos(skip r"[ \t\n\r]+")]
pub enum TokenKind {
    EndOfFile,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,

    #[regex(r"[0-9]+")]
    Number,

    #[token("\"", scan_string)]
    String,

    #[token("'", scan_char)]
    Char,

    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,
    #[token("[")]
    LeftBracket,
    #[token("]")]
    RightBracket,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(";")]
    Semicolon,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("^")]
    Caret,
    #[token("&")]
    Ampersand,
    #[token("|")]
    Pipe,
    #[token("&&")]
    AmpersandAmpersand,
    #[token("||")]
    PipePipe,
    #[token("~")]
    Tilde,
    #[token("!")]
    Bang,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,
    #[token("=")]
    Equal,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token("+=")]
    PlusEqual,
    #[token("-=")]
    MinusEqual,
    #[token("*=")]
    StarEqual,
    #[token("/=")]
    SlashEqual,
    #[token("%=")]
    PercentEqual,
    #[token("&=")]
    AmpersandEqual,
    #[token("|=")]
    PipeEqual,
    #[token("^=")]
    CaretEqual,
    #[token(":=")]
    Assign,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("<<")]
    LessLess,
    #[token(">>")]
    GreaterGreater,
    #[token("<=")]
    LessEqual,
    #[token(">=")]
    GreaterEqual,
    #[token("<<=")]
    LessLessEqual,
    #[token(">>=")]
    GreaterGreaterEqual,
    #[token("==")]
    EqualEqual,
    #[token("!=")]
    BangEqual,
    #[token("->")]
    Arrow,

    // キーワード
    Let,
    Var,
    Class,
    Struct,
    Enum,
    Module,
    Fn,
    If,
    Then,
    Else,
    True,
    False,

    Other,
    Error,
}

/// 文字列リテラルの閉じ引用符を探す。エスケープされた文字は読み飛ばす
fn scan_string(lex: &mut logos::Lexer<TokenKind>) -> Result<(), LexError> {
    let mut escaped = false;
    for (offset, c) in lex.remainder().char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => {
                lex.bump(offset + 1);
                return Ok(());
            }
            _ => {}
        }
    }
    lex.bump(lex.remainder().len());
    Err(LexError::UnterminatedString)
}

/// 文字リテラルは(エスケープを含む)ちょうど1文字と閉じアポストロフィ。
/// 閉じていない場合も内容の次の1文字までは消費する
fn scan_char(lex: &mut logos::Lexer<TokenKind>) -> Result<(), LexError> {
    let mut chars = lex.remainder().chars();
    let mut consumed = 0;
    match chars.next() {
        Some('\\') => {
            consumed += 1;
            if let Some(escape) = chars.next() {
                consumed += escape.len_utf8();
            }
        }
        Some(c) => consumed += c.len_utf8(),
        None => return Err(LexError::UnterminatedChar),
    }
    match chars.next() {
        Some('\'') => {
            lex.bump(consumed + 1);
            Ok(())
        }
        Some(c) => {
            lex.bump(consumed + c.len_utf8());
            Err(LexError::UnterminatedChar)
        }
        None => {
            lex.bump(consumed);
            Err(LexError::UnterminatedChar)
        }
    }
}

impl TokenKind {
    /// 識別子のテキストをキーワードとして分類する。通常の識別子なら `None`
    pub fn keyword(text: &str) -> Option<TokenKind> {
        match text {
            "let" => Some(TokenKind::Let),
            "var" => Some(TokenKind::Var),
            "class" => Some(TokenKind::Class),
            "struct" => Some(TokenKind::Struct),
            "enum" => Some(TokenKind::Enum),
            "module" => Some(TokenKind::Module),
            "fn" => Some(TokenKind::Fn),
            "if" => Some(TokenKind::If),
            "then" => Some(TokenKind::Then),
            "else" => Some(TokenKind::Else),
            "true" => Some(TokenKind::True),
            "false" => Some(TokenKind::False),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TokenKind::EndOfFile => "END_OF_FILE",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Number => "NUMBER",
            TokenKind::String => "STRING",
            TokenKind::Char => "CHAR",
            TokenKind::LeftParen => "LEFT_PAREN",
            TokenKind::RightParen => "RIGHT_PAREN",
            TokenKind::LeftBrace => "LEFT_BRACE",
            TokenKind::RightBrace => "RIGHT_BRACE",
            TokenKind::LeftBracket => "LEFT_BRACKET",
            TokenKind::RightBracket => "RIGHT_BRACKET",
            TokenKind::Comma => "COMMA",
            TokenKind::Dot => "DOT",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "STAR",
            TokenKind::Slash => "SLASH",
            TokenKind::Percent => "PERCENT",
            TokenKind::Caret => "CARET",
            TokenKind::Ampersand => "AMPERSAND",
            TokenKind::Pipe => "PIPE",
            TokenKind::AmpersandAmpersand => "AMPERSAND_AMPERSAND",
            TokenKind::PipePipe => "PIPE_PIPE",
            TokenKind::Tilde => "TILDE",
            TokenKind::Bang => "BANG",
            TokenKind::Question => "QUESTION",
            TokenKind::Colon => "COLON",
            TokenKind::Equal => "EQUAL",
            TokenKind::Less => "LESS",
            TokenKind::Greater => "GREATER",
            TokenKind::PlusEqual => "PLUS_EQUAL",
            TokenKind::MinusEqual => "MINUS_EQUAL",
            TokenKind::StarEqual => "STAR_EQUAL",
            TokenKind::SlashEqual => "SLASH_EQUAL",
            TokenKind::PercentEqual => "PERCENT_EQUAL",
            TokenKind::AmpersandEqual => "AMPERSAND_EQUAL",
            TokenKind::PipeEqual => "PIPE_EQUAL",
            TokenKind::CaretEqual => "CARET_EQUAL",
            TokenKind::Assign => "ASSIGN",
            TokenKind::PlusPlus => "PLUS_PLUS",
            TokenKind::MinusMinus => "MINUS_MINUS",
            TokenKind::LessLess => "LESS_LESS",
            TokenKind::GreaterGreater => "GREATER_GREATER",
            TokenKind::LessEqual => "LESS_EQUAL",
            TokenKind::GreaterEqual => "GREATER_EQUAL",
            TokenKind::LessLessEqual => "LESS_LESS_EQUAL",
            TokenKind::GreaterGreaterEqual => "GREATER_GREATER_EQUAL",
            TokenKind::EqualEqual => "EQUAL_EQUAL",
            TokenKind::BangEqual => "BANG_EQUAL",
            TokenKind::Arrow => "ARROW",
            TokenKind::Let => "LET",
            TokenKind::Var => "VAR",
            TokenKind::Class => "CLASS",
            TokenKind::Struct => "STRUCT",
            TokenKind::Enum => "ENUM",
            TokenKind::Module => "MODULE",
            TokenKind::Fn => "FN",
            TokenKind::If => "IF",
            TokenKind::Then => "THEN",
            TokenKind::Else => "ELSE",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::Other => "OTHER",
            TokenKind::Error => "ERROR",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 種類とテキストの組
///
/// 識別子・数値・演算子のテキストはソースそのもの。
/// 文字列と文字はエスケープを復号した内容、エラートークンはメッセージを持つ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: Rc<str>,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<Rc<str>>) -> Self {
        Self { kind, text: text.into() }
    }

    pub fn end_of_file() -> Self {
        Self::new(TokenKind::EndOfFile, "")
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// 識別子がキーワードの綴りであればその種類を返す
    pub fn keyword(&self) -> Option<TokenKind> {
        match self.kind {
            TokenKind::Identifier => TokenKind::keyword(&self.text),
            _ => None,
        }
    }

    pub fn identifier(self) -> Result<Rc<str>, Token> {
        match self.kind {
            TokenKind::Identifier => Ok(self.text),
            _ => Err(self),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token{{ type: {}, value: {} }}", self.kind.name(), self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_diagnostic_format() {
        let token = Token::new(TokenKind::Identifier, "foo");
        assert_eq!(token.to_string(), "Token{ type: IDENTIFIER, value: foo }");
        assert_eq!(Token::end_of_file().to_string(), "Token{ type: END_OF_FILE, value:  }");
    }

    #[test]
    fn test_keyword_classification() {
        assert_eq!(TokenKind::keyword("fn"), Some(TokenKind::Fn));
        assert_eq!(TokenKind::keyword("module"), Some(TokenKind::Module));
        assert_eq!(TokenKind::keyword("let"), Some(TokenKind::Let));
        assert_eq!(TokenKind::keyword("enum"), Some(TokenKind::Enum));
        assert_eq!(TokenKind::keyword("function"), None);
        assert_eq!(TokenKind::keyword("Fn"), None);
    }

    #[test]
    fn test_keyword_only_for_identifiers() {
        assert_eq!(Token::new(TokenKind::Identifier, "var").keyword(), Some(TokenKind::Var));
        assert_eq!(Token::new(TokenKind::String, "var").keyword(), None);
    }
}
