use logos::Logos;
use crate::errors::LexError;
use crate::token::{Token, TokenKind};

/// 1トークン分の押し戻しを持つ字句解析器
///
/// 押し戻しは直前に返したトークン1つだけ。次の取得までに2回押し戻すのは
/// 呼び出し側の誤用で、検査はしない。入力の終わりでは `END_OF_FILE` を返し続ける。
pub struct Lexer<'a> {
    core: logos::Lexer<'a, TokenKind>,
    last: Token,
    unget: bool,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            core: TokenKind::lexer(input),
            last: Token::end_of_file(),
            unget: false,
            finished: false,
        }
    }

    pub fn get_token(&mut self) -> Token {
        if self.unget {
            self.unget = false;
            return self.last.clone();
        }
        let token = self.scan();
        tracing::trace!(%token, "scanned");
        self.last = token.clone();
        token
    }

    /// 直前のトークンを次の `get_token` で再び返させる
    pub fn unget_token(&mut self) {
        self.unget = true;
    }

    /// 押し戻し枠を任意のトークンで置き換える
    pub fn put_back_token(&mut self, token: Token) {
        self.last = token;
        self.unget = true;
    }

    pub fn peek_token(&mut self) -> Token {
        let token = self.get_token();
        self.unget_token();
        token
    }

    pub fn consume_token(&mut self) {
        self.get_token();
    }

    fn scan(&mut self) -> Token {
        let Some(result) = self.core.next() else {
            return Token::end_of_file();
        };
        match result {
            Ok(kind @ (TokenKind::String | TokenKind::Char)) => {
                let slice = self.core.slice();
                Token::new(kind, unescape(&slice[1..slice.len() - 1]))
            }
            Ok(kind) => Token::new(kind, self.core.slice()),
            Err(LexError::Unrecognized) => self.other(),
            Err(error) => Token::new(TokenKind::Error, error.to_string()),
        }
    }

    /// 認識できない文字は1文字ずつ `OTHER` にする
    fn other(&mut self) -> Token {
        let span = self.core.span();
        let Some(c) = self.core.source().get(span.start..).and_then(|rest| rest.chars().next()) else {
            return Token::end_of_file();
        };
        let end = span.start + c.len_utf8();
        if end > span.end {
            self.core.bump(end - span.end);
        }
        Token::new(TokenKind::Other, c.to_string())
    }
}

/// 終端の `END_OF_FILE` を含めて一度だけ列挙する
impl<'a> Iterator for Lexer<'a> {
    type Item = Token;
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let token = self.get_token();
        if token.is(TokenKind::EndOfFile) {
            self.finished = true;
        }
        Some(token)
    }
}

/// `\n \r \t \\ \' \"` を復号する。未知のエスケープはバックスラッシュを落として次の文字を残す
fn unescape(raw: &str) -> String {
    let mut text = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            text.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => text.push('\n'),
            Some('r') => text.push('\r'),
            Some('t') => text.push('\t'),
            Some(escaped) => text.push(escaped),
            None => {}
        }
    }
    text
}
