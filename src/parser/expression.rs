use crate::ast::{DeclarationVariable, Expression};
use crate::operator::{decide, Action, Lookahead, StackOperator};
use crate::token::TokenKind;
use super::{ParseResult, Parser};

impl<'src, 'sink> Parser<'src, 'sink> {
    /// `;` で区切られた行の並び。`a; b; c` は `a; (b; c)` になる
    pub fn parse_expression(&mut self) -> ParseResult<Expression> {
        let mut lines = Vec::new();
        let mut last = self.parse_line()?;
        while self.lexer.peek_token().is(TokenKind::Semicolon) {
            self.lexer.consume_token();
            lines.push(last);
            last = self.parse_line()?;
        }
        Ok(lines
            .into_iter()
            .rev()
            .fold(last, |next, previous| Expression::semicolon(previous, next)))
    }

    /// 二項演算子の列を優先度に従って木にする
    pub fn parse_line(&mut self) -> ParseResult<Expression> {
        self.parse_line_with(|_, _, _| {})
    }

    /// 演算子順位法の本体。判定ごとに `on_step` を呼ぶ
    ///
    /// 被演算子スタックと演算子スタックを持ち、演算子スタックの底には番兵を置く。
    pub(crate) fn parse_line_with(
        &mut self,
        mut on_step: impl FnMut(StackOperator, Lookahead, Action),
    ) -> ParseResult<Expression> {
        let mut operands = vec![self.parse_primary()?];
        let mut operators = vec![StackOperator::Start];
        loop {
            let token = self.lexer.peek_token();
            let incoming = Lookahead::from_token(token.kind);
            let top = operators.last().copied().unwrap_or(StackOperator::Start);
            let action = decide(top, incoming);
            tracing::trace!(?top, ?incoming, ?action, "operator precedence");
            on_step(top, incoming, action);
            match action {
                Action::Shift(op) => {
                    self.lexer.consume_token();
                    operators.push(StackOperator::Binary(op));
                    operands.push(self.parse_primary()?);
                }
                Action::Reduce => {
                    let (Some(right), Some(left), Some(StackOperator::Binary(op))) =
                        (operands.pop(), operands.pop(), operators.pop())
                    else {
                        return self.error("expression", token);
                    };
                    operands.push(Expression::binary(left, op, right));
                }
                Action::Accept => {
                    return match operands.pop() {
                        Some(expression) if operands.is_empty() => Ok(expression),
                        _ => self.error("expression", token),
                    };
                }
            }
        }
    }

    /// 一次式。何も当てはまらなければトークンを消費せずに `Nop`
    pub fn parse_primary(&mut self) -> ParseResult<Expression> {
        let token = self.lexer.peek_token();
        match token.kind {
            TokenKind::Identifier => match token.keyword() {
                Some(TokenKind::Let | TokenKind::Var) => {
                    self.parse_declaration_variable().map(Expression::DeclarationVariable)
                }
                _ => {
                    self.lexer.consume_token();
                    Ok(Expression::Identifier(token.text))
                }
            },
            TokenKind::Number => {
                self.lexer.consume_token();
                Ok(Expression::Number(token.text))
            }
            TokenKind::String => {
                self.lexer.consume_token();
                Ok(Expression::String(token.text))
            }
            TokenKind::Char => {
                self.lexer.consume_token();
                Ok(Expression::Char(token.text))
            }
            TokenKind::LeftParen => {
                self.lexer.consume_token();
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RightParen, ")")?;
                Ok(inner)
            }
            TokenKind::LeftBrace => self.parse_block().map(Expression::Block),
            _ => Ok(Expression::Nop),
        }
    }

    /// `let name[: type]` / `var name[: type]`
    pub fn parse_declaration_variable(&mut self) -> ParseResult<DeclarationVariable> {
        let keyword = self.lexer.get_token();
        let is_mutable = keyword.keyword() == Some(TokenKind::Var);
        let name = self.expect_identifier("variable name")?;
        let mut type_name = None;
        if self.lexer.peek_token().is(TokenKind::Colon) {
            self.lexer.consume_token();
            type_name = Some(self.expect_identifier("variable type")?);
        }
        Ok(DeclarationVariable { name, type_name, is_mutable })
    }
}
