use std::fmt;
use crate::token::TokenKind;

/// 二項演算子
#[derive(PartialEq, Eq, Clone, Copy, Hash)]
pub enum BinaryOperator {
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    PlusEqual,
    MinusEqual,
    MultiplyEqual,
    DivideEqual,
    ModuloEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Equal,
    NotEqual,
    /// `:=`
    Assign,
    /// `=`
    Substitute,
    CondAnd,
    CondOr,
    And,
    Or,
    Xor,
    AndEqual,
    OrEqual,
    XorEqual,
    LeftShift,
    RightShift,
    LeftShiftEqual,
    RightShiftEqual,
}

/// 代入系の演算子の優先度。この階級同士は還元せずにシフトする
pub const ASSIGNMENT_PRIORITY: u8 = 1;

impl BinaryOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        let op = match kind {
            TokenKind::Plus => BinaryOperator::Plus,
            TokenKind::Minus => BinaryOperator::Minus,
            TokenKind::Star => BinaryOperator::Multiply,
            TokenKind::Slash => BinaryOperator::Divide,
            TokenKind::Percent => BinaryOperator::Modulo,
            TokenKind::PlusEqual => BinaryOperator::PlusEqual,
            TokenKind::MinusEqual => BinaryOperator::MinusEqual,
            TokenKind::StarEqual => BinaryOperator::MultiplyEqual,
            TokenKind::SlashEqual => BinaryOperator::DivideEqual,
            TokenKind::PercentEqual => BinaryOperator::ModuloEqual,
            TokenKind::Less => BinaryOperator::Less,
            TokenKind::Greater => BinaryOperator::Greater,
            TokenKind::LessEqual => BinaryOperator::LessEqual,
            TokenKind::GreaterEqual => BinaryOperator::GreaterEqual,
            TokenKind::EqualEqual => BinaryOperator::Equal,
            TokenKind::BangEqual => BinaryOperator::NotEqual,
            TokenKind::Assign => BinaryOperator::Assign,
            TokenKind::Equal => BinaryOperator::Substitute,
            TokenKind::AmpersandAmpersand => BinaryOperator::CondAnd,
            TokenKind::PipePipe => BinaryOperator::CondOr,
            TokenKind::Ampersand => BinaryOperator::And,
            TokenKind::Pipe => BinaryOperator::Or,
            TokenKind::Caret => BinaryOperator::Xor,
            TokenKind::AmpersandEqual => BinaryOperator::AndEqual,
            TokenKind::PipeEqual => BinaryOperator::OrEqual,
            TokenKind::CaretEqual => BinaryOperator::XorEqual,
            TokenKind::LessLess => BinaryOperator::LeftShift,
            TokenKind::GreaterGreater => BinaryOperator::RightShift,
            TokenKind::LessLessEqual => BinaryOperator::LeftShiftEqual,
            TokenKind::GreaterGreaterEqual => BinaryOperator::RightShiftEqual,
            _ => return None,
        };
        Some(op)
    }

    /// 大きいほど強く結合する
    pub fn priority(self) -> u8 {
        match self {
            BinaryOperator::Multiply | BinaryOperator::Divide | BinaryOperator::Modulo => 11,
            BinaryOperator::Plus | BinaryOperator::Minus => 10,
            BinaryOperator::LeftShift | BinaryOperator::RightShift => 9,
            BinaryOperator::Less
            | BinaryOperator::Greater
            | BinaryOperator::LessEqual
            | BinaryOperator::GreaterEqual => 8,
            BinaryOperator::Equal | BinaryOperator::NotEqual => 7,
            BinaryOperator::And => 6,
            BinaryOperator::Xor => 5,
            BinaryOperator::Or => 4,
            BinaryOperator::CondAnd => 3,
            BinaryOperator::CondOr => 2,
            BinaryOperator::PlusEqual
            | BinaryOperator::MinusEqual
            | BinaryOperator::MultiplyEqual
            | BinaryOperator::DivideEqual
            | BinaryOperator::ModuloEqual
            | BinaryOperator::AndEqual
            | BinaryOperator::OrEqual
            | BinaryOperator::XorEqual
            | BinaryOperator::LeftShiftEqual
            | BinaryOperator::RightShiftEqual
            | BinaryOperator::Assign
            | BinaryOperator::Substitute => ASSIGNMENT_PRIORITY,
        }
    }

    pub fn is_assignment_like(self) -> bool {
        self.priority() == ASSIGNMENT_PRIORITY
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Plus => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::PlusEqual => "+=",
            BinaryOperator::MinusEqual => "-=",
            BinaryOperator::MultiplyEqual => "*=",
            BinaryOperator::DivideEqual => "/=",
            BinaryOperator::ModuloEqual => "%=",
            BinaryOperator::Less => "<",
            BinaryOperator::Greater => ">",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::Assign => ":=",
            BinaryOperator::Substitute => "=",
            BinaryOperator::CondAnd => "&&",
            BinaryOperator::CondOr => "||",
            BinaryOperator::And => "&",
            BinaryOperator::Or => "|",
            BinaryOperator::Xor => "^",
            BinaryOperator::AndEqual => "&=",
            BinaryOperator::OrEqual => "|=",
            BinaryOperator::XorEqual => "^=",
            BinaryOperator::LeftShift => "<<",
            BinaryOperator::RightShift => ">>",
            BinaryOperator::LeftShiftEqual => "<<=",
            BinaryOperator::RightShiftEqual => ">>=",
        }
    }
}

impl fmt::Debug for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// 演算子スタックの要素。底には番兵 `Start` が置かれる
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum StackOperator {
    Start,
    Binary(BinaryOperator),
}

impl StackOperator {
    pub fn priority(self) -> u8 {
        match self {
            StackOperator::Start => 0,
            StackOperator::Binary(op) => op.priority(),
        }
    }
}

/// 先読みしたトークンの解釈。二項演算子でなければ番兵 `End`
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Lookahead {
    End,
    Binary(BinaryOperator),
}

impl Lookahead {
    pub fn from_token(kind: TokenKind) -> Self {
        BinaryOperator::from_token(kind).map_or(Lookahead::End, Lookahead::Binary)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Action {
    /// 先読みの演算子を消費して積み、次の一次式を解析する
    Shift(BinaryOperator),
    /// 被演算子2つと演算子1つを二項式にまとめる
    Reduce,
    Accept,
}

/// スタック頂上の演算子と先読みの演算子から次の操作を決める
///
/// 番兵同士なら受理、代入系同士ならシフト(右結合)、頂上の優先度が
/// 先読み以上なら還元(左結合)、それ以外はシフト。
/// 番兵はどちらも優先度0なので、先読みが `End` なら頂上が演算子である限り還元になる。
/// `End` はスタックに積まれず `Start` は先読みに現れないので、これ以外の状態はない。
pub fn decide(top: StackOperator, incoming: Lookahead) -> Action {
    let Lookahead::Binary(op) = incoming else {
        return match top {
            StackOperator::Start => Action::Accept,
            StackOperator::Binary(_) => Action::Reduce,
        };
    };
    let (left, right) = (top.priority(), op.priority());
    if left == ASSIGNMENT_PRIORITY && right == ASSIGNMENT_PRIORITY {
        Action::Shift(op)
    } else if left >= right {
        Action::Reduce
    } else {
        Action::Shift(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary(kind: TokenKind) -> BinaryOperator {
        BinaryOperator::from_token(kind).unwrap()
    }

    #[test]
    fn test_priority_table() {
        let table = [
            (TokenKind::Star, 11),
            (TokenKind::Slash, 11),
            (TokenKind::Percent, 11),
            (TokenKind::Plus, 10),
            (TokenKind::Minus, 10),
            (TokenKind::LessLess, 9),
            (TokenKind::GreaterGreater, 9),
            (TokenKind::Less, 8),
            (TokenKind::GreaterEqual, 8),
            (TokenKind::EqualEqual, 7),
            (TokenKind::BangEqual, 7),
            (TokenKind::Ampersand, 6),
            (TokenKind::Caret, 5),
            (TokenKind::Pipe, 4),
            (TokenKind::AmpersandAmpersand, 3),
            (TokenKind::PipePipe, 2),
            (TokenKind::Equal, 1),
            (TokenKind::Assign, 1),
            (TokenKind::PlusEqual, 1),
            (TokenKind::LessLessEqual, 1),
            (TokenKind::CaretEqual, 1),
        ];
        for (kind, priority) in table {
            assert_eq!(binary(kind).priority(), priority, "priority of {kind}");
        }
    }

    #[test]
    fn test_non_operators_are_end() {
        for kind in [TokenKind::Semicolon, TokenKind::RightBrace, TokenKind::Identifier, TokenKind::Arrow, TokenKind::Bang] {
            assert_eq!(Lookahead::from_token(kind), Lookahead::End);
        }
    }

    #[test]
    fn test_decide() {
        let plus = binary(TokenKind::Plus);
        let star = binary(TokenKind::Star);
        let substitute = binary(TokenKind::Equal);
        let plus_equal = binary(TokenKind::PlusEqual);

        assert_eq!(decide(StackOperator::Start, Lookahead::End), Action::Accept);
        assert_eq!(decide(StackOperator::Start, Lookahead::Binary(plus)), Action::Shift(plus));
        assert_eq!(decide(StackOperator::Start, Lookahead::Binary(substitute)), Action::Shift(substitute));
        assert_eq!(decide(StackOperator::Binary(plus), Lookahead::Binary(star)), Action::Shift(star));
        assert_eq!(decide(StackOperator::Binary(star), Lookahead::Binary(plus)), Action::Reduce);
        assert_eq!(decide(StackOperator::Binary(plus), Lookahead::Binary(plus)), Action::Reduce);
        assert_eq!(decide(StackOperator::Binary(plus), Lookahead::End), Action::Reduce);
        assert_eq!(decide(StackOperator::Binary(substitute), Lookahead::Binary(substitute)), Action::Shift(substitute));
        assert_eq!(decide(StackOperator::Binary(substitute), Lookahead::Binary(plus_equal)), Action::Shift(plus_equal));
        assert_eq!(decide(StackOperator::Binary(substitute), Lookahead::Binary(plus)), Action::Shift(plus));
        assert_eq!(decide(StackOperator::Binary(plus), Lookahead::Binary(substitute)), Action::Reduce);
        assert_eq!(decide(StackOperator::Binary(substitute), Lookahead::End), Action::Reduce);
    }
}
