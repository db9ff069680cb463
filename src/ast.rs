use std::fmt;
use std::rc::Rc;
use itertools::Itertools;
use crate::operator::BinaryOperator;

/// コンパイル単位全体
#[derive(PartialEq, Default)]
pub struct Root {
    pub items: Vec<TopLevel>,
}

#[derive(PartialEq)]
pub enum TopLevel {
    Module(Module),
    Function(DeclarationFunction),
}

/// 名前付きの入れ子スコープ
#[derive(PartialEq)]
pub struct Module {
    pub name: Rc<str>,
    pub items: Vec<TopLevel>,
}

#[derive(PartialEq)]
pub struct DeclarationFunction {
    pub name: Rc<str>,
    pub arguments: Vec<Argument>,
    pub return_type: Rc<str>,
    pub body: BlockExpression,
}

#[derive(PartialEq, Clone)]
pub struct Argument {
    pub name: Rc<str>,
    pub type_name: Rc<str>,
}

/// `{ ... }`
#[derive(PartialEq)]
pub struct BlockExpression {
    pub inner: Box<Expression>,
}

/// `let` / `var` による変数宣言。型名がなければ推論に任せる
#[derive(PartialEq, Clone)]
pub struct DeclarationVariable {
    pub name: Rc<str>,
    pub type_name: Option<Rc<str>>,
    pub is_mutable: bool,
}

impl DeclarationVariable {
    pub fn type_is_inferred(&self) -> bool {
        self.type_name.is_none()
    }
}

#[derive(PartialEq)]
pub enum Expression {
    Block(BlockExpression),
    /// `a; b`
    Semicolon(Box<Expression>, Box<Expression>),
    DeclarationVariable(DeclarationVariable),
    Binary {
        left: Box<Expression>,
        op: BinaryOperator,
        right: Box<Expression>,
    },
    Identifier(Rc<str>),
    Number(Rc<str>),
    String(Rc<str>),
    Char(Rc<str>),
    /// 式が置けるのに何も解析できなかった位置
    Nop,
}

impl Expression {
    pub(crate) fn semicolon(previous: Expression, next: Expression) -> Self {
        Expression::Semicolon(Box::new(previous), Box::new(next))
    }
    pub(crate) fn binary(left: Expression, op: BinaryOperator, right: Expression) -> Self {
        Expression::Binary { left: Box::new(left), op, right: Box::new(right) }
    }
    pub fn is_nop(&self) -> bool {
        matches!(self, Expression::Nop)
    }
}

impl fmt::Debug for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Block(block) => write!(f, "{:?}", block),
            Expression::Semicolon(previous, next) => write!(f, "{:?}; {:?}", previous, next),
            Expression::DeclarationVariable(decl) => write!(f, "{:?}", decl),
            Expression::Binary { left, op, right } => write!(f, "({:?} {} {:?})", left, op, right),
            Expression::Identifier(name) => write!(f, "{}", name),
            Expression::Number(value) => write!(f, "{}", value),
            Expression::String(value) => write!(f, "{:?}", value),
            Expression::Char(value) => write!(f, "'{}'", value.escape_debug()),
            Expression::Nop => write!(f, "()"),
        }
    }
}

impl fmt::Debug for BlockExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ {:?} }}", self.inner)
    }
}

impl fmt::Debug for DeclarationVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = if self.is_mutable { "var" } else { "let" };
        match &self.type_name {
            Some(type_name) => write!(f, "{} {}: {}", keyword, self.name, type_name),
            None => write!(f, "{} {}", keyword, self.name),
        }
    }
}

impl fmt::Debug for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.type_name)
    }
}

impl fmt::Debug for DeclarationFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fn {}({}) -> {} {:?}",
            self.name,
            self.arguments.iter().map(|argument| format!("{:?}", argument)).join(", "),
            self.return_type,
            self.body
        )
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "module {} {{ {} }}", self.name, self.items.iter().map(|item| format!("{:?}", item)).join(" "))
    }
}

impl fmt::Debug for TopLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopLevel::Module(module) => write!(f, "{:?}", module),
            TopLevel::Function(function) => write!(f, "{:?}", function),
        }
    }
}

impl fmt::Debug for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.items.iter().map(|item| format!("{:?}", item)).join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_rendering() {
        let sum = Expression::binary(
            Expression::Number("1".into()),
            BinaryOperator::Plus,
            Expression::binary(Expression::Number("2".into()), BinaryOperator::Multiply, Expression::Identifier("x".into())),
        );
        assert_eq!(format!("{:?}", sum), "(1 + (2 * x))");

        let decl = Expression::DeclarationVariable(DeclarationVariable {
            name: "y".into(),
            type_name: Some("int".into()),
            is_mutable: true,
        });
        let block = Expression::Block(BlockExpression { inner: Box::new(Expression::semicolon(decl, Expression::Nop)) });
        assert_eq!(format!("{:?}", block), "{ var y: int; () }");
    }

    #[test]
    fn test_type_is_inferred() {
        let inferred = DeclarationVariable { name: "x".into(), type_name: None, is_mutable: false };
        assert!(inferred.type_is_inferred());
        let explicit = DeclarationVariable { type_name: Some("int".into()), ..inferred };
        assert!(!explicit.type_is_inferred());
    }
}
