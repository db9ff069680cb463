use crate::ast::{BlockExpression, DeclarationFunction, Expression, Module, Root, TopLevel};
use super::builder::{FunctionBuilder, ModuleBuilder};
use super::core::{LiteralKind, ValueRef};

/// 二項演算の呼び出し先として参照される名前
pub const BINARY_CALLEE: &str = "binary";

impl Root {
    pub fn lower(&self, builder: &mut ModuleBuilder<'_>) {
        for item in &self.items {
            item.lower(builder);
        }
    }
}

impl TopLevel {
    pub fn lower(&self, builder: &mut ModuleBuilder<'_>) {
        match self {
            TopLevel::Module(module) => module.lower(builder),
            TopLevel::Function(function) => function.lower(builder),
        }
    }
}

impl Module {
    pub fn lower(&self, builder: &mut ModuleBuilder<'_>) {
        let mut module = builder.create_module(&self.name);
        for item in &self.items {
            item.lower(&mut module);
        }
    }
}

impl DeclarationFunction {
    /// 引数の型、戻り値の型の順に型を要求し、本体のブロックを根のブロックに置く
    pub fn lower(&self, builder: &mut ModuleBuilder<'_>) {
        let mut function = builder.create_function(&self.name);
        for argument in &self.arguments {
            function.add_argument(&argument.name, &argument.type_name);
        }
        function.set_return_type(&self.return_type);
        let body = self.body.lower(&mut function);
        function.add_instruction(body);
    }
}

impl BlockExpression {
    pub fn lower(&self, builder: &mut FunctionBuilder<'_>) -> ValueRef {
        builder.create_block();
        let value = self.inner.lower(builder);
        builder.add_instruction(value);
        builder.exit_block()
    }
}

impl Expression {
    pub fn lower(&self, builder: &mut FunctionBuilder<'_>) -> ValueRef {
        match self {
            Expression::Block(block) => block.lower(builder),
            Expression::Semicolon(previous, next) => {
                let previous = previous.lower(builder);
                builder.add_instruction(previous);
                next.lower(builder)
            }
            Expression::DeclarationVariable(decl) => {
                builder.decl_variable(&decl.name, decl.type_name.as_deref(), decl.is_mutable)
            }
            Expression::Binary { left, op, right } => {
                // 代入系は右辺を先に評価する
                let (left, right) = if op.is_assignment_like() {
                    let right = right.lower(builder);
                    (left.lower(builder), right)
                } else {
                    let left = left.lower(builder);
                    (left, right.lower(builder))
                };
                let callee = builder.get_variable(BINARY_CALLEE);
                builder.create_call(callee, vec![left, right])
            }
            Expression::Identifier(name) => builder.get_variable(name),
            Expression::Number(text) => builder.get_literal(text, LiteralKind::Int),
            Expression::String(text) => builder.get_literal(text, LiteralKind::String),
            Expression::Char(text) => builder.get_literal(text, LiteralKind::Char),
            Expression::Nop => ValueRef::Unit,
        }
    }
}
