use super::core::*;

/// モジュールを組み立てるための構造体
///
/// 子のモジュールや関数を作るとその名前で親に登録される。
pub struct ModuleBuilder<'tu> {
    unit: &'tu mut TranslationUnit,
    module: ModuleId,
}

impl<'tu> ModuleBuilder<'tu> {
    pub fn root(unit: &'tu mut TranslationUnit) -> Self {
        let module = unit.root();
        Self { unit, module }
    }

    pub fn id(&self) -> ModuleId {
        self.module
    }

    pub fn module(&self) -> &Module {
        &self.unit.modules[self.module]
    }

    pub fn unit(&self) -> &TranslationUnit {
        &*self.unit
    }

    pub fn create_module(&mut self, name: &str) -> ModuleBuilder<'_> {
        tracing::debug!(name, "create module");
        let symbol = self.unit.symbols.symbol(name);
        let module = self.unit.modules.alloc(Module::new(symbol, Some(self.module)));
        self.unit.modules[self.module].modules.insert(symbol, module);
        ModuleBuilder { unit: &mut *self.unit, module }
    }

    pub fn create_function(&mut self, name: &str) -> FunctionBuilder<'_> {
        tracing::debug!(name, "create function");
        let symbol = self.unit.symbols.symbol(name);
        let function = self.unit.functions.alloc(Function::new(symbol, self.module));
        self.unit.modules[self.module].functions.insert(symbol, function);
        FunctionBuilder::new(&mut *self.unit, function)
    }

    pub fn create_struct(&mut self, name: &str) -> StructId {
        let symbol = self.unit.symbols.symbol(name);
        let id = self.unit.structs.alloc(Struct { name: symbol, parent: self.module });
        self.unit.modules[self.module].structs.insert(symbol, id);
        id
    }

    pub fn create_class(&mut self, name: &str) -> ClassId {
        let symbol = self.unit.symbols.symbol(name);
        let id = self.unit.classes.alloc(Class { name: symbol, parent: self.module });
        self.unit.modules[self.module].classes.insert(symbol, id);
        id
    }
}

#[derive(Debug, Clone, Copy)]
struct OpenBlock {
    value: ValueId,
    scope: ScopeId,
}

/// 関数本体を組み立てるための構造体
///
/// 開いているブロックをスタックで持ち、変数の宣言と参照は一番内側のブロックの
/// スコープに対して行う。スタックが空のときは関数の根のブロックが現在のブロック。
pub struct FunctionBuilder<'tu> {
    unit: &'tu mut TranslationUnit,
    function: FunctionId,
    blocks: Vec<OpenBlock>,
}

impl<'tu> FunctionBuilder<'tu> {
    pub(crate) fn new(unit: &'tu mut TranslationUnit, function: FunctionId) -> Self {
        Self { unit, function, blocks: Vec::new() }
    }

    pub fn id(&self) -> FunctionId {
        self.function
    }

    pub fn function(&self) -> &Function {
        &self.unit.functions[self.function]
    }

    fn function_mut(&mut self) -> &mut Function {
        &mut self.unit.functions[self.function]
    }

    pub fn unit(&self) -> &TranslationUnit {
        &*self.unit
    }

    fn current(&self) -> OpenBlock {
        self.blocks.last().copied().unwrap_or_else(|| {
            let function = self.function();
            OpenBlock { value: function.root_block, scope: function.root_scope }
        })
    }

    pub fn current_block(&self) -> ValueRef {
        ValueRef::Local(self.current().value)
    }

    pub fn current_scope(&self) -> ScopeId {
        self.current().scope
    }

    pub fn set_return_type(&mut self, type_name: &str) {
        let ty = self.unit.request_type(type_name);
        self.function_mut().return_type = Some(ty);
    }

    /// 引数を追加し、その変数を根のスコープに束縛する
    pub fn add_argument(&mut self, name: &str, type_name: &str) -> ValueRef {
        let ty = self.unit.request_type(type_name);
        let symbol = self.unit.symbols.symbol(name);
        let function = self.function_mut();
        let variable = function.values.alloc(Value {
            kind: ValueKind::Variable(Variable {
                name: symbol,
                is_mutable: false,
                resolution: Resolution::Declared,
            }),
            constraint: TypeConstraint::bound(ty),
        });
        let root = function.root_scope;
        function.bind(root, symbol, variable);
        function.arguments.push(Argument { name: symbol, ty, variable });
        ValueRef::Local(variable)
    }

    pub fn add_arguments<'a>(&mut self, arguments: impl IntoIterator<Item = (&'a str, &'a str)>) {
        for (name, type_name) in arguments {
            self.add_argument(name, type_name);
        }
    }

    /// 現在のスコープの子スコープと、それに結び付いたブロックを開く
    pub fn create_block(&mut self) {
        let parent = self.current().scope;
        let function = self.function_mut();
        let scope = function.create_scope(parent);
        let value = function.values.alloc(Value::open(ValueKind::Block(Block::new(scope))));
        self.blocks.push(OpenBlock { value, scope });
    }

    pub fn add_instruction(&mut self, value: ValueRef) {
        let current = self.current().value;
        if let Some(block) = self.function_mut().block_mut(current) {
            block.values.push(value);
        }
    }

    /// 一番内側のブロックを閉じて値として返す。根のブロックは閉じない
    pub fn exit_block(&mut self) -> ValueRef {
        match self.blocks.pop() {
            Some(block) => ValueRef::Local(block.value),
            None => {
                tracing::warn!("exit_block called on the root block");
                ValueRef::Local(self.function().root_block)
            }
        }
    }

    /// 現在のスコープに変数を宣言する。型名があればその型に束縛する
    pub fn decl_variable(&mut self, name: &str, type_name: Option<&str>, is_mutable: bool) -> ValueRef {
        let constraint = match type_name {
            Some(type_name) => TypeConstraint::bound(self.unit.request_type(type_name)),
            None => TypeConstraint::OPEN,
        };
        let symbol = self.unit.symbols.symbol(name);
        let scope = self.current().scope;
        let function = self.function_mut();
        let variable = function.values.alloc(Value {
            kind: ValueKind::Variable(Variable { name: symbol, is_mutable, resolution: Resolution::Declared }),
            constraint,
        });
        function.bind(scope, symbol, variable);
        ValueRef::Local(variable)
    }

    /// 現在のスコープから外側へ名前を探す
    ///
    /// どこにも見つからなければ未解決の変数を作って登録簿に積む。
    /// 同じ名前でも呼ぶたびに新しく登録する。
    pub fn get_variable(&mut self, name: &str) -> ValueRef {
        let symbol = self.unit.symbols.symbol(name);
        let scope = self.current().scope;
        if let Some(variable) = self.function().lookup(scope, symbol) {
            return ValueRef::Local(variable);
        }
        tracing::debug!(name, "unresolved variable");
        let value = self.function_mut().values.alloc(Value::open(ValueKind::Variable(Variable {
            name: symbol,
            is_mutable: false,
            resolution: Resolution::Unresolved,
        })));
        let function = self.function;
        self.unit.add_unresolved_name(UnresolvedName::Variable { function, value, name: symbol });
        ValueRef::Local(value)
    }

    pub fn get_literal(&mut self, text: &str, kind: LiteralKind) -> ValueRef {
        let literal = Literal { text: text.into(), kind };
        ValueRef::Local(self.function_mut().values.alloc(Value::open(ValueKind::Literal(literal))))
    }

    pub fn create_call(&mut self, callee: ValueRef, arguments: Vec<ValueRef>) -> ValueRef {
        ValueRef::Local(self.function_mut().values.alloc(Value::open(ValueKind::Call { callee, arguments })))
    }
}
