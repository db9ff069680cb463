use std::io::{self, Write};
use la_arena::{Arena, Idx};
use rustc_hash::FxHashMap;
use crate::symbol::{Symbol, SymbolArena};

pub type ModuleId = Idx<Module>;
pub type FunctionId = Idx<Function>;
pub type StructId = Idx<Struct>;
pub type ClassId = Idx<Class>;
pub type TypeId = Idx<Type>;
pub type ScopeId = Idx<Scope>;
pub type ValueId = Idx<Value>;

/// 1回のコンパイルで作られるHIR全体
///
/// モジュール・関数・型はすべてここのアリーナが所有し、互いにはインデックスで参照する。
/// 解決できなかった名前は登録順に `unresolved` に積まれ、取り除かれることはない。
#[derive(Debug)]
pub struct TranslationUnit {
    pub symbols: SymbolArena,
    pub modules: Arena<Module>,
    pub functions: Arena<Function>,
    pub structs: Arena<Struct>,
    pub classes: Arena<Class>,
    pub types: Arena<Type>,
    root: ModuleId,
    unresolved: Vec<UnresolvedName>,
}

impl TranslationUnit {
    pub fn new() -> Self {
        let mut symbols = SymbolArena::new();
        let mut modules = Arena::new();
        let root = modules.alloc(Module::new(symbols.symbol("root"), None));
        Self {
            symbols,
            modules,
            functions: Arena::new(),
            structs: Arena::new(),
            classes: Arena::new(),
            types: Arena::new(),
            root,
            unresolved: Vec::new(),
        }
    }

    pub fn root(&self) -> ModuleId {
        self.root
    }

    pub fn root_module(&self) -> &Module {
        &self.modules[self.root]
    }

    pub fn unresolved(&self) -> &[UnresolvedName] {
        &self.unresolved
    }

    pub fn add_unresolved_name(&mut self, name: UnresolvedName) {
        self.unresolved.push(name);
    }

    /// 型名を要求する。型定義はまだないので毎回新しい未解決型を作って登録する
    pub fn request_type(&mut self, name: &str) -> TypeId {
        let name = self.symbols.symbol(name);
        let ty = self.types.alloc(Type::Unresolved { name });
        self.add_unresolved_name(UnresolvedName::Type { ty, name });
        ty
    }

    pub fn name(&self, symbol: Symbol) -> &str {
        self.symbols.get_name(symbol).unwrap_or("<unknown>")
    }

    pub fn unresolved_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.unresolved.iter().map(|name| self.name(name.name()))
    }

    /// 未解決の名前を登録順に1行ずつ書き出す
    pub fn print(&self, out: &mut impl Write) -> io::Result<()> {
        for name in self.unresolved_names() {
            writeln!(out, "{}", name)?;
        }
        Ok(())
    }
}

impl Default for TranslationUnit {
    fn default() -> Self {
        Self::new()
    }
}

/// 名前付きの宣言の入れ物
///
/// 子は名前で引く。同じ名前で作り直すと新しい方に束縛し直される。
#[derive(Debug)]
pub struct Module {
    pub name: Symbol,
    pub parent: Option<ModuleId>,
    pub modules: FxHashMap<Symbol, ModuleId>,
    pub functions: FxHashMap<Symbol, FunctionId>,
    pub structs: FxHashMap<Symbol, StructId>,
    pub classes: FxHashMap<Symbol, ClassId>,
}

impl Module {
    pub(crate) fn new(name: Symbol, parent: Option<ModuleId>) -> Self {
        Self {
            name,
            parent,
            modules: FxHashMap::default(),
            functions: FxHashMap::default(),
            structs: FxHashMap::default(),
            classes: FxHashMap::default(),
        }
    }
}

/// 構造体の宣言。メンバーはまだ持たない
#[derive(Debug)]
pub struct Struct {
    pub name: Symbol,
    pub parent: ModuleId,
}

/// クラスの宣言。メンバーはまだ持たない
#[derive(Debug)]
pub struct Class {
    pub name: Symbol,
    pub parent: ModuleId,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Type {
    /// 名前だけが要求され、定義が見つかっていない型
    Unresolved { name: Symbol },
}

/// 値に付く型の制約。`None` なら推論待ち
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeConstraint {
    pub ty: Option<TypeId>,
}

impl TypeConstraint {
    pub const OPEN: TypeConstraint = TypeConstraint { ty: None };

    pub fn bound(ty: TypeId) -> Self {
        Self { ty: Some(ty) }
    }

    pub fn is_open(&self) -> bool {
        self.ty.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argument {
    pub name: Symbol,
    pub ty: TypeId,
    /// 関数の根スコープに束縛された引数の変数
    pub variable: ValueId,
}

/// 関数本体
///
/// スコープと値は関数ごとのアリーナが所有する。根のスコープ(深さ0)と
/// それに結び付いた根のブロックは関数と同時に作られる。
#[derive(Debug)]
pub struct Function {
    pub name: Symbol,
    pub parent: ModuleId,
    pub arguments: Vec<Argument>,
    pub return_type: Option<TypeId>,
    pub scopes: Arena<Scope>,
    pub values: Arena<Value>,
    pub root_scope: ScopeId,
    pub root_block: ValueId,
}

impl Function {
    pub(crate) fn new(name: Symbol, parent: ModuleId) -> Self {
        let mut scopes = Arena::new();
        let root_scope = scopes.alloc(Scope::root());
        let mut values = Arena::new();
        let root_block = values.alloc(Value::open(ValueKind::Block(Block::new(root_scope))));
        Self {
            name,
            parent,
            arguments: Vec::new(),
            return_type: None,
            scopes,
            values,
            root_scope,
            root_block,
        }
    }

    /// `scope` から親へ向かって名前を探す。最初に見つかった束縛が勝つ
    pub fn lookup(&self, scope: ScopeId, name: Symbol) -> Option<ValueId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = &self.scopes[id];
            if let Some(&variable) = scope.bindings.get(&name) {
                return Some(variable);
            }
            current = scope.parent;
        }
        None
    }

    pub fn value(&self, value: ValueRef) -> &Value {
        match value {
            ValueRef::Unit => &UNIT,
            ValueRef::Local(id) => &self.values[id],
        }
    }

    pub fn block(&self, value: ValueRef) -> Option<&Block> {
        match &self.value(value).kind {
            ValueKind::Block(block) => Some(block),
            _ => None,
        }
    }

    /// 根のブロック
    pub fn body(&self) -> Option<&Block> {
        self.block(ValueRef::Local(self.root_block))
    }

    pub(crate) fn block_mut(&mut self, id: ValueId) -> Option<&mut Block> {
        match &mut self.values[id].kind {
            ValueKind::Block(block) => Some(block),
            _ => None,
        }
    }

    /// `parent` の子スコープを作る
    pub(crate) fn create_scope(&mut self, parent: ScopeId) -> ScopeId {
        let depth = self.scopes[parent].depth + 1;
        let child = self.scopes.alloc(Scope {
            depth,
            parent: Some(parent),
            children: Vec::new(),
            variables: Vec::new(),
            bindings: FxHashMap::default(),
        });
        self.scopes[parent].children.push(child);
        child
    }

    /// 変数を `scope` に直接束縛する。同じスコープの同名の束縛は上書きされる
    pub(crate) fn bind(&mut self, scope: ScopeId, name: Symbol, variable: ValueId) {
        let scope = &mut self.scopes[scope];
        scope.variables.push(variable);
        scope.bindings.insert(name, variable);
    }
}

/// 字句的なブロックの入れ子に対応するスコープ
///
/// `bindings` はこのスコープで直接宣言された名前だけを持つ。
#[derive(Debug)]
pub struct Scope {
    pub depth: usize,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    pub variables: Vec<ValueId>,
    pub bindings: FxHashMap<Symbol, ValueId>,
}

impl Scope {
    fn root() -> Self {
        Self {
            depth: 0,
            parent: None,
            children: Vec::new(),
            variables: Vec::new(),
            bindings: FxHashMap::default(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// 値への参照。ユニット値は関数をまたいで共有される1つの値を指す
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueRef {
    Unit,
    Local(ValueId),
}

#[derive(Debug, PartialEq)]
pub struct Value {
    pub kind: ValueKind,
    pub constraint: TypeConstraint,
}

/// ユニット値の唯一の実体
pub static UNIT: Value = Value { kind: ValueKind::Unit, constraint: TypeConstraint::OPEN };

impl Value {
    pub(crate) fn open(kind: ValueKind) -> Self {
        Self { kind, constraint: TypeConstraint::OPEN }
    }

    pub fn variable(&self) -> Option<&Variable> {
        match &self.kind {
            ValueKind::Variable(variable) => Some(variable),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum ValueKind {
    Variable(Variable),
    Literal(Literal),
    /// 二項演算も `binary` という名前の呼び出しになる
    Call { callee: ValueRef, arguments: Vec<ValueRef> },
    Block(Block),
    Unit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Declared,
    /// どのスコープにも見つからず、登録簿に積まれた変数
    Unresolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variable {
    pub name: Symbol,
    pub is_mutable: bool,
    pub resolution: Resolution,
}

impl Variable {
    pub fn is_unresolved(&self) -> bool {
        self.resolution == Resolution::Unresolved
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    String,
    Char,
    Int,
    Float,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub text: Box<str>,
    pub kind: LiteralKind,
}

/// 値の並び。必ず1つのスコープに結び付く
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub scope: ScopeId,
    pub values: Vec<ValueRef>,
}

impl Block {
    pub(crate) fn new(scope: ScopeId) -> Self {
        Self { scope, values: Vec::new() }
    }
}

/// 後の名前解決に回される名前
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedName {
    Variable { function: FunctionId, value: ValueId, name: Symbol },
    Type { ty: TypeId, name: Symbol },
}

impl UnresolvedName {
    pub fn name(&self) -> Symbol {
        match self {
            UnresolvedName::Variable { name, .. } | UnresolvedName::Type { name, .. } => *name,
        }
    }
}
