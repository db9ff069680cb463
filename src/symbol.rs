use std::fmt;
use std::rc::Rc;
use rustc_hash::FxHashMap;

/// HIR全体で使用される一意な名前を表現する構造体
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol {
    pub(crate) id: usize,
}

impl Symbol {
    pub fn get_id(&self) -> usize {
        self.id
    }
}

/// シンボルを生成・管理する構造体
///
/// 同じ綴りには常に同じシンボルを返す。
#[derive(Debug, Clone, Default)]
pub struct SymbolArena {
    names: Vec<Rc<str>>,
    ids: FxHashMap<Rc<str>, Symbol>,
}

impl SymbolArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn symbol(&mut self, name: impl Into<Rc<str>>) -> Symbol {
        let name = name.into();
        if let Some(&symbol) = self.ids.get(&name) {
            return symbol;
        }
        let symbol = Symbol { id: self.names.len() };
        self.ids.insert(Rc::clone(&name), symbol);
        self.names.push(name);
        symbol
    }

    /// 既に登録済みの名前のシンボル。未登録なら `None`
    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        self.ids.get(name).copied()
    }

    pub fn get_name(&self, symbol: Symbol) -> Option<&str> {
        self.names.get(symbol.id).map(|name| &**name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interning() {
        let mut arena = SymbolArena::new();
        let x = arena.symbol("x");
        let y = arena.symbol("y");
        assert_ne!(x, y);
        assert_eq!(arena.symbol("x"), x);
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get_name(y), Some("y"));
        assert_eq!(arena.lookup("x"), Some(x));
        assert_eq!(arena.lookup("z"), None);
    }

    #[test]
    fn test_foreign_symbol_has_no_name() {
        let arena = SymbolArena::new();
        assert!(arena.is_empty());
        assert_eq!(arena.get_name(Symbol { id: 3 }), None);
    }
}
