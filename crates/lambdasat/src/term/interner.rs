//! Symbol interning
//!
//! Constant names and base type names live in separate arenas so that a
//! symbol and a type may share a name. IDs are plain `u32` newtypes: O(1)
//! comparison, `Copy`, and no heap traffic when terms are rebuilt.

use std::collections::HashMap;

/// ID for an interned constant symbol
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub(crate) u32);

/// ID for an interned base type name
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeNameId(pub(crate) u32);

impl SymbolId {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl TypeNameId {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Default)]
struct StringArena {
    strings: Vec<String>,
    lookup: HashMap<String, u32>,
}

impl StringArena {
    fn intern(&mut self, name: &str) -> u32 {
        if let Some(&id) = self.lookup.get(name) {
            return id;
        }
        let id = self.strings.len() as u32;
        self.strings.push(name.to_string());
        self.lookup.insert(name.to_string(), id);
        id
    }

    fn resolve(&self, id: u32) -> &str {
        &self.strings[id as usize]
    }

    fn get(&self, name: &str) -> Option<u32> {
        self.lookup.get(name).copied()
    }

    fn len(&self) -> usize {
        self.strings.len()
    }
}

/// Name tables owned by a `TermBank`.
#[derive(Debug, Clone, Default)]
pub struct Interner {
    symbols: StringArena,
    type_names: StringArena,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a constant name (get-or-create)
    pub fn intern_symbol(&mut self, name: &str) -> SymbolId {
        SymbolId(self.symbols.intern(name))
    }

    pub fn resolve_symbol(&self, id: SymbolId) -> &str {
        self.symbols.resolve(id.0)
    }

    pub fn get_symbol(&self, name: &str) -> Option<SymbolId> {
        self.symbols.get(name).map(SymbolId)
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    /// Intern a base type name (get-or-create)
    pub fn intern_type_name(&mut self, name: &str) -> TypeNameId {
        TypeNameId(self.type_names.intern(name))
    }

    pub fn resolve_type_name(&self, id: TypeNameId) -> &str {
        self.type_names.resolve(id.0)
    }
}
