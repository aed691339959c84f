//! Symbol table with a class scope and a subroutine scope.
use std::{collections::BTreeMap, fmt};

use smol_str::SmolStr;

use crate::{error::SymbolError, vm::Segment};

/// Storage class of a declared name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Static,
    Field,
    Argument,
    Local,
}

impl Kind {
    /// Scope that owns names of this kind.
    pub fn scope(&self) -> Scope {
        match self {
            Self::Static | Self::Field => Scope::Class,
            Self::Argument | Self::Local => Scope::Subroutine,
        }
    }

    /// Memory segment the stack machine addresses this kind through.
    pub fn segment(&self) -> Segment {
        match self {
            Self::Static => Segment::Static,
            Self::Field => Segment::This,
            Self::Argument => Segment::Argument,
            Self::Local => Segment::Local,
        }
    }

    fn slot(&self) -> usize {
        match self {
            Self::Static => 0,
            Self::Field => 1,
            Self::Argument => 2,
            Self::Local => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Lives as long as the class, holds statics and fields.
    Class,
    /// Restarted for every subroutine, holds arguments and locals.
    Subroutine,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Class => write!(f, "class"),
            Self::Subroutine => write!(f, "subroutine"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// Declared type, either a primitive or a class name.
    pub ty: SmolStr,
    pub kind: Kind,
    /// Running index within the kind.
    pub index: u16,
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    class: BTreeMap<SmolStr, Symbol>,
    subroutine: BTreeMap<SmolStr, Symbol>,
    /// Next free index for each kind.
    counts: [u16; 4],
}

impl SymbolTable {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a new name and assign it the next index of its kind.
    ///
    /// Returns the assigned index.
    pub fn define(
        &mut self,
        name: impl Into<SmolStr>,
        ty: impl Into<SmolStr>,
        kind: Kind,
    ) -> Result<u16, SymbolError> {
        let name = name.into();
        let scope = kind.scope();
        let table = match scope {
            Scope::Class => &mut self.class,
            Scope::Subroutine => &mut self.subroutine,
        };

        if table.contains_key(&name) {
            return Err(SymbolError::Duplicate { name, scope });
        }

        let index = self.counts[kind.slot()];
        self.counts[kind.slot()] += 1;

        table.insert(
            name,
            Symbol {
                ty: ty.into(),
                kind,
                index,
            },
        );

        Ok(index)
    }

    /// Start a new subroutine scope.
    ///
    /// The class scope is left untouched.
    pub fn new_subroutine(&mut self) {
        self.subroutine.clear();
        self.counts[Kind::Argument.slot()] = 0;
        self.counts[Kind::Local.slot()] = 0;
    }

    /// Resolve a name, with the subroutine scope shadowing the class scope.
    #[inline]
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.subroutine.get(name).or_else(|| self.class.get(name))
    }

    #[inline]
    pub fn kind_of(&self, name: &str) -> Option<Kind> {
        self.lookup(name).map(|symbol| symbol.kind)
    }

    #[inline]
    pub fn type_of(&self, name: &str) -> Option<&str> {
        self.lookup(name).map(|symbol| symbol.ty.as_str())
    }

    #[inline]
    pub fn index_of(&self, name: &str) -> Option<u16> {
        self.lookup(name).map(|symbol| symbol.index)
    }

    /// Number of names of the given kind defined so far in its active scope.
    #[inline]
    pub fn count(&self, kind: Kind) -> u16 {
        self.counts[kind.slot()]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_dense_indices() {
        let mut table = SymbolTable::new();
        let names = ["a", "b", "c", "d", "e"];

        for name in names {
            table.define(name, "int", Kind::Local).unwrap();
        }
        table.define("s", "int", Kind::Static).unwrap();

        let indices: Vec<u16> = names.iter().map(|n| table.index_of(n).unwrap()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
        assert_eq!(table.count(Kind::Local), 5);
        assert_eq!(table.count(Kind::Static), 1);
        assert_eq!(table.index_of("s"), Some(0));
    }

    #[test]
    fn test_kinds_count_separately() {
        let mut table = SymbolTable::new();
        assert_eq!(table.define("x", "int", Kind::Field), Ok(0));
        assert_eq!(table.define("count", "int", Kind::Static), Ok(0));
        assert_eq!(table.define("y", "int", Kind::Field), Ok(1));
        assert_eq!(table.define("p", "Point", Kind::Argument), Ok(0));
        assert_eq!(table.define("i", "int", Kind::Local), Ok(0));
        assert_eq!(table.define("q", "Point", Kind::Argument), Ok(1));

        assert_eq!(table.kind_of("y"), Some(Kind::Field));
        assert_eq!(table.type_of("q"), Some("Point"));
        assert_eq!(table.count(Kind::Field), 2);
        assert_eq!(table.count(Kind::Argument), 2);
    }

    #[test]
    fn test_duplicate_in_same_scope() {
        let mut table = SymbolTable::new();
        table.define("x", "int", Kind::Field).unwrap();

        let err = table.define("x", "char", Kind::Static).unwrap_err();
        assert_eq!(
            err,
            SymbolError::Duplicate {
                name: "x".into(),
                scope: Scope::Class
            }
        );

        table.define("i", "int", Kind::Argument).unwrap();
        assert!(table.define("i", "int", Kind::Local).is_err());

        // Failed definitions do not consume an index.
        assert_eq!(table.count(Kind::Static), 0);
        assert_eq!(table.count(Kind::Local), 0);
    }

    #[test]
    fn test_subroutine_shadows_class() {
        let mut table = SymbolTable::new();
        table.define("x", "int", Kind::Field).unwrap();
        table.define("x", "Array", Kind::Argument).unwrap();

        assert_eq!(table.kind_of("x"), Some(Kind::Argument));
        assert_eq!(table.type_of("x"), Some("Array"));

        table.new_subroutine();
        assert_eq!(table.kind_of("x"), Some(Kind::Field));
        assert_eq!(table.type_of("x"), Some("int"));
    }

    #[test]
    fn test_new_subroutine_isolates() {
        let mut table = SymbolTable::new();
        table.define("f", "int", Kind::Field).unwrap();
        table.define("a", "int", Kind::Argument).unwrap();
        table.define("b", "int", Kind::Argument).unwrap();
        table.define("i", "int", Kind::Local).unwrap();

        table.new_subroutine();
        assert_eq!(table.lookup("a"), None);
        assert_eq!(table.lookup("i"), None);
        assert_eq!(table.count(Kind::Argument), 0);
        assert_eq!(table.count(Kind::Local), 0);
        assert_eq!(table.count(Kind::Field), 1);

        // Same names again, fresh indices, no collision.
        assert_eq!(table.define("b", "char", Kind::Argument), Ok(0));
        assert_eq!(table.define("a", "char", Kind::Argument), Ok(1));
        assert_eq!(table.type_of("a"), Some("char"));
        assert_eq!(table.index_of("a"), Some(1));
    }

    #[test]
    fn test_implicit_this_first() {
        let mut table = SymbolTable::new();
        table.new_subroutine();
        table.define("this", "Point", Kind::Argument).unwrap();
        table.define("dx", "int", Kind::Argument).unwrap();

        assert_eq!(table.index_of("this"), Some(0));
        assert_eq!(table.index_of("dx"), Some(1));
    }

    #[test]
    fn test_unknown_name() {
        let table = SymbolTable::new();
        assert_eq!(table.kind_of("Output"), None);
        assert_eq!(table.type_of("Output"), None);
        assert_eq!(table.index_of("Output"), None);
    }

    #[test]
    fn test_kind_segments() {
        assert_eq!(Kind::Static.segment(), Segment::Static);
        assert_eq!(Kind::Field.segment(), Segment::This);
        assert_eq!(Kind::Argument.segment(), Segment::Argument);
        assert_eq!(Kind::Local.segment(), Segment::Local);
    }
}
