//! Kind-tagged view over values under comparison.
//!
//! Every comparable type implements [`Diffable`], which reports its [`Shape`]
//! (used for the shape guard) and a [`Peek`] telling the engine which
//! traversal kind applies. Std types are covered in `impls`; user structs
//! and leaf types use [`diffable_struct!`](crate::diffable_struct) and
//! [`diffable_scalar!`](crate::diffable_scalar).

use std::any::{Any, TypeId};
use std::fmt;

use crate::path::Segment;

mod impls;
mod macros;

/// Upcast to `Any`, available on every `Diffable` trait object
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Static description of a type.
///
/// Two shapes are equal when they describe the same Rust type. The declared
/// name is what the engine uses as the root path; anonymous shapes (`Vec<T>`,
/// `Option<T>`, ...) have an empty name.
#[derive(Clone, Copy, Debug)]
pub struct Shape {
    id: TypeId,
    name: &'static str,
    type_name: &'static str,
}

impl Shape {
    /// Anonymous shape of `T`
    pub fn of<T: Any + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: "",
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Shape of `T` with a declared name
    pub fn named<T: Any + ?Sized>(name: &'static str) -> Self {
        Self {
            name,
            ..Self::of::<T>()
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Declared name, empty when anonymous
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Full Rust type name, for diagnostics
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is_named(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Shape {}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_named() {
            f.write_str(self.name)
        } else {
            f.write_str(self.type_name)
        }
    }
}

/// Traversal category of a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Array,
    List,
    Dynamic,
    Pointer,
    Struct,
    Map,
    Text,
    Scalar,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Kind::Array => "array",
            Kind::List => "list",
            Kind::Dynamic => "dynamic",
            Kind::Pointer => "pointer",
            Kind::Struct => "struct",
            Kind::Map => "map",
            Kind::Text => "text",
            Kind::Scalar => "scalar",
        };
        f.write_str(s)
    }
}

/// Read-only view of one value, tagged by kind
#[derive(Clone, Copy)]
pub enum Peek<'a> {
    /// Fixed-size sequence; its length is part of the shape
    Array(&'a dyn Sequence),
    /// Variable-length sequence
    List(&'a dyn Sequence),
    /// Type-erased value, unwrapped one level during traversal
    Dynamic(&'a dyn Diffable),
    /// Reference to another value; `None` when absent
    Pointer(Option<&'a dyn Diffable>),
    /// Named fields in declared order
    Struct(&'a dyn Record),
    /// Keyed associative container
    Map(&'a dyn Mapping),
    /// String leaf, subject to trim rules
    Text(&'a str),
    /// Any other leaf, compared by equality
    Scalar(&'a dyn Scalar),
}

impl<'a> Peek<'a> {
    pub fn kind(&self) -> Kind {
        match self {
            Peek::Array(_) => Kind::Array,
            Peek::List(_) => Kind::List,
            Peek::Dynamic(_) => Kind::Dynamic,
            Peek::Pointer(_) => Kind::Pointer,
            Peek::Struct(_) => Kind::Struct,
            Peek::Map(_) => Kind::Map,
            Peek::Text(_) => Kind::Text,
            Peek::Scalar(_) => Kind::Scalar,
        }
    }

    /// Element or entry count, for kinds that have one
    pub fn len(&self) -> Option<usize> {
        match self {
            Peek::Array(s) | Peek::List(s) => Some(s.len()),
            Peek::Map(m) => Some(m.len()),
            _ => None,
        }
    }

    /// Whether the value is present, for kinds that can be absent
    pub fn presence(&self) -> Option<bool> {
        match self {
            Peek::Pointer(target) => Some(target.is_some()),
            _ => None,
        }
    }

    /// Leaf rendering used in diff records
    pub fn render(&self) -> String {
        match self {
            Peek::Text(s) => (*s).to_string(),
            Peek::Scalar(s) => s.render(),
            Peek::Pointer(None) => crate::diff::Presence::Nil.to_string(),
            Peek::Pointer(Some(target)) => target.peek().render(),
            Peek::Dynamic(inner) => inner.peek().render(),
            other => format!("<{}>", other.kind()),
        }
    }
}

/// Mutable view used by in-place sort normalization
pub enum PeekMut<'a> {
    /// Variable-length sequence that can be reordered
    List(&'a mut dyn SequenceMut),
    /// Children reachable from this value, with the path segment leading to each
    Children(Vec<(Segment, &'a mut dyn Diffable)>),
    /// Nothing below this value can be normalized
    Opaque,
}

/// A value the engine can compare.
///
/// Implementors must report the same [`Shape`] for every value of the type.
pub trait Diffable: AsAny {
    fn shape(&self) -> Shape;

    fn peek(&self) -> Peek<'_>;

    /// Mutable view for sort normalization; leaves keep the default
    fn peek_mut(&mut self) -> PeekMut<'_> {
        PeekMut::Opaque
    }
}

/// Indexed access to a sequence
pub trait Sequence {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, index: usize) -> Option<&dyn Diffable>;

    /// Address of the backing storage, used for the identity shortcut
    fn storage(&self) -> *const ();
}

/// Sequence that can be reordered in place
pub trait SequenceMut {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, index: usize) -> Option<&dyn Diffable>;

    fn elements_mut(&mut self) -> Vec<&mut dyn Diffable>;

    /// Reorder elements with the partition sort, using `less` as the ordering
    fn reorder(&mut self, less: &dyn Fn(&dyn Any, &dyn Any) -> bool);
}

/// Struct fields in declared order
pub trait Record {
    fn fields(&self) -> Vec<(&'static str, &dyn Diffable)>;
}

/// One map entry as seen by traversal
pub struct MapEntry<'a> {
    pub key: &'a dyn Any,
    pub rendered: String,
    pub value: &'a dyn Diffable,
}

/// Keyed associative container
pub trait Mapping {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries in a deterministic order
    fn entries(&self) -> Vec<MapEntry<'_>>;

    /// Look up the value stored under a key taken from another map of the same shape
    fn lookup(&self, key: &dyn Any) -> Option<&dyn Diffable>;
}

/// Leaf compared by equality
pub trait Scalar {
    fn render(&self) -> String;

    /// Deep equality against another leaf of the same shape
    fn same_as(&self, other: &dyn Any) -> bool;
}
