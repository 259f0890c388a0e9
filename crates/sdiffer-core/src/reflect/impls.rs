//! `Diffable` for std types.

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::hash::{BuildHasher, Hash};
use std::rc::Rc;
use std::sync::Arc;

use super::{
    AsAny, Diffable, MapEntry, Mapping, Peek, PeekMut, Scalar, Sequence, SequenceMut, Shape,
};
use crate::path::Segment;
use crate::rules::quicksort;

// ---------------------------------------------------------------------------
// Leaves
// ---------------------------------------------------------------------------

macro_rules! display_scalars {
    ($($ty:ty),* $(,)?) => {$(
        impl Scalar for $ty {
            fn render(&self) -> String {
                self.to_string()
            }

            fn same_as(&self, other: &dyn Any) -> bool {
                other.downcast_ref::<$ty>().is_some_and(|o| self == o)
            }
        }

        impl Diffable for $ty {
            fn shape(&self) -> Shape {
                Shape::named::<$ty>(stringify!($ty))
            }

            fn peek(&self) -> Peek<'_> {
                Peek::Scalar(self)
            }
        }
    )*};
}

display_scalars!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char,
);

impl Diffable for String {
    fn shape(&self) -> Shape {
        Shape::named::<String>("String")
    }

    fn peek(&self) -> Peek<'_> {
        Peek::Text(self.as_str())
    }
}

impl Diffable for &'static str {
    fn shape(&self) -> Shape {
        Shape::named::<&'static str>("str")
    }

    fn peek(&self) -> Peek<'_> {
        Peek::Text(self)
    }
}

// ---------------------------------------------------------------------------
// Sequences
// ---------------------------------------------------------------------------

impl<T: Diffable> Sequence for Vec<T> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn get(&self, index: usize) -> Option<&dyn Diffable> {
        self.as_slice().get(index).map(|v| v as &dyn Diffable)
    }

    fn storage(&self) -> *const () {
        self.as_ptr().cast()
    }
}

impl<T: Diffable> SequenceMut for Vec<T> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn get(&self, index: usize) -> Option<&dyn Diffable> {
        self.as_slice().get(index).map(|v| v as &dyn Diffable)
    }

    fn elements_mut(&mut self) -> Vec<&mut dyn Diffable> {
        self.iter_mut().map(|v| v as &mut dyn Diffable).collect()
    }

    fn reorder(&mut self, less: &dyn Fn(&dyn Any, &dyn Any) -> bool) {
        quicksort(self.as_mut_slice(), &|x: &T, y: &T| {
            less(AsAny::as_any(x), AsAny::as_any(y))
        });
    }
}

impl<T: Diffable> Diffable for Vec<T> {
    fn shape(&self) -> Shape {
        Shape::of::<Vec<T>>()
    }

    fn peek(&self) -> Peek<'_> {
        Peek::List(self)
    }

    fn peek_mut(&mut self) -> PeekMut<'_> {
        PeekMut::List(self)
    }
}

impl<T: Diffable, const N: usize> Sequence for [T; N] {
    fn len(&self) -> usize {
        N
    }

    fn get(&self, index: usize) -> Option<&dyn Diffable> {
        self.as_slice().get(index).map(|v| v as &dyn Diffable)
    }

    fn storage(&self) -> *const () {
        self.as_ptr().cast()
    }
}

impl<T: Diffable, const N: usize> Diffable for [T; N] {
    fn shape(&self) -> Shape {
        Shape::of::<[T; N]>()
    }

    fn peek(&self) -> Peek<'_> {
        Peek::Array(self)
    }

    fn peek_mut(&mut self) -> PeekMut<'_> {
        PeekMut::Children(
            self.iter_mut()
                .enumerate()
                .map(|(i, v)| (Segment::Index(i), v as &mut dyn Diffable))
                .collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// Pointers
// ---------------------------------------------------------------------------

impl<T: Diffable> Diffable for Option<T> {
    fn shape(&self) -> Shape {
        Shape::of::<Option<T>>()
    }

    fn peek(&self) -> Peek<'_> {
        Peek::Pointer(self.as_ref().map(|v| v as &dyn Diffable))
    }

    fn peek_mut(&mut self) -> PeekMut<'_> {
        match self {
            Some(v) => PeekMut::Children(vec![(Segment::Same, v as &mut dyn Diffable)]),
            None => PeekMut::Opaque,
        }
    }
}

impl<T: Diffable> Diffable for Box<T> {
    fn shape(&self) -> Shape {
        Shape::of::<Box<T>>()
    }

    fn peek(&self) -> Peek<'_> {
        Peek::Pointer(Some(&**self as &dyn Diffable))
    }

    fn peek_mut(&mut self) -> PeekMut<'_> {
        PeekMut::Children(vec![(Segment::Same, &mut **self as &mut dyn Diffable)])
    }
}

// Shared targets are only reachable for reordering while uniquely owned.
impl<T: Diffable> Diffable for Rc<T> {
    fn shape(&self) -> Shape {
        Shape::of::<Rc<T>>()
    }

    fn peek(&self) -> Peek<'_> {
        Peek::Pointer(Some(&**self as &dyn Diffable))
    }

    fn peek_mut(&mut self) -> PeekMut<'_> {
        match Rc::get_mut(self) {
            Some(v) => PeekMut::Children(vec![(Segment::Same, v as &mut dyn Diffable)]),
            None => PeekMut::Opaque,
        }
    }
}

impl<T: Diffable> Diffable for Arc<T> {
    fn shape(&self) -> Shape {
        Shape::of::<Arc<T>>()
    }

    fn peek(&self) -> Peek<'_> {
        Peek::Pointer(Some(&**self as &dyn Diffable))
    }

    fn peek_mut(&mut self) -> PeekMut<'_> {
        match Arc::get_mut(self) {
            Some(v) => PeekMut::Children(vec![(Segment::Same, v as &mut dyn Diffable)]),
            None => PeekMut::Opaque,
        }
    }
}

// ---------------------------------------------------------------------------
// Dynamic
// ---------------------------------------------------------------------------

impl Diffable for Box<dyn Diffable> {
    fn shape(&self) -> Shape {
        Shape::of::<Box<dyn Diffable>>()
    }

    fn peek(&self) -> Peek<'_> {
        Peek::Dynamic(&**self)
    }

    fn peek_mut(&mut self) -> PeekMut<'_> {
        let inner: &mut dyn Diffable = &mut **self;
        let name = inner.shape().name();
        PeekMut::Children(vec![(Segment::Shape(name), inner)])
    }
}

// ---------------------------------------------------------------------------
// Maps
// ---------------------------------------------------------------------------

impl<K, V, S> Mapping for HashMap<K, V, S>
where
    K: Display + Eq + Hash + 'static,
    V: Diffable,
    S: BuildHasher + 'static,
{
    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn entries(&self) -> Vec<MapEntry<'_>> {
        let mut entries: Vec<MapEntry<'_>> = self
            .iter()
            .map(|(k, v)| MapEntry {
                key: k as &dyn Any,
                rendered: k.to_string(),
                value: v as &dyn Diffable,
            })
            .collect();
        entries.sort_by(|x, y| x.rendered.cmp(&y.rendered));
        entries
    }

    fn lookup(&self, key: &dyn Any) -> Option<&dyn Diffable> {
        key.downcast_ref::<K>()
            .and_then(|k| self.get(k))
            .map(|v| v as &dyn Diffable)
    }
}

impl<K, V, S> Diffable for HashMap<K, V, S>
where
    K: Display + Eq + Hash + 'static,
    V: Diffable,
    S: BuildHasher + 'static,
{
    fn shape(&self) -> Shape {
        Shape::of::<HashMap<K, V, S>>()
    }

    fn peek(&self) -> Peek<'_> {
        Peek::Map(self)
    }

    fn peek_mut(&mut self) -> PeekMut<'_> {
        PeekMut::Children(
            self.iter_mut()
                .map(|(k, v)| (Segment::Key(k.to_string()), v as &mut dyn Diffable))
                .collect(),
        )
    }
}

impl<K, V> Mapping for BTreeMap<K, V>
where
    K: Display + Ord + 'static,
    V: Diffable,
{
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn entries(&self) -> Vec<MapEntry<'_>> {
        self.iter()
            .map(|(k, v)| MapEntry {
                key: k as &dyn Any,
                rendered: k.to_string(),
                value: v as &dyn Diffable,
            })
            .collect()
    }

    fn lookup(&self, key: &dyn Any) -> Option<&dyn Diffable> {
        key.downcast_ref::<K>()
            .and_then(|k| self.get(k))
            .map(|v| v as &dyn Diffable)
    }
}

impl<K, V> Diffable for BTreeMap<K, V>
where
    K: Display + Ord + 'static,
    V: Diffable,
{
    fn shape(&self) -> Shape {
        Shape::of::<BTreeMap<K, V>>()
    }

    fn peek(&self) -> Peek<'_> {
        Peek::Map(self)
    }

    fn peek_mut(&mut self) -> PeekMut<'_> {
        PeekMut::Children(
            self.iter_mut()
                .map(|(k, v)| (Segment::Key(k.to_string()), v as &mut dyn Diffable))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::Kind;

    #[test]
    fn test_scalar_same_as() {
        assert!(3i32.same_as(&3i32));
        assert!(!3i32.same_as(&4i32));
        assert!(!3i32.same_as(&3i64));
        assert!(!f64::NAN.same_as(&f64::NAN));
    }

    #[test]
    fn test_kinds() {
        let boxed: Box<dyn Diffable> = Box::new(1u8);
        assert_eq!(1u8.peek().kind(), Kind::Scalar);
        assert_eq!(String::new().peek().kind(), Kind::Text);
        assert_eq!("x".peek().kind(), Kind::Text);
        assert_eq!(vec![1u8].peek().kind(), Kind::List);
        assert_eq!([1u8, 2].peek().kind(), Kind::Array);
        assert_eq!(Some(1u8).peek().kind(), Kind::Pointer);
        assert_eq!(Box::new(1u8).peek().kind(), Kind::Pointer);
        assert_eq!(Rc::new(1u8).peek().kind(), Kind::Pointer);
        assert_eq!(boxed.peek().kind(), Kind::Dynamic);
        assert_eq!(HashMap::<String, u8>::new().peek().kind(), Kind::Map);
        assert_eq!(BTreeMap::<u8, u8>::new().peek().kind(), Kind::Map);
    }

    #[test]
    fn test_hash_map_entries_sorted_by_rendered_key() {
        let mut m = HashMap::new();
        m.insert("b".to_string(), 2u8);
        m.insert("a".to_string(), 1u8);
        m.insert("c".to_string(), 3u8);
        let keys: Vec<String> = Mapping::entries(&m).into_iter().map(|e| e.rendered).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_btree_map_entries_in_key_order() {
        let mut m = BTreeMap::new();
        m.insert(10u32, 1u8);
        m.insert(9u32, 2u8);
        let keys: Vec<String> = Mapping::entries(&m).into_iter().map(|e| e.rendered).collect();
        assert_eq!(keys, vec!["9", "10"]);
    }

    #[test]
    fn test_map_lookup_by_foreign_key() {
        let mut a = HashMap::new();
        a.insert("1".to_string(), "x".to_string());
        let mut b = HashMap::new();
        b.insert("1".to_string(), "y".to_string());

        let entries = Mapping::entries(&a);
        let found = Mapping::lookup(&b, entries[0].key).map(|v| v.peek().render());
        assert_eq!(found.as_deref(), Some("y"));
        assert!(Mapping::lookup(&b, &1u8).is_none());
    }

    #[test]
    fn test_vec_reorder() {
        let mut v = vec![5i32, 4, 3, 2, 1];
        SequenceMut::reorder(&mut v, &|a, b| {
            match (a.downcast_ref::<i32>(), b.downcast_ref::<i32>()) {
                (Some(a), Some(b)) => a < b,
                _ => false,
            }
        });
        assert_eq!(v, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_shared_rc_is_opaque() {
        let mut only = Rc::new(vec![1u8]);
        assert!(matches!(only.peek_mut(), PeekMut::Children(_)));

        let mut shared = Rc::new(vec![1u8]);
        let _other = Rc::clone(&shared);
        assert!(matches!(shared.peek_mut(), PeekMut::Opaque));
    }

    #[test]
    fn test_dynamic_peek_mut_carries_shape_name() {
        let mut boxed: Box<dyn Diffable> = Box::new(7u16);
        match boxed.peek_mut() {
            PeekMut::Children(children) => {
                assert_eq!(children.len(), 1);
                assert_eq!(children[0].0, Segment::Shape("u16"));
            }
            _ => panic!("expected children"),
        }
    }
}
