//! Declarative impls for user types.

/// Implement `Diffable` for a struct, listing its fields in comparison order.
///
/// Fields are compared in the order given here; `as "Name"` overrides the
/// path segment, which otherwise is the field identifier. The struct name
/// becomes the root path when the struct is compared directly.
///
/// ```
/// use sdiffer_core::diffable_struct;
///
/// struct Location {
///     name: String,
///     province: Option<Box<Location>>,
/// }
/// diffable_struct!(Location { name as "Name", province as "Province" });
/// ```
#[macro_export]
macro_rules! diffable_struct {
    ($ty:ident { $($field:ident $(as $rename:literal)?),* $(,)? }) => {
        impl $crate::reflect::Record for $ty {
            fn fields(&self) -> ::std::vec::Vec<(&'static str, &dyn $crate::reflect::Diffable)> {
                ::std::vec![
                    $((
                        $crate::__field_name!($field $(, $rename)?),
                        &self.$field as &dyn $crate::reflect::Diffable,
                    ),)*
                ]
            }
        }

        impl $crate::reflect::Diffable for $ty {
            fn shape(&self) -> $crate::reflect::Shape {
                $crate::reflect::Shape::named::<$ty>(stringify!($ty))
            }

            fn peek(&self) -> $crate::reflect::Peek<'_> {
                $crate::reflect::Peek::Struct(self)
            }

            fn peek_mut(&mut self) -> $crate::reflect::PeekMut<'_> {
                $crate::reflect::PeekMut::Children(::std::vec![
                    $((
                        $crate::path::Segment::Field($crate::__field_name!($field $(, $rename)?)),
                        &mut self.$field as &mut dyn $crate::reflect::Diffable,
                    ),)*
                ])
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_name {
    ($field:ident) => {
        stringify!($field)
    };
    ($field:ident, $rename:literal) => {
        $rename
    };
}

/// Implement `Diffable` for opaque leaf types compared with `PartialEq`.
///
/// Values render with `Debug` in diff records.
///
/// ```
/// use sdiffer_core::diffable_scalar;
///
/// #[derive(Debug, PartialEq)]
/// enum Color {
///     Red,
///     Blue,
/// }
/// diffable_scalar!(Color);
/// ```
#[macro_export]
macro_rules! diffable_scalar {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::reflect::Scalar for $ty {
            fn render(&self) -> ::std::string::String {
                ::std::format!("{:?}", self)
            }

            fn same_as(&self, other: &dyn ::std::any::Any) -> bool {
                other.downcast_ref::<$ty>().is_some_and(|o| self == o)
            }
        }

        impl $crate::reflect::Diffable for $ty {
            fn shape(&self) -> $crate::reflect::Shape {
                $crate::reflect::Shape::named::<$ty>(stringify!($ty))
            }

            fn peek(&self) -> $crate::reflect::Peek<'_> {
                $crate::reflect::Peek::Scalar(self)
            }
        }
    )+};
}
