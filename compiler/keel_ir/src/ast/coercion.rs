//! Conversion operations materialized into the expression tree.

use crate::ConversionId;

/// How a [`Coerce`](super::ExprKind::Coerce) node converts its operand.
///
/// The target type is the node's own type; the source type is the
/// operand's type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum CoercionKind {
    /// Retypes the operand without changing its representation (enum to
    /// underlying integer, alias stripping, reference upcast).
    Retype,
    /// Lossless numeric widening.
    NumericWiden,
    /// Narrowing or sign-changing numeric conversion.
    NumericNarrow { checked: bool },
    /// Value type to reference type.
    Box,
    /// `Boxed<T>` to `T`.
    Unbox,
    /// `object` or interface to a value type, with a runtime type test.
    UnboxAny,
    /// Reference type to a derived class, with a runtime type test.
    Downcast,
    /// Reference to an interface not statically implemented.
    InterfaceCast,
    /// `T*` or `ref T` to `T`.
    Deref,
    /// `T` to `T?`.
    NullableWrap,
    /// `T?` to `T`, throwing when empty.
    NullableValue,
    /// `T?` to `T`, yielding `default(T)` when empty.
    NullableDefault,
    /// Asserts a reference is non-null while converting to `NonNull<T>`.
    NonNullAssert,
    /// `T` into a single-argument wrapper (`Invariant<T>`, `NonNull<T>`).
    WrapperConstruct,
    /// The payload of a single-argument wrapper.
    WrapperExtract,
    /// Call to a user-defined conversion operator.
    UserDefined(ConversionId),
    /// Value to a union, selecting the alternative with this canonical tag.
    UnionTag { tag: u32 },
    /// The payload of a union, typed as `object`.
    UnionToObject,
    /// `object` into an intersection, with runtime type tests.
    IntersectionFromObject,
    /// An intersection to `object`.
    IntersectionToObject,
    /// Delegate to a compatible delegate type.
    DelegateConvert,
    /// Anonymous function to a delegate.
    AnonymousToDelegate,
    /// `T` to a one-element stream.
    Singleton,
    /// First element of a stream, throwing when empty.
    FirstElement,
    /// A stream to `NonEmptySequence<T>`, throwing when empty.
    NonEmpty,
    /// `T` to `Tuple<T>`.
    SingletonTuple,
    /// Invocation of a zero-parameter anonymous function.
    Invoke,
}

impl CoercionKind {
    /// Kinds that perform a runtime test and may throw.
    pub const fn can_fail(self) -> bool {
        matches!(
            self,
            Self::NumericNarrow { checked: true }
                | Self::UnboxAny
                | Self::Downcast
                | Self::InterfaceCast
                | Self::NullableValue
                | Self::NonNullAssert
                | Self::IntersectionFromObject
                | Self::FirstElement
                | Self::NonEmpty
        )
    }
}
