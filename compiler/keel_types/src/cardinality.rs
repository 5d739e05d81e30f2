//! Multiplicity of types and expressions.

use std::fmt;

/// How many values a type or expression stands for.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Cardinality {
    /// Not a value-carrying type (e.g. `void` or a class reference that is
    /// neither a value nor a stream).
    None,
    One,
    ZeroOrOne,
    OneOrMore,
    ZeroOrMore,
}

impl Cardinality {
    pub const ALL: [Cardinality; 5] = [
        Cardinality::None,
        Cardinality::One,
        Cardinality::ZeroOrOne,
        Cardinality::OneOrMore,
        Cardinality::ZeroOrMore,
    ];

    /// Cardinality of a value that is one of two alternatives.
    ///
    /// Commutative. `One` is neutral except against `None`; anything
    /// combined with `ZeroOrMore` is `ZeroOrMore`.
    pub const fn or(self, other: Cardinality) -> Cardinality {
        use Cardinality::{None, One, OneOrMore, ZeroOrMore, ZeroOrOne};
        match (self, other) {
            (ZeroOrMore, _) | (_, ZeroOrMore) => ZeroOrMore,
            (None | One, None) | (None, One) => None,
            (One, x) | (x, One) => x,
            (None | ZeroOrOne, ZeroOrOne) | (ZeroOrOne, None) => ZeroOrOne,
            (OneOrMore, OneOrMore) => OneOrMore,
            (None | ZeroOrOne, OneOrMore) | (OneOrMore, None | ZeroOrOne) => ZeroOrMore,
        }
    }

    /// Cardinality of a collection (`self`) whose elements have cardinality
    /// `element`.
    ///
    /// A collection that always holds at least one element yields at least
    /// one value. Otherwise the result is `OneOrMore` exactly when each
    /// element is guaranteed present, else `ZeroOrMore`.
    pub const fn and(self, element: Cardinality) -> Cardinality {
        use Cardinality::{One, OneOrMore, ZeroOrMore};
        match (self, element) {
            (One | OneOrMore, _) | (_, One | OneOrMore) => OneOrMore,
            _ => ZeroOrMore,
        }
    }

    /// `ZeroOrOne` or `ZeroOrMore`.
    #[inline]
    pub const fn may_be_empty(self) -> bool {
        matches!(self, Cardinality::ZeroOrOne | Cardinality::ZeroOrMore)
    }

    /// `OneOrMore` or `ZeroOrMore`.
    #[inline]
    pub const fn is_many(self) -> bool {
        matches!(self, Cardinality::OneOrMore | Cardinality::ZeroOrMore)
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Cardinality::None => "none",
            Cardinality::One => "1",
            Cardinality::ZeroOrOne => "0..1",
            Cardinality::OneOrMore => "1..*",
            Cardinality::ZeroOrMore => "0..*",
        })
    }
}
