//! Numeric tower.
//!
//! Every numeric builtin is described by a [`NumKind`]: its class, its
//! signedness and its width. Promotion, widening and the integer
//! tie-break are computed from that triple instead of being tabulated
//! per pair of kinds.
//!
//! `char` takes part as an unsigned 16-bit integer. The native-size
//! integers have no fixed width and are handled separately by
//! [`is_native_widening`].

use crate::data::Primitive;

/// Broad numeric class.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NumClass {
    Integral,
    Floating,
    Decimal,
}

/// Class, signedness and width of a numeric builtin.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct NumKind {
    pub class: NumClass,
    pub signed: bool,
    pub bits: u8,
}

impl NumKind {
    const fn int(signed: bool, bits: u8) -> Self {
        NumKind {
            class: NumClass::Integral,
            signed,
            bits,
        }
    }

    /// Describe a builtin; `None` for non-numeric and native-size types.
    pub const fn of(p: Primitive) -> Option<NumKind> {
        Some(match p {
            Primitive::I8 => Self::int(true, 8),
            Primitive::U8 => Self::int(false, 8),
            Primitive::I16 => Self::int(true, 16),
            Primitive::U16 | Primitive::Char => Self::int(false, 16),
            Primitive::I32 => Self::int(true, 32),
            Primitive::U32 => Self::int(false, 32),
            Primitive::I64 => Self::int(true, 64),
            Primitive::U64 => Self::int(false, 64),
            Primitive::F32 => NumKind {
                class: NumClass::Floating,
                signed: true,
                bits: 32,
            },
            Primitive::F64 => NumKind {
                class: NumClass::Floating,
                signed: true,
                bits: 64,
            },
            Primitive::Decimal => NumKind {
                class: NumClass::Decimal,
                signed: true,
                bits: 128,
            },
            _ => return None,
        })
    }

    /// The builtin with this description. `char` is never produced.
    pub const fn to_primitive(self) -> Option<Primitive> {
        Some(match (self.class, self.signed, self.bits) {
            (NumClass::Integral, true, 8) => Primitive::I8,
            (NumClass::Integral, false, 8) => Primitive::U8,
            (NumClass::Integral, true, 16) => Primitive::I16,
            (NumClass::Integral, false, 16) => Primitive::U16,
            (NumClass::Integral, true, 32) => Primitive::I32,
            (NumClass::Integral, false, 32) => Primitive::U32,
            (NumClass::Integral, true, 64) => Primitive::I64,
            (NumClass::Integral, false, 64) => Primitive::U64,
            (NumClass::Floating, _, 32) => Primitive::F32,
            (NumClass::Floating, _, 64) => Primitive::F64,
            (NumClass::Decimal, _, _) => Primitive::Decimal,
            _ => return None,
        })
    }

    #[inline]
    pub const fn is_integral(self) -> bool {
        matches!(self.class, NumClass::Integral)
    }

    /// Inclusive value range of an integral kind.
    pub const fn int_range(self) -> Option<(i128, i128)> {
        if !self.is_integral() {
            return None;
        }
        let bits = self.bits as u32;
        Some(if self.signed {
            (-(1i128 << (bits - 1)), (1i128 << (bits - 1)) - 1)
        } else {
            (0, (1i128 << bits) - 1)
        })
    }
}

/// Type both operands of a binary arithmetic operator are converted to.
///
/// Two integers narrower than 32 bits meet at `i32`. Otherwise operands of
/// the same signedness take the wider width, and mixed signedness takes
/// the signed type wide enough for both ranges, capped at `i64`. Floating
/// types win over integers, and `decimal` wins over integers. `None` when
/// the pair has no common arithmetic type (`decimal` with a float, or a
/// non-numeric operand).
pub fn promote(a: Primitive, b: Primitive) -> Option<Primitive> {
    let ka = NumKind::of(a)?;
    let kb = NumKind::of(b)?;
    match (ka.class, kb.class) {
        (NumClass::Decimal, NumClass::Floating) | (NumClass::Floating, NumClass::Decimal) => None,
        (NumClass::Decimal, _) | (_, NumClass::Decimal) => Some(Primitive::Decimal),
        (NumClass::Floating, _) | (_, NumClass::Floating) => {
            if a == Primitive::F64 || b == Primitive::F64 {
                Some(Primitive::F64)
            } else {
                Some(Primitive::F32)
            }
        }
        (NumClass::Integral, NumClass::Integral) => {
            let bits = ka.bits.max(kb.bits);
            if bits < 32 {
                return Some(Primitive::I32);
            }
            if ka.signed == kb.signed {
                return NumKind::int(ka.signed, bits).to_primitive();
            }
            let (signed, unsigned) = if ka.signed { (ka, kb) } else { (kb, ka) };
            if unsigned.bits < signed.bits {
                signed.to_primitive()
            } else {
                NumKind::int(true, unsigned.bits.saturating_mul(2).min(64)).to_primitive()
            }
        }
    }
}

/// Operand type of a unary arithmetic operator: integers narrower than
/// 32 bits promote to `i32`, everything else numeric is unchanged.
pub fn promote_unary(p: Primitive) -> Option<Primitive> {
    let kind = NumKind::of(p)?;
    if kind.is_integral() {
        promote_small(kind).to_primitive()
    } else {
        Some(p)
    }
}

fn promote_small(kind: NumKind) -> NumKind {
    if kind.is_integral() && kind.bits < 32 {
        NumKind::int(true, 32)
    } else {
        kind
    }
}

/// Whether `from` converts to `to` without a cast.
///
/// The graph: signed integers widen to signed of at least their width;
/// unsigned integers widen to unsigned of at least their width and to
/// signed of strictly greater width; every integer widens to `f32`, `f64`
/// and `decimal`; `f32` widens to `f64`. Nothing widens into `char`, and
/// floating types never reach `decimal` implicitly.
pub fn is_implicit_widening(from: Primitive, to: Primitive) -> bool {
    if from == to {
        return true;
    }
    if to == Primitive::Char {
        return false;
    }
    let (Some(f), Some(t)) = (NumKind::of(from), NumKind::of(to)) else {
        return false;
    };
    match (f.class, t.class) {
        (NumClass::Integral, NumClass::Integral) => {
            if f.signed {
                t.signed && t.bits >= f.bits
            } else if t.signed {
                t.bits > f.bits
            } else {
                t.bits >= f.bits
            }
        }
        (NumClass::Integral, NumClass::Floating | NumClass::Decimal) => true,
        (NumClass::Floating, NumClass::Floating) => t.bits >= f.bits,
        _ => false,
    }
}

/// Widening into a native-size integer, permitted only in unsafe code.
///
/// Signed sources reach `intptr`; unsigned sources (and `char`) reach
/// both `intptr` and `uintptr`.
pub fn is_native_widening(from: Primitive, to: Primitive) -> bool {
    let Some(f) = NumKind::of(from).filter(|k| k.is_integral()) else {
        return false;
    };
    match to {
        Primitive::IntPtr => true,
        Primitive::UIntPtr => !f.signed,
        _ => false,
    }
}

/// Whether a cast can convert `from` to `to`. Every pair of numeric
/// builtins (native-size integers and `char` included) is convertible.
pub fn is_explicit_numeric(from: Primitive, to: Primitive) -> bool {
    from.is_numeric() && to.is_numeric()
}

/// Integer tie-break between two competing conversion targets.
///
/// `Some(true)` when `t1` is preferred, `Some(false)` when `t2` is.
/// A signed target beats an unsigned one whatever the widths; with equal
/// signedness the narrower one wins. `None` for pairs outside the
/// table: equal kinds, `char`, native-size or non-integral kinds.
pub fn prefer_integer(t1: Primitive, t2: Primitive) -> Option<bool> {
    if t1 == t2 || t1 == Primitive::Char || t2 == Primitive::Char {
        return None;
    }
    let k1 = NumKind::of(t1).filter(|k| k.is_integral())?;
    let k2 = NumKind::of(t2).filter(|k| k.is_integral())?;
    if k1.signed != k2.signed {
        Some(k1.signed)
    } else {
        Some(k1.bits < k2.bits)
    }
}

/// `sizeof` of a builtin with a fixed size.
pub const fn size_of(p: Primitive) -> Option<u32> {
    Some(match p {
        Primitive::Bool | Primitive::I8 | Primitive::U8 => 1,
        Primitive::Char | Primitive::I16 | Primitive::U16 => 2,
        Primitive::I32 | Primitive::U32 | Primitive::F32 => 4,
        Primitive::I64 | Primitive::U64 | Primitive::F64 => 8,
        Primitive::Decimal => 16,
        _ => return None,
    })
}
