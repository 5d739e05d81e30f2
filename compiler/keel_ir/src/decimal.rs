//! Exact base-10 decimal values for `decimal` literals.
//!
//! A 96-bit signed mantissa with a power-of-ten scale in `0..=28`, the range
//! of the target runtime's decimal type. Values are normalized on
//! construction (no trailing zero digits, zero has scale 0), so derived
//! equality and hashing compare numeric values.

use std::cmp::Ordering;
use std::fmt;

/// Largest representable mantissa magnitude (2^96 - 1).
const MAX_MANTISSA: i128 = (1i128 << 96) - 1;

/// Largest scale (digits after the decimal point).
pub const MAX_SCALE: u8 = 28;

#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Decimal {
    mantissa: i128,
    scale: u8,
}

#[inline]
fn pow10(exp: u32) -> Option<i128> {
    10i128.checked_pow(exp)
}

/// Unsigned 256-bit magnitude, little-endian 64-bit limbs.
type Wide = [u64; 4];

#[expect(
    clippy::cast_possible_truncation,
    reason = "limbs are split from u128 values deliberately"
)]
fn wide_mul(a: u128, b: u128) -> Wide {
    let a = [a as u64, (a >> 64) as u64];
    let b = [b as u64, (b >> 64) as u64];
    let mut out = [0u64; 4];
    for (i, &x) in a.iter().enumerate() {
        let mut carry = 0u128;
        for (j, &y) in b.iter().enumerate() {
            let t = u128::from(x) * u128::from(y) + u128::from(out[i + j]) + carry;
            out[i + j] = t as u64;
            carry = t >> 64;
        }
        out[i + 2] = carry as u64;
    }
    out
}

/// Divide in place by ten, returning the remainder digit.
#[expect(
    clippy::cast_possible_truncation,
    reason = "each quotient limb and the remainder fit in u64"
)]
fn wide_div10(w: &mut Wide) -> u64 {
    let mut rem = 0u128;
    for limb in w.iter_mut().rev() {
        let cur = (rem << 64) | u128::from(*limb);
        *limb = (cur / 10) as u64;
        rem = cur % 10;
    }
    rem as u64
}

fn wide_to_u128(w: &Wide) -> Option<u128> {
    (w[2] == 0 && w[3] == 0).then(|| u128::from(w[0]) | (u128::from(w[1]) << 64))
}

/// Largest scaled addend; leaves room for the sum of two operands.
const ALIGN_LIMIT: u128 = i128::MAX.unsigned_abs() / 4;

/// Divide by ten, rounding half to even.
fn div10_round(m: i128) -> i128 {
    let q = m / 10;
    let r = (m % 10).abs();
    let away = r > 5 || (r == 5 && q % 2 != 0);
    if !away {
        q
    } else if m < 0 {
        q - 1
    } else {
        q + 1
    }
}

impl Decimal {
    pub const ZERO: Decimal = Decimal {
        mantissa: 0,
        scale: 0,
    };

    /// Build `mantissa * 10^-scale`, rounding away excess scale.
    ///
    /// Returns `None` when the value cannot be represented.
    pub fn new(mantissa: i128, scale: u32) -> Option<Self> {
        let mut m = mantissa;
        let mut s = scale;
        while s > u32::from(MAX_SCALE) || m.unsigned_abs() > MAX_MANTISSA.unsigned_abs() {
            if s == 0 {
                return None;
            }
            m = div10_round(m);
            s -= 1;
        }
        while s > 0 && m % 10 == 0 {
            m /= 10;
            s -= 1;
        }
        if m == 0 {
            s = 0;
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "s is bounded by MAX_SCALE above"
        )]
        let scale = s as u8;
        Some(Decimal { mantissa: m, scale })
    }

    /// Exact integer value, `None` beyond 96 bits.
    pub fn from_i128(value: i128) -> Option<Self> {
        Self::new(value, 0)
    }

    /// Nearest decimal to `value` at 15 significant digits.
    ///
    /// `None` for NaN, infinities and magnitudes beyond the decimal range.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        if value == 0.0 {
            return Some(Self::ZERO);
        }
        // "d.dddddddddddddde<exp>" gives exactly 15 significant digits.
        let text = format!("{value:.14e}");
        let (digits, exp) = text.split_once('e')?;
        let exp: i32 = exp.parse().ok()?;
        let negative = digits.starts_with('-');
        let digits: String = digits.chars().filter(char::is_ascii_digit).collect();
        let mut mantissa: i128 = digits.parse().ok()?;
        if negative {
            mantissa = -mantissa;
        }
        let scale = 14 - exp;
        if scale < 0 {
            let factor = pow10(scale.unsigned_abs())?;
            Self::new(mantissa.checked_mul(factor)?, 0)
        } else {
            Self::new(mantissa, scale.unsigned_abs())
        }
    }

    #[inline]
    pub const fn mantissa(self) -> i128 {
        self.mantissa
    }

    #[inline]
    pub const fn scale(self) -> u8 {
        self.scale
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.mantissa == 0
    }

    #[inline]
    pub const fn is_negative(self) -> bool {
        self.mantissa < 0
    }

    /// Integer part, truncated toward zero.
    pub fn trunc(self) -> i128 {
        match pow10(u32::from(self.scale)) {
            Some(p) => self.mantissa / p,
            None => 0,
        }
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "decimal to double conversion is lossy by definition"
    )]
    pub fn to_f64(self) -> f64 {
        self.mantissa as f64 / 10f64.powi(i32::from(self.scale))
    }

    #[must_use]
    pub fn neg(self) -> Self {
        Decimal {
            mantissa: -self.mantissa,
            scale: self.scale,
        }
    }

    /// Both mantissas expressed at the larger of the two scales.
    fn aligned(self, other: Decimal) -> Option<(i128, i128, u32)> {
        let scale = self.scale.max(other.scale);
        let a = self
            .mantissa
            .checked_mul(pow10(u32::from(scale - self.scale))?)?;
        let b = other
            .mantissa
            .checked_mul(pow10(u32::from(scale - other.scale))?)?;
        Some((a, b, u32::from(scale)))
    }

    /// Like [`aligned`](Self::aligned), but rounds the finer operand down
    /// when scaling the coarser one up would not fit.
    ///
    /// Digits dropped this way lie below the precision of any representable
    /// sum of the two.
    fn aligned_rounding(self, other: Decimal) -> (i128, i128, u32) {
        let swapped = self.scale < other.scale;
        let (fine, coarse) = if swapped { (other, self) } else { (self, other) };
        let mut m = fine.mantissa;
        let mut scale = u32::from(fine.scale);
        let coarse_scale = u32::from(coarse.scale);
        let scaled = loop {
            let up = pow10(scale - coarse_scale).and_then(|p| coarse.mantissa.checked_mul(p));
            if let Some(c) = up.filter(|c| c.unsigned_abs() <= ALIGN_LIMIT) {
                break c;
            }
            m = div10_round(m);
            scale -= 1;
        };
        if swapped {
            (scaled, m, scale)
        } else {
            (m, scaled, scale)
        }
    }

    pub fn checked_add(self, other: Decimal) -> Option<Decimal> {
        let (a, b, scale) = self.aligned_rounding(other);
        Self::new(a.checked_add(b)?, scale)
    }

    pub fn checked_sub(self, other: Decimal) -> Option<Decimal> {
        self.checked_add(other.neg())
    }

    /// Exact product, rounded half to even into range.
    pub fn checked_mul(self, other: Decimal) -> Option<Decimal> {
        let negative = self.is_negative() != other.is_negative();
        let mut wide = wide_mul(self.mantissa.unsigned_abs(), other.mantissa.unsigned_abs());
        let mut scale = u32::from(self.scale) + u32::from(other.scale);
        let mut last = 0;
        let mut sticky = false;
        let mut m = loop {
            let fits = wide_to_u128(&wide).filter(|&m| {
                m <= MAX_MANTISSA.unsigned_abs() && scale <= u32::from(MAX_SCALE)
            });
            if let Some(m) = fits {
                break m;
            }
            if scale == 0 {
                return None;
            }
            sticky |= last != 0;
            last = wide_div10(&mut wide);
            scale -= 1;
        };
        if last > 5 || (last == 5 && (sticky || m % 2 == 1)) {
            m += 1;
        }
        let m = i128::try_from(m).ok()?;
        Self::new(if negative { -m } else { m }, scale)
    }

    /// Long division to at most `MAX_SCALE` fractional digits.
    ///
    /// `None` on division by zero or overflow.
    pub fn checked_div(self, other: Decimal) -> Option<Decimal> {
        if other.is_zero() {
            return None;
        }
        let negative = self.is_negative() != other.is_negative();
        let a = self.mantissa.abs();
        let b = other.mantissa.abs();
        let mut quotient = a / b;
        let mut rem = a % b;
        let mut scale = i32::from(self.scale) - i32::from(other.scale);
        while rem != 0 && scale < i32::from(MAX_SCALE) && quotient <= MAX_MANTISSA / 10 {
            rem *= 10;
            quotient = quotient * 10 + rem / b;
            rem %= b;
            scale += 1;
        }
        if scale < 0 {
            quotient = quotient.checked_mul(pow10(scale.unsigned_abs())?)?;
            scale = 0;
        }
        let quotient = if negative { -quotient } else { quotient };
        Self::new(quotient, scale.unsigned_abs())
    }

    pub fn checked_rem(self, other: Decimal) -> Option<Decimal> {
        if other.is_zero() {
            return None;
        }
        if let Some((a, b, scale)) = self.aligned(other) {
            return Self::new(a % b, scale);
        }
        if self.scale >= other.scale {
            // The divisor scaled up exceeds every mantissa.
            return Some(self);
        }
        // (a * 10^k) % b, one digit at a time.
        let b = other.mantissa;
        let mut r = self.mantissa % b;
        for _ in self.scale..other.scale {
            r = (r * 10) % b;
        }
        Self::new(r, u32::from(other.scale))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_negative(), other.is_negative()) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }
        if let Some((a, b, _)) = self.aligned(*other) {
            return a.cmp(&b);
        }
        // Alignment overflowed: the side scaled up has the larger magnitude.
        let self_bigger = self.scale < other.scale;
        match (self_bigger, self.is_negative()) {
            (true, false) | (false, true) => Ordering::Greater,
            (true, true) | (false, false) => Ordering::Less,
        }
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Decimal {
            mantissa: i128::from(value),
            scale: 0,
        }
    }
}

impl From<u64> for Decimal {
    fn from(value: u64) -> Self {
        Decimal {
            mantissa: i128::from(value),
            scale: 0,
        }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.unsigned_abs().to_string();
        let sign = if self.is_negative() { "-" } else { "" };
        let scale = usize::from(self.scale);
        if scale == 0 {
            return write!(f, "{sign}{digits}");
        }
        let padded = format!("{digits:0>width$}", width = scale + 1);
        let (int, frac) = padded.split_at(padded.len() - scale);
        write!(f, "{sign}{int}.{frac}")
    }
}

impl fmt::Debug for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}m")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
