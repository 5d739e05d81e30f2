use super::*;
use pretty_assertions::assert_eq;

fn dec(mantissa: i128, scale: u32) -> Decimal {
    Decimal::new(mantissa, scale).unwrap()
}

#[test]
fn normalizes_trailing_zeros() {
    assert_eq!(dec(1500, 3), dec(15, 1));
    assert_eq!(dec(0, 5), Decimal::ZERO);
    assert_eq!(dec(1500, 3).scale(), 1);
}

#[test]
fn display_places_point() {
    assert_eq!(dec(15, 1).to_string(), "1.5");
    assert_eq!(dec(-5, 3).to_string(), "-0.005");
    assert_eq!(Decimal::from(42i64).to_string(), "42");
}

#[test]
fn add_aligns_scales() {
    assert_eq!(dec(15, 1).checked_add(dec(25, 2)), Some(dec(175, 2)));
    assert_eq!(dec(1, 0).checked_sub(dec(3, 0)), Some(dec(-2, 0)));
}

#[test]
fn mul_and_div() {
    assert_eq!(dec(15, 1).checked_mul(dec(2, 0)), Some(dec(3, 0)));
    assert_eq!(dec(1, 0).checked_div(dec(4, 0)), Some(dec(25, 2)));
    assert_eq!(dec(1, 0).checked_div(Decimal::ZERO), None);
    let third = dec(1, 0).checked_div(dec(3, 0)).unwrap();
    assert_eq!(third.scale(), MAX_SCALE);
}

#[test]
fn rem_keeps_sign_of_dividend() {
    assert_eq!(dec(-7, 0).checked_rem(dec(2, 0)), Some(dec(-1, 0)));
    assert_eq!(dec(55, 1).checked_rem(dec(2, 0)), Some(dec(15, 1)));
}

#[test]
fn overflow_is_reported() {
    let max = Decimal::from_i128(MAX_MANTISSA).unwrap();
    assert_eq!(max.checked_add(dec(1, 0)), None);
    assert_eq!(Decimal::from_i128(MAX_MANTISSA + 1), None);
}

#[test]
fn ordering_handles_signs_and_scales() {
    assert!(dec(-1, 0) < dec(1, 28));
    assert!(dec(15, 1) > dec(149, 2));
    assert!(dec(-15, 1) < dec(-149, 2));
    assert_eq!(dec(2, 0).cmp(&dec(20, 1)), std::cmp::Ordering::Equal);
}

#[test]
fn from_f64_uses_fifteen_digits() {
    assert_eq!(Decimal::from_f64(0.1), Some(dec(1, 1)));
    assert_eq!(Decimal::from_f64(-2.5), Some(dec(-25, 1)));
    assert_eq!(Decimal::from_f64(1e20), Decimal::from_i128(100_000_000_000_000_000_000));
    assert_eq!(Decimal::from_f64(f64::NAN), None);
    assert_eq!(Decimal::from_f64(1e30), None);
}

#[test]
fn trunc_and_to_f64() {
    assert_eq!(dec(-275, 2).trunc(), -2);
    assert!((dec(275, 2).to_f64() - 2.75).abs() < 1e-12);
}

#[test]
fn add_across_distant_scales_rounds_the_finer_operand() {
    let big = Decimal::from_i128(10i128.pow(20)).unwrap();
    let tiny = dec(1, 20);
    assert_eq!(big.checked_add(tiny), Some(big));
    assert_eq!(tiny.checked_add(big), Some(big));
    assert_eq!(big.checked_sub(tiny), Some(big));

    let max = Decimal::from_i128(MAX_MANTISSA).unwrap();
    assert_eq!(max.checked_add(dec(4, 1)), Some(max));
    assert_eq!(max.checked_add(dec(6, 1)), None);
}

#[test]
fn mul_rounds_wide_products_into_range() {
    let x = dec(12_345_678_901_234_567_890_123_456_789, 28);
    assert_eq!(
        x.checked_mul(x),
        Some(dec(15_241_578_753_238_836_750_495_351_563, 28))
    );
    assert_eq!(
        x.neg().checked_mul(x),
        Some(dec(-15_241_578_753_238_836_750_495_351_563, 28))
    );
    // 1e-28 squared underflows to zero.
    assert_eq!(dec(1, 28).checked_mul(dec(1, 28)), Some(Decimal::ZERO));
}

#[test]
fn mul_overflow_is_still_reported() {
    let max = Decimal::from_i128(MAX_MANTISSA).unwrap();
    assert_eq!(max.checked_mul(dec(2, 0)), None);
    assert_eq!(max.checked_mul(max), None);
    assert_eq!(max.checked_mul(dec(5, 1)), Some(dec(MAX_MANTISSA * 5, 1)));
}

#[test]
fn rem_across_distant_scales() {
    let big = Decimal::from_i128(10i128.pow(20)).unwrap();
    assert_eq!(big.checked_rem(dec(3, 20)), Some(dec(1, 20)));
    assert_eq!(dec(3, 20).checked_rem(big), Some(dec(3, 20)));
}
