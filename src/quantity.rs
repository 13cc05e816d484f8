//! Exact rational quantities
//!
//! Every quantity, rate and solved value is a `BigRational`. Text forms accept
//! integers, decimals (`37.5`) and fractions (`45/8`, `1.5/4`).

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{ToPrimitive, Zero};
use thiserror::Error;

pub type Quantity = BigRational;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseQuantityError {
    #[error("empty quantity")]
    Empty,
    #[error("invalid quantity '{0}'")]
    Invalid(String),
    #[error("zero denominator in '{0}'")]
    ZeroDenominator(String),
}

/// Whole-number quantity
pub fn int(n: i64) -> Quantity {
    BigRational::from_integer(BigInt::from(n))
}

/// Parse a quantity without rounding
pub fn parse(text: &str) -> Result<Quantity, ParseQuantityError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseQuantityError::Empty);
    }

    if let Some((num, den)) = text.split_once('/') {
        let num = parse_decimal(num.trim(), text)?;
        let den = parse_decimal(den.trim(), text)?;
        if den.is_zero() {
            return Err(ParseQuantityError::ZeroDenominator(text.to_string()));
        }
        return Ok(num / den);
    }

    parse_decimal(text, text)
}

fn parse_decimal(part: &str, whole: &str) -> Result<Quantity, ParseQuantityError> {
    let invalid = || ParseQuantityError::Invalid(whole.to_string());

    let (negative, digits) = match part.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, part.strip_prefix('+').unwrap_or(part)),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid());
    }
    if !int_part
        .chars()
        .chain(frac_part.chars())
        .all(|c| c.is_ascii_digit())
    {
        return Err(invalid());
    }

    let mantissa: BigInt = format!("{int_part}{frac_part}")
        .parse()
        .map_err(|_| invalid())?;
    let scale = num_traits::pow(BigInt::from(10u32), frac_part.len());
    let value = BigRational::new(mantissa, scale);

    Ok(if negative { -value } else { value })
}

/// Lossless text form, `n` or `n/d`
pub fn to_exact(q: &Quantity) -> String {
    q.to_string()
}

/// Rounded decimal form for display
pub fn to_decimal(q: &Quantity, places: usize) -> String {
    match q.to_f64() {
        Some(v) => format!("{:.*}", places, v),
        None => to_exact(q),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratio(n: i64, d: i64) -> Quantity {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    #[test]
    fn test_parse_integer_and_decimal() {
        assert_eq!(parse("30").unwrap(), int(30));
        assert_eq!(parse("37.5").unwrap(), ratio(75, 2));
        assert_eq!(parse("5.625").unwrap(), ratio(45, 8));
        assert_eq!(parse(".5").unwrap(), ratio(1, 2));
        assert_eq!(parse("-2.25").unwrap(), ratio(-9, 4));
    }

    #[test]
    fn test_parse_fraction() {
        assert_eq!(parse("500/120").unwrap(), ratio(25, 6));
        assert_eq!(parse(" 1.5 / 4 ").unwrap(), ratio(3, 8));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse(""), Err(ParseQuantityError::Empty));
        assert!(matches!(parse("abc"), Err(ParseQuantityError::Invalid(_))));
        assert!(matches!(parse("1.2.3"), Err(ParseQuantityError::Invalid(_))));
        assert!(matches!(parse("."), Err(ParseQuantityError::Invalid(_))));
        assert!(matches!(
            parse("3/0"),
            Err(ParseQuantityError::ZeroDenominator(_))
        ));
    }

    #[test]
    fn test_exact_text_round_trips_through_parse() {
        let q = ratio(45, 8);
        assert_eq!(to_exact(&q), "45/8");
        assert_eq!(parse(&to_exact(&q)).unwrap(), q);
    }

    #[test]
    fn test_to_decimal() {
        assert_eq!(to_decimal(&ratio(1, 3), 2), "0.33");
        assert_eq!(to_decimal(&int(30), 1), "30.0");
    }
}
