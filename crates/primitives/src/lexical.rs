//! Order-preserving score encoding
//!
//! Sorted-set scores live in a string sort attribute, so the encoding must
//! sort byte-wise exactly like the numbers it represents.
//!
//! ## Format
//!
//! | Class | Encoding |
//! |-------|----------|
//! | −∞ | `0` |
//! | negative finite | `1` + complemented biased exponent + complemented digits + `~` |
//! | ±0 | `2` |
//! | positive finite | `3` + biased exponent (3 digits) + significant digits |
//! | +∞ | `4` |
//!
//! Significant digits are the shortest decimal digits that round-trip the
//! `f64`, without the decimal point. The exponent is the decimal exponent
//! plus 400, which keeps every `f64` exponent (−324..=308) in three digits.
//!
//! Within negatives every digit is replaced by its nine's complement so a
//! larger magnitude sorts first. The trailing `~` sorts above every digit,
//! which makes a shorter complemented mantissa (a smaller magnitude) sort
//! after a longer one sharing its prefix.

use strata_core::{Error, Result};

const NEG_INFINITY: &str = "0";
const NEGATIVE: char = '1';
const ZERO: &str = "2";
const POSITIVE: char = '3';
const POS_INFINITY: &str = "4";

const EXPONENT_BIAS: i32 = 400;
const EXPONENT_MAX: i32 = 999;
const NEGATIVE_TERMINATOR: char = '~';

/// Encode a score into its order-preserving string form
///
/// # Errors
///
/// Returns `Error::InvalidScore` for NaN.
pub fn encode_score(score: f64) -> Result<String> {
    if score.is_nan() {
        return Err(Error::InvalidScore(score));
    }
    if score == f64::INFINITY {
        return Ok(POS_INFINITY.to_string());
    }
    if score == f64::NEG_INFINITY {
        return Ok(NEG_INFINITY.to_string());
    }
    if score == 0.0 {
        return Ok(ZERO.to_string());
    }

    let (digits, exponent) = decimal_parts(score.abs());
    let biased = exponent + EXPONENT_BIAS;

    let mut out = String::with_capacity(digits.len() + 5);
    if score > 0.0 {
        out.push(POSITIVE);
        out.push_str(&format!("{:03}", biased));
        out.push_str(&digits);
    } else {
        out.push(NEGATIVE);
        out.push_str(&format!("{:03}", EXPONENT_MAX - biased));
        out.extend(digits.chars().map(complement));
        out.push(NEGATIVE_TERMINATOR);
    }
    Ok(out)
}

/// Decode a string produced by [`encode_score`]
///
/// # Errors
///
/// Returns `Error::Corruption` if the input is not a valid encoding.
pub fn decode_score(encoded: &str) -> Result<f64> {
    let corrupt = || Error::Corruption(format!("invalid encoded score '{}'", encoded));

    match encoded {
        NEG_INFINITY => return Ok(f64::NEG_INFINITY),
        ZERO => return Ok(0.0),
        POS_INFINITY => return Ok(f64::INFINITY),
        _ => {}
    }

    let mut chars = encoded.chars();
    let class = chars.next().ok_or_else(corrupt)?;
    let rest = chars.as_str();
    let exponent_text = rest.get(..3).ok_or_else(corrupt)?;
    let exponent: i32 = exponent_text.parse().map_err(|_| corrupt())?;
    let mantissa = &rest[3..];

    let (negative, biased, digits) = match class {
        POSITIVE => (false, exponent, mantissa.to_string()),
        NEGATIVE => {
            let body = mantissa
                .strip_suffix(NEGATIVE_TERMINATOR)
                .ok_or_else(corrupt)?;
            (true, EXPONENT_MAX - exponent, body.chars().map(complement).collect())
        }
        _ => return Err(corrupt()),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(corrupt());
    }

    let (lead, tail) = digits.split_at(1);
    let text = if tail.is_empty() {
        format!("{}e{}", lead, biased - EXPONENT_BIAS)
    } else {
        format!("{}.{}e{}", lead, tail, biased - EXPONENT_BIAS)
    };
    let magnitude: f64 = text.parse().map_err(|_| corrupt())?;
    Ok(if negative { -magnitude } else { magnitude })
}

/// Shortest round-trip significant digits and decimal exponent of `x > 0`
fn decimal_parts(x: f64) -> (String, i32) {
    // `{:e}` yields e.g. "1.2345e-7"; float formatting is shortest round-trip
    let formatted = format!("{:e}", x);
    let (mantissa, exponent) = formatted.split_once('e').unwrap_or((&formatted, "0"));
    let mut digits: String = mantissa.chars().filter(|c| c.is_ascii_digit()).collect();
    while digits.len() > 1 && digits.ends_with('0') {
        digits.pop();
    }
    (digits, exponent.parse().unwrap_or(0))
}

fn complement(c: char) -> char {
    match c.to_digit(10) {
        Some(d) => char::from(b'0' + (9 - d) as u8),
        None => c,
    }
}
