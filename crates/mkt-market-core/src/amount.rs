//! Price conversion between display units and the contract's smallest unit.
//!
//! The contract stores prices as wei; the page shows and accepts decimal
//! strings in whole-coin units. Conversion happens entirely before any
//! remote call, so a malformed price never leaves the page.

use crate::error::AmountError;

/// Fractional digits in one display unit (wei per coin).
pub const PRICE_DECIMALS: u32 = 18;

/// Parse a non-negative decimal string into smallest-unit integer form.
///
/// Accepts `"12"`, `"0.5"`, `".5"`, and `"12."`; rejects signs, exponents,
/// group separators, more than `decimals` fractional digits, and anything
/// that would overflow `u128`.
pub fn parse_units(text: &str, decimals: u32) -> Result<u128, AmountError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AmountError::Empty);
    }

    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (text, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(AmountError::Empty);
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit()) || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(AmountError::NotNumeric);
    }
    if frac_part.len() > decimals as usize {
        return Err(AmountError::TooPrecise(decimals));
    }

    let scale = 10_u128.checked_pow(decimals).ok_or(AmountError::Overflow)?;
    let whole: u128 = if int_part.is_empty() {
        0
    } else {
        int_part.parse().map_err(|_| AmountError::Overflow)?
    };
    let frac: u128 = if frac_part.is_empty() {
        0
    } else {
        frac_part.parse().map_err(|_| AmountError::Overflow)?
    };
    // frac < 10^frac_part.len(), so padding it to `decimals` digits stays
    // strictly below `scale`.
    let frac = frac * 10_u128.pow(decimals - frac_part.len() as u32);

    whole
        .checked_mul(scale)
        .and_then(|value| value.checked_add(frac))
        .ok_or(AmountError::Overflow)
}

/// Format a smallest-unit value as a decimal display string, trimming
/// trailing fractional zeros. `format_units(parse_units(s)?) == s` up to
/// zero-trimming, and `parse_units(format_units(v))` always returns `v`.
pub fn format_units(value: u128, decimals: u32) -> String {
    let scale = 10_u128.pow(decimals);
    let whole = value / scale;
    let frac = value % scale;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{frac:0width$}", width = decimals as usize);
    format!("{whole}.{}", frac.trim_end_matches('0'))
}
