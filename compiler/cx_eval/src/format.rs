//! C-style `%g` number formatting.

/// Significant digits used for floats in traces and `to_str`.
pub const FLOAT_DIGITS: usize = 6;

/// Format `value` as C's `%.{precision}g` does.
///
/// Fixed notation when the decimal exponent lies in `-4..precision`,
/// scientific otherwise; trailing fractional zeros are dropped either way.
pub fn format_g(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return if value.is_sign_negative() { "-nan" } else { "nan" }.to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-inf" } else { "inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let precision = precision.max(1);
    // Round to `precision` significant digits first; the exponent of the
    // rounded value decides the notation.
    let sci = format!("{:.*e}", precision - 1, value);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return sci;
    };

    let digits = i32::try_from(precision).unwrap_or(i32::MAX);
    if exp < -4 || exp >= digits {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_fraction(mantissa), exp.unsigned_abs())
    } else {
        #[expect(clippy::cast_sign_loss, reason = "exp < digits, so the difference is positive")]
        let decimals = (digits - 1 - exp) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    }
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}
