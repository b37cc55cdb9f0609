//! Number formatting matching the VM's `lua_pushfstring`
//!
//! Floats render like C's `"%.14g"`. Under [`NumberModel::Tagged`] a float
//! whose text looks like an integer gets a trailing `".0"`, so `1.0` stays
//! distinguishable from `1`.

use argcheck_sdk::{NumberModel, Numeric};

/// Significant digits of `%.14g`
const PRECISION: i32 = 14;

/// Render an integer as `%d` does
pub fn format_integer(i: i64) -> String {
    i.to_string()
}

/// Render a float as the VM's `%f` conversion does
pub fn format_float(f: f64, model: NumberModel) -> String {
    let text = format_g14(f);
    if model == NumberModel::Tagged && looks_like_int(&text) {
        format!("{text}.0")
    } else {
        text
    }
}

/// Render either number subtype
pub fn format_numeric(n: Numeric, model: NumberModel) -> String {
    match n {
        Numeric::Integer(i) => format_integer(i),
        Numeric::Float(f) => format_float(f, model),
    }
}

fn looks_like_int(text: &str) -> bool {
    text.bytes().all(|b| b == b'-' || b.is_ascii_digit())
}

fn format_g14(f: f64) -> String {
    if f.is_nan() {
        return if f.is_sign_negative() { "-nan" } else { "nan" }.to_string();
    }
    if f.is_infinite() {
        return if f < 0.0 { "-inf" } else { "inf" }.to_string();
    }
    if f == 0.0 {
        return if f.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Exponent after rounding to PRECISION significant digits decides the
    // notation, exactly like %g.
    let sci = format!("{:.*e}", (PRECISION - 1) as usize, f);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if (-4..PRECISION).contains(&exp) {
        let decimals = (PRECISION - 1 - exp) as usize;
        strip_zeros(format!("{:.*}", decimals, f))
    } else {
        let mantissa = strip_zeros(mantissa.to_string());
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.abs())
    }
}

fn strip_zeros(mut text: String) -> String {
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    text
}
