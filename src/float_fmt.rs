//! Fixed-decimal float formatting.
//!
//! Float-to-decimal `format!` has panicked on some wasm toolchain/browser
//! combinations, and the browser build renders rewards every second. These
//! helpers scale and round into an `i64`, then format integers only.

/// A value that rounds to zero keeps its minus sign (`-0.004` -> `-0.00`);
/// negative zero itself prints unsigned.
pub fn fmt_f64_fixed(v: f64, decimals: usize) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if !v.is_finite() {
        return infinity(v);
    }

    let decimals = decimals.min(9);
    let scale_i64 = 10_i64.pow(decimals as u32);
    let scaled = (v * scale_i64 as f64).round();
    if !scaled.is_finite() || scaled.abs() > i64::MAX as f64 {
        return infinity(v);
    }

    let scaled_i = scaled as i64;
    let negative = scaled_i < 0 || (scaled_i == 0 && v < 0.0);
    let abs_i = scaled_i.unsigned_abs();
    let scale_u = scale_i64.unsigned_abs();

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&(abs_i / scale_u).to_string());

    if decimals > 0 {
        out.push('.');
        let frac = (abs_i % scale_u).to_string();
        for _ in 0..decimals.saturating_sub(frac.len()) {
            out.push('0');
        }
        out.push_str(&frac);
    }
    out
}

fn infinity(v: f64) -> String {
    if v.is_sign_negative() {
        "-Inf".to_string()
    } else {
        "Inf".to_string()
    }
}
