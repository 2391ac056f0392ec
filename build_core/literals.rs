//! Helpers turning JSON values into Rust source literals.

/// Render an `f64` as a Rust float literal (always carrying a decimal point or exponent).
pub(crate) fn float_literal(value: f64) -> String {
    let text = format!("{:?}", value);
    if text.contains('.') || text.contains('e') || text.contains("inf") || text.contains("NaN") {
        format!("{}_f64", text)
    } else {
        format!("{}.0_f64", text)
    }
}

/// Number of decimals needed to display values produced by `scale`, capped at `max`.
///
/// `0.4` → 1, `0.05` → 2, `1000` → 0, `0.03125` → `max` when `max` < 5.
pub(crate) fn display_precision(scale: f64, max: u8) -> u8 {
    let text = format!("{}", scale.abs());
    let decimals = match text.split_once('.') {
        Some((_, fraction)) => fraction.trim_end_matches('0').len(),
        None => 0,
    };
    decimals.min(max as usize) as u8
}

/// Render an `Option<u16>` as Rust source.
pub(crate) fn option_u16_literal(value: Option<u16>) -> String {
    match value {
        Some(v) => format!("Some({})", v),
        None => "None".to_string(),
    }
}
