// Utilities for SNAP monetary values

pub const CURRENCY_IDR: &str = "IDR";

/// Renders an amount with exactly two decimal places and no grouping,
/// e.g. `15000` -> `"15000.00"`.
pub fn format_amount(amount: u64) -> String {
    format!("{}.00", amount)
}
