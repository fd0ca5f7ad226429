/// Approximate bankruptcy price of an isolated long: `price - price / leverage`.
///
/// A simplified proxy that ignores maintenance margin and fees. Leverage 1
/// yields exactly 0; callers guarantee `leverage >= 1`.
pub fn liquidation_price(price: f64, leverage: u32) -> f64 {
    price - price / f64::from(leverage)
}
