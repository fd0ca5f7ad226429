use serde::{Deserialize, Serialize};

/// One accepted price step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: usize,
    pub price: f64,
    pub capital: f64,
    pub position: f64,
    pub reserve_total: f64,
    pub leverage: u32,
    pub liquidation_price: f64,
}

/// State right after an add-on fired.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AddOnEvent {
    pub step: usize,
    pub price: f64,
    pub capital: f64,
    pub position: f64,
}
