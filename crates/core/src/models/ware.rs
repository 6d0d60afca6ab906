use serde::{Deserialize, Serialize};

/// A stock-keeping unit owned by a business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ware {
    /// Name, unique within the owning business.
    pub name: String,
    /// Cost basis per unit.
    pub buy_price: f64,
    /// Active markdown as a fraction in `[0, 1)`.
    pub discount: f64,
    /// Units on hand.
    pub quantity: u32,
}

impl Ware {
    /// New ware with no stock and no active deal.
    pub fn new(name: impl Into<String>, buy_price: f64) -> Self {
        Self {
            name: name.into(),
            buy_price,
            discount: 0.0,
            quantity: 0,
        }
    }

    /// Current sale price per unit with the active deal applied.
    pub fn calculate_price(&self) -> f64 {
        self.buy_price * (1.0 - self.discount)
    }

    /// Whether a deal is currently active.
    pub fn has_deal(&self) -> bool {
        self.discount > 0.0
    }

    /// Active deal expressed as a percentage.
    pub fn discount_percentage(&self) -> f64 {
        self.discount * 100.0
    }
}
