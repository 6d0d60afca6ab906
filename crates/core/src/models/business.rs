use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ware::Ware;
use crate::error::{LedgerError, LedgerResult};

/// A business with its cash balance and the wares it stocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Business {
    /// Name, unique within the catalog.
    pub name: String,
    /// Cash on hand. Restocking may push this below zero, but it stays finite.
    pub money_available: f64,
    /// Wares keyed by name.
    pub wares: BTreeMap<String, Ware>,
}

/// Line item produced when listing a business's wares.
#[derive(Debug, Clone, PartialEq)]
pub struct WareSummary {
    /// Ware name.
    pub name: String,
    /// Units on hand.
    pub quantity: u32,
    /// Current sale price per unit.
    pub price: f64,
    /// Active deal as a percentage, zero when there is none.
    pub discount_percentage: f64,
}

impl fmt::Display for WareSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - Quantity: {}, Price: {:.2}",
            self.name, self.quantity, self.price
        )
    }
}

impl From<&Ware> for WareSummary {
    fn from(ware: &Ware) -> Self {
        Self {
            name: ware.name.clone(),
            quantity: ware.quantity,
            price: ware.calculate_price(),
            discount_percentage: ware.discount_percentage(),
        }
    }
}

impl Business {
    /// New business with no wares.
    pub fn new(name: impl Into<String>, money_available: f64) -> Self {
        Self {
            name: name.into(),
            money_available,
            wares: BTreeMap::new(),
        }
    }

    /// Borrow a ware by name.
    pub fn ware(&self, ware_name: &str) -> Option<&Ware> {
        self.wares.get(ware_name.trim())
    }

    /// Number of distinct wares, including those out of stock.
    pub fn ware_count(&self) -> usize {
        self.wares.len()
    }

    /// Buy `quantity` units at `buy_price` each.
    ///
    /// An existing ware takes the new price and loses any active deal. The cost
    /// is deducted from the balance whether or not it covers it, but the
    /// balance must stay a finite number.
    pub fn restock_ware(
        &mut self,
        ware_name: &str,
        quantity: u32,
        buy_price: f64,
    ) -> LedgerResult<()> {
        let ware_name = ware_name.trim();
        if ware_name.is_empty() {
            return Err(LedgerError::invalid_argument("ware name cannot be empty"));
        }
        if !buy_price.is_finite() || buy_price < 0.0 {
            return Err(LedgerError::invalid_argument(format!(
                "buy price must be a non-negative number, got {buy_price}"
            )));
        }
        let balance = self.money_available - f64::from(quantity) * buy_price;
        if !balance.is_finite() {
            return Err(LedgerError::invalid_argument(format!(
                "restocking {quantity} {ware_name} at {buy_price} exceeds the ledger's range"
            )));
        }

        match self.wares.get_mut(ware_name) {
            Some(ware) => {
                let total = ware.quantity.checked_add(quantity).ok_or_else(|| {
                    LedgerError::invalid_argument(format!(
                        "restocking {quantity} would overflow the stock of {ware_name}"
                    ))
                })?;
                ware.buy_price = buy_price;
                ware.discount = 0.0;
                ware.quantity = total;
            }
            None => {
                let mut ware = Ware::new(ware_name, buy_price);
                ware.quantity = quantity;
                self.wares.insert(ware_name.to_string(), ware);
            }
        }

        self.money_available = balance;
        debug!(
            business = %self.name,
            ware = ware_name,
            quantity,
            buy_price,
            money_available = self.money_available,
            "restocked ware"
        );
        Ok(())
    }

    /// Current sale price of a ware, if it is stocked.
    pub fn check_price(&self, ware_name: &str) -> Option<f64> {
        self.wares.get(ware_name.trim()).map(Ware::calculate_price)
    }

    /// Units on hand; unknown wares report zero.
    pub fn check_availability(&self, ware_name: &str) -> u32 {
        self.wares
            .get(ware_name.trim())
            .map(|ware| ware.quantity)
            .unwrap_or(0)
    }

    /// Sell `quantity` units at the current price and return the earnings.
    pub fn sell_ware(&mut self, ware_name: &str, quantity: u32) -> LedgerResult<f64> {
        let ware_name = ware_name.trim();
        let Some(ware) = self.wares.get_mut(ware_name) else {
            return Err(LedgerError::InsufficientStock {
                ware: ware_name.to_string(),
                requested: quantity,
                available: 0,
            });
        };
        if quantity > ware.quantity {
            return Err(LedgerError::InsufficientStock {
                ware: ware_name.to_string(),
                requested: quantity,
                available: ware.quantity,
            });
        }

        let earnings = f64::from(quantity) * ware.calculate_price();
        let balance = self.money_available + earnings;
        if !balance.is_finite() {
            return Err(LedgerError::invalid_argument(format!(
                "selling {quantity} {ware_name} exceeds the ledger's range"
            )));
        }
        ware.quantity -= quantity;
        self.money_available = balance;
        debug!(
            business = %self.name,
            ware = ware_name,
            quantity,
            earnings,
            "sold ware"
        );
        Ok(earnings)
    }

    /// Put a ware on sale at `discount_percentage` percent off.
    pub fn add_deal(&mut self, ware_name: &str, discount_percentage: f64) -> LedgerResult<()> {
        if !discount_percentage.is_finite() || !(0.0..100.0).contains(&discount_percentage) {
            return Err(LedgerError::invalid_argument(format!(
                "discount must be at least 0% and below 100%, got {discount_percentage}%"
            )));
        }
        let ware_name = ware_name.trim();
        let ware = self
            .wares
            .get_mut(ware_name)
            .ok_or_else(|| LedgerError::ware_not_found(ware_name))?;
        ware.discount = discount_percentage / 100.0;
        Ok(())
    }

    /// Clear the active deal on a ware.
    pub fn remove_deal(&mut self, ware_name: &str) -> LedgerResult<()> {
        let ware_name = ware_name.trim();
        let ware = self
            .wares
            .get_mut(ware_name)
            .ok_or_else(|| LedgerError::ware_not_found(ware_name))?;
        ware.discount = 0.0;
        Ok(())
    }

    /// Summaries of every ware in name order, out-of-stock ones included.
    pub fn get_available_wares(&self) -> impl Iterator<Item = WareSummary> + '_ {
        self.wares.values().map(WareSummary::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn shop() -> Business {
        Business::new("Shop", 100.0)
    }

    #[test]
    fn restock_creates_ware_and_pays_for_it() -> LedgerResult<()> {
        let mut shop = shop();
        shop.restock_ware("Apple", 10, 1.0)?;

        assert_eq!(shop.money_available, 90.0);
        assert_eq!(shop.check_availability("Apple"), 10);
        assert_eq!(shop.check_price("Apple"), Some(1.0));
        let apple = shop.ware("Apple").expect("apple stocked");
        assert_eq!(apple.discount, 0.0);
        Ok(())
    }

    #[test]
    fn restock_clears_deal_and_overwrites_price() -> LedgerResult<()> {
        let mut shop = shop();
        shop.restock_ware("Apple", 10, 1.0)?;
        shop.add_deal("Apple", 50.0)?;
        shop.restock_ware("Apple", 5, 2.0)?;

        let apple = shop.ware("Apple").expect("apple stocked");
        assert_eq!(apple.quantity, 15);
        assert_eq!(apple.buy_price, 2.0);
        assert_eq!(apple.discount, 0.0);
        assert_eq!(shop.money_available, 80.0);
        Ok(())
    }

    #[test]
    fn restock_may_overdraw() -> LedgerResult<()> {
        let mut shop = Business::new("Shop", 5.0);
        shop.restock_ware("Pear", 10, 1.0)?;
        assert_eq!(shop.money_available, -5.0);
        Ok(())
    }

    #[test]
    fn restock_rejects_bad_arguments() {
        let mut shop = shop();
        assert!(matches!(
            shop.restock_ware("Apple", 1, -1.0),
            Err(LedgerError::InvalidArgument(_))
        ));
        assert!(matches!(
            shop.restock_ware("Apple", 1, f64::NAN),
            Err(LedgerError::InvalidArgument(_))
        ));
        assert!(matches!(
            shop.restock_ware("  ", 1, 1.0),
            Err(LedgerError::InvalidArgument(_))
        ));
        assert_eq!(shop.money_available, 100.0);
        assert_eq!(shop.ware_count(), 0);
    }

    #[test]
    fn restock_overflow_leaves_state_alone() -> LedgerResult<()> {
        let mut shop = shop();
        shop.restock_ware("Bolt", u32::MAX, 0.0)?;
        let err = shop.restock_ware("Bolt", 1, 0.0).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidArgument(_)));
        assert_eq!(shop.check_availability("Bolt"), u32::MAX);
        Ok(())
    }

    #[test]
    fn balance_must_stay_finite() -> LedgerResult<()> {
        let mut shop = Business::new("Vault", 0.0);
        shop.restock_ware("Gold", 1, 1e308)?;
        assert_eq!(shop.money_available, -1e308);

        let before = shop.clone();
        assert!(matches!(
            shop.restock_ware("Gold", 1, 1e308),
            Err(LedgerError::InvalidArgument(_))
        ));
        assert!(matches!(
            shop.restock_ware("Silver", 10, 1e308),
            Err(LedgerError::InvalidArgument(_))
        ));
        assert_eq!(shop, before);

        shop.money_available = f64::MAX;
        let before = shop.clone();
        assert!(matches!(
            shop.sell_ware("Gold", 1),
            Err(LedgerError::InvalidArgument(_))
        ));
        assert_eq!(shop, before);
        Ok(())
    }

    #[test]
    fn padded_names_reach_the_same_ware() -> LedgerResult<()> {
        let mut shop = shop();
        shop.restock_ware(" Apple ", 10, 1.0)?;
        assert_eq!(shop.ware_count(), 1);
        assert!(shop.ware("Apple").is_some());
        assert_eq!(shop.check_price(" Apple "), Some(1.0));
        assert_eq!(shop.check_availability("Apple  "), 10);

        shop.add_deal("  Apple", 50.0)?;
        assert_eq!(shop.check_price("Apple"), Some(0.5));
        assert_eq!(shop.sell_ware(" Apple ", 2)?, 1.0);
        shop.remove_deal(" Apple ")?;
        assert_eq!(shop.check_price("Apple"), Some(1.0));
        assert_eq!(shop.check_availability(" Apple"), 8);
        Ok(())
    }

    #[test]
    fn deal_then_sale() -> LedgerResult<()> {
        let mut shop = shop();
        shop.restock_ware("Apple", 10, 1.0)?;
        shop.add_deal("Apple", 50.0)?;
        assert_eq!(shop.check_price("Apple"), Some(0.5));

        let earnings = shop.sell_ware("Apple", 4)?;
        assert_eq!(earnings, 2.0);
        assert_eq!(shop.check_availability("Apple"), 6);
        assert_eq!(shop.money_available, 92.0);
        Ok(())
    }

    #[test]
    fn oversell_fails_without_side_effects() -> LedgerResult<()> {
        let mut shop = shop();
        shop.restock_ware("Apple", 6, 1.0)?;
        let before = shop.clone();

        let err = shop.sell_ware("Apple", 100).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientStock {
                requested: 100,
                available: 6,
                ..
            }
        ));
        assert_eq!(shop, before);
        Ok(())
    }

    #[test]
    fn selling_unknown_ware_reports_insufficient_stock() {
        let mut shop = shop();
        let err = shop.sell_ware("Ghost", 1).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientStock { available: 0, .. }
        ));
        assert_eq!(shop.money_available, 100.0);
    }

    #[test]
    fn unknown_ware_lookups() {
        let mut shop = shop();
        assert_eq!(shop.check_price("Ghost"), None);
        assert_eq!(shop.check_availability("Ghost"), 0);
        assert!(matches!(
            shop.add_deal("Ghost", 10.0),
            Err(LedgerError::NotFound { .. })
        ));
        assert!(matches!(
            shop.remove_deal("Ghost"),
            Err(LedgerError::NotFound { .. })
        ));
    }

    #[test]
    fn deal_percentage_must_be_below_one_hundred() -> LedgerResult<()> {
        let mut shop = shop();
        shop.restock_ware("Apple", 1, 1.0)?;
        assert!(matches!(
            shop.add_deal("Apple", 100.0),
            Err(LedgerError::InvalidArgument(_))
        ));
        assert!(matches!(
            shop.add_deal("Apple", -5.0),
            Err(LedgerError::InvalidArgument(_))
        ));
        assert_eq!(shop.check_price("Apple"), Some(1.0));
        Ok(())
    }

    #[test]
    fn listing_includes_empty_wares_in_name_order() -> LedgerResult<()> {
        let mut shop = shop();
        shop.restock_ware("Pear", 2, 3.0)?;
        shop.restock_ware("Apple", 1, 1.0)?;
        shop.sell_ware("Apple", 1)?;

        let lines: Vec<String> = shop.get_available_wares().map(|s| s.to_string()).collect();
        assert_eq!(
            lines,
            vec![
                "Apple - Quantity: 0, Price: 1.00".to_string(),
                "Pear - Quantity: 2, Price: 3.00".to_string(),
            ]
        );
        // The listing can be walked again.
        assert_eq!(shop.get_available_wares().count(), 2);
        Ok(())
    }

    proptest! {
        #[test]
        fn restock_accumulates(first in 0u32..10_000, second in 0u32..10_000, price in 0.0f64..100.0, pct in 0.0f64..99.0) {
            let mut shop = shop();
            shop.restock_ware("Item", first, 1.0).unwrap();
            shop.add_deal("Item", pct).unwrap();
            shop.restock_ware("Item", second, price).unwrap();

            let ware = shop.ware("Item").unwrap();
            prop_assert_eq!(ware.quantity, first + second);
            prop_assert_eq!(ware.buy_price, price);
            prop_assert_eq!(ware.discount, 0.0);
        }

        #[test]
        fn oversell_is_rejected(stock in 0u32..1_000, extra in 1u32..1_000) {
            let mut shop = shop();
            shop.restock_ware("Item", stock, 2.0).unwrap();
            let before = shop.clone();
            let result = shop.sell_ware("Item", stock + extra);
            prop_assert!(
                matches!(result, Err(LedgerError::InsufficientStock { .. })),
                "expected InsufficientStock"
            );
            prop_assert_eq!(shop, before);
        }

        #[test]
        fn deal_round_trip_restores_price(price in 0.0f64..1_000.0, pct in 0.0f64..99.99) {
            let mut shop = shop();
            shop.restock_ware("Item", 1, price).unwrap();
            let before_deal = shop.check_price("Item");
            shop.add_deal("Item", pct).unwrap();
            shop.remove_deal("Item").unwrap();
            prop_assert_eq!(shop.check_price("Item"), before_deal);
        }
    }
}
