//! In-memory catalog of businesses.

use std::collections::{btree_map::Entry, BTreeMap};

use tracing::info;

use crate::{
    error::{LedgerError, LedgerResult},
    models::Business,
};

/// Every known business keyed by name. This is the unit of persistence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    businesses: BTreeMap<String, Business>,
}

impl Catalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of businesses.
    pub fn len(&self) -> usize {
        self.businesses.len()
    }

    /// Whether the catalog holds no businesses.
    pub fn is_empty(&self) -> bool {
        self.businesses.is_empty()
    }

    /// Business names in listing order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.businesses.keys().map(String::as_str)
    }

    /// Iterate over businesses in listing order.
    pub fn iter(&self) -> impl Iterator<Item = &Business> + '_ {
        self.businesses.values()
    }

    /// Whether a business with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.businesses.contains_key(name)
    }

    /// Borrow a business, if present.
    pub fn get(&self, name: &str) -> Option<&Business> {
        self.businesses.get(name)
    }

    /// Mutably borrow a business, if present.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Business> {
        self.businesses.get_mut(name)
    }

    /// Borrow a business or report it missing.
    pub fn lookup(&self, name: &str) -> LedgerResult<&Business> {
        self.get(name)
            .ok_or_else(|| LedgerError::business_not_found(name))
    }

    /// Mutably borrow a business or report it missing.
    pub fn lookup_mut(&mut self, name: &str) -> LedgerResult<&mut Business> {
        self.businesses
            .get_mut(name)
            .ok_or_else(|| LedgerError::business_not_found(name))
    }

    /// Register a new business with an opening balance.
    pub fn create_business(
        &mut self,
        name: &str,
        money_available: f64,
    ) -> LedgerResult<&mut Business> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::invalid_argument("business name cannot be empty"));
        }
        if !money_available.is_finite() {
            return Err(LedgerError::invalid_argument(format!(
                "opening balance must be a finite number, got {money_available}"
            )));
        }

        match self.businesses.entry(name.to_string()) {
            Entry::Occupied(_) => Err(LedgerError::AlreadyExists(name.to_string())),
            Entry::Vacant(slot) => {
                info!(business = name, money_available, "business created");
                Ok(slot.insert(Business::new(name, money_available)))
            }
        }
    }

    /// Remove a business and hand it back.
    pub fn remove_business(&mut self, name: &str) -> LedgerResult<Business> {
        let business = self
            .businesses
            .remove(name)
            .ok_or_else(|| LedgerError::business_not_found(name))?;
        info!(business = name, "business removed");
        Ok(business)
    }

    /// Insert a fully built business, replacing any existing entry with the same name.
    pub(crate) fn insert(&mut self, business: Business) -> Option<Business> {
        self.businesses.insert(business.name.clone(), business)
    }
}
