//! Interactive session state.
//!
//! A [`Session`] owns the loaded [`Catalog`] together with the store it came
//! from. Front ends hand it parsed [`Request`]s and show the resulting
//! [`Outcome`] or error message.

mod models;

pub use models::{Outcome, Request};

use anyhow::Result;
use tracing::{debug, info};

use crate::{
    catalog::Catalog,
    error::{LedgerError, LedgerResult},
    models::Business,
    store::CatalogStore,
};

/// One interactive run over a catalog.
#[derive(Debug)]
pub struct Session {
    catalog: Catalog,
    store: CatalogStore,
    finished: bool,
}

impl Session {
    /// Session over an already loaded catalog.
    pub fn new(catalog: Catalog, store: CatalogStore) -> Self {
        Self {
            catalog,
            store,
            finished: false,
        }
    }

    /// Load the catalog from `store` and start a session over it.
    pub fn open(store: CatalogStore) -> Result<Self> {
        let catalog = store.load()?;
        Ok(Self::new(catalog, store))
    }

    /// Current catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Store backing this session.
    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    /// Business names in listing order.
    pub fn business_names(&self) -> Vec<String> {
        self.catalog.names().map(str::to_string).collect()
    }

    /// Borrow a business by name.
    pub fn business(&self, name: &str) -> LedgerResult<&Business> {
        self.catalog.lookup(name)
    }

    /// Whether the user has quit.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Add a business to the catalog.
    pub fn create_business(&mut self, name: &str, money_available: f64) -> LedgerResult<Outcome> {
        let business = self.catalog.create_business(name, money_available)?;
        Ok(Outcome::Created {
            business: business.name.clone(),
            money_available: business.money_available,
        })
    }

    /// Persist the whole catalog.
    pub fn save(&self) -> LedgerResult<()> {
        self.store.save(&self.catalog).map_err(LedgerError::Storage)
    }

    /// Carry out `request` against the named business.
    pub fn perform(&mut self, business: &str, request: Request) -> LedgerResult<Outcome> {
        debug!(business, action = %request.action(), "performing request");
        let outcome = match request {
            Request::Restock {
                ware,
                quantity,
                buy_price,
            } => {
                let entry = self.catalog.lookup_mut(business)?;
                entry.restock_ware(&ware, quantity, buy_price)?;
                Outcome::Restocked {
                    ware: ware.trim().to_string(),
                    quantity,
                    buy_price,
                    money_available: entry.money_available,
                }
            }
            Request::Price { ware } => {
                let price = self.catalog.lookup(business)?.check_price(&ware);
                Outcome::Price { ware, price }
            }
            Request::Availability { ware } => {
                let quantity = self.catalog.lookup(business)?.check_availability(&ware);
                Outcome::Availability { ware, quantity }
            }
            Request::Sell { ware, quantity } => {
                let earnings = self
                    .catalog
                    .lookup_mut(business)?
                    .sell_ware(&ware, quantity)?;
                Outcome::Sold {
                    ware,
                    quantity,
                    earnings,
                }
            }
            Request::AddDeal { ware, percentage } => {
                self.catalog
                    .lookup_mut(business)?
                    .add_deal(&ware, percentage)?;
                Outcome::DealAdded { ware, percentage }
            }
            Request::RemoveDeal { ware } => {
                self.catalog.lookup_mut(business)?.remove_deal(&ware)?;
                Outcome::DealRemoved { ware }
            }
            Request::AvailableWares => {
                let wares = self.catalog.lookup(business)?.get_available_wares().collect();
                Outcome::Wares(wares)
            }
            Request::Delete => {
                let removed = self.catalog.remove_business(business)?;
                if let Err(err) = self.save() {
                    // Keep memory in line with the file that still holds it.
                    self.catalog.insert(removed);
                    return Err(err);
                }
                Outcome::Deleted {
                    business: removed.name,
                }
            }
            Request::Quit => {
                self.catalog.lookup(business)?;
                self.quit()?
            }
        };
        Ok(outcome)
    }

    /// Save and end the session.
    pub fn quit(&mut self) -> LedgerResult<Outcome> {
        self.save()?;
        self.finished = true;
        info!(path = %self.store.path().display(), "session finished");
        Ok(Outcome::Saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EntityKind;
    use tempfile::{tempdir, TempDir};

    fn session() -> Result<(TempDir, Session)> {
        let dir = tempdir()?;
        let store = CatalogStore::new(dir.path().join("catalog.json"));
        let session = Session::open(store)?;
        Ok((dir, session))
    }

    fn restock(ware: &str, quantity: u32, buy_price: f64) -> Request {
        Request::Restock {
            ware: ware.to_string(),
            quantity,
            buy_price,
        }
    }

    #[test]
    fn shop_scenarios() -> Result<()> {
        let (_dir, mut session) = session()?;
        session.create_business("Shop", 100.0)?;

        session.perform("Shop", restock("Apple", 10, 1.0))?;
        let shop = session.business("Shop")?;
        assert_eq!(shop.money_available, 90.0);
        assert_eq!(shop.check_availability("Apple"), 10);
        assert_eq!(shop.check_price("Apple"), Some(1.0));

        session.perform(
            "Shop",
            Request::AddDeal {
                ware: "Apple".to_string(),
                percentage: 50.0,
            },
        )?;
        let price = session.perform(
            "Shop",
            Request::Price {
                ware: "Apple".to_string(),
            },
        )?;
        assert_eq!(
            price,
            Outcome::Price {
                ware: "Apple".to_string(),
                price: Some(0.5)
            }
        );

        let sold = session.perform(
            "Shop",
            Request::Sell {
                ware: "Apple".to_string(),
                quantity: 4,
            },
        )?;
        assert_eq!(sold.to_string(), "Earnings from selling 4 Apple: 2.00");
        assert_eq!(session.business("Shop")?.check_availability("Apple"), 6);
        assert_eq!(session.business("Shop")?.money_available, 92.0);

        let err = session
            .perform(
                "Shop",
                Request::Sell {
                    ware: "Apple".to_string(),
                    quantity: 100,
                },
            )
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientStock { .. }));
        assert_eq!(session.business("Shop")?.check_availability("Apple"), 6);
        assert_eq!(session.business("Shop")?.money_available, 92.0);

        let deleted = session.perform("Shop", Request::Delete)?;
        assert_eq!(deleted.to_string(), "Business 'Shop' has been deleted.");
        assert!(matches!(
            session.business("Shop"),
            Err(LedgerError::NotFound {
                kind: EntityKind::Business,
                ..
            })
        ));
        Ok(())
    }

    #[test]
    fn delete_persists_immediately() -> Result<()> {
        let (_dir, mut session) = session()?;
        session.create_business("Shop", 1.0)?;
        session.create_business("Bakery", 2.0)?;
        session.perform("Shop", Request::Delete)?;

        let reloaded = session.store().load()?;
        assert_eq!(reloaded.names().collect::<Vec<_>>(), vec!["Bakery"]);
        Ok(())
    }

    #[test]
    fn quit_saves_and_finishes() -> Result<()> {
        let (_dir, mut session) = session()?;
        session.create_business("Shop", 50.0)?;
        session.perform("Shop", restock("Pear", 3, 2.0))?;
        assert!(!session.store().path().exists());

        let outcome = session.perform("Shop", Request::Quit)?;
        assert_eq!(outcome, Outcome::Saved);
        assert!(session.is_finished());

        let reopened = Session::open(session.store().clone())?;
        let shop = reopened.business("Shop")?;
        assert_eq!(shop.money_available, 44.0);
        assert_eq!(shop.check_availability("Pear"), 3);
        Ok(())
    }

    #[test]
    fn out_of_range_restock_keeps_file_loadable() -> Result<()> {
        let (_dir, mut session) = session()?;
        session.create_business("Shop", 100.0)?;
        let err = session
            .perform("Shop", restock("Gold", 10, 1e308))
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidArgument(_)));
        session.perform("Shop", Request::Quit)?;

        let reopened = Session::open(session.store().clone())?;
        let shop = reopened.business("Shop")?;
        assert_eq!(shop.money_available, 100.0);
        assert_eq!(shop.ware_count(), 0);
        Ok(())
    }

    #[test]
    fn unknown_business_is_not_found() -> Result<()> {
        let (_dir, mut session) = session()?;
        let err = session.perform("Ghost", Request::AvailableWares).unwrap_err();
        assert!(matches!(err, LedgerError::NotFound { .. }));
        assert!(!session.is_finished());
        Ok(())
    }

    #[test]
    fn listing_and_missing_wares() -> Result<()> {
        let (_dir, mut session) = session()?;
        session.create_business("Shop", 10.0)?;
        assert_eq!(
            session.perform("Shop", Request::AvailableWares)?.to_string(),
            "No wares available in stock."
        );

        let availability = session.perform(
            "Shop",
            Request::Availability {
                ware: "Kiwi".to_string(),
            },
        )?;
        assert_eq!(availability.to_string(), "Available quantity of Kiwi: 0");

        let err = session
            .perform(
                "Shop",
                Request::RemoveDeal {
                    ware: "Kiwi".to_string(),
                },
            )
            .unwrap_err();
        assert_eq!(err.to_string(), "Ware 'Kiwi' does not exist.");
        Ok(())
    }

    #[test]
    fn save_failures_surface_as_storage_errors() -> Result<()> {
        let dir = tempdir()?;
        // A directory where the file should be makes the final rename fail.
        let path = dir.path().join("catalog.json");
        std::fs::create_dir_all(path.join("occupied"))?;
        let mut session = Session::new(Catalog::new(), CatalogStore::new(&path));
        session.create_business("Shop", 1.0)?;

        let err = session.quit().unwrap_err();
        assert!(matches!(err, LedgerError::Storage(_)));
        assert!(!session.is_finished());
        Ok(())
    }

    #[test]
    fn failed_delete_keeps_the_business() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("catalog.json");
        std::fs::create_dir_all(path.join("occupied"))?;
        let mut session = Session::new(Catalog::new(), CatalogStore::new(&path));
        session.create_business("Shop", 1.0)?;
        session.perform("Shop", restock("Apple", 2, 0.5))?;

        let err = session.perform("Shop", Request::Delete).unwrap_err();
        assert!(matches!(err, LedgerError::Storage(_)));
        let shop = session.business("Shop")?;
        assert_eq!(shop.check_availability("Apple"), 2);
        assert_eq!(session.business_names(), vec!["Shop".to_string()]);
        Ok(())
    }
}
