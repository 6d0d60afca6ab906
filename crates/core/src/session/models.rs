#![allow(missing_docs)]

use std::fmt;

use crate::{command::Action, models::WareSummary};

/// A fully parsed action with its arguments, scoped to one business.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Restock {
        ware: String,
        quantity: u32,
        buy_price: f64,
    },
    Price {
        ware: String,
    },
    Availability {
        ware: String,
    },
    Sell {
        ware: String,
        quantity: u32,
    },
    AddDeal {
        ware: String,
        percentage: f64,
    },
    RemoveDeal {
        ware: String,
    },
    AvailableWares,
    Delete,
    Quit,
}

impl Request {
    /// Action this request carries out.
    pub fn action(&self) -> Action {
        match self {
            Request::Restock { .. } => Action::Restock,
            Request::Price { .. } => Action::Price,
            Request::Availability { .. } => Action::Availability,
            Request::Sell { .. } => Action::Sell,
            Request::AddDeal { .. } => Action::AddDeal,
            Request::RemoveDeal { .. } => Action::RemoveDeal,
            Request::AvailableWares => Action::AvailableWares,
            Request::Delete => Action::Delete,
            Request::Quit => Action::Quit,
        }
    }
}

/// Result of a successful request, rendered as the message shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Created {
        business: String,
        money_available: f64,
    },
    Restocked {
        ware: String,
        quantity: u32,
        buy_price: f64,
        money_available: f64,
    },
    Price {
        ware: String,
        price: Option<f64>,
    },
    Availability {
        ware: String,
        quantity: u32,
    },
    Sold {
        ware: String,
        quantity: u32,
        earnings: f64,
    },
    DealAdded {
        ware: String,
        percentage: f64,
    },
    DealRemoved {
        ware: String,
    },
    Wares(Vec<WareSummary>),
    Deleted {
        business: String,
    },
    Saved,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Created {
                business,
                money_available,
            } => write!(
                f,
                "Business '{business}' created with {money_available:.2} available."
            ),
            Outcome::Restocked {
                ware,
                quantity,
                buy_price,
                money_available,
            } => write!(
                f,
                "Restocked {quantity} {ware} at {buy_price:.2} each. Money available: {money_available:.2}"
            ),
            Outcome::Price {
                ware,
                price: Some(price),
            } => write!(f, "Price of {ware}: {price:.2}"),
            Outcome::Price { ware, price: None } => write!(f, "{ware} not available in stock."),
            Outcome::Availability { ware, quantity } => {
                write!(f, "Available quantity of {ware}: {quantity}")
            }
            Outcome::Sold {
                ware,
                quantity,
                earnings,
            } => write!(f, "Earnings from selling {quantity} {ware}: {earnings:.2}"),
            Outcome::DealAdded { ware, percentage } => {
                write!(f, "Deal added for {ware} with a {percentage}% discount.")
            }
            Outcome::DealRemoved { ware } => write!(f, "Deal removed for {ware}."),
            Outcome::Wares(wares) if wares.is_empty() => f.write_str("No wares available in stock."),
            Outcome::Wares(wares) => {
                f.write_str("Available Wares:")?;
                for ware in wares {
                    write!(f, "\n{ware}")?;
                }
                Ok(())
            }
            Outcome::Deleted { business } => {
                write!(f, "Business '{business}' has been deleted.")
            }
            Outcome::Saved => f.write_str("Catalog saved."),
        }
    }
}
