#![allow(missing_docs)]

//! Parsing of the textual action vocabulary and numeric entries.

use std::{fmt, str::FromStr};

use crate::error::{LedgerError, LedgerResult};

/// Action offered once a business is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Restock,
    Price,
    Availability,
    Sell,
    AddDeal,
    RemoveDeal,
    AvailableWares,
    Delete,
    Quit,
}

impl Action {
    /// Every action in menu order.
    pub const ALL: [Action; 9] = [
        Action::Restock,
        Action::Price,
        Action::Availability,
        Action::Sell,
        Action::AddDeal,
        Action::RemoveDeal,
        Action::AvailableWares,
        Action::Delete,
        Action::Quit,
    ];

    /// Parse a typed action name. Case and repeated whitespace are ignored.
    pub fn parse(input: &str) -> LedgerResult<Self> {
        let normalized = input
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        Self::ALL
            .into_iter()
            .find(|action| action.keyword() == normalized)
            .ok_or_else(|| {
                if normalized.is_empty() {
                    LedgerError::invalid_input("no action entered")
                } else {
                    LedgerError::invalid_input(format!("unknown action '{}'", input.trim()))
                }
            })
    }

    /// Word used to invoke the action.
    pub fn keyword(self) -> &'static str {
        match self {
            Action::Restock => "restock",
            Action::Price => "price",
            Action::Availability => "availability",
            Action::Sell => "sell",
            Action::AddDeal => "add deal",
            Action::RemoveDeal => "remove deal",
            Action::AvailableWares => "available wares",
            Action::Delete => "delete",
            Action::Quit => "quit",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for Action {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Answer to the "which business" prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusinessChoice {
    /// Start creating a new business.
    New,
    /// Open the named business.
    Existing(String),
}

impl BusinessChoice {
    /// Parse a business selection; `new` in any case starts creation.
    pub fn parse(input: &str) -> LedgerResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(LedgerError::invalid_input("no business entered"));
        }
        if trimmed.eq_ignore_ascii_case("new") {
            Ok(Self::New)
        } else {
            Ok(Self::Existing(trimmed.to_string()))
        }
    }
}

/// Parse a whole, non-negative unit count.
pub fn parse_quantity(input: &str) -> LedgerResult<u32> {
    let trimmed = input.trim();
    trimmed
        .parse::<u32>()
        .map_err(|_| LedgerError::invalid_input(format!("'{trimmed}' is not a valid quantity")))
}

/// Parse a finite decimal amount.
pub fn parse_amount(input: &str) -> LedgerResult<f64> {
    parse_finite(input, "amount")
}

/// Parse a finite decimal percentage. Range checks happen in the domain.
pub fn parse_percentage(input: &str) -> LedgerResult<f64> {
    let trimmed = input.trim();
    parse_finite(trimmed.strip_suffix('%').unwrap_or(trimmed), "percentage")
}

fn parse_finite(input: &str, what: &str) -> LedgerResult<f64> {
    let trimmed = input.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(LedgerError::invalid_input(format!(
            "'{trimmed}' is not a valid {what}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_keyword() -> LedgerResult<()> {
        for action in Action::ALL {
            assert_eq!(Action::parse(action.keyword())?, action);
        }
        Ok(())
    }

    #[test]
    fn parsing_ignores_case_and_spacing() -> LedgerResult<()> {
        assert_eq!(Action::parse("  ReStock ")?, Action::Restock);
        assert_eq!(Action::parse("ADD   deal")?, Action::AddDeal);
        assert_eq!("available wares".parse::<Action>()?, Action::AvailableWares);
        Ok(())
    }

    #[test]
    fn unknown_actions_are_invalid_input() {
        assert!(matches!(
            Action::parse("dance"),
            Err(LedgerError::InvalidInput(msg)) if msg.contains("dance")
        ));
        assert!(matches!(Action::parse("   "), Err(LedgerError::InvalidInput(_))));
        assert!(matches!(Action::parse("add"), Err(LedgerError::InvalidInput(_))));
    }

    #[test]
    fn business_choice() -> LedgerResult<()> {
        assert_eq!(BusinessChoice::parse("NEW")?, BusinessChoice::New);
        assert_eq!(
            BusinessChoice::parse(" Shop ")?,
            BusinessChoice::Existing("Shop".to_string())
        );
        assert!(BusinessChoice::parse("").is_err());
        Ok(())
    }

    #[test]
    fn numeric_entries() -> LedgerResult<()> {
        assert_eq!(parse_quantity(" 12 ")?, 12);
        assert!(parse_quantity("-1").is_err());
        assert!(parse_quantity("1.5").is_err());
        assert_eq!(parse_amount("2.75")?, 2.75);
        assert_eq!(parse_amount("-4")?, -4.0);
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("inf").is_err());
        assert_eq!(parse_percentage("50%")?, 50.0);
        assert_eq!(parse_percentage("12.5")?, 12.5);
        assert!(parse_percentage("NaN").is_err());
        Ok(())
    }
}
