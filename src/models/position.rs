//! Variable budget positions
//!
//! A position is a user-defined budget line inside one month (vacation,
//! clothing, gifts) with a planned budget and what was actually spent.

use serde::{Deserialize, Serialize};

use super::ids::PositionId;
use super::money::Money;

/// Validation errors for budget positions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionValidationError {
    EmptyName,
    NegativeAmount,
}

impl std::fmt::Display for PositionValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Position name cannot be empty"),
            Self::NegativeAmount => write!(f, "Position amounts cannot be negative"),
        }
    }
}

impl std::error::Error for PositionValidationError {}

/// A budgeted position without template backing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableBudgetPosition {
    pub id: PositionId,
    pub name: String,
    #[serde(default)]
    pub budget_amount: Money,
    #[serde(default)]
    pub actual_amount: Money,
}

impl VariableBudgetPosition {
    pub fn new(name: impl Into<String>, budget_amount: Money, actual_amount: Money) -> Self {
        Self {
            id: PositionId::new(),
            name: name.into().trim().to_string(),
            budget_amount,
            actual_amount,
        }
    }

    pub fn validate(&self) -> Result<(), PositionValidationError> {
        if self.name.trim().is_empty() {
            return Err(PositionValidationError::EmptyName);
        }
        if self.budget_amount.is_negative() || self.actual_amount.is_negative() {
            return Err(PositionValidationError::NegativeAmount);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_position() {
        let position =
            VariableBudgetPosition::new("Urlaub", Money::from_cents(50000), Money::zero());
        assert_eq!(position.name, "Urlaub");
        assert!(position.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let position = VariableBudgetPosition::new(" ", Money::zero(), Money::zero());
        assert_eq!(position.validate(), Err(PositionValidationError::EmptyName));

        let position =
            VariableBudgetPosition::new("Kleidung", Money::zero(), Money::from_cents(-5));
        assert_eq!(
            position.validate(),
            Err(PositionValidationError::NegativeAmount)
        );
    }
}
