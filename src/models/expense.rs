//! Expense and income lines
//!
//! Free-form lines owned by exactly one month: misc costs, legacy variable
//! costs and incomes all share this shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::ExpenseId;
use super::money::Money;

/// Expenses at or above this amount (minor units) count as variable costs
pub const VARIABLE_EXPENSE_THRESHOLD: Money = Money::from_cents(3000);

/// Validation errors for expense lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    EmptyDescription,
    NegativeAmount,
}

impl std::fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "Description cannot be empty"),
            Self::NegativeAmount => write!(f, "Amount cannot be negative"),
        }
    }
}

impl std::error::Error for ExpenseValidationError {}

/// Which bucket a new expense is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseKind {
    Variable,
    Misc,
}

impl ExpenseKind {
    /// Classify an expense by amount
    ///
    /// Applied once when the expense is created; editing the amount later
    /// does not move it.
    pub fn classify(amount: Money) -> Self {
        if amount >= VARIABLE_EXPENSE_THRESHOLD {
            Self::Variable
        } else {
            Self::Misc
        }
    }
}

impl std::fmt::Display for ExpenseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Variable => write!(f, "variable"),
            Self::Misc => write!(f, "misc"),
        }
    }
}

/// A single cost or income line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseEntry {
    pub id: ExpenseId,
    #[serde(default)]
    pub description: String,
    pub amount: Money,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl ExpenseEntry {
    /// Create a new line stamped with the current time
    pub fn new(description: impl Into<String>, amount: Money) -> Self {
        Self {
            id: ExpenseId::new(),
            description: description.into().trim().to_string(),
            amount,
            created_at: Utc::now(),
        }
    }

    /// Validate the line
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if self.description.trim().is_empty() {
            return Err(ExpenseValidationError::EmptyDescription);
        }
        if self.amount.is_negative() {
            return Err(ExpenseValidationError::NegativeAmount);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_boundary() {
        assert_eq!(
            ExpenseKind::classify(Money::from_cents(3000)),
            ExpenseKind::Variable
        );
        assert_eq!(
            ExpenseKind::classify(Money::from_cents(2999)),
            ExpenseKind::Misc
        );
        assert_eq!(ExpenseKind::classify(Money::zero()), ExpenseKind::Misc);
    }

    #[test]
    fn test_new_expense() {
        let expense = ExpenseEntry::new("  Bäcker ", Money::from_cents(450));
        assert_eq!(expense.description, "Bäcker");
        assert!(expense.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let expense = ExpenseEntry::new("", Money::from_cents(450));
        assert_eq!(
            expense.validate(),
            Err(ExpenseValidationError::EmptyDescription)
        );

        let expense = ExpenseEntry::new("Refund", Money::from_cents(-450));
        assert_eq!(
            expense.validate(),
            Err(ExpenseValidationError::NegativeAmount)
        );
    }

    #[test]
    fn test_deserialize_without_created_at() {
        let json = r#"{"id":"e1","description":"Kino","amount":1800}"#;
        let expense: ExpenseEntry = serde_json::from_str(json).unwrap();
        assert_eq!(expense.amount.cents(), 1800);
    }
}
