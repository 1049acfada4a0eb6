//! Fixed-cost templates and their per-month snapshots
//!
//! A template is a recurring cost defined once, independent of any year.
//! Applying it to a month copies its values into a `FixedCostEntry`; the
//! entry keeps only the template's ID, never a live link to it.

use serde::{Deserialize, Serialize};

use super::ids::{FixedCostId, TemplateId};
use super::money::Money;

/// Validation errors for templates and fixed-cost entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateValidationError {
    EmptyName,
    NegativeAmount,
}

impl std::fmt::Display for TemplateValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Fixed cost name cannot be empty"),
            Self::NegativeAmount => write!(f, "Fixed cost amount cannot be negative"),
        }
    }
}

impl std::error::Error for TemplateValidationError {}

/// A recurring fixed-cost definition (rent, insurance, subscriptions)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedCostTemplate {
    pub id: TemplateId,
    pub name: String,
    pub planned_amount: Money,
}

impl FixedCostTemplate {
    /// Create a new template with a fresh ID
    pub fn new(name: impl Into<String>, planned_amount: Money) -> Self {
        Self {
            id: TemplateId::new(),
            name: name.into().trim().to_string(),
            planned_amount,
        }
    }

    /// Validate the template
    pub fn validate(&self) -> Result<(), TemplateValidationError> {
        if self.name.trim().is_empty() {
            return Err(TemplateValidationError::EmptyName);
        }
        if self.planned_amount.is_negative() {
            return Err(TemplateValidationError::NegativeAmount);
        }
        Ok(())
    }
}

/// A month's snapshot of a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredFixedCostEntry")]
pub struct FixedCostEntry {
    pub id: FixedCostId,
    /// Weak reference; the template may no longer exist
    pub template_id: TemplateId,
    pub name: String,
    pub planned_amount: Money,
    /// What was really paid this month
    pub actual_amount: Money,
}

impl FixedCostEntry {
    /// Snapshot a template; the actual amount starts at the planned amount
    pub fn from_template(template: &FixedCostTemplate) -> Self {
        Self {
            id: FixedCostId::new(),
            template_id: template.id.clone(),
            name: template.name.clone(),
            planned_amount: template.planned_amount,
            actual_amount: template.planned_amount,
        }
    }

    /// Take over a template's current name and planned amount
    ///
    /// The actual amount follows only while it still equals the previous
    /// planned amount; a recorded deviation is kept.
    pub fn apply_template(&mut self, template: &FixedCostTemplate) {
        if self.actual_amount == self.planned_amount {
            self.actual_amount = template.planned_amount;
        }
        self.name = template.name.clone();
        self.planned_amount = template.planned_amount;
    }

    /// Whether the user recorded an actual amount other than the plan
    pub fn has_manual_actual(&self) -> bool {
        self.actual_amount != self.planned_amount
    }
}

/// On-disk shape of a fixed-cost entry; `actualAmount` is missing in
/// records written before it was introduced.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredFixedCostEntry {
    id: FixedCostId,
    template_id: TemplateId,
    name: String,
    planned_amount: Money,
    #[serde(default)]
    actual_amount: Option<Money>,
}

impl From<StoredFixedCostEntry> for FixedCostEntry {
    fn from(stored: StoredFixedCostEntry) -> Self {
        Self {
            id: stored.id,
            template_id: stored.template_id,
            name: stored.name,
            planned_amount: stored.planned_amount,
            actual_amount: stored.actual_amount.unwrap_or(stored.planned_amount),
        }
    }
}

/// Resolve an entry's template against the current template set
pub fn lookup_template<'a>(
    templates: &'a [FixedCostTemplate],
    entry: &FixedCostEntry,
) -> Option<&'a FixedCostTemplate> {
    templates.iter().find(|t| t.id == entry.template_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_copies_values() {
        let template = FixedCostTemplate::new("Miete", Money::from_cents(90000));
        let entry = FixedCostEntry::from_template(&template);

        assert_eq!(entry.template_id, template.id);
        assert_eq!(entry.name, "Miete");
        assert_eq!(entry.planned_amount.cents(), 90000);
        assert_eq!(entry.actual_amount.cents(), 90000);
        assert!(!entry.has_manual_actual());
    }

    #[test]
    fn test_apply_template_rolls_untouched_actual() {
        let mut template = FixedCostTemplate::new("Miete", Money::from_cents(90000));
        let mut entry = FixedCostEntry::from_template(&template);

        template.planned_amount = Money::from_cents(95000);
        template.name = "Warmmiete".into();
        entry.apply_template(&template);

        assert_eq!(entry.name, "Warmmiete");
        assert_eq!(entry.planned_amount.cents(), 95000);
        assert_eq!(entry.actual_amount.cents(), 95000);
    }

    #[test]
    fn test_apply_template_keeps_manual_actual() {
        let mut template = FixedCostTemplate::new("Strom", Money::from_cents(8000));
        let mut entry = FixedCostEntry::from_template(&template);
        entry.actual_amount = Money::from_cents(7350);

        template.planned_amount = Money::from_cents(8500);
        entry.apply_template(&template);

        assert_eq!(entry.planned_amount.cents(), 8500);
        assert_eq!(entry.actual_amount.cents(), 7350);
    }

    #[test]
    fn test_validation() {
        let template = FixedCostTemplate::new("  ", Money::from_cents(100));
        assert_eq!(template.validate(), Err(TemplateValidationError::EmptyName));

        let template = FixedCostTemplate::new("Gym", Money::from_cents(-1));
        assert_eq!(
            template.validate(),
            Err(TemplateValidationError::NegativeAmount)
        );
    }

    #[test]
    fn test_entry_without_actual_reads_planned() {
        let json = r#"{"id":"f1","templateId":"t1","name":"Internet","plannedAmount":3999}"#;
        let entry: FixedCostEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.actual_amount.cents(), 3999);
    }

    #[test]
    fn test_camel_case_round_trip() {
        let template = FixedCostTemplate::new("Miete", Money::from_cents(90000));
        let entry = FixedCostEntry::from_template(&template);
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("templateId").is_some());
        assert!(json.get("actualAmount").is_some());

        let back: FixedCostEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_lookup_template_orphaned() {
        let template = FixedCostTemplate::new("Netflix", Money::from_cents(1299));
        let entry = FixedCostEntry::from_template(&template);

        assert!(lookup_template(std::slice::from_ref(&template), &entry).is_some());
        assert!(lookup_template(&[], &entry).is_none());
    }
}
