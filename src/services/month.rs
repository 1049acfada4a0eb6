//! Month service
//!
//! Every edit inside a month: day amounts, fixed-cost actuals, the fixed
//! budget override, variable positions, expense and income lines. Each
//! operation validates first, mutates the in-memory year, saves that year
//! and records an audit entry.

use chrono::NaiveDate;

use crate::audit::{generate_diff, EntityType};
use crate::error::{LedgerError, LedgerResult};
use crate::ledger::LedgerState;
use crate::models::{
    DayEntry, ExpenseBucket, ExpenseEntry, ExpenseKind, FixedCostEntry, Money, MonthRecord,
    VariableBudgetPosition, YearMonth,
};
use crate::storage::{AuditRecorder, LedgerStore};

/// Service for editing the contents of a month
pub struct MonthService<'a> {
    store: &'a dyn LedgerStore,
}

/// Changes to apply to a variable position; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct PositionUpdate {
    pub name: Option<String>,
    pub budget_amount: Option<Money>,
    pub actual_amount: Option<Money>,
}

impl<'a> MonthService<'a> {
    pub fn new(store: &'a dyn LedgerStore) -> Self {
        Self { store }
    }

    /// Set food and going-out spend for one day
    pub fn set_day_amounts(
        &self,
        state: &mut LedgerState,
        date: NaiveDate,
        food_amount: Money,
        going_out_amount: Money,
    ) -> LedgerResult<DayEntry> {
        ensure_non_negative(food_amount, "Food amount")?;
        ensure_non_negative(going_out_amount, "Going-out amount")?;

        let period = YearMonth::from(date);
        let day = state
            .month_mut(period)?
            .day_mut(date)
            .ok_or_else(|| LedgerError::entry_not_found("Day", date.to_string()))?;

        let before = day.clone();
        day.food_amount = food_amount;
        day.going_out_amount = going_out_amount;
        let after = day.clone();

        self.save(state, period)?;
        self.log_change(EntityType::DayEntry, date.to_string(), None, &before, &after)?;
        Ok(after)
    }

    /// Record what was really paid for a fixed cost this month
    pub fn set_fixed_actual(
        &self,
        state: &mut LedgerState,
        period: YearMonth,
        reference: &str,
        actual_amount: Money,
    ) -> LedgerResult<FixedCostEntry> {
        ensure_non_negative(actual_amount, "Actual amount")?;

        let month = state.month_mut(period)?;
        let index = find_index(&month.fixed_costs, reference, "Fixed cost", |e, r| {
            e.id.matches(r) || e.name.eq_ignore_ascii_case(r)
        })?;

        let entry = &mut month.fixed_costs[index];
        let before = entry.clone();
        entry.actual_amount = actual_amount;
        let after = entry.clone();

        self.save(state, period)?;
        self.log_change(
            EntityType::FixedCost,
            after.id.to_string(),
            Some(after.name.clone()),
            &before,
            &after,
        )?;
        Ok(after)
    }

    /// Override the fixed budget of a month, or reset it to the planned
    /// total with `None`
    pub fn set_fixed_budget(
        &self,
        state: &mut LedgerState,
        period: YearMonth,
        amount: Option<Money>,
    ) -> LedgerResult<Money> {
        if let Some(amount) = amount {
            ensure_non_negative(amount, "Fixed budget")?;
        }

        let month = state.month_mut(period)?;
        let before = month.fixed_budget_amount;
        match amount {
            Some(amount) => month.fixed_budget_amount = Some(amount),
            None => month.recompute_fixed_budget(),
        }
        let after = month.fixed_budget();

        self.save(state, period)?;
        let diff = match before {
            Some(previous) if previous == after => None,
            Some(previous) => Some(format!("fixedBudgetAmount: {} -> {}", previous, after)),
            None => Some(format!("fixedBudgetAmount: (unset) -> {}", after)),
        };
        self.store.log_update(
            EntityType::FixedCost,
            period.to_string(),
            Some("fixedBudgetAmount".into()),
            &before,
            &Some(after),
            diff,
        )?;
        Ok(after)
    }

    pub fn add_position(
        &self,
        state: &mut LedgerState,
        period: YearMonth,
        name: &str,
        budget_amount: Money,
        actual_amount: Money,
    ) -> LedgerResult<VariableBudgetPosition> {
        let position = VariableBudgetPosition::new(name, budget_amount, actual_amount);
        position
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let month = state.month_mut(period)?;
        month.variable_positions.push(position.clone());
        month.recompute_variable_budget();

        self.save(state, period)?;
        self.store.log_create(
            EntityType::Position,
            position.id.to_string(),
            Some(position.name.clone()),
            &position,
        )?;
        Ok(position)
    }

    pub fn update_position(
        &self,
        state: &mut LedgerState,
        period: YearMonth,
        reference: &str,
        update: PositionUpdate,
    ) -> LedgerResult<VariableBudgetPosition> {
        let month = state.month_mut(period)?;
        let index = find_index(&month.variable_positions, reference, "Position", |p, r| {
            p.id.matches(r) || p.name.eq_ignore_ascii_case(r)
        })?;

        let before = month.variable_positions[index].clone();
        let mut after = before.clone();
        if let Some(name) = update.name {
            after.name = name.trim().to_string();
        }
        if let Some(budget) = update.budget_amount {
            after.budget_amount = budget;
        }
        if let Some(actual) = update.actual_amount {
            after.actual_amount = actual;
        }
        after
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        month.variable_positions[index] = after.clone();
        month.recompute_variable_budget();

        self.save(state, period)?;
        self.log_change(
            EntityType::Position,
            after.id.to_string(),
            Some(after.name.clone()),
            &before,
            &after,
        )?;
        Ok(after)
    }

    pub fn remove_position(
        &self,
        state: &mut LedgerState,
        period: YearMonth,
        reference: &str,
    ) -> LedgerResult<VariableBudgetPosition> {
        let month = state.month_mut(period)?;
        let index = find_index(&month.variable_positions, reference, "Position", |p, r| {
            p.id.matches(r) || p.name.eq_ignore_ascii_case(r)
        })?;

        let removed = month.variable_positions.remove(index);
        month.recompute_variable_budget();

        self.save(state, period)?;
        self.store.log_delete(
            EntityType::Position,
            removed.id.to_string(),
            Some(removed.name.clone()),
            &removed,
        )?;
        Ok(removed)
    }

    /// Add an expense, filed under the bucket its amount classifies it into
    pub fn add_expense(
        &self,
        state: &mut LedgerState,
        period: YearMonth,
        description: &str,
        amount: Money,
    ) -> LedgerResult<(ExpenseKind, ExpenseEntry)> {
        let expense = ExpenseEntry::new(description, amount);
        expense
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let kind = ExpenseKind::classify(amount);
        let bucket = match kind {
            ExpenseKind::Variable => ExpenseBucket::Variable,
            ExpenseKind::Misc => ExpenseBucket::Misc,
        };
        state
            .month_mut(period)?
            .bucket_mut(bucket)
            .push(expense.clone());

        self.save(state, period)?;
        self.store.log_create(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.description.clone()),
            &expense,
        )?;
        Ok((kind, expense))
    }

    /// Edit an expense in place; it stays in the bucket it was filed under
    pub fn update_expense(
        &self,
        state: &mut LedgerState,
        period: YearMonth,
        reference: &str,
        description: Option<&str>,
        amount: Option<Money>,
    ) -> LedgerResult<ExpenseEntry> {
        let month = state.month_mut(period)?;
        let (bucket, index) = find_expense(month, reference, COST_BUCKETS, "Expense")?;

        let before = month.bucket(bucket)[index].clone();
        let mut after = before.clone();
        if let Some(description) = description {
            after.description = description.trim().to_string();
        }
        if let Some(amount) = amount {
            after.amount = amount;
        }
        after
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        month.bucket_mut(bucket)[index] = after.clone();

        self.save(state, period)?;
        self.log_change(
            EntityType::Expense,
            after.id.to_string(),
            Some(after.description.clone()),
            &before,
            &after,
        )?;
        Ok(after)
    }

    pub fn remove_expense(
        &self,
        state: &mut LedgerState,
        period: YearMonth,
        reference: &str,
    ) -> LedgerResult<ExpenseEntry> {
        self.remove_line(state, period, reference, COST_BUCKETS, EntityType::Expense)
    }

    pub fn add_income(
        &self,
        state: &mut LedgerState,
        period: YearMonth,
        description: &str,
        amount: Money,
    ) -> LedgerResult<ExpenseEntry> {
        let income = ExpenseEntry::new(description, amount);
        income
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        state.month_mut(period)?.incomes.push(income.clone());

        self.save(state, period)?;
        self.store.log_create(
            EntityType::Income,
            income.id.to_string(),
            Some(income.description.clone()),
            &income,
        )?;
        Ok(income)
    }

    pub fn remove_income(
        &self,
        state: &mut LedgerState,
        period: YearMonth,
        reference: &str,
    ) -> LedgerResult<ExpenseEntry> {
        self.remove_line(
            state,
            period,
            reference,
            &[ExpenseBucket::Income],
            EntityType::Income,
        )
    }

    fn remove_line(
        &self,
        state: &mut LedgerState,
        period: YearMonth,
        reference: &str,
        buckets: &[ExpenseBucket],
        entity_type: EntityType,
    ) -> LedgerResult<ExpenseEntry> {
        let label = match entity_type {
            EntityType::Income => "Income",
            _ => "Expense",
        };
        let month = state.month_mut(period)?;
        let (bucket, index) = find_expense(month, reference, buckets, label)?;
        let removed = month.bucket_mut(bucket).remove(index);

        self.save(state, period)?;
        self.store.log_delete(
            entity_type,
            removed.id.to_string(),
            Some(removed.description.clone()),
            &removed,
        )?;
        Ok(removed)
    }

    fn save(&self, state: &LedgerState, period: YearMonth) -> LedgerResult<()> {
        self.store.save_year(state.require_year(period.year)?)
    }

    fn log_change<T: serde::Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> LedgerResult<()> {
        let diff = generate_diff(&serde_json::to_value(before)?, &serde_json::to_value(after)?);
        self.store
            .log_update(entity_type, entity_id, entity_name, before, after, diff)
    }
}

const COST_BUCKETS: &[ExpenseBucket] = &[ExpenseBucket::Variable, ExpenseBucket::Misc];

fn ensure_non_negative(amount: Money, what: &str) -> LedgerResult<()> {
    if amount.is_negative() {
        return Err(LedgerError::Validation(format!("{} cannot be negative", what)));
    }
    Ok(())
}

/// Index of the single item matching `reference`
fn find_index<T>(
    items: &[T],
    reference: &str,
    entity_type: &'static str,
    matches: impl Fn(&T, &str) -> bool,
) -> LedgerResult<usize> {
    let reference = reference.trim();
    let mut found = items
        .iter()
        .enumerate()
        .filter(|(_, item)| matches(item, reference))
        .map(|(index, _)| index);

    match (found.next(), found.next()) {
        (Some(index), None) => Ok(index),
        (Some(_), Some(_)) => Err(LedgerError::Validation(format!(
            "{} reference '{}' is ambiguous",
            entity_type, reference
        ))),
        (None, _) => Err(LedgerError::entry_not_found(entity_type, reference)),
    }
}

/// Bucket and index of the single expense line matching `reference`
fn find_expense(
    month: &MonthRecord,
    reference: &str,
    buckets: &[ExpenseBucket],
    entity_type: &'static str,
) -> LedgerResult<(ExpenseBucket, usize)> {
    let reference = reference.trim();
    let mut found = buckets.iter().flat_map(move |&bucket| {
        month
            .bucket(bucket)
            .iter()
            .enumerate()
            .filter(move |(_, e)| {
                e.id.matches(reference) || e.description.eq_ignore_ascii_case(reference)
            })
            .map(move |(index, _)| (bucket, index))
    });

    match (found.next(), found.next()) {
        (Some(hit), None) => Ok(hit),
        (Some(_), Some(_)) => Err(LedgerError::Validation(format!(
            "{} reference '{}' is ambiguous",
            entity_type, reference
        ))),
        (None, _) => Err(LedgerError::entry_not_found(entity_type, reference)),
    }
}
