//! Month CLI commands
//!
//! Implements CLI commands for everything recorded inside a month: day
//! amounts, fixed-cost actuals and budget, variable positions, expenses
//! and incomes.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::error::LedgerResult;
use crate::ledger::LedgerState;
use crate::models::{Money, YearMonth};
use crate::reports::MonthBudgetOverview;
use crate::services::{MonthService, PositionUpdate};
use crate::storage::LedgerStore;

use super::{parse_amount, parse_date, parse_optional_amount, parse_period};

/// Month subcommands
#[derive(Subcommand)]
pub enum MonthCommands {
    /// Show budget overview and entries of a month
    Show {
        /// Month (YYYY-MM)
        month: String,
    },

    /// Set food and going-out spend for a day
    Day {
        /// Date (YYYY-MM-DD)
        date: String,
        /// Food amount
        #[arg(long, default_value = "0")]
        food: String,
        /// Going-out amount
        #[arg(long, default_value = "0")]
        going_out: String,
    },

    /// Record the amount actually paid for a fixed cost
    #[command(name = "fixed-actual")]
    FixedActual {
        /// Month (YYYY-MM)
        month: String,
        /// Fixed cost name or ID
        fixed_cost: String,
        /// Amount paid
        amount: String,
    },

    /// Override the fixed budget of a month
    #[command(name = "fixed-budget")]
    FixedBudget {
        /// Month (YYYY-MM)
        month: String,
        /// Budget amount
        #[arg(required_unless_present = "reset")]
        amount: Option<String>,
        /// Reset the budget to the sum of planned fixed costs
        #[arg(long, conflicts_with = "amount")]
        reset: bool,
    },

    /// Expense lines
    #[command(subcommand)]
    Expense(ExpenseCommands),

    /// Income lines
    #[command(subcommand)]
    Income(IncomeCommands),

    /// Variable budget positions
    #[command(subcommand)]
    Position(PositionCommands),
}

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Add an expense; large amounts are filed as variable costs
    Add {
        /// Month (YYYY-MM)
        month: String,
        /// Description
        description: String,
        /// Amount
        amount: String,
    },

    /// Edit an expense
    Update {
        /// Month (YYYY-MM)
        month: String,
        /// Expense description or ID
        expense: String,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
    },

    /// Remove an expense
    Remove {
        /// Month (YYYY-MM)
        month: String,
        /// Expense description or ID
        expense: String,
    },
}

/// Income subcommands
#[derive(Subcommand)]
pub enum IncomeCommands {
    /// Add an income line
    Add {
        /// Month (YYYY-MM)
        month: String,
        /// Description
        description: String,
        /// Amount
        amount: String,
    },

    /// Remove an income line
    Remove {
        /// Month (YYYY-MM)
        month: String,
        /// Income description or ID
        income: String,
    },
}

/// Position subcommands
#[derive(Subcommand)]
pub enum PositionCommands {
    /// Add a variable budget position
    Add {
        /// Month (YYYY-MM)
        month: String,
        /// Position name
        name: String,
        /// Budgeted amount
        budget: String,
        /// Amount already spent
        #[arg(long, default_value = "0")]
        actual: String,
    },

    /// Edit a variable budget position
    Update {
        /// Month (YYYY-MM)
        month: String,
        /// Position name or ID
        position: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New budgeted amount
        #[arg(short, long)]
        budget: Option<String>,
        /// New spent amount
        #[arg(short, long)]
        actual: Option<String>,
    },

    /// Remove a variable budget position
    Remove {
        /// Month (YYYY-MM)
        month: String,
        /// Position name or ID
        position: String,
    },
}

/// Handle a month command
pub fn handle_month_command(
    store: &dyn LedgerStore,
    state: &mut LedgerState,
    settings: &Settings,
    cmd: MonthCommands,
) -> LedgerResult<()> {
    let service = MonthService::new(store);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        MonthCommands::Show { month } => {
            let period = parse_period(&month)?;
            let record = state.month(period)?;
            let overview = MonthBudgetOverview::generate(period, record);
            print!("{}", overview.format_terminal(record, symbol));
        }

        MonthCommands::Day {
            date,
            food,
            going_out,
        } => {
            let date = parse_date(&date)?;
            let food = parse_amount(&food)?;
            let going_out = parse_amount(&going_out)?;

            let day = service.set_day_amounts(state, date, food, going_out)?;
            println!(
                "{}: food {}, going out {}",
                day.iso_date,
                day.food_amount.format_with_symbol(symbol),
                day.going_out_amount.format_with_symbol(symbol)
            );
        }

        MonthCommands::FixedActual {
            month,
            fixed_cost,
            amount,
        } => {
            let period = parse_period(&month)?;
            let amount = parse_amount(&amount)?;

            let entry = service.set_fixed_actual(state, period, &fixed_cost, amount)?;
            println!(
                "{} {}: paid {} (planned {})",
                period,
                entry.name,
                entry.actual_amount.format_with_symbol(symbol),
                entry.planned_amount.format_with_symbol(symbol)
            );
        }

        MonthCommands::FixedBudget {
            month,
            amount,
            reset,
        } => {
            let period = parse_period(&month)?;
            let amount = match (amount, reset) {
                (Some(amount), false) => Some(parse_amount(&amount)?),
                _ => None,
            };

            let budget = service.set_fixed_budget(state, period, amount)?;
            println!(
                "{} fixed budget: {}",
                period,
                budget.format_with_symbol(symbol)
            );
        }

        MonthCommands::Expense(cmd) => handle_expense_command(&service, state, symbol, cmd)?,
        MonthCommands::Income(cmd) => handle_income_command(&service, state, symbol, cmd)?,
        MonthCommands::Position(cmd) => handle_position_command(&service, state, symbol, cmd)?,
    }

    Ok(())
}

fn handle_expense_command(
    service: &MonthService<'_>,
    state: &mut LedgerState,
    symbol: &str,
    cmd: ExpenseCommands,
) -> LedgerResult<()> {
    match cmd {
        ExpenseCommands::Add {
            month,
            description,
            amount,
        } => {
            let period = parse_period(&month)?;
            let amount = parse_amount(&amount)?;

            let (kind, expense) = service.add_expense(state, period, &description, amount)?;
            println!(
                "Added {} expense: {} {} ({})",
                kind,
                expense.description,
                expense.amount.format_with_symbol(symbol),
                expense.id
            );
        }

        ExpenseCommands::Update {
            month,
            expense,
            description,
            amount,
        } => {
            let period = parse_period(&month)?;
            let amount = parse_optional_amount(amount.as_deref())?;

            let updated =
                service.update_expense(state, period, &expense, description.as_deref(), amount)?;
            println!(
                "Updated expense: {} {}",
                updated.description,
                updated.amount.format_with_symbol(symbol)
            );
        }

        ExpenseCommands::Remove { month, expense } => {
            let period = parse_period(&month)?;
            let removed = service.remove_expense(state, period, &expense)?;
            println!("Removed expense: {}", removed.description);
        }
    }

    Ok(())
}

fn handle_income_command(
    service: &MonthService<'_>,
    state: &mut LedgerState,
    symbol: &str,
    cmd: IncomeCommands,
) -> LedgerResult<()> {
    match cmd {
        IncomeCommands::Add {
            month,
            description,
            amount,
        } => {
            let period = parse_period(&month)?;
            let amount = parse_amount(&amount)?;

            let income = service.add_income(state, period, &description, amount)?;
            println!(
                "Added income: {} {} ({})",
                income.description,
                income.amount.format_with_symbol(symbol),
                income.id
            );
        }

        IncomeCommands::Remove { month, income } => {
            let period = parse_period(&month)?;
            let removed = service.remove_income(state, period, &income)?;
            println!("Removed income: {}", removed.description);
        }
    }

    Ok(())
}

fn handle_position_command(
    service: &MonthService<'_>,
    state: &mut LedgerState,
    symbol: &str,
    cmd: PositionCommands,
) -> LedgerResult<()> {
    match cmd {
        PositionCommands::Add {
            month,
            name,
            budget,
            actual,
        } => {
            let period = parse_period(&month)?;
            let budget = parse_amount(&budget)?;
            let actual = parse_amount(&actual)?;

            let position = service.add_position(state, period, &name, budget, actual)?;
            println!("Added position: {} ({})", position.name, position.id);
            print_variable_budget(state, period, symbol)?;
        }

        PositionCommands::Update {
            month,
            position,
            name,
            budget,
            actual,
        } => {
            let period = parse_period(&month)?;
            let update = PositionUpdate {
                name,
                budget_amount: parse_optional_amount(budget.as_deref())?,
                actual_amount: parse_optional_amount(actual.as_deref())?,
            };

            let updated = service.update_position(state, period, &position, update)?;
            println!(
                "Updated position: {} {} of {}",
                updated.name,
                updated.actual_amount.format_with_symbol(symbol),
                updated.budget_amount.format_with_symbol(symbol)
            );
            print_variable_budget(state, period, symbol)?;
        }

        PositionCommands::Remove { month, position } => {
            let period = parse_period(&month)?;
            let removed = service.remove_position(state, period, &position)?;
            println!("Removed position: {}", removed.name);
            print_variable_budget(state, period, symbol)?;
        }
    }

    Ok(())
}

fn print_variable_budget(
    state: &LedgerState,
    period: YearMonth,
    symbol: &str,
) -> LedgerResult<()> {
    let budget: Money = state.month(period)?.variable_budget_amount();
    println!(
        "  {} variable budget: {}",
        period,
        budget.format_with_symbol(symbol)
    );
    Ok(())
}
