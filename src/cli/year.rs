//! Year CLI commands
//!
//! Implements CLI commands for creating, listing and deleting years.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::error::LedgerResult;
use crate::ledger::LedgerState;
use crate::models::{Money, YearRecord};
use crate::reports::summarize_month;
use crate::services::YearService;
use crate::storage::LedgerStore;

/// Year subcommands
#[derive(Subcommand)]
pub enum YearCommands {
    /// List all years
    List,

    /// Create a year with twelve months seeded from the current templates
    Create {
        /// Calendar year (e.g., 2026)
        year: i32,
    },

    /// Show the months of a year
    Show {
        /// Calendar year
        year: i32,
    },

    /// Delete a year and everything recorded in it
    Delete {
        /// Calendar year
        year: i32,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a year command
pub fn handle_year_command(
    store: &dyn LedgerStore,
    state: &mut LedgerState,
    settings: &Settings,
    cmd: YearCommands,
) -> LedgerResult<()> {
    let service = YearService::new(store);

    match cmd {
        YearCommands::List => {
            let years = service.list_years(state);
            if years.is_empty() {
                println!("No years yet.");
                println!("Create one with: household year create <year>");
                return Ok(());
            }

            for year in years {
                println!("  {}", year);
            }
        }

        YearCommands::Create { year } => {
            let record = service.create_year(state, year)?;
            let fixed = record.months.first().map_or(0, |m| m.fixed_costs.len());
            println!("Created year {}", record.year);
            println!("  {} fixed cost(s) per month", fixed);
        }

        YearCommands::Show { year } => {
            let record = service.get_year(state, year)?;
            print!("{}", format_year(record, &settings.currency_symbol));
        }

        YearCommands::Delete { year, force } => {
            service.get_year(state, year)?;

            if !force {
                println!("WARNING: This deletes all entries recorded in {}.", year);
                println!("To proceed, run again with --force flag:");
                println!("  household year delete {} --force", year);
                return Ok(());
            }

            service.delete_year(state, year)?;
            println!("Deleted year {}", year);
        }
    }

    Ok(())
}

fn format_year(record: &YearRecord, currency_symbol: &str) -> String {
    let mut output = format!("Year {}\n", record.year);
    output.push_str(&"=".repeat(64));
    output.push('\n');
    output.push_str(&format!(
        "{:<6} {:>5} {:>12} {:>12} {:>12} {:>12}\n",
        "Month", "Fixed", "Fixed budget", "Var. budget", "Spent", "Income"
    ));
    output.push_str(&"-".repeat(64));
    output.push('\n');

    for month in record.months_sorted() {
        let summary = summarize_month(month);
        output.push_str(&format!(
            "{:<6} {:>5} {:>12} {:>12} {:>12} {:>12}\n",
            format!("{:02}", month.month_number),
            month.fixed_costs.len(),
            month.fixed_budget(),
            month.variable_budget_amount(),
            summary.grand_total,
            summary.income_total
        ));
    }

    let total_spent: Money = record
        .months
        .iter()
        .map(|m| summarize_month(m).grand_total)
        .sum();
    output.push_str(&"-".repeat(64));
    output.push('\n');
    output.push_str(&format!(
        "Spent this year: {}\n",
        total_spent.format_with_symbol(currency_symbol)
    ));
    output
}
