//! Summary CLI commands

use std::fs::File;
use std::path::PathBuf;

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::export::export_year_summary_csv;
use crate::ledger::LedgerState;
use crate::reports::{summarize_month, YearReport};

use super::parse_period;

/// Summary subcommands
#[derive(Subcommand)]
pub enum SummaryCommands {
    /// Monthly breakdown and totals of a year
    Year {
        /// Calendar year
        year: i32,
        /// Also write the breakdown to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Category totals of a single month
    Month {
        /// Month (YYYY-MM)
        month: String,
    },
}

/// Handle a summary command
pub fn handle_summary_command(
    state: &LedgerState,
    settings: &Settings,
    cmd: SummaryCommands,
) -> LedgerResult<()> {
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        SummaryCommands::Year { year, csv } => {
            let report = YearReport::generate(state.require_year(year)?);
            print!("{}", report.format_terminal(symbol));

            if let Some(path) = csv {
                let file = File::create(&path).map_err(|e| {
                    LedgerError::Export(format!("Failed to create {}: {}", path.display(), e))
                })?;
                export_year_summary_csv(&report, file)?;
                println!("\nCSV written to {}", path.display());
            }
        }

        SummaryCommands::Month { month } => {
            let period = parse_period(&month)?;
            let summary = summarize_month(state.month(period)?);

            println!("Summary - {}", period);
            println!("{}", "=".repeat(40));
            let rows = [
                ("Food", summary.food_total),
                ("Going out", summary.going_out_total),
                ("Fixed costs", summary.fixed_actual_total),
                ("Variable", summary.variable_total),
                ("Misc", summary.misc_total),
            ];
            for (label, amount) in rows {
                println!("{:<20} {:>19}", label, amount.format_with_symbol(symbol));
            }
            println!("{}", "-".repeat(40));
            println!(
                "{:<20} {:>19}",
                "Total",
                summary.grand_total.format_with_symbol(symbol)
            );
            println!(
                "{:<20} {:>19}",
                "Income",
                summary.income_total.format_with_symbol(symbol)
            );
            println!(
                "{:<20} {:>19}",
                "Balance",
                summary.balance().format_with_symbol(symbol)
            );
        }
    }

    Ok(())
}
