//! Template CLI commands
//!
//! Implements CLI commands for fixed-cost templates. Every change takes
//! effect from a month (`--from`, default: the current month) and reaches
//! all stored months from there on.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::error::LedgerResult;
use crate::ledger::{LedgerState, PropagationOutcome};
use crate::models::Money;
use crate::services::TemplateService;
use crate::storage::LedgerStore;

use super::{parse_amount, parse_effective, parse_optional_amount};

/// Template subcommands
#[derive(Subcommand)]
pub enum TemplateCommands {
    /// List all fixed-cost templates
    List,

    /// Add a fixed-cost template
    Add {
        /// Template name (e.g., "Miete")
        name: String,
        /// Planned monthly amount (e.g., "900" or "899.99")
        amount: String,
        /// First month the template applies to (YYYY-MM)
        #[arg(long)]
        from: Option<String>,
    },

    /// Rename or re-price a template
    Update {
        /// Template name or ID
        template: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New planned amount
        #[arg(short, long)]
        amount: Option<String>,
        /// First month the change applies to (YYYY-MM)
        #[arg(long)]
        from: Option<String>,
    },

    /// Remove a template from a month on
    Remove {
        /// Template name or ID
        template: String,
        /// First month without the template (YYYY-MM)
        #[arg(long)]
        from: Option<String>,
    },
}

/// Handle a template command
pub fn handle_template_command(
    store: &dyn LedgerStore,
    state: &mut LedgerState,
    settings: &Settings,
    cmd: TemplateCommands,
) -> LedgerResult<()> {
    let service = TemplateService::new(store);

    match cmd {
        TemplateCommands::List => {
            let templates = service.list(state);
            if templates.is_empty() {
                println!("No fixed-cost templates.");
                println!("Add one with: household template add <name> <amount>");
                return Ok(());
            }

            println!("{:<14} {:<30} {:>14}", "ID", "Name", "Planned");
            println!("{}", "-".repeat(60));
            for template in templates {
                println!(
                    "{:<14} {:<30} {:>14}",
                    template.id.to_string(),
                    template.name,
                    template.planned_amount.format_with_symbol(&settings.currency_symbol)
                );
            }
            let total: Money = templates.iter().map(|t| t.planned_amount).sum();
            println!("{}", "-".repeat(60));
            println!(
                "{:<45} {:>14}",
                "Planned per month",
                total.format_with_symbol(&settings.currency_symbol)
            );
        }

        TemplateCommands::Add { name, amount, from } => {
            let amount = parse_amount(&amount)?;
            let effective = parse_effective(from.as_deref())?;

            let (template, outcome) = service.create(state, &name, amount, effective)?;
            println!("Added template: {} ({})", template.name, template.id);
            println!(
                "  Planned: {}",
                template.planned_amount.format_with_symbol(&settings.currency_symbol)
            );
            print_reach(effective.to_string(), &outcome);
        }

        TemplateCommands::Update {
            template,
            name,
            amount,
            from,
        } => {
            let amount = parse_optional_amount(amount.as_deref())?;
            let effective = parse_effective(from.as_deref())?;

            let (updated, outcome) =
                service.update(state, &template, name.as_deref(), amount, effective)?;
            println!("Updated template: {} ({})", updated.name, updated.id);
            println!(
                "  Planned: {}",
                updated.planned_amount.format_with_symbol(&settings.currency_symbol)
            );
            print_reach(effective.to_string(), &outcome);
        }

        TemplateCommands::Remove { template, from } => {
            let effective = parse_effective(from.as_deref())?;

            let (removed, outcome) = service.delete(state, &template, effective)?;
            println!("Removed template: {} ({})", removed.name, removed.id);
            print_reach(effective.to_string(), &outcome);
        }
    }

    Ok(())
}

fn print_reach(effective: String, outcome: &PropagationOutcome) {
    if outcome.touched_months == 0 {
        println!("  No stored month from {} on was affected.", effective);
        return;
    }

    let years = outcome
        .touched_years
        .iter()
        .map(|y| y.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    println!(
        "  Applied from {}: {} month(s) in {}",
        effective, outcome.touched_months, years
    );
}
