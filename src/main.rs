use anyhow::Result;
use clap::{Parser, Subcommand};

use household_ledger::cli::{
    handle_backup_command, handle_month_command, handle_summary_command, handle_template_command,
    handle_year_command,
};
use household_ledger::config::{paths::LedgerPaths, settings::Settings};
use household_ledger::ledger::LedgerState;
use household_ledger::storage::Storage;

#[derive(Parser)]
#[command(
    name = "household",
    version,
    about = "Household budgeting ledger with fixed-cost templates",
    long_about = "Track a household budget month by month: daily food and going-out \
                  spend, fixed costs seeded from templates, variable budget positions, \
                  expenses and incomes."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Year management commands
    #[command(subcommand)]
    Year(household_ledger::cli::YearCommands),

    /// Fixed-cost template commands
    #[command(subcommand, alias = "tpl")]
    Template(household_ledger::cli::TemplateCommands),

    /// Month editing commands
    #[command(subcommand)]
    Month(household_ledger::cli::MonthCommands),

    /// Summaries and CSV export
    #[command(subcommand)]
    Summary(household_ledger::cli::SummaryCommands),

    /// Backup, export and import commands
    #[command(subcommand)]
    Backup(household_ledger::cli::BackupCommands),

    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = LedgerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let mut storage = Storage::with_audit(paths.clone(), settings.audit_enabled)?;
    storage.load_all()?;
    let (mut state, _) = LedgerState::load(&storage)?;

    match cli.command {
        Some(Commands::Year(cmd)) => {
            handle_year_command(&storage, &mut state, &settings, cmd)?;
        }
        Some(Commands::Template(cmd)) => {
            handle_template_command(&storage, &mut state, &settings, cmd)?;
        }
        Some(Commands::Month(cmd)) => {
            handle_month_command(&storage, &mut state, &settings, cmd)?;
        }
        Some(Commands::Summary(cmd)) => {
            handle_summary_command(&state, &settings, cmd)?;
        }
        Some(Commands::Backup(cmd)) => {
            handle_backup_command(&storage, &mut state, &paths, &settings, cmd)?;
        }
        Some(Commands::Init) => {
            println!("Initializing household ledger at: {}", paths.data_dir().display());
            household_ledger::storage::init::initialize_storage(&paths)?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Next steps:");
            println!("  household template add Miete 900");
            println!("  household year create {}", chrono::Local::now().format("%Y"));
        }
        Some(Commands::Config) => {
            println!("Household Ledger Configuration");
            println!("==============================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:   {}", settings.currency_symbol);
            println!(
                "  Backup retention:  {} daily, {} monthly",
                settings.backup_retention.daily_count, settings.backup_retention.monthly_count
            );
            println!("  Audit log enabled: {}", settings.audit_enabled);
            println!(
                "  Backup before import: {}",
                settings.auto_backup_before_import
            );
            println!();
            println!("Templates: {}", state.templates.len());
            println!("Years:     {}", state.years.len());
        }
        None => {
            println!("Household Ledger - household budgeting from the terminal");
            println!();
            println!("Run 'household --help' for usage information.");
        }
    }

    Ok(())
}
