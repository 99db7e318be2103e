mod display;
mod menu;

use chrono::NaiveDate;
use clap::{ArgGroup, Parser, Subcommand};
use medstock_core::alert_log::{read_alert_log, AlertLogEntry, ALERT_LOG_FILE};
use medstock_core::inventory::{
    add_medication, edit_stock, remove_medication, skip_sleeping_medications,
};
use medstock_core::*;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "medstock")]
#[command(about = "Household medication stock tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Pretend today is this date (YYYY-MM-DD)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Daily reconciliation: deduct elapsed days and send low-stock alerts
    Run {
        /// Show what would happen without notifying or saving
        #[arg(long)]
        dry_run: bool,
    },

    /// List registered medications
    List,

    /// Show when each medication runs out and when to buy more
    Predict,

    /// Register a new medication
    Add {
        name: String,

        /// Initial pill count
        #[arg(long)]
        stock: u32,

        /// Pills per day, 0 for as-needed
        #[arg(long)]
        daily: u32,

        /// Mark as a sleeping medication
        #[arg(long)]
        sleeping: bool,
    },

    /// Change the stock of a medication
    #[command(group(ArgGroup::new("change").required(true).args(["add", "remove", "set"])))]
    Edit {
        /// Position as shown by `list`
        position: usize,

        #[arg(long)]
        add: Option<u32>,

        #[arg(long)]
        remove: Option<u32>,

        #[arg(long)]
        set: Option<u32>,
    },

    /// Remove a medication
    Remove {
        /// Position as shown by `list`
        position: usize,
    },

    /// Skip today's dose of every sleeping medication
    SkipSleep,

    /// Export the inventory with forecasts to CSV
    Export { output: PathBuf },

    /// Show logged alerts
    History {
        /// Only the most recent N alerts
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Interactive menu (default)
    Menu,
}

fn main() -> Result<()> {
    medstock_core::logging::init();
    load_dotenv();

    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let today = cli
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let mut store = FileStore::in_dir(&data_dir);

    match cli.command {
        Some(Commands::Run { dry_run }) => cmd_run(&mut store, &data_dir, today, dry_run, &config),
        Some(Commands::List) => {
            let meds = store.load_medications()?;
            display::print_list(&mut io::stdout(), &meds)?;
            Ok(())
        }
        Some(Commands::Predict) => {
            let meds = store.load_medications()?;
            display::print_predictions(
                &mut io::stdout(),
                &meds,
                today,
                config.forecast.buy_lead_days,
            )?;
            Ok(())
        }
        Some(Commands::Add {
            name,
            stock,
            daily,
            sleeping,
        }) => cmd_add(&mut store, Medication::new(name, stock, daily, sleeping)),
        Some(Commands::Edit {
            position,
            add,
            remove,
            set,
        }) => {
            let edit = match (add, remove, set) {
                (Some(n), _, _) => StockEdit::Add(n),
                (_, Some(n), _) => StockEdit::Remove(n),
                (_, _, Some(n)) => StockEdit::Set(n),
                _ => return Err(Error::InvalidInput("no stock change given".into())),
            };
            cmd_edit(&mut store, position, edit)
        }
        Some(Commands::Remove { position }) => cmd_remove(&mut store, position),
        Some(Commands::SkipSleep) => cmd_skip_sleep(&mut store, today),
        Some(Commands::Export { output }) => {
            let meds = store.load_medications()?;
            let count = export::export_csv(&meds, today, config.forecast.buy_lead_days, &output)?;
            println!("✓ Exported {} medications to {}", count, output.display());
            Ok(())
        }
        Some(Commands::History { limit }) => cmd_history(&data_dir, limit),
        Some(Commands::Menu) | None => {
            let stdin = io::stdin();
            menu::Menu::new(
                stdin.lock(),
                io::stdout(),
                &mut store,
                today,
                config.forecast.buy_lead_days,
            )?
            .run()
        }
    }
}

/// Pick up PUSHBULLET_API_KEY from a local .env file if there is one
fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment from {:?}", path),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Ignoring unreadable .env file: {}", e),
    }
}

fn cmd_run(
    store: &mut FileStore,
    data_dir: &std::path::Path,
    today: NaiveDate,
    dry_run: bool,
    config: &Config,
) -> Result<()> {
    let notifier = notifier_from_config(&config.notify)?;
    let options = ReconcileOptions {
        buy_lead_days: config.forecast.buy_lead_days,
        dry_run,
    };

    let report = run_daily(store, notifier.as_ref(), today, &options)?;

    // The alert log is a convenience; failing to write it must not fail the run
    if !dry_run && !report.alerts.is_empty() {
        let mut sink = JsonlAlertLog::new(data_dir.join(ALERT_LOG_FILE));
        for dispatched in &report.alerts {
            if let Err(e) = sink.append(&AlertLogEntry::new(today, dispatched)) {
                tracing::warn!("Could not log alert for {}: {}", dispatched.alert.medication, e);
            }
        }
    }

    let mut out = io::stdout();
    display::print_report(&mut out, &report)?;
    if dry_run {
        writeln!(out, "\n[Dry run - nothing saved or sent]")?;
    }
    Ok(())
}

fn cmd_add(store: &mut FileStore, medication: Medication) -> Result<()> {
    let mut meds = store.load_medications()?;
    let name = medication.name.clone();
    let position = add_medication(&mut meds, medication);
    store.save_medications(&meds)?;
    println!("✓ Added {} at position {}", name, position);
    Ok(())
}

fn cmd_edit(store: &mut FileStore, position: usize, edit: StockEdit) -> Result<()> {
    let mut meds = store.load_medications()?;
    let med = edit_stock(&mut meds, position, edit)?;
    let message = format!("✓ {} now has {} pills", med.name, med.stock);
    store.save_medications(&meds)?;
    println!("{}", message);
    Ok(())
}

fn cmd_remove(store: &mut FileStore, position: usize) -> Result<()> {
    let mut meds = store.load_medications()?;
    let removed = remove_medication(&mut meds, position)?;
    store.save_medications(&meds)?;
    println!("✓ Removed {}", removed.name);
    Ok(())
}

fn cmd_skip_sleep(store: &mut FileStore, today: NaiveDate) -> Result<()> {
    let mut meds = store.load_medications()?;
    let skipped = skip_sleeping_medications(&mut meds, today);

    if skipped.is_empty() {
        println!("No sleeping medication to skip today.");
        return Ok(());
    }

    store.save_medications(&meds)?;
    for name in skipped {
        println!("✓ Skipping {} today", name);
    }
    Ok(())
}

fn cmd_history(data_dir: &std::path::Path, limit: Option<usize>) -> Result<()> {
    let entries = read_alert_log(&data_dir.join(ALERT_LOG_FILE))?;
    let start = limit.map_or(0, |n| entries.len().saturating_sub(n));
    display::print_history(&mut io::stdout(), &entries[start..])?;
    Ok(())
}
