use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use dialoguer::Confirm;
use std::io::{IsTerminal, Write};
use std::path::PathBuf;

use crate::application::{LedgerStore, LoadPolicy, Session, StoreConfig};
use crate::domain::{Bill, BillId, DayZone, category_name, format_cents, resolve_user, roster};
use crate::io::Exporter;
use crate::storage::FileBlobStore;

/// Splitbook - Shared Expense Ledger
#[derive(Parser)]
#[command(name = "splitbook")]
#[command(about = "A local-first ledger for splitting shared bills")]
#[command(version)]
pub struct Cli {
    /// Directory holding the ledger data
    #[arg(
        short = 'D',
        long,
        env = "SPLITBOOK_DATA_DIR",
        default_value = ".splitbook",
        global = true
    )]
    pub data_dir: PathBuf,

    /// Acting user, by name or id
    #[arg(short, long, env = "SPLITBOOK_USER", global = true)]
    pub user: Option<String>,

    /// Time zone for calendar days: an IANA name, `local` or `utc`
    #[arg(long, env = "SPLITBOOK_TZ", default_value = "local", global = true)]
    pub timezone: String,

    /// Fail instead of starting empty when the stored ledger is corrupt
    #[arg(long, global = true)]
    pub strict: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List users and how much each has spent
    Users,

    /// List categories and their totals
    Categories,

    /// Record a bill as the acting user
    Add {
        /// Amount (e.g., "50.00" or "50")
        amount: String,

        /// Category id: food, transport, utilities, entertainment, other
        #[arg(short, long)]
        category: String,

        /// Date of the bill (YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<String>,

        /// Description of the bill
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Delete one of your own bills
    Delete {
        /// Bill ID
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show bill history, newest first
    List {
        /// Match user name, description or amount
        #[arg(short, long, default_value = "")]
        search: String,

        /// Only bills on this day (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },

    /// Totals per user, per category and overall
    Summary,

    /// Export the ledger
    Export {
        /// Output format
        format: ExportFormat,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl Cli {
    fn day_zone(&self) -> Result<DayZone> {
        DayZone::parse(&self.timezone)
            .with_context(|| format!("Invalid timezone: {}", self.timezone))
    }

    fn open_store(&self, zone: DayZone) -> Result<LedgerStore<FileBlobStore>> {
        let blobs = FileBlobStore::open(&self.data_dir)?;
        let policy = if self.strict {
            LoadPolicy::Strict
        } else {
            LoadPolicy::Lenient
        };
        let config = StoreConfig::default()
            .with_load_policy(policy)
            .with_time_zone(zone);
        LedgerStore::with_config(blobs, config)
            .with_context(|| format!("Failed to open ledger in {}", self.data_dir.display()))
    }

    fn open_session(&self) -> Result<Session> {
        let mut session = Session::new();
        if let Some(key) = &self.user {
            let user = resolve_user(key).with_context(|| {
                format!("Unknown user '{}'. Run `splitbook users` to see the roster", key)
            })?;
            session.select_user(user);
        }
        Ok(session)
    }

    pub fn run(self) -> Result<()> {
        let zone = self.day_zone()?;
        let mut store = self.open_store(zone)?;
        let mut session = self.open_session()?;

        match self.command {
            Commands::Users => run_users_command(&store, &session),

            Commands::Categories => run_categories_command(&store),

            Commands::Add {
                amount,
                category,
                date,
                description,
            } => {
                let date = match date {
                    Some(date_str) => Some(day_start(&parse_day(&date_str)?, &zone)?),
                    None => None,
                };
                let bill = session.add_bill(&mut store, &amount, &category, date, &description)?;
                println!(
                    "Recorded bill: {} {} by {} ({})",
                    format_cents(bill.amount),
                    category_name(&bill.category),
                    bill.user_name,
                    bill.id
                );
                Ok(())
            }

            Commands::Delete { id, yes } => {
                let bill_id = BillId::from(id);
                session.request_delete(&store, bill_id.clone())?;

                let prompt = match store.get_bill(&bill_id) {
                    Some(bill) => format!(
                        "Delete {} {} from {}?",
                        format_cents(bill.amount),
                        category_name(&bill.category),
                        format_day(bill, &zone)
                    ),
                    None => format!("Delete bill {}?", bill_id),
                };

                if yes || confirm(&prompt)? {
                    if let Some(deleted) = session.confirm_delete(&mut store)? {
                        println!("Deleted bill {}", deleted);
                    }
                } else {
                    session.cancel_delete();
                    println!("Cancelled.");
                }
                Ok(())
            }

            Commands::List { search, date } => {
                let day = date.as_deref().map(parse_day).transpose()?;
                run_list_command(&store, &session, &search, day, &zone)
            }

            Commands::Summary => run_summary_command(&store),

            Commands::Export { format, output } => {
                let writer: Box<dyn Write> = match &output {
                    Some(path) => Box::new(
                        std::fs::File::create(path)
                            .with_context(|| format!("Failed to create {}", path.display()))?,
                    ),
                    None => Box::new(std::io::stdout()),
                };

                let exporter = Exporter::new(&store);
                let count = match format {
                    ExportFormat::Csv => exporter.export_bills_csv(writer)?,
                    ExportFormat::Json => exporter.export_snapshot_json(writer)?,
                };

                if let Some(path) = output {
                    eprintln!("Exported {} bill(s) to {}", count, path.display());
                }
                Ok(())
            }
        }
    }
}

fn run_users_command(store: &LedgerStore<FileBlobStore>, session: &Session) -> Result<()> {
    let selected = session.selected_user().map(|u| u.id);

    println!("{:<4} {:<12} {:>12}", "ID", "NAME", "TOTAL");
    println!("{}", "-".repeat(30));
    for user in roster() {
        let marker = if selected == Some(user.id) { "*" } else { " " };
        println!(
            "{:<4} {:<12} {:>12} {}",
            user.id,
            user.name,
            format_cents(store.total_for_user(user.id)),
            marker
        );
    }
    Ok(())
}

fn run_categories_command(store: &LedgerStore<FileBlobStore>) -> Result<()> {
    println!("{:<15} {:<15} {:>12}", "ID", "NAME", "TOTAL");
    println!("{}", "-".repeat(44));
    for (category, total) in store.category_totals() {
        println!(
            "{:<15} {:<15} {:>12}",
            category.id,
            category.name,
            format_cents(total)
        );
    }
    Ok(())
}

fn run_list_command(
    store: &LedgerStore<FileBlobStore>,
    session: &Session,
    search: &str,
    day: Option<NaiveDate>,
    zone: &DayZone,
) -> Result<()> {
    let bills = store.search(search, day);
    if bills.is_empty() {
        println!("No bills found.");
        return Ok(());
    }

    let selected = session.selected_user().map(|u| u.id);

    println!(
        "{:<36}  {:<18}  {:<10}  {:<13}  {:>10}  DESCRIPTION",
        "ID", "DATE", "USER", "CATEGORY", "AMOUNT"
    );
    println!("{}", "-".repeat(110));

    for bill in &bills {
        let owned = if selected.is_some_and(|id| bill.is_owned_by(id)) {
            "*"
        } else {
            " "
        };
        println!(
            "{:<36}  {:<18}  {:<10}  {:<13}  {:>10}{} {}",
            bill.id,
            format_day(bill, zone),
            bill.user_name,
            category_name(&bill.category),
            format_cents(bill.amount),
            owned,
            bill.description.as_deref().unwrap_or("")
        );
    }

    println!("\n{} bill(s)", bills.len());
    Ok(())
}

fn run_summary_command(store: &LedgerStore<FileBlobStore>) -> Result<()> {
    println!("By user:");
    for (user, total) in store.user_totals() {
        println!("  {:<15} {:>12}", user.name, format_cents(total));
    }

    println!("\nBy category:");
    for (category, total) in store.category_totals() {
        println!("  {:<15} {:>12}", category.name, format_cents(total));
    }

    println!("\n  {:<15} {:>12}", "TOTAL", format_cents(store.grand_total()));
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    if !std::io::stdin().is_terminal() {
        bail!("Interactive confirmation required. Use --yes or run on a TTY.");
    }

    let confirmed = Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?;
    Ok(confirmed)
}

fn format_day(bill: &Bill, zone: &DayZone) -> String {
    zone.format(&bill.date, "%B %-d, %Y")
}

/// Parse a YYYY-MM-DD date string.
pub fn parse_day(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str))
}

/// Start of `day` in the given zone, as a UTC timestamp.
pub fn day_start(day: &NaiveDate, zone: &DayZone) -> Result<DateTime<Utc>> {
    zone.day_start(*day)
        .with_context(|| format!("{} has no start in the selected time zone", day))
}
