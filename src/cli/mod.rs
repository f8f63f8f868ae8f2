use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};

use crate::application::{AppError, ExpenseService};
use crate::domain::{CategorySet, EntryDraft, format_cents, parse_cents};

/// Spendlog - Personal Expense Ledger
#[derive(Parser)]
#[command(name = "spendlog")]
#[command(about = "A local-first expense tracker with per-date entries and spending analytics")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "spendlog.db")]
    pub database: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Show the expenses recorded for a date
    Show {
        /// Date to show (ISO 8601 format: YYYY-MM-DD)
        date: String,
    },

    /// Save a date's expenses, replacing whatever was recorded before
    Save {
        /// Date to save (ISO 8601 format: YYYY-MM-DD)
        date: String,

        /// Expense slots as "amount:category" or "amount:category:notes"
        /// (e.g. "12.50:Food:lunch"). Slots with amount 0 are ignored.
        #[arg(required = true)]
        entries: Vec<String>,

        /// Accept category labels outside the default set
        #[arg(long)]
        any_category: bool,
    },

    /// Remove every expense recorded for a date
    Clear {
        /// Date to clear (ISO 8601 format: YYYY-MM-DD)
        date: String,
    },

    /// Generate reports and analytics
    #[command(subcommand)]
    Report(ReportCommands),

    /// Export all entries to CSV
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Category spending breakdown over a date range
    Category {
        /// Start date (YYYY-MM-DD, defaults to start of current month)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        to: Option<String>,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Month-over-month totals across the whole ledger
    Monthly {
        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                ExpenseService::init(&self.database)
                    .await
                    .map_err(present)?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Show { date } => {
                let service = connect(&self.database).await?;
                let date = parse_date(&date)?;
                run_show_command(&service, date).await?;
            }

            Commands::Save {
                date,
                entries,
                any_category,
            } => {
                let service = connect(&self.database).await?;
                let date = parse_date(&date)?;
                run_save_command(&service, date, &entries, any_category).await?;
            }

            Commands::Clear { date } => {
                let service = connect(&self.database).await?;
                let date = parse_date(&date)?;
                let removed = service.clear_date(date).await.map_err(present)?;
                println!("Cleared {} entr{} for {}", removed, plural_y(removed), date);
            }

            Commands::Report(report_cmd) => {
                let service = connect(&self.database).await?;
                run_report_command(&service, report_cmd).await?;
            }

            Commands::Export { output } => {
                let service = connect(&self.database).await?;
                run_export_command(&service, output.as_deref()).await?;
            }
        }

        Ok(())
    }
}

async fn connect(database: &str) -> Result<ExpenseService> {
    ExpenseService::connect(database).await.map_err(present)
}

async fn run_show_command(service: &ExpenseService, date: NaiveDate) -> Result<()> {
    let day = service.entries_for_date(date).await.map_err(present)?;

    if day.entries.is_empty() {
        println!("No expenses recorded for {}.", date);
        return Ok(());
    }

    println!("Expenses for {}", date);
    println!();
    println!("{:<4} {:>12} {:<16} {}", "#", "AMOUNT", "CATEGORY", "NOTES");
    println!("{}", "-".repeat(60));
    for (i, entry) in day.entries.iter().enumerate() {
        println!(
            "{:<4} {:>12} {:<16} {}",
            i + 1,
            format_cents(entry.amount_cents),
            entry.category,
            entry.notes.as_deref().unwrap_or("")
        );
    }
    println!("{}", "-".repeat(60));
    println!("{:<4} {:>12}", "", format_cents(day.total_cents));

    Ok(())
}

async fn run_save_command(
    service: &ExpenseService,
    date: NaiveDate,
    raw_entries: &[String],
    any_category: bool,
) -> Result<()> {
    let drafts = raw_entries
        .iter()
        .map(|raw| parse_entry_slot(raw))
        .collect::<Result<Vec<_>>>()?;

    if !any_category {
        let set = CategorySet::default();
        if let Err(err) = check_categories(&drafts, &set) {
            anyhow::bail!(
                "{err}. Valid categories: {} (use --any-category to bypass)",
                set.labels().join(", ")
            );
        }
    }

    let outcome = service
        .replace_for_date(date, drafts)
        .await
        .map_err(present)?;

    if outcome.saved == 0 {
        println!("Nothing to save: every slot had amount 0. Entries for {} unchanged.", date);
        println!("(Use `spendlog clear {}` to remove a date's expenses.)", date);
    } else {
        println!(
            "Saved {} entr{} for {} (total {})",
            outcome.saved,
            plural_y(outcome.saved as u64),
            date,
            format_cents(outcome.total_cents)
        );
    }

    Ok(())
}

async fn run_report_command(service: &ExpenseService, cmd: ReportCommands) -> Result<()> {
    match cmd {
        ReportCommands::Category { from, to, format } => {
            let (from_date, to_date) = parse_date_range(from, to)?;
            let report = service
                .category_report(from_date, to_date)
                .await
                .map_err(present)?;

            match format.as_str() {
                "json" => {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                "csv" => {
                    println!("category,total,percentage");
                    for cat in &report.categories {
                        println!("{},{},{:.2}", cat.category, cat.total, cat.percentage);
                    }
                }
                _ => {
                    println!("Category Spending Report");
                    println!("Period: {} to {}", report.from_date, report.to_date);
                    println!();

                    if report.categories.is_empty() {
                        println!("No expenses in this period.");
                        return Ok(());
                    }

                    println!("{:<20} {:>12} {:>8}", "CATEGORY", "TOTAL", "PERCENT");
                    println!("{}", "-".repeat(42));
                    for cat in &report.categories {
                        println!(
                            "{:<20} {:>12} {:>7.1}%",
                            cat.category,
                            format_cents(cat.total),
                            cat.percentage
                        );
                    }
                    println!("{}", "-".repeat(42));
                    println!("{:<20} {:>12}", "TOTAL", format_cents(report.total));
                }
            }
        }

        ReportCommands::Monthly { format } => {
            let report = service.monthly_report().await.map_err(present)?;

            match format.as_str() {
                "json" => {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                "csv" => {
                    println!("month_number,month_name,total");
                    for month in &report.months {
                        println!("{},{},{}", month.month_number, month.month_name, month.total);
                    }
                }
                _ => {
                    println!("Monthly Spending Report (all years combined)");
                    println!();

                    if report.months.is_empty() {
                        println!("No expenses recorded yet.");
                        return Ok(());
                    }

                    println!("{:<4} {:<12} {:>12}", "#", "MONTH", "TOTAL");
                    println!("{}", "-".repeat(30));
                    for month in &report.months {
                        println!(
                            "{:<4} {:<12} {:>12}",
                            month.month_number,
                            month.month_name,
                            format_cents(month.total)
                        );
                    }
                    println!("{}", "-".repeat(30));
                    println!("{:<17} {:>12}", "TOTAL", format_cents(report.total));
                }
            }
        }
    }

    Ok(())
}

async fn run_export_command(service: &ExpenseService, output: Option<&str>) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{Write, stdout};

    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    let count = exporter.export_entries_csv(writer).await?;
    if output.is_some() {
        eprintln!("Exported {} entries", count);
    }

    Ok(())
}

/// Parse an "amount:category[:notes]" slot into a draft.
fn parse_entry_slot(raw: &str) -> Result<EntryDraft> {
    let mut parts = raw.splitn(3, ':');
    let amount_str = parts.next().unwrap_or_default();
    let category = parts
        .next()
        .ok_or_else(|| anyhow::anyhow!("Invalid entry '{}': expected amount:category[:notes]", raw))?;

    let amount_cents = parse_cents(amount_str)
        .with_context(|| format!("Invalid amount '{}' in entry '{}'", amount_str, raw))?;

    let mut draft = EntryDraft::new(amount_cents, category);
    if let Some(notes) = parts.next() {
        if !notes.is_empty() {
            draft = draft.with_notes(notes);
        }
    }
    Ok(draft)
}

/// Boundary enforcement of the category allow-list. The store itself
/// accepts any label; only the CLI cares about the closed set.
fn check_categories(drafts: &[EntryDraft], set: &CategorySet) -> Result<(), AppError> {
    for draft in drafts {
        if draft.is_persistable() && !set.contains(&draft.category) {
            return Err(AppError::UnknownCategory(draft.category.clone()));
        }
    }
    Ok(())
}

fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str))
}

fn parse_date_range(from: Option<String>, to: Option<String>) -> Result<(NaiveDate, NaiveDate)> {
    let today = Local::now().date_naive();

    let from_date = match from {
        Some(date_str) => parse_date(&date_str)?,
        None => today.with_day(1).unwrap_or(today),
    };

    let to_date = match to {
        Some(date_str) => parse_date(&date_str)?,
        None => today,
    };

    Ok((from_date, to_date))
}

/// Map application errors to what the user should see: validation failures
/// verbatim (they name the field and constraint), storage failures as a
/// generic retry hint with the detail kept in the logs.
fn present(err: AppError) -> anyhow::Error {
    if err.is_validation() {
        anyhow::anyhow!("{err}")
    } else {
        tracing::error!(error = %err, "storage operation failed");
        anyhow::anyhow!("The expense store is unavailable. Please try again.")
    }
}

fn plural_y(n: u64) -> &'static str {
    if n == 1 { "y" } else { "ies" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entry_slot() {
        let draft = parse_entry_slot("12.50:Food:lunch at work").unwrap();
        assert_eq!(draft.amount_cents, 1250);
        assert_eq!(draft.category, "Food");
        assert_eq!(draft.notes.as_deref(), Some("lunch at work"));
    }

    #[test]
    fn test_parse_entry_slot_without_notes() {
        let draft = parse_entry_slot("100:Rent").unwrap();
        assert_eq!(draft.amount_cents, 10000);
        assert_eq!(draft.notes, None);
    }

    #[test]
    fn test_parse_entry_slot_rejects_missing_category() {
        assert!(parse_entry_slot("12.50").is_err());
    }

    #[test]
    fn test_check_categories_skips_empty_slots() {
        // A zero-amount slot never reaches storage, so its label is not checked
        let drafts = vec![
            EntryDraft::new(0, "whatever"),
            EntryDraft::new(100, "Food"),
        ];
        assert!(check_categories(&drafts, &CategorySet::default()).is_ok());
    }

    #[test]
    fn test_check_categories_rejects_unknown_label() {
        let drafts = vec![EntryDraft::new(100, "Travel")];
        assert!(matches!(
            check_categories(&drafts, &CategorySet::default()),
            Err(AppError::UnknownCategory(_))
        ));
    }
}
