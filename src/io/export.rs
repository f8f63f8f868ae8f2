use anyhow::Result;
use std::io::Write;

use crate::application::ExpenseService;
use crate::domain::format_cents;

/// Exporter for dumping the raw entry table.
pub struct Exporter<'a> {
    service: &'a ExpenseService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a ExpenseService) -> Self {
        Self { service }
    }

    /// Export all entries to CSV, ordered by date. Returns the row count.
    pub async fn export_entries_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let entries = self.service.list_all_entries().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["date", "amount", "category", "notes"])?;

        let mut count = 0;
        for entry in &entries {
            csv_writer.write_record([
                entry.date.to_string(),
                format_cents(entry.amount_cents),
                entry.category.clone(),
                entry.notes.clone().unwrap_or_default(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }
}
