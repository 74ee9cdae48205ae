//! `import` and `catalog`: moving finished series into and out of the store.

use anyhow::Context;
use hydro_db::models::CatalogEntry;
use hydro_db::{read_csv_series, Database};
use hydro_series::output::TimeSeriesRecord;
use log::info;
use std::path::Path;

/// Read a DSS text or CSV output file and store it.
///
/// CSV files carry no pathname, so `pathname` is required for them; for
/// DSS text it overrides the file's own first line.
pub fn run_import(
    input: &Path,
    db_file: &Path,
    pathname: Option<&str>,
    day_offset: i64,
) -> anyhow::Result<TimeSeriesRecord> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;

    let is_csv = input
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    let mut record = if is_csv {
        let pathname = pathname
            .with_context(|| format!("{}: --path is required for CSV input", input.display()))?;
        read_csv_series(pathname, &text)?
    } else {
        let mut record = TimeSeriesRecord::from_dss_text(&text)
            .with_context(|| format!("parsing {}", input.display()))?;
        if let Some(pathname) = pathname {
            record.pathname = pathname.to_string();
        }
        record
    };
    record = record.offset_days(day_offset);

    Database::open(db_file)?.put_series(&record)?;
    info!(
        "Imported {} ({} values from {}) into {}",
        record.pathname,
        record.values.len(),
        record.start,
        db_file.display()
    );
    Ok(record)
}

pub fn run_catalog(db_file: &Path) -> anyhow::Result<Vec<CatalogEntry>> {
    let catalog = Database::open(db_file)?.query_catalog()?;
    for entry in &catalog {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            entry.pathname, entry.start, entry.end, entry.value_count, entry.units, entry.data_type
        );
    }
    Ok(catalog)
}
