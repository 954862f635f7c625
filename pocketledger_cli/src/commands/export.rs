//! `<resource> export`: drives the export dialog from flags.

use std::future::Future;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::Args;
use pocketledger_lib::export::print::{write_print_document, PrintOptions};
use pocketledger_lib::export::xlsx::write_xlsx;
use pocketledger_lib::export::{
    collect_dataset, ExportDefaults, ExportDialog, ExportError, ExportFormat, PageRequest,
    Reportable,
};
use pocketledger_lib::types::Paginated;
use pocketledger_lib::{ActionResult, SortDirection};

use super::Context;

#[derive(Args)]
pub struct ExportArgs {
    /// File format: xlsx or pdf
    #[arg(long, default_value = "xlsx")]
    pub format: String,

    /// Export every page instead of the first `--rows` rows
    #[arg(long)]
    pub full: bool,

    /// Rows to export when not using --full
    #[arg(long)]
    pub rows: Option<u32>,

    /// Sort field
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Sort ascending instead of descending
    #[arg(long)]
    pub asc: bool,

    /// Output path (defaults to `<resource>-<date>.<ext>` in the current directory)
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Do not open the print document in a browser
    #[arg(long)]
    pub no_open: bool,
}

pub fn parse_format(value: &str) -> Result<ExportFormat> {
    match value.to_ascii_lowercase().as_str() {
        "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
        "pdf" | "print" => Ok(ExportFormat::Pdf),
        other => bail!("unknown export format '{}'. Valid formats: xlsx, pdf", other),
    }
}

fn extension(format: ExportFormat) -> &'static str {
    match format {
        ExportFormat::Xlsx => "xlsx",
        ExportFormat::Pdf => "html",
    }
}

pub fn default_path(resource: &str, format: ExportFormat, today: chrono::NaiveDate) -> PathBuf {
    PathBuf::from(format!(
        "{}-{}.{}",
        resource,
        today.format("%Y-%m-%d"),
        extension(format)
    ))
}

/// Runs one export of `title` with the dialog opened on `defaults`.
pub async fn run<T, K, F, Fut>(
    args: &ExportArgs,
    ctx: &Context,
    resource: &str,
    title: &str,
    defaults: ExportDefaults<K>,
    sort_field: Option<K>,
    fetch: F,
) -> Result<()>
where
    T: Reportable,
    K: Copy,
    F: FnMut(PageRequest<K>) -> Fut,
    Fut: Future<Output = ActionResult<Paginated<T>>>,
{
    let format = parse_format(&args.format)?;

    let mut dialog = ExportDialog::new(defaults);
    dialog.open();
    if let Some(config) = dialog.config_mut() {
        config.full_data = args.full;
        if let Some(rows) = args.rows {
            config.set_rows_quantity(rows)?;
        }
        if sort_field.is_some() {
            config.sort_field = sort_field;
        }
        if args.asc {
            config.sort_direction = SortDirection::Asc;
        }
    }

    let ticket = dialog.begin(format)?;
    let cancel = ticket.cancellation();
    let on_interrupt = cancel.clone();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    if dialog.config().full_data {
        eprintln!("Fetching all {}...", resource);
    }
    let outcome = collect_dataset(dialog.config(), fetch, cancel).await;
    interrupt.abort();

    let committed = match dialog.complete(ticket, outcome) {
        Ok(committed) => committed,
        Err(ExportError::PageFailed {
            page,
            fetched_rows,
            errors,
        }) => {
            eprintln!(
                "Export stopped at page {} after {} rows; nothing was written.",
                page, fetched_rows
            );
            return ctx.resolve(ActionResult::error(errors));
        }
        Err(ExportError::Cancelled) => {
            eprintln!("Export cancelled; nothing was written.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let report = committed.into_report(title, ctx.locale);
    let path = args
        .out
        .clone()
        .unwrap_or_else(|| default_path(resource, format, chrono::Local::now().date_naive()));

    match format {
        ExportFormat::Xlsx => write_xlsx(&report, &path)?,
        ExportFormat::Pdf => {
            let options = PrintOptions {
                auto_print: !args.no_open,
            };
            write_print_document(&report, &path, options)?;
            if !args.no_open {
                open_in_browser(&path);
            }
        }
    }
    dialog.close();

    eprintln!("Exported {} rows to {}", report.rows.len(), path.display());
    Ok(())
}

fn open_in_browser(path: &Path) {
    if let Err(e) = open::that(path) {
        tracing::warn!("Could not open {}: {}", path.display(), e);
        eprintln!("Open {} in a browser and print it to PDF.", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_parse_case_insensitively() {
        assert_eq!(parse_format("XLSX").unwrap(), ExportFormat::Xlsx);
        assert_eq!(parse_format("pdf").unwrap(), ExportFormat::Pdf);
        assert!(parse_format("docx").is_err());
    }

    #[test]
    fn default_path_names_resource_and_day() {
        let day = chrono::NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(
            default_path("transfers", ExportFormat::Pdf, day),
            PathBuf::from("transfers-2024-03-05.html")
        );
        assert_eq!(
            default_path("budgets", ExportFormat::Xlsx, day),
            PathBuf::from("budgets-2024-03-05.xlsx")
        );
    }
}
