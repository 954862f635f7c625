//! Print document rendering.
//!
//! The PDF export produces an HTML page whose print-only region holds the
//! report title and table. Opening the page in a browser and printing it
//! (automatically, with `auto_print`) yields the PDF.

use std::io::{Cursor, Write};
use std::path::Path;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::error::ExportError;
use super::report::Report;

pub const PRINT_REGION_ID: &str = "print-region";

const STYLE: &str = "\
body { font-family: sans-serif; margin: 2rem; }
.print-only { display: none; }
.screen-only { color: #555; }
table { border-collapse: collapse; width: 100%; font-size: 11px; }
th, td { border: 1px solid #ccc; padding: 4px 6px; text-align: left; }
th { background: #f0f0f0; }
@media print {
  .print-only { display: block; }
  .screen-only { display: none; }
}
";

#[derive(Debug, Clone, Copy, Default)]
pub struct PrintOptions {
    /// Open the browser print dialog as soon as the page loads.
    pub auto_print: bool,
}

fn text_element<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    text: &str,
) -> Result<(), ExportError> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn table_row<W: Write>(
    writer: &mut Writer<W>,
    cell_tag: &str,
    cells: &[&str],
) -> Result<(), ExportError> {
    writer.write_event(Event::Start(BytesStart::new("tr")))?;
    for cell in cells {
        text_element(writer, cell_tag, cell)?;
    }
    writer.write_event(Event::End(BytesEnd::new("tr")))?;
    Ok(())
}

/// Renders `report` into a standalone HTML print document.
pub fn render_print_document(
    report: &Report,
    options: PrintOptions,
) -> Result<String, ExportError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer.write_event(Event::DocType(BytesText::from_escaped("html")))?;
    writer.write_event(Event::Start(BytesStart::new("html")))?;

    writer.write_event(Event::Start(BytesStart::new("head")))?;
    writer.write_event(Event::Empty(
        BytesStart::new("meta").with_attributes([("charset", "utf-8")]),
    ))?;
    text_element(&mut writer, "title", &report.name)?;
    writer.write_event(Event::Start(BytesStart::new("style")))?;
    writer.write_event(Event::Text(BytesText::from_escaped(STYLE)))?;
    writer.write_event(Event::End(BytesEnd::new("style")))?;
    writer.write_event(Event::End(BytesEnd::new("head")))?;

    let mut body = BytesStart::new("body");
    if options.auto_print {
        body.push_attribute(("onload", "window.print()"));
    }
    writer.write_event(Event::Start(body))?;

    writer.write_event(Event::Start(
        BytesStart::new("p").with_attributes([("class", "screen-only")]),
    ))?;
    writer.write_event(Event::Text(BytesText::new(
        "Use your browser's print command and choose \"Save as PDF\".",
    )))?;
    writer.write_event(Event::End(BytesEnd::new("p")))?;

    writer.write_event(Event::Start(
        BytesStart::new("div")
            .with_attributes([("id", PRINT_REGION_ID), ("class", "print-only")]),
    ))?;
    text_element(&mut writer, "h1", &report.name)?;
    writer.write_event(Event::Start(BytesStart::new("table")))?;

    writer.write_event(Event::Start(BytesStart::new("thead")))?;
    table_row(&mut writer, "th", &report.header())?;
    writer.write_event(Event::End(BytesEnd::new("thead")))?;

    writer.write_event(Event::Start(BytesStart::new("tbody")))?;
    for row in report.body() {
        table_row(&mut writer, "td", &row)?;
    }
    writer.write_event(Event::End(BytesEnd::new("tbody")))?;

    writer.write_event(Event::End(BytesEnd::new("table")))?;
    writer.write_event(Event::End(BytesEnd::new("div")))?;
    writer.write_event(Event::End(BytesEnd::new("body")))?;
    writer.write_event(Event::End(BytesEnd::new("html")))?;

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).map_err(|e| ExportError::Render(e.to_string()))
}

pub fn write_print_document(
    report: &Report,
    path: &Path,
    options: PrintOptions,
) -> Result<(), ExportError> {
    let html = render_print_document(report, options)?;
    std::fs::write(path, html)?;
    tracing::info!(
        "Wrote print document with {} rows to {}",
        report.rows.len(),
        path.display()
    );
    Ok(())
}
