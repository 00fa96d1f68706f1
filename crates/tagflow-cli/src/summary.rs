use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use tagflow_cli::types::{BatchResult, FileResult};
use tagflow_ingest::{RouteStatus, RouteSummary};

pub fn print_route_summary(summary: &RouteSummary) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Kind"),
        header_cell("Destination"),
        header_cell("Status"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Center);
    for outcome in &summary.outcomes {
        let status = match outcome.status {
            RouteStatus::Success => Cell::new("✓").fg(Color::Green),
            RouteStatus::Skipped => Cell::new(&outcome.message).fg(Color::Yellow),
            RouteStatus::Failed => Cell::new(&outcome.message).fg(Color::Red),
        };
        table.add_row(vec![
            Cell::new(outcome.source.display()),
            outcome
                .kind
                .map_or_else(|| dim_cell("-"), Cell::new),
            outcome
                .destination
                .as_ref()
                .map_or_else(|| dim_cell("-"), |path| Cell::new(path.display())),
            status,
        ]);
    }
    println!("{table}");
    println!(
        "Processed {} files: {} successful, {} failed, {} skipped ({})",
        summary.processed(),
        summary.successful(),
        summary.failed(),
        summary.skipped(),
        summary.status()
    );
}

/// Per-file table for an extraction or transformation batch.
pub fn print_batch_summary(title: &str, batch: &BatchResult) {
    println!("{title}: {}/{} files succeeded", batch.succeeded(), batch.total());
    if batch.files.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Rows"),
        header_cell("Columns"),
        header_cell("Tagged"),
        header_cell("Transformations"),
        header_cell("Output"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for file in &batch.files {
        table.add_row(file_row(file));
    }
    println!("{table}");

    let failures: Vec<&FileResult> = batch.files.iter().filter(|f| !f.is_success()).collect();
    if !failures.is_empty() {
        eprintln!("Errors:");
        for file in failures {
            eprintln!("- {}: {}", file.filename, file.error.as_deref().unwrap_or(""));
        }
    }
}

fn file_row(file: &FileResult) -> Vec<Cell> {
    if !file.is_success() {
        return vec![
            Cell::new(&file.filename).fg(Color::Red),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            Cell::new("error")
                .fg(Color::Red)
                .add_attribute(Attribute::Bold),
        ];
    }
    let transformations = if file.transformations.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(file.transformations.join("\n"))
    };
    vec![
        Cell::new(&file.filename),
        Cell::new(file.rows),
        Cell::new(file.columns),
        Cell::new(file.tagged_columns),
        transformations,
        file.output
            .as_ref()
            .map_or_else(|| dim_cell("-"), |path| Cell::new(path.display())),
    ]
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
