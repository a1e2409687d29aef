use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use nsmo_cli::pipeline::RunOutcome;

pub fn print_summary(outcome: &RunOutcome, dry_run: bool) {
    let summary = &outcome.prepared.summary;
    if dry_run {
        println!("Dry run: no files written");
    }
    for path in &outcome.written {
        println!("Wrote: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![header_cell("Stage"), header_cell("Measure"), header_cell("Value")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);

    let beta = &summary.beta;
    let rows: Vec<(&str, &str, Cell)> = vec![
        ("ingest", "survey rows", Cell::new(summary.input_rows)),
        ("ingest", "survey columns", Cell::new(summary.input_columns)),
        ("ingest", "yield observations", Cell::new(summary.yield_observations)),
        ("classify", "categorical", Cell::new(summary.categorical)),
        ("classify", "numeric", Cell::new(summary.numeric)),
        ("classify", "unclassified", count_cell(summary.unclassified, Color::Red)),
        ("normalize", "sentinels nulled", Cell::new(summary.sentinels_nulled)),
        ("aggregate", "months", Cell::new(summary.months)),
        ("derive", "Beta nulls", count_cell(beta.nulls, Color::Yellow)),
        ("derive", "Beta non-finite", count_cell(beta.non_finite, Color::Yellow)),
        ("derive", "winsor lower", bound_cell(beta.bounds.map(|b| b.lower))),
        ("derive", "winsor upper", bound_cell(beta.bounds.map(|b| b.upper))),
        ("encode", "indicator columns", Cell::new(summary.indicators)),
        ("output", "rows", Cell::new(summary.output_rows)),
        ("output", "columns", Cell::new(summary.output_columns)),
    ];
    for (stage, measure, value) in rows {
        table.add_row(vec![stage_cell(stage), Cell::new(measure), value]);
    }
    println!("{table}");

    let issues = outcome.prepared.classification.issues();
    if !issues.is_empty() {
        eprintln!("Unclassified columns:");
        for issue in issues {
            eprintln!("- {issue}");
        }
    }
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn stage_cell(stage: &str) -> Cell {
    Cell::new(stage)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn bound_cell(bound: Option<f64>) -> Cell {
    match bound {
        Some(value) => Cell::new(format!("{value:.4}")),
        None => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
