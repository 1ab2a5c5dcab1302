use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use labor_cli::types::{BuildResult, SeriesResult};
use labor_transform::MergeStats;

pub fn print_series_summary(result: &SeriesResult) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Entities"),
        header_cell("Indicators"),
        header_cell("Identifiers"),
        header_cell("Output"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 0..3 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(result.entities),
        Cell::new(result.indicators),
        Cell::new(result.identifiers).add_attribute(Attribute::Bold),
        path_cell(&result.output),
    ]);
    println!("{table}");
}

pub fn print_build_summary(result: &BuildResult) {
    println!("State: {}", result.state);
    println!("Output: {}", result.output_dir.display());
    if result.dry_run {
        println!("Dry run: no files written");
    }

    let mut sources = Table::new();
    sources.set_header(vec![
        header_cell("Source"),
        header_cell("Path"),
        header_cell("Rows"),
        header_cell("Periods"),
    ]);
    apply_summary_table_style(&mut sources);
    align_column(&mut sources, 2, CellAlignment::Right);
    align_column(&mut sources, 3, CellAlignment::Right);
    for source in &result.sources {
        sources.add_row(vec![
            Cell::new(&source.name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            path_cell(&source.path),
            Cell::new(source.rows),
            Cell::new(source.periods),
        ]);
    }
    println!("{sources}");

    let mut stages = Table::new();
    stages.set_header(vec![
        header_cell("Stage"),
        header_cell("Rows"),
        header_cell("Dropped"),
        header_cell("Detail"),
    ]);
    apply_summary_table_style(&mut stages);
    align_column(&mut stages, 1, CellAlignment::Right);
    align_column(&mut stages, 2, CellAlignment::Right);
    let align = &result.align;
    let reconcile = &result.reconcile;
    let merge = &result.merge;
    stages.add_row(vec![
        stage_cell("Series IDs"),
        Cell::new(result.series_ids),
        dim_cell("-"),
        Cell::new(format!("{} entities", result.entities)),
    ]);
    stages.add_row(vec![
        stage_cell("Indicators"),
        Cell::new(align.output_rows),
        count_cell(align.missing_values + align.invalid_series_rows, Color::Yellow),
        Cell::new(format!(
            "{} missing values, {} unrecognized series",
            align.missing_values, align.invalid_series_rows
        )),
    ]);
    stages.add_row(vec![
        stage_cell("Population"),
        Cell::new(result.population_rows),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    stages.add_row(vec![
        stage_cell("Reconcile"),
        Cell::new(reconcile.matched_rows),
        count_cell(reconcile.unmatched_rows, Color::Yellow),
        Cell::new(format!(
            "latest year {}, {} historical unmatched",
            reconcile
                .latest_year
                .map_or_else(|| "-".to_string(), |year| year.to_string()),
            reconcile.historical_unmatched_rows
        )),
    ]);
    stages.add_row(vec![
        Cell::new("MERGED")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(merge.output_rows).add_attribute(Attribute::Bold),
        count_cell(merge.excluded(), Color::Yellow),
        Cell::new(merge_detail(merge)),
    ]);
    println!("{stages}");

    if !reconcile.historical_unmatched_keys.is_empty() {
        eprintln!("Unmatched historical keys:");
        for key in &reconcile.historical_unmatched_keys {
            eprintln!("- {key}");
        }
    }
    if !reconcile.historical_missing_counties.is_empty() {
        eprintln!("County codes missing from the entity table:");
        for code in &reconcile.historical_missing_counties {
            eprintln!("- {code}");
        }
    }
    for path in &result.outputs {
        println!("Wrote {}", path.display());
    }
}

/// Breakdown of the rows the merge dropped, one entry per reason.
fn merge_detail(merge: &MergeStats) -> String {
    format!(
        "{} no population, {} no value, {} no county, {} invalid date",
        merge.missing_population, merge.missing_value, merge.missing_county, merge.invalid_date
    )
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
        .set_width(120);
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

fn stage_cell(label: &str) -> Cell {
    Cell::new(label).fg(Color::Blue)
}

fn path_cell(path: &Path) -> Cell {
    Cell::new(path.display())
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_detail_lists_every_exclusion_reason() {
        let stats = MergeStats {
            input_rows: 10,
            missing_population: 1,
            missing_value: 2,
            missing_county: 3,
            invalid_date: 4,
            output_rows: 0,
        };
        assert_eq!(
            merge_detail(&stats),
            "1 no population, 2 no value, 3 no county, 4 invalid date"
        );
    }
}
