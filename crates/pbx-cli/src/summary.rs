use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use pbx_cli::types::{AddFileResult, CheckResult, GroupEntry, ProjectInfo};
use pbx_model::DanglingReference;

pub fn print_check(result: &CheckResult) {
    println!("Project: {}", result.path.display());
    println!("Records: {}", result.records);
    match result.first_difference {
        None => println!("Round trip: identical"),
        Some(line) => println!("Round trip: differs from line {line}"),
    }
    print_dangling(&result.dangling);
}

pub fn print_info(info: &ProjectInfo) {
    println!("Project: {} ({})", info.name, info.path.display());
    println!(
        "Archive version {}, object version {}, root object {}",
        info.archive_version, info.object_version, info.root_object
    );

    let mut records = Table::new();
    records.set_header(vec![header_cell("Record"), header_cell("Count")]);
    apply_table_style(&mut records);
    align_column(&mut records, 1, CellAlignment::Right);
    let mut total = 0usize;
    for entry in &info.records {
        total += entry.count;
        records.add_row(vec![Cell::new(&entry.isa), Cell::new(entry.count)]);
    }
    records.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total).add_attribute(Attribute::Bold),
    ]);
    println!("{records}");

    if !info.targets.is_empty() {
        let mut targets = Table::new();
        targets.set_header(vec![
            header_cell("Target"),
            header_cell("Kind"),
            header_cell("Product type"),
            header_cell("Phases"),
            header_cell("Sources"),
            header_cell("Reference"),
        ]);
        apply_table_style(&mut targets);
        align_column(&mut targets, 3, CellAlignment::Right);
        align_column(&mut targets, 4, CellAlignment::Right);
        for target in &info.targets {
            targets.add_row(vec![
                Cell::new(&target.name).add_attribute(Attribute::Bold),
                Cell::new(target.isa),
                optional_cell(target.product_type.as_deref()),
                Cell::new(target.build_phases),
                match target.sources {
                    Some(count) => Cell::new(count),
                    None => dim_cell("-"),
                },
                dim_cell(&target.reference),
            ]);
        }
        println!("{targets}");
    }
    print_dangling(&info.dangling);
}

pub fn print_groups(groups: &[GroupEntry]) {
    if groups.is_empty() {
        println!("No group segments given");
        return;
    }
    for group in groups {
        println!("{} {}", group.reference, group.name);
    }
}

pub fn print_add_file(result: &AddFileResult) {
    let mut table = Table::new();
    apply_table_style(&mut table);
    table.add_row(vec![header_cell("File reference"), Cell::new(&result.file_reference)]);
    table.add_row(vec![
        header_cell("Recorded path"),
        optional_cell(result.recorded_path.as_deref()),
    ]);
    table.add_row(vec![header_cell("Group"), Cell::new(&result.group)]);
    table.add_row(vec![
        header_cell("Build file"),
        match &result.build_file {
            Some(reference) => Cell::new(reference),
            None => dim_cell("-"),
        },
    ]);
    println!("{table}");
}

fn print_dangling(dangling: &[DanglingReference]) {
    if dangling.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Owner"),
        header_cell("Field"),
        header_cell("Missing"),
    ]);
    apply_table_style(&mut table);
    for edge in dangling {
        table.add_row(vec![
            Cell::new(&edge.owner),
            Cell::new(edge.field),
            Cell::new(&edge.target).fg(Color::Yellow),
        ]);
    }
    eprintln!("Dangling references:");
    eprintln!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
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

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
