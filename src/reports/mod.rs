use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use scorecard::columns::Column;
use scorecard::geometry::CellRect;
use scorecard::ledger::ScoreLedger;

pub fn print_card(ledger: &ScoreLedger) {
    println!("\n⛳ === SCORECARD === ⛳");
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![Cell::new("Player").add_attribute(Attribute::Bold)];
    header.extend(Column::all().iter().map(|c| {
        let cell = Cell::new(c.to_string()).set_alignment(CellAlignment::Center);
        if c.is_derived() {
            cell.fg(Color::Cyan).add_attribute(Attribute::Bold)
        } else {
            cell.add_attribute(Attribute::Bold)
        }
    }));
    table.set_header(header);

    for player in 1..=ledger.players() {
        let mut row = vec![Cell::new(format!("P{}", player))];
        for (col, value) in Column::all().iter().zip(ledger.row(player)) {
            let cell = Cell::new(value).set_alignment(CellAlignment::Center);
            row.push(if col.is_derived() {
                cell.fg(Color::Cyan)
            } else {
                cell
            });
        }
        table.add_row(row);
    }

    println!("{}", table);
}

pub fn print_cells(cells: &[CellRect]) {
    println!("\n📦 === CELL GRID ({} cells) === 📦", cells.len());
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.set_header(vec!["Player", "Column", "X", "Y", "W", "H"]);

    for cell in cells {
        table.add_row(vec![
            Cell::new(format!("P{}", cell.player)),
            Cell::new(cell.column.to_string()),
            Cell::new(format!("{:.1}", cell.x)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}", cell.y)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}", cell.w)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}", cell.h)).set_alignment(CellAlignment::Right),
        ]);
    }

    println!("{}", table);
}
