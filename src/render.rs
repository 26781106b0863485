use comfy_table::{Cell, ContentArrangement, Table};

use crate::record::Record;
use crate::schema::ColumnDef;

/// Renders records as a console grid. Column order follows the schema;
/// fields absent from a record render as empty cells.
pub fn records_table(columns: &[ColumnDef], records: &[Record]) -> String {
    let mut table = Table::new();
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .load_preset(comfy_table::presets::UTF8_FULL)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);

    table.set_header(columns.iter().map(|column| Cell::new(&column.name)));
    for record in records {
        table.add_row(
            columns
                .iter()
                .map(|column| Cell::new(record.field_text(&column.name))),
        );
    }

    table.to_string()
}

/// Renders the plain table-name listing.
pub fn table_listing<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names
        .map(|name| format!("-> {name}"))
        .collect::<Vec<_>>()
        .join("\n")
}
