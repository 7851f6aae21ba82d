//! Shared test helpers for template engine tests

use crate::table::Table;

/// Single-column table of cat breeds
pub(super) fn cat_breeds() -> Table {
    Table::parse(
        "T_CAT_BREEDS",
        "k         |\nPersian   |\nMaineCoon |\nSiamese   |\nBengal    |\n",
    )
    .unwrap()
}

/// Two-column table with one row
pub(super) fn single_color() -> Table {
    Table::parse("T_COLORS", "name | hex\nRed | ff0000\n").unwrap()
}

/// Two-column table with three rows
pub(super) fn colors() -> Table {
    Table::parse(
        "T_COLORS",
        "name  | hex\nRed   | ff0000\nGreen | 00ff00\nBlue  | 0000ff\n",
    )
    .unwrap()
}

/// Header-only table
pub(super) fn empty_table() -> Table {
    Table::parse("T_EMPTY", "k |").unwrap()
}
