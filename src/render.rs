//! Plain-text rendering of a grid window.

use crate::config::DisplayConfig;
use cellsheet_core::{CellKind, CellRef, Sheet};
use cellsheet_engine::engine::{CellContent, format_display};
use std::fmt::Write;

/// Render up to `window_rows x window_cols` cells starting at `anchor`.
///
/// Numbers and formula results are right-aligned, text left-aligned.
/// Anything wider than the cell is cut.
pub fn render_window(sheet: &Sheet, anchor: CellRef, display: &DisplayConfig) -> String {
    let width = display.cell_width;
    let last_row = sheet.rows().min(anchor.row.saturating_add(display.window_rows));
    let last_col = sheet.cols().min(anchor.col.saturating_add(display.window_cols));
    let label_width = last_row.to_string().len().max(3);

    let mut out = String::new();
    let _ = write!(out, "{:label_width$}", "");
    for col in anchor.col..last_col {
        let _ = write!(out, " {:^width$}", CellRef::col_to_letters(col));
    }
    out.push('\n');

    for row in anchor.row..last_row {
        let _ = write!(out, "{:>label_width$}", row + 1);
        for col in anchor.col..last_col {
            out.push(' ');
            out.push_str(&render_cell(sheet, CellRef::new(col, row), width));
        }
        out.push('\n');
    }
    out
}

fn render_cell(sheet: &Sheet, at: CellRef, width: usize) -> String {
    let Some(cell) = sheet.cell(&at) else {
        return " ".repeat(width);
    };
    let text = match cell.payload() {
        CellContent::Formula { value, .. } => format_display(*value),
        _ => cell.value(),
    };
    let text: String = text.chars().take(width).collect();
    match cell.kind() {
        CellKind::Number | CellKind::Formula => format!("{:>width$}", text),
        CellKind::String | CellKind::Empty => format!("{:<width$}", text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn r(name: &str) -> CellRef {
        CellRef::parse(name).unwrap()
    }

    #[test]
    fn test_render_small_window() {
        let mut sheet = Sheet::new(3, 3);
        sheet.set_content(&r("A1"), "5").unwrap();
        sheet.set_content(&r("B1"), "hi").unwrap();
        sheet.set_content(&r("A2"), "=A1/2").unwrap();
        let display = DisplayConfig {
            cell_width: 5,
            window_rows: 2,
            window_cols: 2,
        };

        let rendered = render_window(&sheet, r("A1"), &display);
        assert_eq!(
            rendered,
            "      A     B  \n  1     5 hi   \n  2  2.50      \n"
        );
    }

    #[test]
    fn test_render_clamps_to_grid_and_truncates() {
        let mut sheet = Sheet::new(2, 2);
        sheet.set_content(&r("B2"), "abcdefgh").unwrap();
        let display = DisplayConfig {
            cell_width: 3,
            window_rows: 10,
            window_cols: 10,
        };

        let rendered = render_window(&sheet, r("B2"), &display);
        assert_eq!(rendered, "     B \n  2 abc\n");
    }

    #[test]
    fn test_render_far_anchor_and_huge_window() {
        let mut sheet = Sheet::new(5, 5);
        sheet.set_content(&r("A1"), "1").unwrap();

        let far = r("A18446744073709551615");
        let rendered = render_window(&sheet, far, &DisplayConfig::default());
        assert_eq!(rendered.lines().count(), 1);

        let display = DisplayConfig {
            cell_width: 3,
            window_rows: usize::MAX,
            window_cols: usize::MAX,
        };
        let rendered = render_window(&sheet, r("E5"), &display);
        assert_eq!(rendered, "     E \n  5    \n");
    }
}
