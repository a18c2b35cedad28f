//! Column-aligned text tables.

/// Render rows as a grid of centered cells.
///
/// Every column is as wide as its widest cell plus `padding` spaces on each
/// side. The first row is treated as the header and followed by a blank line.
pub fn render_table(rows: &[Vec<String>], padding: usize) -> String {
    let Some((header, body)) = rows.split_first() else {
        return String::new();
    };

    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
                + 2 * padding
        })
        .collect();

    let mut out = render_row(header, &widths);
    out.push('\n');
    for row in body {
        out.push_str(&render_row(row, &widths));
    }
    out
}

fn render_row(row: &[String], widths: &[usize]) -> String {
    let mut line = String::new();
    for (col, width) in widths.iter().enumerate() {
        let cell = row.get(col).map(String::as_str).unwrap_or("");
        line.push_str(&center(cell, *width));
    }
    line.push('\n');
    line
}

/// Center `text` in `width` characters; odd padding leans right.
fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let left = (width - len) / 2;
    let right = width - len - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}
