//! Minimal CSV writer for admin exports.

/// Escape a value for CSV: wrap in quotes if it contains comma, quote, or newline.
pub fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Build a CSV document from a header row and data rows.
///
/// Every row is written with its cells escaped and joined with commas;
/// lines end in `\n`.
pub fn build_csv(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    push_row(&mut out, headers.iter().copied());
    for row in rows {
        push_row(&mut out, row.iter().map(String::as_str));
    }
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>) {
    let line: Vec<String> = cells.map(csv_escape).collect();
    out.push_str(&line.join(","));
    out.push('\n');
}
