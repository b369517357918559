// Text and JSON rendering of resolved columns

use colprefs_core::{ResolvedColumn, ResolvedSchema};
use serde_json::json;

fn state(col: &ResolvedColumn) -> &'static str {
    if col.locked {
        "locked"
    } else if col.visible {
        "visible"
    } else {
        "hidden"
    }
}

/// Aligned table: position, id, label, width, state
pub fn table(columns: &[&ResolvedColumn]) -> String {
    let headers = ["#", "ID", "LABEL", "WIDTH", "STATE"];
    let rows: Vec<[String; 5]> = columns
        .iter()
        .map(|c| {
            [
                c.order.to_string(),
                c.id.clone(),
                c.label.clone(),
                c.width.to_string(),
                state(c).to_string(),
            ]
        })
        .collect();

    let mut widths = headers.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut push_line = |cells: [&str; 5]| {
        let line: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, w)| format!("{cell:<w$}"))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    };
    push_line(headers);
    for row in &rows {
        push_line([&row[0], &row[1], &row[2], &row[3], &row[4]]);
    }
    out
}

/// Columns to show: everything with `all`, otherwise what the grid renders
pub fn select(resolved: &ResolvedSchema, all: bool) -> Vec<&ResolvedColumn> {
    if all {
        resolved.all_columns().iter().collect()
    } else {
        resolved.visible_columns()
    }
}

pub fn json_report(
    resource: &str,
    user: &str,
    resolved: &ResolvedSchema,
    all: bool,
) -> serde_json::Result<String> {
    let report = json!({
        "resource": resource,
        "user": user,
        "customized": resolved.is_customized(),
        "columns": select(resolved, all),
    });
    serde_json::to_string_pretty(&report)
}
