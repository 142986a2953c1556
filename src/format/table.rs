//! Ticket table pretty-printer.
//!
//! Every cell is a space followed by the value, padded to the widest value
//! of its column plus three.

use pyticket_lib::MetaTicket;
use pyticket_lib::util::format_timestamp;
use unicode_width::UnicodeWidthStr;

pub const HEADER: [&str; 4] = ["Ticket", "Status", "Last update", "Tags"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableSort {
    /// Most recently updated first.
    #[default]
    Mtime,
    Name,
}

/// Sort and keep at most `count` tickets; a zero count keeps everything.
#[must_use]
pub fn select_rows<'a>(
    tickets: &[&'a MetaTicket],
    sort: TableSort,
    count: Option<usize>,
) -> Vec<&'a MetaTicket> {
    let mut sorted = tickets.to_vec();
    match sort {
        TableSort::Mtime => sorted.sort_by(|a, b| b.mtime.total_cmp(&a.mtime)),
        TableSort::Name => sorted.sort_by(|a, b| a.name.cmp(&b.name)),
    }
    if let Some(count) = count.filter(|c| *c > 0) {
        sorted.truncate(count);
    }
    sorted
}

/// Select rows as [`select_rows`] does and format their cells.
#[must_use]
pub fn build_table(
    tickets: &[&MetaTicket],
    sort: TableSort,
    count: Option<usize>,
) -> Vec<[String; 4]> {
    select_rows(tickets, sort, count)
        .into_iter()
        .map(|t| {
            [
                t.name.clone(),
                t.status.to_string(),
                format_timestamp(t.mtime),
                t.tags.join(", "),
            ]
        })
        .collect()
}

fn column_widths(rows: &[[String; 4]]) -> [usize; 4] {
    let mut widths = HEADER.map(|h| h.width() + 3);
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width() + 3);
        }
    }
    widths
}

fn render_row<S: AsRef<str>>(row: &[S], widths: &[usize; 4]) -> String {
    let mut line = String::new();
    for (cell, width) in row.iter().zip(widths) {
        let cell = format!(" {}", cell.as_ref());
        let pad = width.saturating_sub(cell.width());
        line.push_str(&cell);
        line.push_str(&" ".repeat(pad));
    }
    line
}

/// Render the header and `rows` between dashed rules.
#[must_use]
pub fn render_table(rows: &[[String; 4]]) -> String {
    let widths = column_widths(rows);
    let rule = "-".repeat(widths.iter().sum());

    let mut out = String::new();
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&render_row(&HEADER, &widths));
    out.push('\n');
    out.push_str(&rule);
    out.push('\n');
    for row in rows {
        out.push_str(&render_row(row, &widths));
        out.push('\n');
    }
    out.push_str(&rule);
    out.push('\n');
    out
}
