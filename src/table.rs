use std::borrow::Cow;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Renders a plain-text table. Columns listed in `right_aligned` are padded
/// on the left so numbers line up.
pub fn render_table(headers: &[&str], rows: &[Vec<String>], right_aligned: &[usize]) -> String {
    let aligns = (0..headers.len())
        .map(|idx| {
            if right_aligned.contains(&idx) {
                Align::Right
            } else {
                Align::Left
            }
        })
        .collect::<Vec<_>>();
    let mut widths = headers.iter().map(|h| display_width(h)).collect::<Vec<_>>();
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(headers.len()) {
            widths[idx] = widths[idx].max(display_width(&sanitize_cell(cell)));
        }
    }

    let mut output = String::new();
    let header_cells = headers.iter().map(|h| h.to_string()).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&header_cells, &widths, &aligns));
    let rule = widths
        .iter()
        .map(|w| "-".repeat((*w).max(1)))
        .collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&rule, &widths, &aligns));
    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths, &aligns));
    }
    output
}

pub fn print_table(headers: &[&str], rows: &[Vec<String>], right_aligned: &[usize]) {
    print!("{}", render_table(headers, rows, right_aligned));
}

fn format_row(values: &[String], widths: &[usize], aligns: &[Align]) -> String {
    let line = values
        .iter()
        .zip(widths.iter().zip(aligns))
        .map(|(value, (width, align))| {
            let cell = sanitize_cell(value);
            let padding = " ".repeat(width.saturating_sub(display_width(&cell)));
            match align {
                Align::Left => format!("{cell}{padding}"),
                Align::Right => format!("{padding}{cell}"),
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    line.trim_end().to_string()
}

fn display_width(value: &str) -> usize {
    value.chars().count()
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}
