use std::borrow::Cow;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Elastic text table. `alignments` is matched to columns by position;
/// columns without an entry are left-aligned.
pub fn render_table(headers: &[&str], rows: &[Vec<String>], alignments: &[Align]) -> String {
    let column_count = headers.len();
    let mut widths = headers.iter().map(|h| display_width(h)).collect::<Vec<_>>();
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(display_width(cell));
        }
    }
    for width in &mut widths {
        *width = (*width).max(3);
    }
    let align = |idx: usize| alignments.get(idx).copied().unwrap_or(Align::Left);

    let mut output = String::new();
    let header_cells = headers.iter().map(|h| Cow::Borrowed(*h)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&header_cells, &widths, align));

    let separator = widths.iter().map(|w| Cow::Owned("-".repeat(*w))).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&separator, &widths, align));

    for row in rows {
        let cells = row.iter().map(|c| sanitize_cell(c)).collect::<Vec<_>>();
        let _ = writeln!(output, "{}", format_row(&cells, &widths, align));
    }
    output
}

pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows, &[]));
}

fn format_row(values: &[Cow<'_, str>], widths: &[usize], align: impl Fn(usize) -> Align) -> String {
    let mut cells = Vec::with_capacity(values.len());
    for (idx, value) in values.iter().enumerate().take(widths.len()) {
        let padding = " ".repeat(widths[idx].saturating_sub(display_width(value)));
        let cell = match align(idx) {
            Align::Left => format!("{value}{padding}"),
            Align::Right => format!("{padding}{value}"),
        };
        cells.push(cell);
    }
    let mut line = cells.join("  ");
    while line.ends_with(' ') {
        line.pop();
    }
    line
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_columns_and_right_aligns_numbers() {
        let rows = vec![
            vec!["Manila".to_string(), "12".to_string()],
            vec!["Quezon City".to_string(), "3".to_string()],
        ];
        let rendered = render_table(&["province", "count"], &rows, &[Align::Left, Align::Right]);
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "province     count");
        assert_eq!(lines[1], "-----------  -----");
        assert_eq!(lines[2], "Manila          12");
        assert_eq!(lines[3], "Quezon City      3");
    }

    #[test]
    fn control_characters_are_flattened() {
        let rows = vec![vec!["a\tb".to_string()]];
        let rendered = render_table(&["name"], &rows, &[]);
        assert!(rendered.lines().any(|line| line == "a b"));
    }
}
