use std::fmt::Write as _;

use crate::summary::SummaryEntry;

const BAR_GLYPH: char = '█';

/// Horizontal bar chart, one line per entry, bars scaled so the largest
/// count spans `width` glyphs. Non-zero counts always get at least one glyph.
pub fn render_bar_chart(entries: &[SummaryEntry], width: usize) -> String {
    let Some(max) = entries.iter().map(|e| e.count).max() else {
        return String::new();
    };
    let label_width = entries
        .iter()
        .map(|e| e.province.chars().count())
        .max()
        .unwrap_or(0);
    let count_width = max.to_string().len();

    let mut output = String::new();
    for entry in entries {
        let bar_len = scaled(entry.count, max, width.max(1));
        let padding = label_width - entry.province.chars().count();
        let _ = writeln!(
            output,
            "{}{}  {:>count_width$}  {}",
            entry.province,
            " ".repeat(padding),
            entry.count,
            BAR_GLYPH.to_string().repeat(bar_len),
        );
    }
    output
}

fn scaled(count: usize, max: usize, width: usize) -> usize {
    if count == 0 || max == 0 {
        return 0;
    }
    ((count * width) / max).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(province: &str, count: usize) -> SummaryEntry {
        SummaryEntry {
            province: province.to_string(),
            count,
        }
    }

    #[test]
    fn largest_count_fills_width() {
        let chart = render_bar_chart(&[entry("Manila", 10), entry("Cebu", 5)], 20);
        let lines = chart.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], format!("Manila  10  {}", "█".repeat(20)));
        assert_eq!(lines[1], format!("Cebu     5  {}", "█".repeat(10)));
    }

    #[test]
    fn small_counts_keep_one_glyph() {
        assert_eq!(scaled(1, 1000, 40), 1);
        assert_eq!(scaled(0, 10, 40), 0);
    }

    #[test]
    fn empty_entries_render_nothing() {
        assert!(render_bar_chart(&[], 40).is_empty());
    }
}
