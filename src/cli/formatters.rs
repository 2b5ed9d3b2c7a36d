//! Text formatting for amounts and tables printed by the shell.

/// Formats `value` with two decimals and thousands separators, e.g. `-1,234.50`.
pub fn format_amount(value: f64) -> String {
    let rounded = format!("{:.2}", value.abs());
    let (whole, fraction) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 && rounded != "0.00" {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{fraction}")
}

pub fn format_money(currency: &str, value: f64) -> String {
    format!("{currency} {}", format_amount(value))
}

/// Like [`format_amount`] but always shows the sign.
pub fn format_signed(value: f64) -> String {
    if value > 0.0 {
        format!("+{}", format_amount(value))
    } else {
        format_amount(value)
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Fixed-width progress bar for a 0..=100 percentage.
pub fn progress_bar(percent: f64, width: usize) -> String {
    let clamped = percent.clamp(0.0, 100.0);
    let filled = ((clamped / 100.0) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}

/// Describes how a column should align its contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableColumn {
    pub header: String,
    pub alignment: Alignment,
}

/// A plain-text table with a header row and a rule beneath it.
pub struct Table {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: &[(&str, Alignment)]) -> Self {
        Self {
            columns: columns
                .iter()
                .map(|(header, alignment)| TableColumn {
                    header: (*header).to_string(),
                    alignment: *alignment,
                })
                .collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn compute_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| cell.chars().count())
                    .fold(column.header.chars().count(), usize::max)
            })
            .collect()
    }

    fn render_row(&self, row: &[String], widths: &[usize]) -> String {
        let cells: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let text = row.get(idx).map(String::as_str).unwrap_or("");
                match column.alignment {
                    Alignment::Left => format!("{:<width$}", text, width = widths[idx]),
                    Alignment::Right => format!("{:>width$}", text, width = widths[idx]),
                }
            })
            .collect();
        format!("  {}", cells.join("  ")).trim_end().to_string()
    }

    pub fn render(&self) -> String {
        let widths = self.compute_widths();
        let header: Vec<String> = self.columns.iter().map(|c| c.header.clone()).collect();
        let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();

        let mut lines = vec![self.render_row(&header, &widths), format!("  {}", rule.join("  "))];
        lines.extend(self.rows.iter().map(|row| self.render_row(row, &widths)));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_are_grouped() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(999.999), "1,000.00");
        assert_eq!(format_amount(1234567.891), "1,234,567.89");
        assert_eq!(format_amount(-2900.0), "-2,900.00");
        assert_eq!(format_amount(-0.001), "0.00");
        assert_eq!(format_signed(12.5), "+12.50");
        assert_eq!(format_money("LKR", 290.0), "LKR 290.00");
    }

    #[test]
    fn progress_bar_is_clamped() {
        assert_eq!(progress_bar(50.0, 4), "[##..]");
        assert_eq!(progress_bar(250.0, 4), "[####]");
        assert_eq!(progress_bar(-5.0, 4), "[....]");
    }

    #[test]
    fn table_aligns_columns() {
        let mut table = Table::new(&[("Name", Alignment::Left), ("Balance", Alignment::Right)]);
        table.push_row(vec!["On Hand".into(), "1.00".into()]);
        table.push_row(vec!["MM".into(), "1,000.00".into()]);
        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "  Name      Balance");
        assert_eq!(lines[1], "  -------  --------");
        assert_eq!(lines[2], "  On Hand      1.00");
        assert_eq!(lines[3], "  MM       1,000.00");
    }
}
