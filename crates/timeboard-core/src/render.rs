use std::io::{self, IsTerminal, Write};

use unicode_width::UnicodeWidthStr;

use crate::config::Config;
use crate::model::{CategoryRecord, Granularity, format_hours};

/// Terminal output for the CLI.
#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let color = cfg.color()? && io::stdout().is_terminal();
        Ok(Self { color })
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    #[tracing::instrument(skip(self, records))]
    pub fn print_summary(
        &self,
        records: &[CategoryRecord],
        mode: Granularity,
    ) -> anyhow::Result<()> {
        let out = io::stdout().lock();
        self.write_summary(out, records, mode)
    }

    pub fn write_summary<W: Write>(
        &self,
        mut out: W,
        records: &[CategoryRecord],
        mode: Granularity,
    ) -> anyhow::Result<()> {
        writeln!(out, "{}", self.paint(mode.label(), "1"))?;

        let headers = vec![
            "Category".to_string(),
            "Current".to_string(),
            mode.previous_label().to_string(),
        ];

        let rows = records
            .iter()
            .map(|record| {
                let frame = record.timeframes.get(mode);
                vec![
                    self.paint(&record.title, "36"),
                    format_hours(frame.current),
                    format_hours(frame.previous),
                ]
            })
            .collect();

        write_table(&mut out, headers, rows)
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    let line = |writer: &mut W, cells: &[String]| -> io::Result<()> {
        let mut text = String::new();
        for (idx, cell) in cells.iter().enumerate() {
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = widths[idx].saturating_sub(visible_width);
            text.push_str(cell);
            text.push_str(&" ".repeat(padding + 1));
        }
        writeln!(writer, "{}", text.trim_end())
    };

    line(&mut writer, &headers[..])?;
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    line(&mut writer, &rule[..])?;
    for row in rows {
        line(&mut writer, &row[..])?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}
