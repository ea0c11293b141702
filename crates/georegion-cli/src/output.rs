use console::{style, StyledObject};
use serde::Serialize;
use std::fmt::Display;
use tabled::{settings::Style, Table, Tabled};

/// Output format mode
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Writes command results to stdout, either styled or as JSON envelopes
pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    pub fn new(json: bool) -> Self {
        let format = if json { OutputFormat::Json } else { OutputFormat::Human };
        Self { format }
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    fn line(&self, marker: StyledObject<&str>, status: &str, message: impl Display) {
        match self.format {
            OutputFormat::Human => println!("{} {}", marker, message),
            OutputFormat::Json => {
                println!("{:#}", serde_json::json!({ "status": status, "message": message.to_string() }))
            }
        }
    }

    pub fn success(&self, message: impl Display) {
        self.line(style("✓").green().bold(), "success", message);
    }

    pub fn info(&self, message: impl Display) {
        self.line(style("ℹ").blue().bold(), "info", message);
    }

    pub fn section(&self, title: impl Display) {
        if !self.is_json() {
            println!("\n{}", style(title).bold().underlined());
        }
    }

    /// Rounded table of rows; JSON callers report rows through `result` instead
    pub fn table<T: Tabled>(&self, rows: Vec<T>) {
        if self.is_json() {
            return;
        }
        if rows.is_empty() {
            println!("{}", style("(no matches)").dim());
            return;
        }
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{}", table);
    }

    /// Pretty JSON regardless of mode
    pub fn data<T: Serialize>(&self, data: &T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(data)?);
        Ok(())
    }

    /// Bare data in human mode, `{"status": "success", "data": ...}` in JSON mode
    pub fn result<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.is_json() {
            self.data(&serde_json::json!({ "status": "success", "data": data }))
        } else {
            self.data(&data)
        }
    }
}
