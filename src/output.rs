use std::fs::File;
use std::io::{self, Write, BufWriter};
use std::path::PathBuf;
use std::time::Duration;
use anyhow::Result;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::app::Report;
use crate::cli::OutputFormat;

pub struct OutputWriter {
    format: OutputFormat,
    file: Option<PathBuf>,
}

impl OutputWriter {
    pub fn new(format: OutputFormat, file: Option<PathBuf>) -> Result<Self> {
        Ok(Self { format, file })
    }

    /// "Running..." spinner for human output. Not drawn when stderr is not a terminal.
    pub fn loading(&self, operation: &str) -> ProgressBar {
        if self.format != OutputFormat::Human {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.bright_magenta} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("Running {}...", operation));
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }

    pub fn write(&self, report: &Report) -> Result<()> {
        let output = match self.format {
            OutputFormat::Human => self.format_human(report),
            OutputFormat::Json => self.format_json(report)?,
        };
        self.emit(&output)
    }

    /// Error state: distinct styling in human output, an `error` field in JSON.
    pub fn write_error(&self, operation: &str, error: &dyn std::fmt::Display) -> Result<()> {
        let output = match self.format {
            OutputFormat::Human => format!("{} {}\n", "❌ Error:".red().bold(), error.to_string().red()),
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "operation": operation,
                    "error": error.to_string(),
                });
                format!("{}\n", serde_json::to_string_pretty(&value)?)
            }
        };
        self.emit(&output)
    }

    fn emit(&self, output: &str) -> Result<()> {
        match &self.file {
            Some(path) => {
                let file = File::create(path)?;
                let mut writer = BufWriter::new(file);
                writer.write_all(output.as_bytes())?;
                writer.flush()?;
            }
            None => {
                print!("{}", output);
                io::stdout().flush()?;
            }
        }

        Ok(())
    }

    fn format_human(&self, report: &Report) -> String {
        let mut output = String::new();

        output.push_str(&format!("{} {} {}\n",
            "✅".green(),
            report.operation.truecolor(255, 140, 0).bold(),
            format!("({}ms)", report.elapsed_ms()).truecolor(128, 128, 128)));
        output.push_str(&report.summary);
        if !report.summary.ends_with('\n') {
            output.push('\n');
        }

        output
    }

    fn format_json(&self, report: &Report) -> Result<String> {
        let mut value = serde_json::to_value(report)?;
        if let Some(object) = value.as_object_mut() {
            object.insert("elapsed_ms".to_string(), report.elapsed_ms().into());
        }
        Ok(format!("{}\n", serde_json::to_string_pretty(&value)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_report() -> Report {
        let now = Utc::now();
        Report {
            operation: "dns.lookup",
            started_at: now,
            finished_at: now,
            result: serde_json::json!({"domain": "google.com", "address": "142.250.185.78"}),
            summary: "google.com → 142.250.185.78".to_string(),
        }
    }

    #[test]
    fn test_json_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let writer = OutputWriter::new(OutputFormat::Json, Some(path.clone())).unwrap();
        writer.write(&sample_report()).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["operation"], "dns.lookup");
        assert_eq!(written["result"]["address"], "142.250.185.78");
        assert_eq!(written["elapsed_ms"], 0);
        assert!(written.get("summary").is_none());
    }

    #[test]
    fn test_human_output_to_file() {
        colored::control::set_override(false);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let writer = OutputWriter::new(OutputFormat::Human, Some(path.clone())).unwrap();
        writer.write(&sample_report()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("dns.lookup"));
        assert!(written.ends_with("google.com → 142.250.185.78\n"));
    }

    #[test]
    fn test_error_output_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("err.json");
        let writer = OutputWriter::new(OutputFormat::Json, Some(path.clone())).unwrap();
        writer.write_error("ping.test", &"invalid input: ping count must be at least 1").unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["operation"], "ping.test");
        assert_eq!(written["error"], "invalid input: ping count must be at least 1");
    }

    #[test]
    fn test_loading_hidden_for_json() {
        let writer = OutputWriter::new(OutputFormat::Json, None).unwrap();
        assert!(writer.loading("dns.lookup").is_hidden());
    }
}
