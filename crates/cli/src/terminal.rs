use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use flowmap_rules::Level;

use crate::loader::CheckReport;
use crate::report::{text_line, SerieReport};

/// Color scheme for terminal output.
struct Colors;

impl Colors {
    const OK: Color = Color::Green;
    const WARNING: Color = Color::Yellow;
    const CRITICAL: Color = Color::Red;
    const DIM: Color = Color::DarkGrey;
}

fn level_color(level: Level) -> Color {
    match level {
        Level::Disabled => Colors::DIM,
        Level::Ok => Colors::OK,
        Level::Warning => Colors::WARNING,
        Level::Critical => Colors::CRITICAL,
    }
}

/// Writes human-readable reports to stdout.
#[derive(Debug, Default)]
pub struct Terminal;

impl Terminal {
    pub fn new() -> Self {
        Self
    }

    fn print_colored(&self, color: Color, text: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(color),
            Print(format!("{}\n", text)),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// One colored line per series, by severity.
    pub fn print_reports(&self, reports: &[SerieReport]) -> Result<()> {
        for report in reports {
            let color = report
                .decision
                .as_ref()
                .map(|d| level_color(d.level))
                .unwrap_or(Colors::DIM);
            self.print_colored(color, &text_line(report))?;
        }
        Ok(())
    }

    pub fn print_check(&self, report: &CheckReport) -> Result<()> {
        if report.is_clean() {
            return self.print_colored(Colors::OK, &format!("{} rules, no problems", report.rules));
        }
        self.print_colored(
            Colors::WARNING,
            &format!("{} rules, {} problems", report.rules, report.problems.len()),
        )?;
        for problem in &report.problems {
            self.print_colored(Colors::WARNING, &format!("  {}", problem))?;
        }
        Ok(())
    }

    pub fn print_error(&self, msg: &str) -> Result<()> {
        self.print_colored(Colors::CRITICAL, &format!("Error: {}", msg))
    }
}
