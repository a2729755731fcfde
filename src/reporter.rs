use crate::models::{HEADING_LEVELS, PageReport};
use anyhow::Result;
use colored::*;
use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;

pub struct Reporter;

impl Reporter {
    pub fn render_text_report(url: &str, report: &PageReport) -> String {
        let mut out = String::new();
        let stats = &report.link_stats;

        let _ = writeln!(out, "\n{}", "=".repeat(80).bright_blue());
        let _ = writeln!(out, "{}", "PageProbe - Page Report".bright_cyan().bold());
        let _ = writeln!(out, "{}", "=".repeat(80).bright_blue());
        let _ = writeln!(out);

        let _ = writeln!(out, "{}: {}", "URL".bright_white().bold(), url);
        let _ = writeln!(
            out,
            "{}: {}",
            "HTML Version".bright_white().bold(),
            if report.html_version.is_empty() {
                "none".dimmed()
            } else {
                report.html_version.normal()
            }
        );
        let _ = writeln!(
            out,
            "{}: {}",
            "Title".bright_white().bold(),
            if report.title.is_empty() {
                "none".dimmed()
            } else {
                report.title.bright_white()
            }
        );
        let _ = writeln!(out);

        let _ = writeln!(out, "{}", "Headings".bright_yellow().bold().underline());
        for level in HEADING_LEVELS {
            let count = report.heading_count(level);
            let _ = writeln!(
                out,
                "  {}: {}",
                level,
                if count > 0 {
                    count.to_string().bright_green()
                } else {
                    count.to_string().dimmed()
                }
            );
        }
        let _ = writeln!(out);

        let _ = writeln!(out, "{}", "Links".bright_yellow().bold().underline());
        let _ = writeln!(
            out,
            "  Internal:      {}",
            stats.internal.to_string().bright_green()
        );
        let _ = writeln!(
            out,
            "  External:      {}",
            stats.external.to_string().bright_green()
        );
        let _ = writeln!(
            out,
            "  Inaccessible:  {}",
            if stats.unreachable > 0 {
                stats.unreachable.to_string().bright_red()
            } else {
                stats.unreachable.to_string().bright_green()
            }
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", "=".repeat(80).bright_blue());

        out
    }

    pub fn print_text_report(url: &str, report: &PageReport) {
        print!("{}", Self::render_text_report(url, report));
    }

    pub fn save_json_report(report: &PageReport, filename: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        let mut file = File::create(filename)?;
        file.write_all(json.as_bytes())?;
        println!("Report saved to: {}", filename.bright_green());
        Ok(())
    }
}
