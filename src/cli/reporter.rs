use crate::cli::args::Cli;
use crate::models::{AnalysisStatus, Report};

const SEPARATOR_WIDTH: usize = 59;

pub struct ReportFormatter {
    use_colors: bool,
    verbose: bool,
}

impl ReportFormatter {
    pub fn new(cli: &Cli) -> Self {
        Self {
            use_colors: cli.should_use_color(),
            verbose: cli.is_verbose(),
        }
    }

    pub fn format_report(&self, report: &Report) -> String {
        let mut output = String::new();

        output.push_str(&"═".repeat(SEPARATOR_WIDTH));
        output.push('\n');
        output.push_str("📄 RONBUN PAPER ANALYSIS REPORT\n");
        output.push_str(&"═".repeat(SEPARATOR_WIDTH));
        output.push_str("\n\n");

        output.push_str(&format!("Title: {}\n", report.paper_info.title));
        output.push_str(&format!(
            "Pages: {}, Sections: {}, Size: {} bytes\n\n",
            report.paper_info.page_count,
            report.paper_info.section_count,
            report.paper_info.size_bytes
        ));

        for result in &report.section_results {
            let marker = self.status_marker(&result.status);
            output.push_str(&format!(
                "▶ {} {} (attempts: {}, {}ms)\n",
                marker,
                result.section_name.to_uppercase(),
                result.attempts,
                result.duration_ms
            ));

            if result.is_success() {
                output.push_str(&self.clip(&result.output));
            } else {
                output.push_str("  analysis failed - no output\n");
            }
            output.push('\n');
        }

        if report.has_synthesis() {
            output.push_str(&"─".repeat(SEPARATOR_WIDTH));
            output.push('\n');
            output.push_str("▶ SYNTHESIS\n");
            output.push_str(&self.clip(&report.synthesis));
            output.push('\n');
        }

        if !report.page_summaries.is_empty() {
            output.push_str(&"─".repeat(SEPARATOR_WIDTH));
            output.push('\n');
            output.push_str("▶ PAGE SUMMARIES\n");
            for summary in &report.page_summaries {
                let marker = self.status_marker(&summary.status);
                let pages = if summary.first_page == summary.last_page {
                    format!("p.{}", summary.first_page + 1)
                } else {
                    format!("p.{}-{}", summary.first_page + 1, summary.last_page + 1)
                };
                let text = if summary.is_success() {
                    summary.output.replace('\n', " ")
                } else {
                    "summary failed".to_string()
                };
                output.push_str(&format!("  {} {}: {}\n", marker, pages, text));
            }
            output.push('\n');
        }

        if !report.warnings.is_empty() {
            output.push_str("⚠️  WARNINGS:\n");
            for warning in &report.warnings {
                output.push_str(&format!("  - {}\n", warning));
            }
            output.push('\n');
        }

        output.push_str(&"═".repeat(SEPARATOR_WIDTH));
        output.push('\n');
        output.push_str(&format!(
            "Sections: {} succeeded, {} failed | Pages: {} succeeded, {} failed\n",
            report.diagnostics.sections_succeeded,
            report.diagnostics.sections_failed,
            report.diagnostics.pages_succeeded,
            report.diagnostics.pages_failed
        ));

        output
    }

    fn status_marker(&self, status: &AnalysisStatus) -> String {
        match status {
            AnalysisStatus::Success => {
                if self.use_colors {
                    "\x1b[32m✅\x1b[0m".to_string()
                } else {
                    "✅".to_string()
                }
            }
            AnalysisStatus::Failed => {
                if self.use_colors {
                    "\x1b[31m❌\x1b[0m".to_string()
                } else {
                    "❌".to_string()
                }
            }
        }
    }

    /// Long outputs are clipped unless verbose mode is on.
    fn clip(&self, text: &str) -> String {
        const CLIP_AT: usize = 600;

        let mut block: String = text
            .trim()
            .lines()
            .map(|l| format!("  {}\n", l))
            .collect();

        if !self.verbose && block.len() > CLIP_AT {
            let cut = block
                .char_indices()
                .take_while(|(i, _)| *i < CLIP_AT)
                .count();
            block = block.chars().take(cut).collect();
            block.push_str("…\n  (truncated - run with --verbose for full output)\n");
        }

        block
    }
}
