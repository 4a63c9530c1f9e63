pub mod args;
pub mod reporter;

pub use args::{Cli, OutputFormat};
pub use reporter::ReportFormatter;

use crate::analyzer::{AnalysisOrchestrator, LlmConfig, RetryPolicy};
use crate::config;
use crate::error::RonbunError;
use crate::models::Report;
use crate::parser::SectionExtractor;
use crate::storage;
use std::io::{self, Read};
use std::time::Duration;

pub struct CliHandler {
    cli: Cli,
}

impl CliHandler {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    pub async fn run(&self) -> Result<i32, RonbunError> {
        // Step 1: Read the extracted paper text
        let raw_text = self.read_input()?;
        if raw_text.trim().is_empty() {
            return Err(RonbunError::NoInput);
        }

        if self.cli.is_verbose() {
            eprintln!("📥 Read {} bytes of paper text", raw_text.len());
        }

        // Step 2: Partition into title, pages, and sections
        let extractor = SectionExtractor::new();
        let document = extractor.extract(&raw_text)?;

        if self.cli.is_verbose() {
            eprintln!(
                "🔍 '{}': {} pages, {} sections ({})",
                document.title,
                document.pages.len(),
                document.sections.len(),
                document
                    .sections
                    .iter()
                    .map(|s| s.name())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        // Step 3: Resolve the provider configuration
        let llm_config = self.resolve_llm_config()?;

        if self.cli.is_verbose() {
            eprintln!("🤖 Starting analysis with model: {}", llm_config.model_name);
        }

        // Step 4: Fan out the analysis run
        let orchestrator = AnalysisOrchestrator::new(
            &llm_config,
            self.cli.max_concurrent,
            RetryPolicy {
                max_attempts: self.cli.max_attempts,
                base_delay: Duration::from_millis(self.cli.retry_base_ms),
                max_delay: Duration::from_secs(60),
            },
            Duration::from_secs(self.cli.get_timeout_seconds()),
            self.cli.pages_per_group,
        )?;

        match orchestrator.analyze_document(&document).await {
            Ok(report) => {
                self.emit_report(&report)?;
                self.save_report(&report)?;
                Ok(0)
            }
            Err(RonbunError::SynthesisFailed {
                last_error,
                partial,
            }) => {
                // Section and page results survive a failed synthesis; show
                // them so the caller can see what succeeded.
                eprintln!("⚠️  Synthesis failed: {}", last_error);
                self.emit_report(&partial)?;
                Ok(4)
            }
            Err(RonbunError::NoUsableSections {
                partial: Some(partial),
            }) => {
                eprintln!(
                    "❌ No usable sections - all {} section analyses failed",
                    partial.diagnostics.sections_failed
                );
                if let Some(ref error) = partial.diagnostics.last_error {
                    eprintln!("   last provider error: {}", error);
                }
                Ok(3)
            }
            Err(e) => Err(e),
        }
    }

    fn read_input(&self) -> Result<String, RonbunError> {
        match &self.cli.input {
            Some(path) => Ok(std::fs::read_to_string(path)?),
            None => {
                let mut buffer = String::new();
                io::stdin().read_to_string(&mut buffer)?;
                Ok(buffer)
            }
        }
    }

    fn resolve_llm_config(&self) -> Result<LlmConfig, RonbunError> {
        if let Some(ref path) = self.cli.profiles {
            let profiles = config::load_profiles(path)?;
            let profile = config::select_profile(&profiles, self.cli.profile.as_deref())?.clone();
            return Ok(profile.into_llm_config(None));
        }

        if self.cli.profile.is_some() {
            return Err(RonbunError::InvalidArguments(
                "--profile requires --profiles".to_string(),
            ));
        }

        Ok(LlmConfig {
            model_name: self.cli.get_llm_model(),
            ..Default::default()
        })
    }

    fn emit_report(&self, report: &Report) -> Result<(), RonbunError> {
        match self.cli.get_output_format()? {
            OutputFormat::Text => {
                let formatter = ReportFormatter::new(&self.cli);
                println!("{}", formatter.format_report(report));
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&report.to_output_json())?);
            }
        }
        Ok(())
    }

    fn save_report(&self, report: &Report) -> Result<(), RonbunError> {
        if self.cli.no_save {
            return Ok(());
        }

        let path = storage::save_report(&self.cli.output_dir, report)?;
        if self.cli.is_verbose() {
            eprintln!("💾 Analysis saved to {}", path.display());
        }
        Ok(())
    }
}
