use crate::error::RonbunError;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Result<Self, RonbunError> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(RonbunError::InvalidArguments(format!(
                "unknown output format '{}' (expected text or json)",
                other
            ))),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "ronbun")]
#[command(about = "Research paper analyzer - multi-expert LLM analysis of extracted paper text")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    /// Extracted paper text (pages separated by form feed); reads stdin when omitted
    pub input: Option<PathBuf>,

    /// LLM model to use for analysis
    #[arg(short = 'm', long, default_value = "gpt-5-mini")]
    pub model: String,

    /// Provider profile list (JSON array of {name, model, endpoint, temperature})
    #[arg(long)]
    pub profiles: Option<PathBuf>,

    /// Profile name to select from the profile list (first entry when omitted)
    #[arg(long)]
    pub profile: Option<String>,

    /// Maximum wall-clock time for one LLM call in seconds (10-600)
    #[arg(short = 't', long, default_value = "120", value_parser = validate_timeout)]
    pub timeout: u64,

    /// Maximum concurrent in-flight calls (1-16)
    #[arg(short = 'c', long, default_value = "4", value_parser = validate_concurrency)]
    pub max_concurrent: usize,

    /// Maximum attempts per call before giving up (1-10)
    #[arg(long, default_value = "5", value_parser = validate_attempts)]
    pub max_attempts: u32,

    /// Base backoff delay in milliseconds
    #[arg(long, default_value = "1000")]
    pub retry_base_ms: u64,

    /// Pages per summary call
    #[arg(long, default_value = "1")]
    pub pages_per_group: usize,

    /// Directory for saved analysis JSON
    #[arg(short = 'o', long, default_value = "analysis_results")]
    pub output_dir: PathBuf,

    /// Skip writing the analysis JSON to disk
    #[arg(long)]
    pub no_save: bool,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub format: String,

    /// Enable verbose output to stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Enable debug output including provider communications
    #[arg(short = 'd', long)]
    pub debug: bool,
}

impl Cli {
    pub fn parse_args() -> Result<Self, RonbunError> {
        let cli = Self::try_parse().map_err(|e| RonbunError::InvalidArguments(e.to_string()))?;
        cli.validate()?;
        Ok(cli)
    }

    pub fn validate(&self) -> Result<(), RonbunError> {
        if !(10..=600).contains(&self.timeout) {
            return Err(RonbunError::InvalidArguments(
                "Timeout must be between 10 and 600 seconds".to_string(),
            ));
        }

        if self.retry_base_ms == 0 {
            return Err(RonbunError::InvalidArguments(
                "Retry base delay must be greater than zero".to_string(),
            ));
        }

        if self.pages_per_group == 0 {
            return Err(RonbunError::InvalidArguments(
                "Pages per group must be at least 1".to_string(),
            ));
        }

        self.get_output_format()?;

        Ok(())
    }

    pub fn get_llm_model(&self) -> String {
        std::env::var("RONBUN_DEFAULT_MODEL").unwrap_or_else(|_| self.model.clone())
    }

    pub fn get_timeout_seconds(&self) -> u64 {
        if let Ok(timeout_str) = std::env::var("RONBUN_DEFAULT_TIMEOUT") {
            if let Ok(timeout) = timeout_str.parse::<u64>() {
                if (10..=600).contains(&timeout) {
                    return timeout;
                }
            }
        }
        self.timeout
    }

    pub fn get_output_format(&self) -> Result<OutputFormat, RonbunError> {
        OutputFormat::from_str(&self.format)
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose || self.debug
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn should_use_color(&self) -> bool {
        std::env::var("NO_COLOR").is_err()
    }
}

fn validate_timeout(s: &str) -> Result<u64, String> {
    let timeout: u64 = s.parse().map_err(|_| "Timeout must be a number")?;

    if (10..=600).contains(&timeout) {
        Ok(timeout)
    } else {
        Err("Timeout must be between 10 and 600 seconds".to_string())
    }
}

fn validate_concurrency(s: &str) -> Result<usize, String> {
    let limit: usize = s.parse().map_err(|_| "Concurrency must be a number")?;

    if (1..=16).contains(&limit) {
        Ok(limit)
    } else {
        Err("Concurrency must be between 1 and 16".to_string())
    }
}

fn validate_attempts(s: &str) -> Result<u32, String> {
    let attempts: u32 = s.parse().map_err(|_| "Attempts must be a number")?;

    if (1..=10).contains(&attempts) {
        Ok(attempts)
    } else {
        Err("Attempts must be between 1 and 10".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_cli_parsing() {
        let args = vec!["ronbun"];
        let cli = Cli::try_parse_from(args).unwrap();

        assert!(cli.input.is_none());
        assert_eq!(cli.model, "gpt-5-mini");
        assert_eq!(cli.timeout, 120);
        assert_eq!(cli.max_concurrent, 4);
        assert_eq!(cli.max_attempts, 5);
        assert_eq!(cli.pages_per_group, 1);
        assert!(!cli.verbose);
        assert!(!cli.no_save);
        assert_eq!(cli.format, "text");
    }

    #[test]
    fn test_cli_with_all_options() {
        let args = vec![
            "ronbun",
            "--model",
            "gemini-2.5-flash",
            "--timeout",
            "60",
            "--max-concurrent",
            "2",
            "--max-attempts",
            "3",
            "--retry-base-ms",
            "500",
            "--pages-per-group",
            "2",
            "--output-dir",
            "out",
            "--format",
            "json",
            "--verbose",
            "paper.txt",
        ];

        let cli = Cli::try_parse_from(args).unwrap();

        assert_eq!(cli.model, "gemini-2.5-flash");
        assert_eq!(cli.timeout, 60);
        assert_eq!(cli.max_concurrent, 2);
        assert_eq!(cli.max_attempts, 3);
        assert_eq!(cli.retry_base_ms, 500);
        assert_eq!(cli.pages_per_group, 2);
        assert_eq!(cli.input, Some(PathBuf::from("paper.txt")));
        assert_eq!(cli.get_output_format().unwrap(), OutputFormat::Json);
        assert!(cli.is_verbose());
    }

    #[test]
    fn test_cli_short_flags() {
        let args = vec![
            "ronbun",
            "-m",
            "claude-sonnet-4",
            "-t",
            "30",
            "-c",
            "8",
            "-o",
            "results",
            "-v",
        ];

        let cli = Cli::try_parse_from(args).unwrap();

        assert_eq!(cli.model, "claude-sonnet-4");
        assert_eq!(cli.timeout, 30);
        assert_eq!(cli.max_concurrent, 8);
        assert_eq!(cli.output_dir, PathBuf::from("results"));
        assert!(cli.verbose);
    }

    #[test]
    fn test_debug_flag_implies_verbose() {
        let args = vec!["ronbun", "--debug"];
        let cli = Cli::try_parse_from(args).unwrap();

        assert!(cli.is_debug());
        assert!(cli.is_verbose());
    }

    #[test]
    fn test_timeout_validation() {
        let args = vec!["ronbun", "--timeout", "5"];
        assert!(Cli::try_parse_from(args).is_err());

        let args = vec!["ronbun", "--timeout", "900"];
        assert!(Cli::try_parse_from(args).is_err());

        let args = vec!["ronbun", "--timeout", "120"];
        assert!(Cli::try_parse_from(args).is_ok());
    }

    #[test]
    fn test_concurrency_validation() {
        let args = vec!["ronbun", "--max-concurrent", "0"];
        assert!(Cli::try_parse_from(args).is_err());

        let args = vec!["ronbun", "--max-concurrent", "32"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_format_validation() {
        let mut cli = Cli::try_parse_from(vec!["ronbun"]).unwrap();
        assert!(cli.validate().is_ok());

        cli.format = "yaml".to_string();
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_environment_variable_override() {
        std::env::set_var("RONBUN_DEFAULT_MODEL", "gpt-4o");

        let cli = Cli::try_parse_from(vec!["ronbun"]).unwrap();
        assert_eq!(cli.get_llm_model(), "gpt-4o");

        std::env::remove_var("RONBUN_DEFAULT_MODEL");
        assert_eq!(cli.get_llm_model(), "gpt-5-mini");
    }

    #[test]
    fn test_timeout_env_override_is_range_checked() {
        std::env::set_var("RONBUN_DEFAULT_TIMEOUT", "90");
        let cli = Cli::try_parse_from(vec!["ronbun"]).unwrap();
        assert_eq!(cli.get_timeout_seconds(), 90);

        std::env::set_var("RONBUN_DEFAULT_TIMEOUT", "5000");
        assert_eq!(cli.get_timeout_seconds(), 120);

        std::env::remove_var("RONBUN_DEFAULT_TIMEOUT");
    }
}
