pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod parser;
pub mod storage;

pub use error::RonbunError;

// Re-export commonly used types
pub use models::{
    AnalysisRequest, AnalysisStatus, Document, ExpertRole, PageSummary, PaperInfo, Report,
    RunDiagnostics, Section, SectionAnalysis, SectionKind,
};

pub use analyzer::{
    AnalysisOrchestrator, LlmConfig, LlmProvider, RateLimitedClient, ReportAggregator, RetryPolicy,
};

pub use parser::SectionExtractor;

pub use cli::CliHandler;
