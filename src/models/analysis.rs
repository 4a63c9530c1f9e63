use crate::models::SectionKind;
use serde::{Deserialize, Serialize};

/// The closed set of prompt roles dispatched against the provider.
///
/// Each section kind maps to exactly one expert; unrecognized section names
/// fall back to `GenericAnalyst`. `SynthesisExpert` is used both for the
/// final synthesis call and for page summaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpertRole {
    IntroductionExpert,
    MethodologyExpert,
    ResultsExpert,
    DiscussionExpert,
    SynthesisExpert,
    GenericAnalyst,
}

impl ExpertRole {
    pub fn for_section(kind: &SectionKind) -> Self {
        match kind {
            SectionKind::Introduction => ExpertRole::IntroductionExpert,
            SectionKind::Methodology => ExpertRole::MethodologyExpert,
            SectionKind::Results => ExpertRole::ResultsExpert,
            SectionKind::Discussion => ExpertRole::DiscussionExpert,
            SectionKind::Other(_) => ExpertRole::GenericAnalyst,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpertRole::IntroductionExpert => "Introduction_Expert",
            ExpertRole::MethodologyExpert => "Methodology_Expert",
            ExpertRole::ResultsExpert => "Results_Expert",
            ExpertRole::DiscussionExpert => "Discussion_Expert",
            ExpertRole::SynthesisExpert => "Synthesis_Expert",
            ExpertRole::GenericAnalyst => "Generic_Analyst",
        }
    }
}

/// One dispatch against the rate-limited client. Created per call, consumed
/// by the client, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub role: ExpertRole,
    pub section_name: String,
    pub content: String,
}

impl AnalysisRequest {
    pub fn new(role: ExpertRole, section_name: impl Into<String>, content: String) -> Self {
        Self {
            role,
            section_name: section_name.into(),
            content,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn content_size(&self) -> usize {
        self.content.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Success,
    Failed,
}

impl AnalysisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStatus::Success => "success",
            AnalysisStatus::Failed => "failed",
        }
    }
}

/// Terminal outcome of one section's analysis. Every dispatched section gets
/// exactly one of these before synthesis begins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionAnalysis {
    pub section_name: String,
    pub output: String,
    pub attempts: u32,
    pub status: AnalysisStatus,
    pub duration_ms: u64,
}

impl SectionAnalysis {
    pub fn success(
        section_name: impl Into<String>,
        output: String,
        attempts: u32,
        duration_ms: u64,
    ) -> Self {
        Self {
            section_name: section_name.into(),
            output,
            attempts,
            status: AnalysisStatus::Success,
            duration_ms,
        }
    }

    /// Output is the empty sentinel for failed analyses.
    pub fn failed(section_name: impl Into<String>, attempts: u32, duration_ms: u64) -> Self {
        Self {
            section_name: section_name.into(),
            output: String::new(),
            attempts,
            status: AnalysisStatus::Failed,
            duration_ms,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == AnalysisStatus::Success
    }
}

/// One page group's summary. Page indices are inclusive and zero-based;
/// report ordering follows page index, never call completion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSummary {
    pub first_page: usize,
    pub last_page: usize,
    pub output: String,
    pub attempts: u32,
    pub status: AnalysisStatus,
}

impl PageSummary {
    pub fn success(first_page: usize, last_page: usize, output: String, attempts: u32) -> Self {
        Self {
            first_page,
            last_page,
            output,
            attempts,
            status: AnalysisStatus::Success,
        }
    }

    pub fn failed(first_page: usize, last_page: usize, attempts: u32) -> Self {
        Self {
            first_page,
            last_page,
            output: String::new(),
            attempts,
            status: AnalysisStatus::Failed,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == AnalysisStatus::Success
    }
}
