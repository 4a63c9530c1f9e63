use crate::models::analysis::{PageSummary, SectionAnalysis};
use crate::models::document::PaperInfo;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Run-level counters surfaced alongside fatal errors and in the saved JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunDiagnostics {
    pub sections_succeeded: usize,
    pub sections_failed: usize,
    pub pages_succeeded: usize,
    pub pages_failed: usize,
    pub last_error: Option<String>,
}

/// The terminal artifact of one analysis run. Never mutated after assembly.
///
/// `section_results` keeps dispatch order; consumers key by section name and
/// must not rely on completion order. `page_summaries` is ordered by page
/// index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub paper_info: PaperInfo,
    pub section_results: Vec<SectionAnalysis>,
    pub synthesis: String,
    pub page_summaries: Vec<PageSummary>,
    pub diagnostics: RunDiagnostics,
    pub warnings: Vec<String>,
}

impl Report {
    pub fn new(paper_info: PaperInfo) -> Self {
        Self {
            paper_info,
            section_results: Vec::new(),
            synthesis: String::new(),
            page_summaries: Vec::new(),
            diagnostics: RunDiagnostics::default(),
            warnings: Vec::new(),
        }
    }

    pub fn with_section_results(mut self, results: Vec<SectionAnalysis>) -> Self {
        self.section_results = results;
        self
    }

    pub fn with_synthesis(mut self, synthesis: String) -> Self {
        self.synthesis = synthesis;
        self
    }

    pub fn with_page_summaries(mut self, summaries: Vec<PageSummary>) -> Self {
        self.page_summaries = summaries;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: RunDiagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    pub fn section_result(&self, name: &str) -> Option<&SectionAnalysis> {
        self.section_results.iter().find(|r| r.section_name == name)
    }

    pub fn successful_sections(&self) -> impl Iterator<Item = &SectionAnalysis> {
        self.section_results.iter().filter(|r| r.is_success())
    }

    pub fn has_synthesis(&self) -> bool {
        !self.synthesis.trim().is_empty()
    }

    /// The persisted/emitted JSON shape. Keys are stable: `sectionResults`
    /// (object keyed by section name), `synthesis`, `pageSummaries`
    /// (strings in page order, empty for failed pages), plus `title` and
    /// `diagnostics`.
    pub fn to_output_json(&self) -> Value {
        let mut section_map = Map::new();
        for result in &self.section_results {
            section_map.insert(
                result.section_name.clone(),
                json!({
                    "output": result.output,
                    "status": result.status.as_str(),
                    "attempts": result.attempts,
                }),
            );
        }

        let page_summaries: Vec<Value> = self
            .page_summaries
            .iter()
            .map(|p| Value::String(p.output.clone()))
            .collect();

        json!({
            "title": self.paper_info.title,
            "sectionResults": Value::Object(section_map),
            "synthesis": self.synthesis,
            "pageSummaries": page_summaries,
            "diagnostics": {
                "sectionsSucceeded": self.diagnostics.sections_succeeded,
                "sectionsFailed": self.diagnostics.sections_failed,
                "pagesSucceeded": self.diagnostics.pages_succeeded,
                "pagesFailed": self.diagnostics.pages_failed,
                "lastError": self.diagnostics.last_error,
            },
        })
    }
}
