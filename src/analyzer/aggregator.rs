use crate::models::{PageSummary, PaperInfo, Report, RunDiagnostics, SectionAnalysis};

/// Assembles terminal dispatch results into the run's Report.
///
/// Every section result is terminal (Success or Failed) by the time it
/// arrives here; the aggregator never sees an in-flight call.
pub struct ReportAggregator;

impl ReportAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Synthesis input is built from successful analyses only, in original
    /// section order (dispatch order), never completion order.
    pub fn build_synthesis_input(&self, results: &[SectionAnalysis]) -> Vec<(String, String)> {
        results
            .iter()
            .filter(|r| r.is_success())
            .map(|r| (r.section_name.clone(), r.output.clone()))
            .collect()
    }

    pub fn assemble(
        &self,
        paper_info: PaperInfo,
        section_results: Vec<SectionAnalysis>,
        page_summaries: Vec<PageSummary>,
        synthesis: String,
        last_error: Option<String>,
    ) -> Report {
        let diagnostics = RunDiagnostics {
            sections_succeeded: section_results.iter().filter(|r| r.is_success()).count(),
            sections_failed: section_results.iter().filter(|r| !r.is_success()).count(),
            pages_succeeded: page_summaries.iter().filter(|p| p.is_success()).count(),
            pages_failed: page_summaries.iter().filter(|p| !p.is_success()).count(),
            last_error,
        };

        let mut report = Report::new(paper_info)
            .with_section_results(section_results)
            .with_page_summaries(page_summaries)
            .with_synthesis(synthesis)
            .with_diagnostics(diagnostics);

        for warning in self.validate_analysis_quality(&report) {
            report.add_warning(warning);
        }

        report
    }

    pub fn validate_analysis_quality(&self, report: &Report) -> Vec<String> {
        let mut warnings = Vec::new();

        for result in &report.section_results {
            if result.is_success() && result.output.trim().len() < 20 {
                warnings.push(format!(
                    "Section '{}': analysis output appears too brief - may indicate provider issues",
                    result.section_name
                ));
            }

            if result.attempts > 1 {
                warnings.push(format!(
                    "Section '{}': took {} attempts to resolve",
                    result.section_name, result.attempts
                ));
            }
        }

        if report.diagnostics.sections_failed > 0 {
            warnings.push(format!(
                "{} of {} section analyses failed - treat the synthesis as incomplete",
                report.diagnostics.sections_failed,
                report.section_results.len()
            ));
        }

        if report.diagnostics.pages_failed > 0 {
            warnings.push(format!(
                "{} page summaries failed and are empty in the output",
                report.diagnostics.pages_failed
            ));
        }

        warnings
    }
}

impl Default for ReportAggregator {
    fn default() -> Self {
        Self::new()
    }
}
