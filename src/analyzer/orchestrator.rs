use crate::analyzer::aggregator::ReportAggregator;
use crate::analyzer::llm_client::{create_llm_client, LlmConfig, LlmProvider};
use crate::analyzer::prompts::PromptTemplate;
use crate::analyzer::rate_limit::{RateLimitedClient, RetryPolicy};
use crate::error::RonbunError;
use crate::models::{
    AnalysisRequest, Document, ExpertRole, PageSummary, PaperInfo, Report, Section,
    SectionAnalysis,
};
use crate::parser::pages::{group_pages, PageGroup};
use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Turns a document's sections into a completed Report.
///
/// Every section and page group is dispatched concurrently through the
/// rate-limited client; one section's failure never cancels its siblings.
/// Synthesis runs once, only over the successful section analyses.
pub struct AnalysisOrchestrator {
    client: Arc<RateLimitedClient>,
    aggregator: ReportAggregator,
    pages_per_group: usize,
}

impl AnalysisOrchestrator {
    pub fn new(
        llm_config: &LlmConfig,
        max_concurrent: usize,
        policy: RetryPolicy,
        call_timeout: Duration,
        pages_per_group: usize,
    ) -> Result<Self, RonbunError> {
        let provider = create_llm_client(llm_config)?;
        Ok(Self::with_provider(
            provider.into(),
            max_concurrent,
            policy,
            call_timeout,
            pages_per_group,
        ))
    }

    /// Builds the orchestrator around an already-constructed provider. This
    /// is the seam tests use to inject a deterministic provider.
    pub fn with_provider(
        provider: Arc<dyn LlmProvider + Send + Sync>,
        max_concurrent: usize,
        policy: RetryPolicy,
        call_timeout: Duration,
        pages_per_group: usize,
    ) -> Self {
        Self {
            client: Arc::new(RateLimitedClient::new(
                provider,
                max_concurrent,
                policy,
                call_timeout,
            )),
            aggregator: ReportAggregator::new(),
            pages_per_group,
        }
    }

    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }

    pub async fn analyze_document(&self, document: &Document) -> Result<Report, RonbunError> {
        // An empty document never reaches the provider.
        if document.sections.is_empty() {
            return Err(RonbunError::NoUsableSections { partial: None });
        }

        info!(
            title = %document.title,
            sections = document.sections.len(),
            pages = document.pages.len(),
            model = self.client.model_name(),
            "starting analysis run"
        );

        // Fan out one analysis per section.
        let section_futures: Vec<_> = document
            .sections
            .iter()
            .map(|section| self.analyze_section(section))
            .collect();
        let section_outcomes = join_all(section_futures).await;

        let mut last_error = None;
        let mut section_results = Vec::with_capacity(section_outcomes.len());
        for (analysis, error) in section_outcomes {
            if error.is_some() {
                last_error = error;
            }
            section_results.push(analysis);
        }

        // Page summaries run before synthesis so a synthesis failure still
        // leaves them on the partial report. join_all preserves input order,
        // which keeps summaries in page order regardless of completion order.
        let groups = group_pages(&document.pages, self.pages_per_group);
        let page_futures: Vec<_> = groups
            .iter()
            .map(|group| self.summarize_page_group(group))
            .collect();
        let page_outcomes = join_all(page_futures).await;

        let mut page_summaries = Vec::with_capacity(page_outcomes.len());
        for (summary, error) in page_outcomes {
            if error.is_some() {
                last_error = error;
            }
            page_summaries.push(summary);
        }

        let paper_info = PaperInfo::from_document(document);
        let synthesis_input = self.aggregator.build_synthesis_input(&section_results);

        if synthesis_input.is_empty() {
            warn!("every section analysis failed; synthesis skipped");
            let partial = self.aggregator.assemble(
                paper_info,
                section_results,
                page_summaries,
                String::new(),
                last_error,
            );
            return Err(RonbunError::NoUsableSections {
                partial: Some(Box::new(partial)),
            });
        }

        let request = AnalysisRequest::new(
            ExpertRole::SynthesisExpert,
            "synthesis",
            PromptTemplate::build_synthesis_prompt(&synthesis_input),
        );

        match self.client.execute(&request).await {
            Ok(outcome) => {
                info!(attempts = outcome.attempts, "synthesis complete");
                Ok(self.aggregator.assemble(
                    paper_info,
                    section_results,
                    page_summaries,
                    outcome.output,
                    last_error,
                ))
            }
            Err(e) => {
                warn!(error = %e, "synthesis call exhausted retries");
                let message = e.to_string();
                let partial = self.aggregator.assemble(
                    paper_info,
                    section_results,
                    page_summaries,
                    String::new(),
                    Some(message.clone()),
                );
                Err(RonbunError::SynthesisFailed {
                    last_error: message,
                    partial: Box::new(partial),
                })
            }
        }
    }

    async fn analyze_section(&self, section: &Section) -> (SectionAnalysis, Option<String>) {
        let role = ExpertRole::for_section(&section.kind);
        let request = AnalysisRequest::new(
            role,
            section.name(),
            PromptTemplate::build_section_prompt(section.name(), &section.text),
        );
        let start = Instant::now();

        match self.client.execute(&request).await {
            Ok(outcome) => {
                debug!(
                    section = section.name(),
                    attempts = outcome.attempts,
                    "section analysis succeeded"
                );
                (
                    SectionAnalysis::success(
                        section.name(),
                        outcome.output,
                        outcome.attempts,
                        start.elapsed().as_millis() as u64,
                    ),
                    None,
                )
            }
            Err(e) => {
                warn!(section = section.name(), error = %e, "section analysis failed");
                (
                    SectionAnalysis::failed(
                        section.name(),
                        attempts_of(&e),
                        start.elapsed().as_millis() as u64,
                    ),
                    Some(e.to_string()),
                )
            }
        }
    }

    async fn summarize_page_group(&self, group: &PageGroup) -> (PageSummary, Option<String>) {
        let label = if group.first_page == group.last_page {
            format!("page {}", group.first_page + 1)
        } else {
            format!("pages {}-{}", group.first_page + 1, group.last_page + 1)
        };
        let request = AnalysisRequest::new(
            ExpertRole::SynthesisExpert,
            label,
            PromptTemplate::build_page_summary_prompt(group),
        );

        match self.client.execute(&request).await {
            Ok(outcome) => (
                PageSummary::success(
                    group.first_page,
                    group.last_page,
                    outcome.output,
                    outcome.attempts,
                ),
                None,
            ),
            Err(e) => {
                warn!(
                    first_page = group.first_page,
                    last_page = group.last_page,
                    error = %e,
                    "page summary failed"
                );
                (
                    PageSummary::failed(group.first_page, group.last_page, attempts_of(&e)),
                    Some(e.to_string()),
                )
            }
        }
    }
}

fn attempts_of(error: &RonbunError) -> u32 {
    match error {
        RonbunError::ExhaustedRetries { attempts, .. } => *attempts,
        _ => 1,
    }
}
