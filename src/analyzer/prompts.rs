use crate::models::ExpertRole;
use crate::parser::PageGroup;

pub struct PromptTemplate;

impl PromptTemplate {
    /// Fixed system message per expert role. The mapping is closed; roles do
    /// not carry any per-run state.
    pub fn system_message(role: &ExpertRole) -> &'static str {
        match role {
            ExpertRole::IntroductionExpert => {
                "You are an expert in analyzing research paper introductions. \
                 Focus on the problem statement, research questions, and \
                 significance of the study."
            }
            ExpertRole::MethodologyExpert => {
                "You are an expert in research methodologies. Analyze the \
                 methods, experimental design, and data collection techniques \
                 used in the paper."
            }
            ExpertRole::ResultsExpert => {
                "You are an expert in interpreting research results. Analyze \
                 the findings, statistical analyses, and data visualizations \
                 presented in the paper."
            }
            ExpertRole::DiscussionExpert => {
                "You are an expert in research paper discussions. Analyze the \
                 interpretation of results, implications, limitations, and \
                 future research directions."
            }
            ExpertRole::SynthesisExpert => {
                "You are an expert in synthesizing information from all parts \
                 of a research paper. Provide a cohesive analysis that \
                 highlights the key aspects and contributions of the study."
            }
            ExpertRole::GenericAnalyst => {
                "You are an expert research analyst. Analyze the given part of \
                 a research paper and highlight its key points, strengths, and \
                 weaknesses."
            }
        }
    }

    pub fn build_section_prompt(section_name: &str, content: &str) -> String {
        format!("Analyze the {} section:\n\n{}", section_name, content)
    }

    /// Inputs arrive as (section name, analysis output) pairs in original
    /// section order; each entry is prefixed by its section name.
    pub fn build_synthesis_prompt(inputs: &[(String, String)]) -> String {
        let mut prompt =
            String::from("Synthesize the following analyses into a comprehensive review:\n\n");
        for (section_name, analysis) in inputs {
            prompt.push_str(&format!("{}:\n{}\n\n", section_name, analysis));
        }
        prompt
    }

    pub fn build_page_summary_prompt(group: &PageGroup) -> String {
        if group.first_page == group.last_page {
            format!(
                "Summarize this page content in one sentence:\n\n{}",
                group.text
            )
        } else {
            format!(
                "Summarize the content of pages {}-{} in one sentence:\n\n{}",
                group.first_page + 1,
                group.last_page + 1,
                group.text
            )
        }
    }
}
