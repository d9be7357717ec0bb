// Prompt construction for resume generation.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::HTML_ONLY_INSTRUCTION;
use crate::models::resume::GenerationRequest;

/// Opening instruction of the resume prompt.
pub const RESUME_PROMPT_PREAMBLE: &str = "Generate a professional resume in clean HTML format.";

/// Builds the generation prompt. Jobs appear one per line, in request order.
pub fn build_resume_prompt(request: &GenerationRequest) -> String {
    let experience = request
        .jobs
        .iter()
        .map(|job| job.summary_line())
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{RESUME_PROMPT_PREAMBLE}\n\
         Personal Info: {}, {}\n\
         Work Experience:\n\
         {experience}\n\n\
         {HTML_ONLY_INSTRUCTION}",
        request.personal.name, request.personal.email,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{JobEntry, PersonalInfo};

    fn request() -> GenerationRequest {
        GenerationRequest {
            personal: PersonalInfo {
                name: "Jane Doe".to_string(),
                email: "jane@x.com".to_string(),
            },
            jobs: vec![
                JobEntry {
                    employer: "Acme".to_string(),
                    title: "Engineer".to_string(),
                    description: "Built things".to_string(),
                },
                JobEntry {
                    employer: "Initech".to_string(),
                    title: "Lead".to_string(),
                    description: "Ran things".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_prompt_contains_personal_info() {
        let prompt = build_resume_prompt(&request());
        assert!(prompt.contains("Personal Info: Jane Doe, jane@x.com"));
    }

    #[test]
    fn test_prompt_lists_jobs_in_order_one_per_line() {
        let prompt = build_resume_prompt(&request());
        assert!(prompt.contains("Engineer at Acme - Built things\nLead at Initech - Ran things"));
    }

    #[test]
    fn test_prompt_keeps_braces_in_user_text_verbatim() {
        let mut req = request();
        req.personal.name = "{email}".to_string();
        let prompt = build_resume_prompt(&req);
        assert!(prompt.contains("Personal Info: {email}, jane@x.com"));
        assert!(prompt.starts_with(RESUME_PROMPT_PREAMBLE));
    }
}
