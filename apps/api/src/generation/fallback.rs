//! Deterministic HTML used when generation is unavailable or unusable.

use handlebars::{Handlebars, RenderError as TemplateRenderError, TemplateError};
use serde::Serialize;

use crate::models::resume::GenerationRequest;

const TEMPLATE_NAME: &str = "fallback_resume";

/// `{{…}}` values are HTML-escaped by handlebars.
const FALLBACK_TEMPLATE: &str = r#"<!DOCTYPE html>
<html><head><meta charset="utf-8"><title>Resume</title></head><body>
<h1>{{name}}</h1>
<p>Email: {{email}}</p>
<h2>Work Experience</h2>
<ul>{{#each jobs}}<li>{{this}}</li>{{/each}}</ul>
</body></html>"#;

#[derive(Serialize)]
struct FallbackContext<'a> {
    name: &'a str,
    email: &'a str,
    jobs: Vec<String>,
}

/// Minimal resume: name heading, email line, and one list item per job in
/// request order. Compiled once at startup and shared across requests.
pub struct FallbackTemplate {
    handlebars: Handlebars<'static>,
}

impl FallbackTemplate {
    pub fn new() -> Result<Self, TemplateError> {
        let mut handlebars = Handlebars::new();
        handlebars.register_template_string(TEMPLATE_NAME, FALLBACK_TEMPLATE)?;
        Ok(Self { handlebars })
    }

    pub fn render(&self, request: &GenerationRequest) -> Result<String, TemplateRenderError> {
        let context = FallbackContext {
            name: &request.personal.name,
            email: &request.personal.email,
            jobs: request.jobs.iter().map(|job| job.summary_line()).collect(),
        };
        self.handlebars.render(TEMPLATE_NAME, &context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{JobEntry, PersonalInfo};

    fn request(jobs: Vec<JobEntry>) -> GenerationRequest {
        GenerationRequest {
            personal: PersonalInfo {
                name: "Jane Doe".to_string(),
                email: "jane@x.com".to_string(),
            },
            jobs,
        }
    }

    fn job(employer: &str, title: &str, description: &str) -> JobEntry {
        JobEntry {
            employer: employer.to_string(),
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    fn render(req: &GenerationRequest) -> String {
        FallbackTemplate::new().unwrap().render(req).unwrap()
    }

    #[test]
    fn test_contains_heading_email_and_job_line() {
        let html = render(&request(vec![job("Acme", "Engineer", "Built things")]));
        assert!(html.contains("<h1>Jane Doe</h1>"));
        assert!(html.contains("<p>Email: jane@x.com</p>"));
        assert!(html.contains("<li>Engineer at Acme - Built things</li>"));
    }

    #[test]
    fn test_preserves_job_order() {
        let html = render(&request(vec![
            job("Acme", "Engineer", "first"),
            job("Initech", "Lead", "second"),
        ]));
        let first = html.find("Engineer at Acme").unwrap();
        let second = html.find("Lead at Initech").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_is_deterministic() {
        let template = FallbackTemplate::new().unwrap();
        let req = request(vec![job("Acme", "Engineer", "Built things")]);
        assert_eq!(template.render(&req).unwrap(), template.render(&req).unwrap());
    }

    #[test]
    fn test_escapes_markup_in_values() {
        let mut req = request(vec![job("A&B <Corp>", "Dev", "said \"hi\"")]);
        req.personal.name = "<script>alert(1)</script>".to_string();
        let html = render(&req);

        assert!(html.contains("Dev at A&amp;B &lt;Corp&gt; - said &quot;hi&quot;"));
        assert!(html.contains("<h1>&lt;script&gt;alert(1)&lt;/script&gt;</h1>"));
        assert!(!html.contains("<Corp>"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_no_jobs_still_renders_valid_document() {
        let html = render(&request(vec![]));
        assert!(html.contains("<ul></ul>"));
        assert!(html.ends_with("</html>"));
    }
}
