use serde::{Deserialize, Serialize};

/// Who the resume is for. Values are opaque strings: nothing here checks
/// that the email looks like an email.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// One position in the candidate's work history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobEntry {
    #[serde(default)]
    pub employer: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl JobEntry {
    /// `"<title> at <employer> - <description>"`, the line used by both the
    /// prompt and the fallback template.
    pub fn summary_line(&self) -> String {
        format!("{} at {} - {}", self.title, self.employer, self.description)
    }
}

/// A validated generation request. Jobs keep the order the caller sent them in.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub personal: PersonalInfo,
    pub jobs: Vec<JobEntry>,
}

/// Raw body of `POST /api/generate`. Both fields are optional on the wire so
/// that a missing field is reported as a 400 by the handler instead of an
/// extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateResumeBody {
    pub personal: Option<PersonalInfo>,
    pub jobs: Option<Vec<JobEntry>>,
}

impl GenerateResumeBody {
    /// Returns `None` if either `personal` or `jobs` is absent.
    pub fn into_request(self) -> Option<GenerationRequest> {
        Some(GenerationRequest {
            personal: self.personal?,
            jobs: self.jobs?,
        })
    }
}
