// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting fragments.

/// Appended to prompts whose output is fed to the PDF renderer.
pub const HTML_ONLY_INSTRUCTION: &str = "\
    Respond with a single complete HTML document, starting with <html> and ending with </html>. \
    Inline all CSS in a <style> element; do NOT reference external stylesheets, scripts or fonts. \
    Do NOT wrap the document in markdown code fences. \
    Do NOT include explanations before or after the document.";
