use crate::extract::Strategy;

const MARKER_SYSTEM_PROMPT: &str = "\
You are an expert full-stack web developer.

Your job: generate a complete multi-page website using TailwindCSS and Vanilla JS.

Rules:
- Return HTML for multiple pages.
- Each page must start with this exact line:
===PAGE: filename.html===
- After that line, include the full <html> code for that page.
- Pages to include: index.html, login.html, signup.html, about.html, tasks.html.
- Use TailwindCSS from CDN for a modern, beautiful UI.
- Link between pages with relative URLs (e.g. href=\"about.html\").
- Do NOT include markdown, explanations, or code fences.";

const ENVELOPE_SYSTEM_PROMPT: &str = "\
You are an expert full-stack web developer.

Your job: generate a complete multi-page website using TailwindCSS and Vanilla JS.

Rules:
- Respond with a single JSON object and nothing else.
- The object has one key, \"files\", holding an array of {\"path\": string, \"content\": string}.
- Paths are relative to the project root (e.g. \"index.html\", \"js/app.js\").
- Always include index.html, login.html, signup.html, about.html and tasks.html.
- Use TailwindCSS from CDN for a modern, beautiful UI.
- Link between pages with relative URLs.
- Do NOT wrap the JSON in markdown or add explanations.";

/// System prompt matching the way the response will be decoded.
pub fn system_prompt(strategy: Strategy) -> &'static str {
    match strategy {
        Strategy::Marker => MARKER_SYSTEM_PROMPT,
        Strategy::Envelope => ENVELOPE_SYSTEM_PROMPT,
    }
}

/// Build the user prompt for a project description.
pub fn build_user_prompt(description: &str) -> String {
    format!(
        "Build a project based on this description: \"{}\"\n\nInclude all pages as instructed above.",
        description.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_prompt_embeds_description() {
        let prompt = build_user_prompt("  a todo app \n");
        assert!(prompt.starts_with("Build a project based on this description: \"a todo app\""));
    }

    #[test]
    fn test_system_prompt_matches_strategy() {
        assert!(system_prompt(Strategy::Marker).contains("===PAGE: filename.html==="));
        assert!(system_prompt(Strategy::Envelope).contains("\"files\""));
    }
}
