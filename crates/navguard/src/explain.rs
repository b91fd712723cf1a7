//! The `explain` use case: look up decision code documentation.

use navguard_types::explain::{self, Explanation};
use navguard_types::ids;

/// Output from the explain use case.
#[derive(Clone, Debug)]
pub enum ExplainOutput {
    /// Found an explanation for the code.
    Found(Explanation),
    /// Unknown code; includes every known code.
    NotFound {
        code: String,
        available_codes: &'static [&'static str],
    },
}

/// Look up an explanation for a decision code such as `https.strict_blocked`.
pub fn run_explain(code: &str) -> ExplainOutput {
    match explain::lookup_explanation(code) {
        Some(exp) => ExplainOutput::Found(exp),
        None => ExplainOutput::NotFound {
            code: code.to_string(),
            available_codes: ids::all_codes(),
        },
    }
}

/// Format an explanation for terminal display.
pub fn format_explanation(exp: &Explanation) -> String {
    let mut out = String::new();

    out.push_str(exp.title);
    out.push('\n');
    out.push_str(&"=".repeat(exp.title.len()));
    out.push_str("\n\n");
    out.push_str(exp.description);
    out.push_str("\n\n");
    out.push_str("Remediation\n");
    out.push_str("-----------\n");
    out.push_str(exp.remediation);
    out.push('\n');

    out
}

/// Format the "not found" message for terminal display.
pub fn format_not_found(code: &str, codes: &[&'static str]) -> String {
    let mut out = format!("Unknown decision code: {code}\n\nAvailable codes:\n");
    for known in codes {
        out.push_str(&format!("  - {known}\n"));
    }
    out
}
