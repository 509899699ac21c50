// crates/mcp-env-validation/src/message.rs
// ============================================================================
// Module: Error Message Rendering
// Description: Deterministic operator message for configuration failures.
// Purpose: Tell the operator what is missing and how to fix it.
// Dependencies: crate::requirement
// ============================================================================

//! ## Overview
//! The message has a header, a section per missing kind, and a remediation
//! footer. The footer only names the first missing entry (required before
//! conditional); the sections above it list everything.

use crate::requirement::Requirement;

/// Placeholder value shown in the remediation footer.
const PLACEHOLDER_VALUE: &str = "your_token_here";

/// Renders the configuration failure message.
#[must_use]
pub fn render_error_message(
    service_name: &str,
    missing_required: &[Requirement],
    missing_conditional: &[Requirement],
) -> String {
    let mut lines = vec![format!("{service_name} MCP Server Configuration Error"), String::new()];

    if !missing_required.is_empty() {
        lines.push("Missing required environment variables:".to_string());
        for requirement in missing_required {
            lines.push(format!("  • {}: {}", requirement.name, requirement.description));
            if let Some(url) = &requirement.setup_url {
                lines.push(format!("    Setup: {url}"));
            }
            if !requirement.required_permissions.is_empty() {
                lines.push(format!(
                    "    Required permissions: {}",
                    requirement.required_permissions.join(", ")
                ));
            }
            lines.push(String::new());
        }
    }

    if !missing_conditional.is_empty() {
        lines.push("Missing conditional environment variables:".to_string());
        for requirement in missing_conditional {
            lines.push(format!("  • {}: {}", requirement.name, requirement.description));
            if let Some(dependency) = &requirement.depends_on {
                lines.push(format!("    Required when {dependency} is set"));
            }
            lines.push(String::new());
        }
    }

    let first = missing_required
        .first()
        .or_else(|| missing_conditional.first())
        .map_or("", |requirement| requirement.name.as_str());
    lines.extend([
        "To fix this:".to_string(),
        "1. Set the environment variables in your shell:".to_string(),
        format!("   export {first}={PLACEHOLDER_VALUE}"),
        String::new(),
        "2. Or add to a .env file:".to_string(),
        format!("   {first}={PLACEHOLDER_VALUE}"),
        String::new(),
        format!("3. Restart the {service_name} MCP server"),
    ]);

    lines.join("\n")
}
