// CLI error rendering
// Pipeline errors are shown with their code and offending fragment

use colored::Colorize;

/// Format an error for the terminal
pub fn render_error(error: &anyhow::Error) -> String {
    match error.downcast_ref::<partiture::Error>() {
        Some(err) => {
            let report = err.report();
            let mut text = format!("{}: {}", format!("error[{}]", report.code).red().bold(), report.message);
            if let Some(fragment) = report.fragment {
                text.push_str(&format!("\n  {} {}", "-->".blue().bold(), fragment));
            }
            text
        }
        None => format!("{}: {:#}", "error".red().bold(), error),
    }
}

/// Machine-readable form of an error
pub fn error_json(error: &anyhow::Error) -> serde_json::Value {
    match error.downcast_ref::<partiture::Error>() {
        Some(err) => serde_json::to_value(err.report()).unwrap_or_default(),
        None => serde_json::json!({ "message": format!("{:#}", error) }),
    }
}
