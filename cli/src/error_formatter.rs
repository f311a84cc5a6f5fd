use ariadne::{Color, Label, Report, ReportKind, Source};
use waypoint::WaypointError;

/// Format a WaypointError with fancy terminal output using Ariadne
pub fn format_error(error: &WaypointError) -> String {
    match error {
        WaypointError::Parse(details) | WaypointError::Validation(details) => {
            let mut output = Vec::new();

            let error_type = match error {
                WaypointError::Parse(_) => "Parse error",
                _ => "Validation error",
            };

            let enhanced_message = format!(
                "{}: {} (in tree '{}', file {}:{})",
                error_type, details.message, details.tree_name, details.source_id, details.span.line
            );

            let mut report =
                Report::build(ReportKind::Error, &details.source_id, details.span.start)
                    .with_message(enhanced_message)
                    .with_label(
                        Label::new((&details.source_id, details.span.start..details.span.end))
                            .with_message("")
                            .with_color(Color::Red),
                    );

            if let Some(suggestion) = &details.suggestion {
                report = report.with_help(suggestion);
            }

            match report.finish().write(
                (
                    &details.source_id,
                    Source::from(details.source_text.as_ref()),
                ),
                &mut output,
            ) {
                Ok(_) => String::from_utf8_lossy(&output).to_string(),
                Err(_) => format!("{}", error),
            }
        }
        WaypointError::InvalidAnswer {
            question_id,
            value,
            reason,
        } => format!(
            "Invalid answer: '{}' for question '{}'\n  {}",
            value, question_id, reason
        ),
        WaypointError::InconsistentState(msg) => format!("Inconsistent state: {}", msg),
        WaypointError::Engine(msg) => format!("Engine error: {}", msg),
        WaypointError::ResourceLimitExceeded {
            limit_name,
            limit_value,
            actual_value,
            suggestion,
        } => {
            format!(
                "Resource limit exceeded: {}\n  Limit: {}\n  Actual: {}\n  {}",
                limit_name, limit_value, actual_value, suggestion
            )
        }
        WaypointError::MultipleErrors(errors) => {
            let mut result = String::from("Multiple errors occurred:\n\n");
            for error in errors {
                result.push_str(&format_error(error));
                result.push_str("\n\n");
            }
            result
        }
    }
}
