use crate::ast::{LineIndex, Span};
use crate::error::WaypointError;
use crate::facts::Answer;
use crate::resource_limits::ResourceLimits;
use crate::semantic::*;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use std::sync::Arc;

pub mod literals;
pub mod questions;
pub mod rules;

#[derive(Parser)]
#[grammar = "src/parser/waypoint.pest"]
pub struct WaypointParser;

pub fn parse(
    content: &str,
    filename: Option<String>,
    limits: &ResourceLimits,
) -> Result<Vec<TreeDoc>, WaypointError> {
    // Check file size limit
    if content.len() > limits.max_file_size_bytes {
        return Err(WaypointError::ResourceLimitExceeded {
            limit_name: "max_file_size_bytes".to_string(),
            limit_value: format!(
                "{} bytes ({} MB)",
                limits.max_file_size_bytes,
                limits.max_file_size_bytes / (1024 * 1024)
            ),
            actual_value: format!(
                "{} bytes ({:.2} MB)",
                content.len(),
                content.len() as f64 / (1024.0 * 1024.0)
            ),
            suggestion: "Reduce file size or split the questionnaire into several trees"
                .to_string(),
        });
    }

    let filename = filename.unwrap_or_else(|| "<input>".to_string());

    match WaypointParser::parse(Rule::waypoint_file, content) {
        Ok(pairs) => {
            let lines = LineIndex::new(content);
            let mut trees = Vec::new();
            for pair in pairs {
                if pair.as_rule() == Rule::waypoint_file {
                    for inner_pair in pair.into_inner() {
                        if inner_pair.as_rule() == Rule::tree {
                            trees.push(parse_tree(inner_pair, &filename, &lines)?);
                        }
                    }
                }
            }
            Ok(trees)
        }
        Err(e) => {
            let (start, end) = match e.location {
                pest::error::InputLocation::Pos(pos) => (pos, pos),
                pest::error::InputLocation::Span((start, end)) => (start, end),
            };
            let (line, col) = match e.line_col {
                pest::error::LineColLocation::Pos((line, col)) => (line, col),
                pest::error::LineColLocation::Span((line, col), (_, _)) => (line, col),
            };

            Err(WaypointError::parse(
                e.variant.message().to_string(),
                Span {
                    start,
                    end,
                    line,
                    col,
                },
                filename,
                Arc::from(content),
                "<parse-error>",
            ))
        }
    }
}

/// Parse `question_id=value` assignments as handed over by command line adapters.
/// The value may be bare text or a double quoted string.
pub fn parse_answers(assignments: &[&str]) -> Result<Vec<Answer>, WaypointError> {
    let mut answers = Vec::new();

    for assignment in assignments {
        let pairs = WaypointParser::parse(Rule::answer_assignment, assignment).map_err(|e| {
            WaypointError::Engine(format!("Failed to parse answer '{}': {}", assignment, e))
        })?;

        let mut question_id = None;
        let mut value = None;
        for pair in pairs.flatten() {
            match pair.as_rule() {
                Rule::question_ref if question_id.is_none() => {
                    question_id = Some(pair.as_str().to_string())
                }
                Rule::string_literal => value = Some(literals::parse_string_literal(pair)?),
                Rule::bare_value => value = Some(pair.as_str().trim_end().to_string()),
                _ => {}
            }
        }

        match (question_id, value) {
            (Some(question_id), Some(value)) => answers.push(Answer { question_id, value }),
            _ => {
                return Err(WaypointError::Engine(format!(
                    "Answer '{}' must look like question_id=value",
                    assignment
                )))
            }
        }
    }

    Ok(answers)
}

fn parse_tree(
    pair: Pair<Rule>,
    filename: &str,
    lines: &LineIndex,
) -> Result<TreeDoc, WaypointError> {
    let span = lines.span(pair.as_span());

    let mut tree_name: Option<String> = None;
    let mut roots = Vec::new();
    let mut questions = Vec::new();
    let mut rules = Vec::new();

    for inner_pair in pair.into_inner() {
        match inner_pair.as_rule() {
            Rule::tree_declaration => {
                for decl_inner in inner_pair.into_inner() {
                    if decl_inner.as_rule() == Rule::tree_name {
                        tree_name = Some(decl_inner.as_str().to_string());
                        break;
                    }
                }
            }
            Rule::root_declaration => roots.push(parse_root_declaration(inner_pair, lines)?),
            Rule::question_definition => {
                questions.push(crate::parser::questions::parse_question_definition(inner_pair, lines)?);
            }
            Rule::rule_definition => {
                rules.push(crate::parser::rules::parse_rule_definition(inner_pair, lines)?);
            }
            _ => {}
        }
    }

    let name = tree_name.ok_or_else(|| {
        WaypointError::Engine("Grammar error: tree missing tree_name".to_string())
    })?;
    let mut tree = TreeDoc::new(name)
        .with_source(filename.to_string())
        .with_span(span);

    for root in roots {
        tree = tree.add_root(root);
    }
    for question in questions {
        tree = tree.add_question(question);
    }
    for rule in rules {
        tree = tree.add_rule(rule);
    }

    Ok(tree)
}

fn parse_root_declaration(pair: Pair<Rule>, lines: &LineIndex) -> Result<RootDecl, WaypointError> {
    let span = lines.span(pair.as_span());
    let question = literals::child_str(&pair, Rule::question_ref).ok_or_else(|| {
        WaypointError::Engine("Grammar error: root_declaration missing question".to_string())
    })?;

    Ok(RootDecl {
        question: question.to_string(),
        span: Some(span),
    })
}
