use crate::ast::LineIndex;
use crate::error::WaypointError;
use crate::parser::literals::{child_str, parse_string_literal};
use crate::parser::Rule;
use crate::semantic::*;
use pest::iterators::Pair;

pub(crate) fn parse_rule_definition(
    pair: Pair<Rule>,
    lines: &LineIndex,
) -> Result<RuleDecl, WaypointError> {
    let span = lines.span(pair.as_span());
    let mut rule_name = None;
    let mut trigger = None;
    let mut action = None;

    for inner_pair in pair.into_inner() {
        match inner_pair.as_rule() {
            Rule::rule_name => rule_name = Some(inner_pair.as_str().to_string()),
            Rule::trigger => trigger = Some(parse_trigger(inner_pair)?),
            Rule::ask_action => {
                let question = child_str(&inner_pair, Rule::question_ref).ok_or_else(|| {
                    WaypointError::Engine("Grammar error: ask missing question".to_string())
                })?;
                action = Some(Action::Ask(question.to_string()));
            }
            Rule::recommend_action => action = Some(parse_recommend_action(inner_pair)?),
            _ => {}
        }
    }

    let name = rule_name.ok_or_else(|| {
        WaypointError::Engine("Grammar error: rule_definition missing rule_name".to_string())
    })?;
    let trigger = trigger.ok_or_else(|| {
        WaypointError::Engine("Grammar error: rule_definition missing trigger".to_string())
    })?;
    let action = action.ok_or_else(|| {
        WaypointError::Engine("Grammar error: rule_definition missing action".to_string())
    })?;

    Ok(RuleDecl {
        name,
        trigger,
        action,
        span: Some(span),
    })
}

fn parse_trigger(pair: Pair<Rule>) -> Result<Trigger, WaypointError> {
    let mut question = None;
    let mut pattern = None;

    for inner_pair in pair.into_inner() {
        match inner_pair.as_rule() {
            Rule::question_ref => question = Some(inner_pair.as_str().to_string()),
            Rule::string_literal => {
                pattern = Some(Pattern::Literal(parse_string_literal(inner_pair)?));
            }
            Rule::capture_pattern => {
                let variable = child_str(&inner_pair, Rule::variable).ok_or_else(|| {
                    WaypointError::Engine("Grammar error: capture missing variable".to_string())
                })?;
                pattern = Some(Pattern::Any(variable.to_string()));
            }
            _ => {}
        }
    }

    let question = question.ok_or_else(|| {
        WaypointError::Engine("Grammar error: trigger missing question".to_string())
    })?;
    let pattern = pattern.ok_or_else(|| {
        WaypointError::Engine("Grammar error: trigger missing pattern".to_string())
    })?;

    Ok(Trigger { question, pattern })
}

fn parse_recommend_action(pair: Pair<Rule>) -> Result<Action, WaypointError> {
    let mut track = None;
    let mut description = None;

    for inner_pair in pair.into_inner() {
        let rule = inner_pair.as_rule();
        if rule != Rule::track && rule != Rule::description {
            continue;
        }
        let literal = inner_pair.into_inner().next().ok_or_else(|| {
            WaypointError::Engine("Grammar error: recommend text missing string".to_string())
        })?;
        let template = Template::parse(&parse_string_literal(literal)?);
        if rule == Rule::track {
            track = Some(template);
        } else {
            description = Some(template);
        }
    }

    match (track, description) {
        (Some(track), Some(description)) => Ok(Action::Recommend { track, description }),
        _ => Err(WaypointError::Engine(
            "Grammar error: recommend_action needs a track and a description".to_string(),
        )),
    }
}
