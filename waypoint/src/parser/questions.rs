use crate::ast::LineIndex;
use crate::error::WaypointError;
use crate::parser::literals::parse_string_literal;
use crate::parser::Rule;
use crate::semantic::QuestionDecl;
use pest::iterators::Pair;

pub(crate) fn parse_question_definition(
    pair: Pair<Rule>,
    lines: &LineIndex,
) -> Result<QuestionDecl, WaypointError> {
    let span = lines.span(pair.as_span());
    let mut id = None;
    let mut prompt = None;
    let mut options = Vec::new();

    for inner_pair in pair.into_inner() {
        match inner_pair.as_rule() {
            Rule::question_id => id = Some(inner_pair.as_str().to_string()),
            Rule::prompt => {
                let literal = inner_pair.into_inner().next().ok_or_else(|| {
                    WaypointError::Engine("Grammar error: prompt missing string".to_string())
                })?;
                prompt = Some(parse_string_literal(literal)?);
            }
            Rule::option_list => {
                for option in inner_pair.into_inner() {
                    if option.as_rule() == Rule::string_literal {
                        options.push(parse_string_literal(option)?);
                    }
                }
            }
            _ => {}
        }
    }

    let id = id.ok_or_else(|| {
        WaypointError::Engine("Grammar error: question_definition missing question_id".to_string())
    })?;
    let prompt = prompt.ok_or_else(|| {
        WaypointError::Engine("Grammar error: question_definition missing prompt".to_string())
    })?;

    Ok(QuestionDecl {
        id,
        prompt,
        options,
        span: Some(span),
    })
}
