use crate::error::WaypointError;
use crate::parser::Rule;
use pest::iterators::Pair;

/// Text of a `string_literal` pair with quotes removed and escapes resolved
pub(crate) fn parse_string_literal(pair: Pair<Rule>) -> Result<String, WaypointError> {
    let content = pair
        .into_inner()
        .find(|p| p.as_rule() == Rule::string_content)
        .map(|p| p.as_str())
        .unwrap_or("");
    unescape(content)
}

/// Resolve `\"`, `\\`, `\n` and `\t`, the only escapes the grammar admits
pub(crate) fn unescape(raw: &str) -> Result<String, WaypointError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            other => {
                return Err(WaypointError::Engine(format!(
                    "Grammar error: unsupported escape '\\{}' in string literal",
                    other.map(String::from).unwrap_or_default()
                )))
            }
        }
    }
    Ok(out)
}

/// Inner string of the first child with the given rule
pub(crate) fn child_str<'a>(pair: &Pair<'a, Rule>, rule: Rule) -> Option<&'a str> {
    pair.clone()
        .into_inner()
        .find(|p| p.as_rule() == rule)
        .map(|p| p.as_str())
}
