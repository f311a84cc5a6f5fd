//! Trees compiled into the library

use crate::{parser, ResourceLimits, RuleTable, Validator, WaypointError, WaypointResult};
use std::sync::Arc;

/// Source of the `career_advisor` tree
pub const CAREER_ADVISOR_SOURCE: &str = include_str!("../trees/career.tree");

/// Source id reported in errors for the built-in tree
pub const CAREER_ADVISOR_SOURCE_ID: &str = "<builtin>/career.tree";

pub const CAREER_ADVISOR: &str = "career_advisor";

/// Parse and validate the built-in tech career tree
pub fn career_advisor() -> WaypointResult<RuleTable> {
    let limits = ResourceLimits::default();
    let mut trees = parser::parse(
        CAREER_ADVISOR_SOURCE,
        Some(CAREER_ADVISOR_SOURCE_ID.to_string()),
        &limits,
    )?;

    if trees.len() != 1 {
        return Err(WaypointError::Engine(format!(
            "Expected one built-in tree, found {}",
            trees.len()
        )));
    }

    Validator::new().validate(trees.remove(0), Arc::from(CAREER_ADVISOR_SOURCE), &limits)
}
