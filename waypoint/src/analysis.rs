//! Static walks over a rule table
//!
//! Answers questions about a tree without running a session: which answer
//! sequences exist, which of them lead to a given track, how deep the tree
//! goes. Wildcard leaves are expanded over their question's options.

use crate::facts::{Fact, Recommendation};
use crate::rule_table::{Production, RuleTable};
use serde::Serialize;
use std::collections::{HashSet, VecDeque};

/// One answered question on a path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathStep {
    pub question_id: String,
    pub answer: String,
}

/// A complete answer sequence from the root and the recommendation it reaches
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreePath {
    pub steps: Vec<PathStep>,
    pub recommendation: Recommendation,
}

impl TreePath {
    /// Number of answers on the path
    pub fn depth(&self) -> usize {
        self.steps.len()
    }
}

/// Every root-to-recommendation path, in option order
pub fn paths(table: &RuleTable) -> Vec<TreePath> {
    let mut found = Vec::new();
    let mut steps = Vec::new();
    walk(table, table.root_id(), &mut steps, &mut found);
    found
}

/// Paths whose recommended track contains `fragment` (case-insensitive)
pub fn paths_to(table: &RuleTable, fragment: &str) -> Vec<TreePath> {
    let needle = fragment.to_lowercase();
    paths(table)
        .into_iter()
        .filter(|p| p.recommendation.track.to_lowercase().contains(&needle))
        .collect()
}

fn walk(table: &RuleTable, question_id: &str, steps: &mut Vec<PathStep>, found: &mut Vec<TreePath>) {
    let Some(question) = table.question(question_id) else {
        return;
    };
    // A question already on the path means the table has a cycle
    if steps.iter().any(|s| s.question_id == question_id) {
        return;
    }

    for option in &question.options {
        steps.push(PathStep {
            question_id: question_id.to_string(),
            answer: option.clone(),
        });

        for rule in table.rules_for(question_id).iter().filter(|r| r.matches(option)) {
            match rule.produce(option, table) {
                Ok(Fact::Question(next)) => walk(table, &next.id, steps, found),
                Ok(Fact::Recommendation(recommendation)) => found.push(TreePath {
                    steps: steps.clone(),
                    recommendation,
                }),
                Ok(Fact::Answer(_)) | Err(_) => {}
            }
        }

        steps.pop();
    }
}

/// Longest number of answers needed to reach a recommendation.
///
/// Walks breadth first with an explicit queue, so arbitrarily long chains
/// cannot exhaust the stack.
pub fn max_depth(table: &RuleTable) -> usize {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut deepest = 0;
    let mut queue: VecDeque<(&str, usize)> = VecDeque::from([(table.root_id(), 1)]);

    while let Some((id, depth)) = queue.pop_front() {
        if !seen.insert(id) {
            continue;
        }
        deepest = deepest.max(depth);
        for next in asked_after(table, id) {
            queue.push_back((next, depth + 1));
        }
    }

    deepest
}

fn asked_after<'a>(table: &'a RuleTable, question_id: &str) -> impl Iterator<Item = &'a str> + 'a {
    table
        .rules_for(question_id)
        .iter()
        .filter_map(|rule| match rule.production() {
            Production::Ask(next) => Some(next.as_str()),
            Production::Recommend { .. } => None,
        })
}

/// Question ids reachable from the root, breadth first
pub fn reachable_questions(table: &RuleTable) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut order = Vec::new();
    let mut queue: VecDeque<&str> = VecDeque::from([table.root_id()]);

    while let Some(id) = queue.pop_front() {
        if table.question(id).is_none() || !seen.insert(id) {
            continue;
        }
        order.push(id.to_string());
        queue.extend(asked_after(table, id));
    }

    order
}
