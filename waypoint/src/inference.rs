//! Forward chaining to a fixed point
//!
//! Facts not yet matched sit on an agenda. Each answer on the agenda is run
//! through the rule table; whatever the firing rules declare is appended to
//! the agenda in turn. The pass ends when the agenda is empty. Derived facts
//! are questions or recommendations, never answers, so in practice a pass
//! fires at most one rule per new answer.

use crate::facts::{Fact, FactId, FactStore};
use crate::response::Firing;
use crate::rule_table::RuleTable;
use crate::WaypointResult;
use std::collections::VecDeque;
use tracing::debug;

/// Remembers how far into the fact store matching has progressed, so a
/// pass with nothing new to match is a no-op
#[derive(Debug, Clone, Default)]
pub struct InferenceLoop {
    last_matched: Option<FactId>,
}

impl InferenceLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_matched(&self) -> Option<FactId> {
        self.last_matched
    }

    /// Match every unmatched fact against `table` until nothing new is declared.
    /// Returns the rules that fired during this pass, in firing order.
    pub fn run(&mut self, store: &mut FactStore, table: &RuleTable) -> WaypointResult<Vec<Firing>> {
        let mut agenda: VecDeque<FactId> =
            store.since(self.last_matched).map(|(id, _)| id).collect();
        let mut firings = Vec::new();

        while let Some(fact_id) = agenda.pop_front() {
            // Agenda ids only ever increase
            self.last_matched = Some(fact_id);

            let answer = match store.get(fact_id) {
                Some(Fact::Answer(answer)) => answer.clone(),
                _ => continue,
            };

            let produced: Vec<(String, Fact)> = table
                .matching(&answer)
                .map(|rule| {
                    let fact = rule.produce(&answer.value, table)?;
                    Ok((rule.name().to_string(), fact))
                })
                .collect::<WaypointResult<_>>()?;

            for (rule, fact) in produced {
                let produced_id = store.declare(fact);
                debug!(
                    rule = %rule,
                    trigger = %fact_id,
                    produced = ?produced_id,
                    "rule fired"
                );
                if let Some(id) = produced_id {
                    agenda.push_back(id);
                }
                firings.push(Firing {
                    rule,
                    trigger: fact_id,
                    produced: produced_id,
                });
            }
        }

        Ok(firings)
    }
}
