//! Session controller
//!
//! Drives one walk through a decision tree: takes an answer, records it,
//! runs inference, then works out the one fact to show next. A session owns
//! its fact store outright; sessions never share facts.

use crate::facts::{Answer, Fact, FactStore};
use crate::inference::InferenceLoop;
use crate::response::{DisplayFact, Firing, Step, Transcript};
use crate::rule_table::RuleTable;
use crate::{ResourceLimits, WaypointError, WaypointResult};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// A question is live and no recommendation exists yet
    AwaitingAnswer,
    /// A recommendation has been declared
    Complete,
}

pub struct Session {
    table: Arc<RuleTable>,
    store: FactStore,
    inference: InferenceLoop,
    firings: Vec<Firing>,
    live: DisplayFact,
    limits: ResourceLimits,
}

impl Session {
    /// Start a session at the table's root question
    pub fn new(table: Arc<RuleTable>) -> WaypointResult<Self> {
        Self::with_limits(table, ResourceLimits::default())
    }

    pub fn with_limits(table: Arc<RuleTable>, limits: ResourceLimits) -> WaypointResult<Self> {
        let root = table.root().cloned().ok_or_else(|| {
            WaypointError::InconsistentState(format!(
                "Root question '{}' is not declared in tree '{}'",
                table.root_id(),
                table.name()
            ))
        })?;

        let store = FactStore::with_initial_facts(vec![Fact::Question(root.clone())]);
        let mut session = Self {
            table,
            store,
            inference: InferenceLoop::new(),
            firings: Vec::new(),
            live: DisplayFact::from(&root),
            limits,
        };
        session.settle()?;
        Ok(session)
    }

    /// Discard all facts and go back to the root question
    pub fn start(&mut self) -> WaypointResult<DisplayFact> {
        debug!(tree = %self.table.name(), "session started");
        self.store.reset();
        self.firings.clear();
        self.settle()
    }

    /// Same as [`Session::start`]; callable whether or not the session is complete
    pub fn reset(&mut self) -> WaypointResult<DisplayFact> {
        debug!(
            tree = %self.table.name(),
            answered = self.store.answers().count(),
            "session reset"
        );
        self.start()
    }

    /// Record an answer for the live question and advance.
    ///
    /// Fails with [`WaypointError::InvalidAnswer`] without touching any state when
    /// `question_id` is not the live question or `value` is not one of its options.
    /// An [`WaypointError::InconsistentState`] failure leaves the session as it was
    /// before the call.
    pub fn answer(&mut self, question_id: &str, value: &str) -> WaypointResult<DisplayFact> {
        if let Err(e) = self.check_answer(question_id, value) {
            warn!(error = %e, "answer rejected");
            return Err(e);
        }

        // Restored if the new facts do not settle on a single live fact
        let facts = self.store.len();
        let inference = self.inference.clone();
        let fired = self.firings.len();

        self.store.insert(Fact::Answer(Answer {
            question_id: question_id.to_string(),
            value: value.to_string(),
        }));
        debug!(question = %question_id, answer = %value, "answer accepted");

        self.settle().inspect_err(|e| {
            warn!(error = %e, "answer rolled back");
            self.store.rollback(facts);
            self.inference = inference;
            self.firings.truncate(fired);
        })
    }

    fn check_answer(&self, question_id: &str, value: &str) -> WaypointResult<()> {
        if value.len() > self.limits.max_answer_bytes {
            return Err(WaypointError::invalid_answer(
                question_id,
                value.chars().take(32).collect::<String>(),
                format!(
                    "answer is {} bytes, the limit is {}",
                    value.len(),
                    self.limits.max_answer_bytes
                ),
            ));
        }

        match &self.live {
            DisplayFact::Recommendation { .. } => Err(WaypointError::invalid_answer(
                question_id,
                value,
                "the session is complete; reset to start over",
            )),
            DisplayFact::Question { id, options, .. } => {
                if id != question_id {
                    return Err(WaypointError::invalid_answer(
                        question_id,
                        value,
                        format!("the live question is '{}'", id),
                    ));
                }
                if !options.iter().any(|o| o == value) {
                    return Err(WaypointError::invalid_answer(
                        question_id,
                        value,
                        format!("expected one of: {}", options.join(", ")),
                    ));
                }
                Ok(())
            }
        }
    }

    /// Run inference to a fixed point and recompute the live fact
    fn settle(&mut self) -> WaypointResult<DisplayFact> {
        let fired = self.inference.run(&mut self.store, &self.table)?;
        self.firings.extend(fired);
        self.live = self.derive_live()?;
        Ok(self.live.clone())
    }

    /// A recommendation if one exists, otherwise the unique unanswered question
    fn derive_live(&self) -> WaypointResult<DisplayFact> {
        let recommendations: Vec<_> = self.store.recommendations().collect();
        match recommendations.as_slice() {
            [recommendation] => return Ok(DisplayFact::from(*recommendation)),
            [] => {}
            many => {
                return Err(WaypointError::InconsistentState(format!(
                    "{} recommendations declared in tree '{}'",
                    many.len(),
                    self.table.name()
                )))
            }
        }

        let pending: Vec<_> = self
            .store
            .questions()
            .filter(|q| self.store.answer_for(&q.id).is_none())
            .collect();
        match pending.as_slice() {
            [question] => Ok(DisplayFact::from(*question)),
            [] => Err(WaypointError::InconsistentState(format!(
                "no unanswered question and no recommendation in tree '{}'",
                self.table.name()
            ))),
            many => Err(WaypointError::InconsistentState(format!(
                "{} unanswered questions in tree '{}': {}",
                many.len(),
                self.table.name(),
                many.iter()
                    .map(|q| q.id.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }

    /// Re-run inference and re-derive the live fact. With no new answers this
    /// changes nothing and returns the same fact as [`Session::current`].
    pub fn refresh(&mut self) -> WaypointResult<DisplayFact> {
        self.settle()
    }

    /// The fact currently on display
    pub fn current(&self) -> &DisplayFact {
        &self.live
    }

    pub fn state(&self) -> SessionState {
        if self.live.is_recommendation() {
            SessionState::Complete
        } else {
            SessionState::AwaitingAnswer
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state() == SessionState::Complete
    }

    pub fn tree(&self) -> &RuleTable {
        &self.table
    }

    pub fn facts(&self) -> &FactStore {
        &self.store
    }

    /// Rule firings since the last reset
    pub fn firings(&self) -> &[Firing] {
        &self.firings
    }

    pub fn transcript(&self) -> Transcript {
        let steps = self
            .store
            .answers()
            .map(|answer| Step {
                question_id: answer.question_id.clone(),
                prompt: self
                    .table
                    .question(&answer.question_id)
                    .map(|q| q.prompt.clone())
                    .unwrap_or_default(),
                answer: answer.value.clone(),
            })
            .collect();

        Transcript {
            tree: self.table.name().to_string(),
            steps,
            outcome: self.store.recommendations().next().cloned(),
        }
    }
}
