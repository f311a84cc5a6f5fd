//! Fact store
//!
//! Append-only record of everything known in one session. Facts get a
//! monotonically increasing [`FactId`] on insertion and are never changed
//! afterwards. The only way to remove facts is [`FactStore::reset`], which
//! drops everything and re-declares the initial facts.

use serde::Serialize;
use std::fmt;
use tracing::trace;

/// Identity of a fact, unique for the lifetime of a store (also across resets)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FactId(pub u64);

impl fmt::Display for FactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f-{}", self.0)
    }
}

/// The user picked `value` for question `question_id`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Answer {
    pub question_id: String,
    pub value: String,
}

/// A pending decision point
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub options: Vec<String>,
}

/// Terminal outcome of a session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Recommendation {
    pub track: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Fact {
    Answer(Answer),
    Question(Question),
    Recommendation(Recommendation),
}

impl Fact {
    pub fn kind(&self) -> &'static str {
        match self {
            Fact::Answer(_) => "answer",
            Fact::Question(_) => "question",
            Fact::Recommendation(_) => "recommendation",
        }
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fact::Answer(a) => write!(f, "answer({} = \"{}\")", a.question_id, a.value),
            Fact::Question(q) => write!(f, "question({})", q.id),
            Fact::Recommendation(r) => write!(f, "recommendation(\"{}\")", r.track),
        }
    }
}

impl From<Answer> for Fact {
    fn from(answer: Answer) -> Self {
        Fact::Answer(answer)
    }
}

impl From<Question> for Fact {
    fn from(question: Question) -> Self {
        Fact::Question(question)
    }
}

impl From<Recommendation> for Fact {
    fn from(recommendation: Recommendation) -> Self {
        Fact::Recommendation(recommendation)
    }
}

/// Append-only, identity-keyed fact collection owned by a single session
#[derive(Debug, Clone)]
pub struct FactStore {
    facts: Vec<(FactId, Fact)>,
    initial: Vec<Fact>,
    next_id: u64,
}

impl FactStore {
    /// Create a store holding `initial` facts; they are declared again on every reset
    pub fn with_initial_facts(initial: Vec<Fact>) -> Self {
        let mut store = Self {
            facts: Vec::new(),
            initial,
            next_id: 0,
        };
        store.seed();
        store
    }

    fn seed(&mut self) {
        for fact in self.initial.clone() {
            self.insert(fact);
        }
    }

    /// Append a fact and return its new identity
    pub fn insert(&mut self, fact: Fact) -> FactId {
        let id = FactId(self.next_id);
        self.next_id += 1;
        trace!(fact_id = %id, fact = %fact, "fact inserted");
        self.facts.push((id, fact));
        id
    }

    /// Append a fact unless an identical one is already known.
    ///
    /// Derived facts go through here so that matching the same answer twice
    /// never duplicates what it produced.
    pub fn declare(&mut self, fact: Fact) -> Option<FactId> {
        if self.contains(&fact) {
            trace!(fact = %fact, "duplicate fact ignored");
            return None;
        }
        Some(self.insert(fact))
    }

    pub fn contains(&self, fact: &Fact) -> bool {
        self.facts.iter().any(|(_, f)| f == fact)
    }

    pub fn get(&self, id: FactId) -> Option<&Fact> {
        self.facts
            .binary_search_by_key(&id, |(fid, _)| *fid)
            .ok()
            .map(|index| &self.facts[index].1)
    }

    /// All facts in insertion order
    pub fn all(&self) -> impl Iterator<Item = (FactId, &Fact)> + '_ {
        self.facts.iter().map(|(id, fact)| (*id, fact))
    }

    /// Facts inserted after `after` (everything when `None`), in insertion order
    pub fn since(&self, after: Option<FactId>) -> impl Iterator<Item = (FactId, &Fact)> + '_ {
        self.all()
            .filter(move |(id, _)| after.map_or(true, |last| *id > last))
    }

    pub fn answers(&self) -> impl Iterator<Item = &Answer> + '_ {
        self.facts.iter().filter_map(|(_, f)| match f {
            Fact::Answer(a) => Some(a),
            _ => None,
        })
    }

    pub fn questions(&self) -> impl Iterator<Item = &Question> + '_ {
        self.facts.iter().filter_map(|(_, f)| match f {
            Fact::Question(q) => Some(q),
            _ => None,
        })
    }

    pub fn recommendations(&self) -> impl Iterator<Item = &Recommendation> + '_ {
        self.facts.iter().filter_map(|(_, f)| match f {
            Fact::Recommendation(r) => Some(r),
            _ => None,
        })
    }

    pub fn answer_for(&self, question_id: &str) -> Option<&Answer> {
        self.answers().find(|a| a.question_id == question_id)
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Discard facts appended after the first `len`, undoing a step that did
    /// not settle. Identities keep counting up.
    pub(crate) fn rollback(&mut self, len: usize) {
        trace!(discarded = self.facts.len().saturating_sub(len), "fact store rollback");
        self.facts.truncate(len);
    }

    /// Drop every fact and declare the initial facts again. Identities keep counting up.
    pub fn reset(&mut self) {
        trace!(discarded = self.facts.len(), "fact store reset");
        self.facts.clear();
        self.seed();
    }
}
