//! # Waypoint
//!
//! **Guided questionnaires on a forward-chaining rule engine**
//!
//! Waypoint walks a person through a branching questionnaire until it can
//! make a recommendation. Questions, answers and recommendations are facts;
//! rules turn each new answer into the next question or into a terminal
//! recommendation.
//!
//! ## Quick Start
//!
//! ```rust
//! use waypoint::{Engine, WaypointResult};
//!
//! fn main() -> WaypointResult<()> {
//!     let engine = Engine::with_builtin()?;
//!     let mut session = engine.session("career_advisor")?;
//!
//!     session.answer("field_interest", "Systems & Infrastructure")?;
//!     let next = session.answer("sys_focus", "Network Engineering")?;
//!
//!     assert_eq!(next.track(), Some("Network Engineer (Cisco/Juniper)"));
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Facts
//! Everything known in a session: the answers given, the questions asked
//! and, at the end, the recommendation. Facts are only ever appended.
//!
//! ### Rules
//! A rule waits for an answer to one question. Exact-match rules wait for a
//! specific option; wildcard rules take any option and can use it in the
//! text they produce.
//!
//! ### Trees
//! Rules and questions are written in `.tree` files. A tree is validated as
//! a whole before use, so that every answer leads to exactly one next step.

pub mod analysis;
pub mod ast;
pub mod builtin;
pub mod engine;
pub mod error;
pub mod facts;
pub mod inference;
pub mod parser;
pub mod resource_limits;
pub mod response;
pub mod rule_table;
pub mod semantic;
pub mod session;
pub mod validator;

pub use analysis::{PathStep, TreePath};
pub use ast::Span;
pub use engine::Engine;
pub use error::{ErrorDetails, WaypointError};
pub use facts::{Answer, Fact, FactId, FactStore, Question, Recommendation};
pub use inference::InferenceLoop;
pub use parser::{parse, parse_answers};
pub use resource_limits::ResourceLimits;
pub use response::{DisplayFact, Firing, Step, Transcript};
pub use rule_table::{Production, Rule, RuleTable};
pub use semantic::*;
pub use session::{Session, SessionState};
pub use validator::Validator;

/// Result type for Waypoint operations
pub type WaypointResult<T> = Result<T, WaypointError>;

#[cfg(test)]
mod tests;
