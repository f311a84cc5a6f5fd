use crate::facts::{FactId, Question, Recommendation};
use serde::Serialize;
use std::fmt;

/// The single fact a presentation layer should show next
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayFact {
    Question {
        id: String,
        prompt: String,
        options: Vec<String>,
    },
    Recommendation {
        track: String,
        description: String,
    },
}

impl DisplayFact {
    pub fn is_question(&self) -> bool {
        matches!(self, DisplayFact::Question { .. })
    }

    pub fn is_recommendation(&self) -> bool {
        matches!(self, DisplayFact::Recommendation { .. })
    }

    /// Id of the live question, `None` once a recommendation is shown
    pub fn question_id(&self) -> Option<&str> {
        match self {
            DisplayFact::Question { id, .. } => Some(id),
            DisplayFact::Recommendation { .. } => None,
        }
    }

    pub fn options(&self) -> &[String] {
        match self {
            DisplayFact::Question { options, .. } => options,
            DisplayFact::Recommendation { .. } => &[],
        }
    }

    pub fn track(&self) -> Option<&str> {
        match self {
            DisplayFact::Recommendation { track, .. } => Some(track),
            DisplayFact::Question { .. } => None,
        }
    }
}

impl From<&Question> for DisplayFact {
    fn from(question: &Question) -> Self {
        DisplayFact::Question {
            id: question.id.clone(),
            prompt: question.prompt.clone(),
            options: question.options.clone(),
        }
    }
}

impl From<&Recommendation> for DisplayFact {
    fn from(recommendation: &Recommendation) -> Self {
        DisplayFact::Recommendation {
            track: recommendation.track.clone(),
            description: recommendation.description.clone(),
        }
    }
}

impl fmt::Display for DisplayFact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayFact::Question { prompt, options, .. } => {
                write!(f, "{} [{}]", prompt, options.join(" | "))
            }
            DisplayFact::Recommendation { track, description } => {
                write!(f, "{}: {}", track, description)
            }
        }
    }
}

/// A rule that fired during inference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Firing {
    pub rule: String,
    pub trigger: FactId,
    /// `None` when the produced fact was already known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub produced: Option<FactId>,
}

/// One answered question
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub question_id: String,
    pub prompt: String,
    pub answer: String,
}

/// Answers given so far and, once reached, the recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transcript {
    pub tree: String,
    pub steps: Vec<Step>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Recommendation>,
}

impl Transcript {
    pub fn is_complete(&self) -> bool {
        self.outcome.is_some()
    }
}
