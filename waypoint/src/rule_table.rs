//! Rule table
//!
//! Static rules keyed by the question whose answer triggers them. Every
//! question is either a branch (exact-match rules partitioning its options)
//! or a leaf (one wildcard rule). The [`Validator`](crate::Validator) enforces
//! that split before a table can be built, so at most one rule matches any
//! answer.

use crate::facts::{Answer, Fact, Question, Recommendation};
use crate::semantic::{Action, Pattern, Template, TreeDoc};
use crate::{WaypointError, WaypointResult};
use std::collections::HashMap;

/// What a rule declares when it fires
#[derive(Debug, Clone, PartialEq)]
pub enum Production {
    /// Declare the named question
    Ask(String),
    /// Declare a recommendation, filling placeholders from the captured answer
    Recommend {
        track: Template,
        description: Template,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Fires only when the answer equals `literal`
    ExactMatch {
        name: String,
        literal: String,
        production: Production,
    },
    /// Fires for any answer, binding it to `binding`
    WildcardCapture {
        name: String,
        binding: String,
        production: Production,
    },
}

impl Rule {
    pub fn name(&self) -> &str {
        match self {
            Rule::ExactMatch { name, .. } | Rule::WildcardCapture { name, .. } => name,
        }
    }

    pub fn production(&self) -> &Production {
        match self {
            Rule::ExactMatch { production, .. } | Rule::WildcardCapture { production, .. } => {
                production
            }
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Rule::WildcardCapture { .. })
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Rule::ExactMatch { literal, .. } => literal == value,
            Rule::WildcardCapture { .. } => true,
        }
    }

    /// Build the fact this rule declares for an answer `value`
    pub fn produce(&self, value: &str, table: &RuleTable) -> WaypointResult<Fact> {
        let binding = match self {
            Rule::WildcardCapture { binding, .. } => Some((binding.as_str(), value)),
            Rule::ExactMatch { .. } => None,
        };

        match self.production() {
            Production::Ask(question_id) => {
                let question = table.question(question_id).ok_or_else(|| {
                    WaypointError::InconsistentState(format!(
                        "Rule '{}' asks unknown question '{}'",
                        self.name(),
                        question_id
                    ))
                })?;
                Ok(Fact::Question(question.clone()))
            }
            Production::Recommend { track, description } => {
                Ok(Fact::Recommendation(Recommendation {
                    track: track.render(binding),
                    description: description.render(binding),
                }))
            }
        }
    }
}

/// Validated, immutable set of questions and rules for one decision tree
#[derive(Debug, Clone)]
pub struct RuleTable {
    name: String,
    root: String,
    question_order: Vec<String>,
    questions: HashMap<String, Question>,
    rules: HashMap<String, Vec<Rule>>,
}

impl RuleTable {
    /// Assemble a table from a tree that already passed validation
    pub(crate) fn from_validated(doc: TreeDoc) -> WaypointResult<Self> {
        let root = doc
            .roots
            .first()
            .map(|r| r.question.clone())
            .ok_or_else(|| WaypointError::Engine(format!("Tree '{}' has no root", doc.name)))?;

        Ok(Self::assemble(doc, root))
    }

    /// Assemble without checking any authoring rule. Only for exercising
    /// the defensive paths of sessions built on broken tables.
    #[cfg(test)]
    pub(crate) fn assemble_unchecked(doc: TreeDoc, root: &str) -> Self {
        Self::assemble(doc, root.to_string())
    }

    fn assemble(doc: TreeDoc, root: String) -> Self {
        let mut question_order = Vec::new();
        let mut questions = HashMap::new();
        for decl in doc.questions {
            question_order.push(decl.id.clone());
            questions.insert(
                decl.id.clone(),
                Question {
                    id: decl.id,
                    prompt: decl.prompt,
                    options: decl.options,
                },
            );
        }

        let mut rules: HashMap<String, Vec<Rule>> = HashMap::new();
        for decl in doc.rules {
            let production = match decl.action {
                Action::Ask(question_id) => Production::Ask(question_id),
                Action::Recommend { track, description } => {
                    Production::Recommend { track, description }
                }
            };
            let rule = match decl.trigger.pattern {
                Pattern::Literal(literal) => Rule::ExactMatch {
                    name: decl.name,
                    literal,
                    production,
                },
                Pattern::Any(binding) => Rule::WildcardCapture {
                    name: decl.name,
                    binding,
                    production,
                },
            };
            rules.entry(decl.trigger.question).or_default().push(rule);
        }

        Self {
            name: doc.name,
            root,
            question_order,
            questions,
            rules,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root_id(&self) -> &str {
        &self.root
    }

    /// The entry question. Present in every table built from a validated tree.
    pub fn root(&self) -> Option<&Question> {
        self.questions.get(&self.root)
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.get(id)
    }

    /// Questions in declaration order
    pub fn questions(&self) -> impl Iterator<Item = &Question> + '_ {
        self.question_order
            .iter()
            .filter_map(move |id| self.questions.get(id))
    }

    pub fn rules_for(&self, question_id: &str) -> &[Rule] {
        self.rules
            .get(question_id)
            .map(|rules| rules.as_slice())
            .unwrap_or(&[])
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.values().map(|r| r.len()).sum()
    }

    /// True when the question's answers lead straight to a recommendation
    pub fn is_leaf(&self, question_id: &str) -> bool {
        self.rules_for(question_id).iter().any(|r| r.is_wildcard())
    }

    /// Rules whose trigger matches `answer`: exact-match rules with an equal
    /// literal, and any wildcard rule on the same question. The yielded rules
    /// borrow from the table only.
    pub fn matching<'a, 'b>(
        &'a self,
        answer: &'b Answer,
    ) -> impl Iterator<Item = &'a Rule> + 'b
    where
        'a: 'b,
    {
        self.rules_for(&answer.question_id)
            .iter()
            .filter(move |rule| rule.matches(&answer.value))
    }
}
