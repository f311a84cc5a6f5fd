//! Authoring checks that run after parsing and before a [`RuleTable`] exists.
//!
//! The session controller relies on every answer producing exactly one
//! successor. These checks make that a property of the table itself rather
//! than something each session has to discover.

use crate::analysis;
use crate::rule_table::RuleTable;
use crate::semantic::{Pattern, QuestionDecl, RuleDecl, TreeDoc};
use crate::{ResourceLimits, Span, WaypointError, WaypointResult};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

/// Validates parsed trees and turns them into rule tables
#[derive(Default)]
pub struct Validator;

struct Report<'a> {
    doc: &'a TreeDoc,
    source_id: String,
    source_text: Arc<str>,
    errors: Vec<WaypointError>,
}

impl<'a> Report<'a> {
    fn new(doc: &'a TreeDoc, source_text: Arc<str>) -> Self {
        Self {
            doc,
            source_id: doc.source.clone().unwrap_or_else(|| "<input>".to_string()),
            source_text,
            errors: Vec::new(),
        }
    }

    fn error(&mut self, message: impl Into<String>, span: Option<&Span>) {
        self.errors.push(WaypointError::validation(
            message,
            span.cloned().unwrap_or_default(),
            self.source_id.clone(),
            self.source_text.clone(),
            self.doc.name.clone(),
        ));
    }

    fn error_with_suggestion(
        &mut self,
        message: impl Into<String>,
        span: Option<&Span>,
        suggestion: impl Into<String>,
    ) {
        self.errors.push(WaypointError::validation_with_suggestion(
            message,
            span.cloned().unwrap_or_default(),
            self.source_id.clone(),
            self.source_text.clone(),
            self.doc.name.clone(),
            suggestion,
        ));
    }

    fn finish(mut self) -> WaypointResult<()> {
        match self.errors.len() {
            0 => Ok(()),
            1 => Err(self.errors.remove(0)),
            _ => Err(WaypointError::MultipleErrors(self.errors)),
        }
    }
}

impl Validator {
    /// Create a new validator
    pub fn new() -> Self {
        Self
    }

    /// Validate one tree and build its rule table
    pub fn validate(
        &self,
        doc: TreeDoc,
        source_text: Arc<str>,
        limits: &ResourceLimits,
    ) -> WaypointResult<RuleTable> {
        // Phase 1: declarations on their own
        let mut report = Report::new(&doc, source_text.clone());
        self.validate_questions(&mut report);
        self.validate_root(&mut report);
        self.validate_rule_references(&mut report);
        report.finish()?;

        // Phase 2: how rules partition each question's answers
        let mut report = Report::new(&doc, source_text.clone());
        self.validate_rule_shapes(&mut report);
        report.finish()?;

        // Phase 3: the questions form a tree under the root
        let mut report = Report::new(&doc, source_text.clone());
        self.validate_tree_shape(&mut report);
        report.finish()?;

        let tree_name = doc.name.clone();
        let tree_span = doc.span.clone();
        let source_id = doc.source.clone().unwrap_or_else(|| "<input>".to_string());
        let table = RuleTable::from_validated(doc)?;

        // Phase 4: depth, now that walking the table is guaranteed to terminate
        let depth = analysis::max_depth(&table);
        if depth > limits.max_tree_depth {
            return Err(WaypointError::validation_with_suggestion(
                format!(
                    "Tree '{}' is {} answers deep; the limit is {}",
                    tree_name, depth, limits.max_tree_depth
                ),
                tree_span.unwrap_or_default(),
                source_id,
                source_text,
                tree_name,
                "Split the tree or raise ResourceLimits::max_tree_depth",
            ));
        }

        Ok(table)
    }

    /// Duplicate ids, empty or repeated options
    fn validate_questions(&self, report: &mut Report) {
        let doc = report.doc;
        let mut seen: HashSet<&str> = HashSet::new();
        for question in &doc.questions {
            if !seen.insert(question.id.as_str()) {
                report.error(
                    format!("Question '{}' is declared more than once", question.id),
                    question.span.as_ref(),
                );
            }

            if question.options.is_empty() {
                report.error(
                    format!("Question '{}' has no options", question.id),
                    question.span.as_ref(),
                );
            }

            let mut options: HashSet<&str> = HashSet::new();
            for option in &question.options {
                if !options.insert(option.as_str()) {
                    report.error(
                        format!(
                            "Question '{}' lists option \"{}\" more than once",
                            question.id, option
                        ),
                        question.span.as_ref(),
                    );
                }
            }
        }

        let mut rule_names: HashSet<&str> = HashSet::new();
        for rule in &doc.rules {
            if !rule_names.insert(rule.name.as_str()) {
                report.error(
                    format!("Rule '{}' is declared more than once", rule.name),
                    rule.span.as_ref(),
                );
            }
        }
    }

    fn validate_root(&self, report: &mut Report) {
        let doc = report.doc;
        match doc.roots.as_slice() {
            [] => report.error_with_suggestion(
                format!("Tree '{}' has no root question", doc.name),
                doc.span.as_ref(),
                "Add a line like: root <question_id>",
            ),
            [root] => {
                if doc.question(&root.question).is_none() {
                    report.error(
                        format!("Root question '{}' is not declared", root.question),
                        root.span.as_ref(),
                    );
                }
            }
            [_, extra @ ..] => {
                for root in extra {
                    report.error(
                        format!(
                            "Tree '{}' declares more than one root ('{}')",
                            doc.name, root.question
                        ),
                        root.span.as_ref(),
                    );
                }
            }
        }
    }

    /// Triggers and asks must name declared questions, literals must be options,
    /// placeholders must name the captured variable
    fn validate_rule_references(&self, report: &mut Report) {
        let doc = report.doc;
        let declared: HashMap<&str, &QuestionDecl> = doc
            .questions
            .iter()
            .map(|q| (q.id.as_str(), q))
            .collect();

        for rule in &doc.rules {
            match declared.get(rule.trigger.question.as_str()) {
                None => report.error(
                    format!(
                        "Rule '{}' triggers on undeclared question '{}'",
                        rule.name, rule.trigger.question
                    ),
                    rule.span.as_ref(),
                ),
                Some(question) => {
                    if let Pattern::Literal(literal) = &rule.trigger.pattern {
                        if !question.options.contains(literal) {
                            report.error_with_suggestion(
                                format!(
                                    "Rule '{}' waits for \"{}\", which is not an option of '{}'",
                                    rule.name, literal, question.id
                                ),
                                rule.span.as_ref(),
                                format!("Options are: {}", question.options.join(", ")),
                            );
                        }
                    }
                }
            }

            if let crate::semantic::Action::Ask(target) = &rule.action {
                if !declared.contains_key(target.as_str()) {
                    report.error(
                        format!("Rule '{}' asks undeclared question '{}'", rule.name, target),
                        rule.span.as_ref(),
                    );
                }
            }

            self.validate_placeholders(rule, report);
        }
    }

    fn validate_placeholders(&self, rule: &RuleDecl, report: &mut Report) {
        let bound = match &rule.trigger.pattern {
            Pattern::Any(variable) => Some(variable.as_str()),
            Pattern::Literal(_) => None,
        };
        for variable in rule.action.variables() {
            if Some(variable) != bound {
                let suggestion = match bound {
                    Some(b) => format!("Use {{{}}} or capture the answer as '{}'", b, variable),
                    None => format!(
                        "Only rules written 'when {} is any as {}' can use {{{}}}",
                        rule.trigger.question, variable, variable
                    ),
                };
                report.error_with_suggestion(
                    format!(
                        "Rule '{}' uses placeholder {{{}}} which it does not bind",
                        rule.name, variable
                    ),
                    rule.span.as_ref(),
                    suggestion,
                );
            }
        }
    }

    /// Per question: exact-match rules covering a disjoint partition of the
    /// options, or exactly one wildcard rule. Never both.
    fn validate_rule_shapes(&self, report: &mut Report) {
        let doc = report.doc;
        let mut by_question: HashMap<&str, Vec<&RuleDecl>> = HashMap::new();
        for rule in &doc.rules {
            by_question
                .entry(rule.trigger.question.as_str())
                .or_default()
                .push(rule);
        }

        for question in &doc.questions {
            let rules = by_question
                .get(question.id.as_str())
                .cloned()
                .unwrap_or_default();

            if rules.is_empty() {
                report.error_with_suggestion(
                    format!("No rule handles answers to question '{}'", question.id),
                    question.span.as_ref(),
                    format!(
                        "Add 'rule ... when {} is any as answer then recommend ...'",
                        question.id
                    ),
                );
                continue;
            }

            let wildcards: Vec<_> = rules
                .iter()
                .filter(|r| matches!(r.trigger.pattern, Pattern::Any(_)))
                .collect();

            if !wildcards.is_empty() {
                if rules.len() > 1 {
                    let names: Vec<&str> = rules.iter().map(|r| r.name.as_str()).collect();
                    report.error_with_suggestion(
                        format!(
                            "Question '{}' is handled by more than one rule alongside a wildcard: {}",
                            question.id,
                            names.join(", ")
                        ),
                        wildcards[0].span.as_ref(),
                        "A question is either a branch (one rule per option) or a leaf (one 'is any' rule)",
                    );
                }
                continue;
            }

            let mut covered: HashMap<&str, &str> = HashMap::new();
            for rule in &rules {
                if let Pattern::Literal(literal) = &rule.trigger.pattern {
                    if let Some(first) = covered.insert(literal.as_str(), rule.name.as_str()) {
                        report.error(
                            format!(
                                "Rules '{}' and '{}' both fire for {} = \"{}\"",
                                first, rule.name, question.id, literal
                            ),
                            rule.span.as_ref(),
                        );
                    }
                }
            }

            let uncovered: Vec<&str> = question
                .options
                .iter()
                .map(|o| o.as_str())
                .filter(|o| !covered.contains_key(o))
                .collect();
            if !uncovered.is_empty() {
                report.error_with_suggestion(
                    format!(
                        "Question '{}' has no rule for option(s): {}",
                        question.id,
                        uncovered.join(", ")
                    ),
                    question.span.as_ref(),
                    "Every option of a branch question needs its own rule",
                );
            }
        }
    }

    /// Every non-root question asked by exactly one rule, the root by none,
    /// and every question reachable from the root
    fn validate_tree_shape(&self, report: &mut Report) {
        let doc = report.doc;
        let Some(root) = doc.roots.first().map(|r| r.question.as_str()) else {
            return;
        };

        let mut askers: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
        for rule in &doc.rules {
            if let crate::semantic::Action::Ask(target) = &rule.action {
                askers
                    .entry(target.as_str())
                    .or_default()
                    .push(rule.name.as_str());
                children
                    .entry(rule.trigger.question.as_str())
                    .or_default()
                    .push(target.as_str());
            }
        }

        for question in &doc.questions {
            let asked_by = askers
                .get(question.id.as_str())
                .cloned()
                .unwrap_or_default();
            if question.id == root {
                if !asked_by.is_empty() {
                    report.error(
                        format!(
                            "Root question '{}' is asked again by rule(s): {}",
                            root,
                            asked_by.join(", ")
                        ),
                        question.span.as_ref(),
                    );
                }
            } else if asked_by.len() > 1 {
                report.error(
                    format!(
                        "Question '{}' is asked by more than one rule: {}",
                        question.id,
                        asked_by.join(", ")
                    ),
                    question.span.as_ref(),
                );
            }
        }

        let mut reachable: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::from([root]);
        while let Some(id) = queue.pop_front() {
            if !reachable.insert(id) {
                continue;
            }
            if let Some(next) = children.get(id) {
                queue.extend(next.iter().copied());
            }
        }

        for question in &doc.questions {
            if !reachable.contains(question.id.as_str()) {
                report.error(
                    format!(
                        "Question '{}' cannot be reached from root '{}'",
                        question.id, root
                    ),
                    question.span.as_ref(),
                );
            }
        }
    }
}
