use crate::ast::Span;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// A parsed decision tree: questions, rules and the entry question
#[derive(Debug, Clone, PartialEq)]
pub struct TreeDoc {
    pub name: String,
    pub source: Option<String>,
    pub roots: Vec<RootDecl>,
    pub questions: Vec<QuestionDecl>,
    pub rules: Vec<RuleDecl>,
    pub span: Option<Span>,
}

impl TreeDoc {
    pub fn new(name: String) -> Self {
        Self {
            name,
            source: None,
            roots: Vec::new(),
            questions: Vec::new(),
            rules: Vec::new(),
            span: None,
        }
    }

    pub fn with_source(mut self, source: String) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn add_root(mut self, root: RootDecl) -> Self {
        self.roots.push(root);
        self
    }

    pub fn add_question(mut self, question: QuestionDecl) -> Self {
        self.questions.push(question);
        self
    }

    pub fn add_rule(mut self, rule: RuleDecl) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn question(&self, id: &str) -> Option<&QuestionDecl> {
        self.questions.iter().find(|q| q.id == id)
    }
}

/// `root <question_id>`
#[derive(Debug, Clone, PartialEq)]
pub struct RootDecl {
    pub question: String,
    pub span: Option<Span>,
}

/// `question <id> "<prompt>" options "<a>", "<b>"`
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionDecl {
    pub id: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub span: Option<Span>,
}

/// `rule <name> when <trigger> then <action>`
#[derive(Debug, Clone, PartialEq)]
pub struct RuleDecl {
    pub name: String,
    pub trigger: Trigger,
    pub action: Action,
    pub span: Option<Span>,
}

/// The answer a rule waits for
#[derive(Debug, Clone, PartialEq)]
pub struct Trigger {
    pub question: String,
    pub pattern: Pattern,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// `is "<literal>"`
    Literal(String),
    /// `is any as <variable>`
    Any(String),
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Literal(value) => write!(f, "\"{}\"", value),
            Pattern::Any(variable) => write!(f, "any as {}", variable),
        }
    }
}

/// What a rule declares once it fires
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Ask(String),
    Recommend {
        track: Template,
        description: Template,
    },
}

impl Action {
    /// Variables referenced by the action's text templates
    pub fn variables(&self) -> Vec<&str> {
        match self {
            Action::Ask(_) => Vec::new(),
            Action::Recommend { track, description } => {
                let mut vars = track.variables();
                vars.extend(description.variables());
                vars
            }
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Ask(question) => write!(f, "ask {}", question),
            Action::Recommend { track, .. } => write!(f, "recommend \"{}\"", track),
        }
    }
}

/// Text with `{variable}` placeholders filled from a captured answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Var(String),
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern compiles")
    })
}

impl Template {
    /// Split raw text into literal and placeholder segments.
    /// Braces that do not enclose an identifier stay literal.
    pub fn parse(raw: &str) -> Self {
        let mut segments = Vec::new();
        let mut last = 0;

        for caps in placeholder_regex().captures_iter(raw) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if whole.start() > last {
                segments.push(Segment::Text(raw[last..whole.start()].to_string()));
            }
            segments.push(Segment::Var(name.as_str().to_string()));
            last = whole.end();
        }

        if last < raw.len() {
            segments.push(Segment::Text(raw[last..].to_string()));
        }

        Self { segments }
    }

    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment::Text(text.into())],
        }
    }

    pub fn variables(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Var(name) => Some(name.as_str()),
                Segment::Text(_) => None,
            })
            .collect()
    }

    /// Fill placeholders named `binding.0` with `binding.1`.
    /// Unbound placeholders are written back verbatim.
    pub fn render(&self, binding: Option<(&str, &str)>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Var(name) => match binding {
                    Some((var, value)) if var == name => out.push_str(value),
                    _ => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                },
            }
        }
        out
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(None))
    }
}
