use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Row, Table};
use serde::Serialize;
use waypoint::{DisplayFact, Production, Rule, RuleTable, Session, Transcript, TreePath};

enum LineType {
    Step,
    LastStep,
    Outcome,
}

impl LineType {
    fn format_line(&self, base_prefix: &str, content: &str) -> String {
        let symbol = match self {
            LineType::Step => "├─",
            LineType::LastStep => "└─",
            LineType::Outcome => "└─>",
        };
        format!("{}{} {}\n", base_prefix, symbol, content)
    }
}

/// Session output for `run --json`
#[derive(Serialize)]
struct SessionJson<'a> {
    transcript: Transcript,
    display: &'a DisplayFact,
}

pub struct Formatter {}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self {}
    }

    /// Answers given so far, then the live fact
    pub fn format_session(&self, session: &Session) -> String {
        let mut output = String::new();
        let transcript = session.transcript();

        if !transcript.steps.is_empty() {
            output.push_str(&self.format_transcript_table(&transcript));
            output.push('\n');
        }

        output.push_str(&self.format_display(session.current()));
        output
    }

    pub fn format_session_json(&self, session: &Session) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&SessionJson {
            transcript: session.transcript(),
            display: session.current(),
        })
    }

    fn format_transcript_table(&self, transcript: &Transcript) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec![
            Cell::new("Question").set_alignment(CellAlignment::Left),
            Cell::new("Answer").set_alignment(CellAlignment::Left),
        ]));

        for step in &transcript.steps {
            table.add_row(Row::from(vec![&step.prompt, &step.answer]));
        }

        table.to_string()
    }

    pub fn format_display(&self, fact: &DisplayFact) -> String {
        match fact {
            DisplayFact::Question {
                id,
                prompt,
                options,
            } => {
                let mut output = format!("{} ({})\n", prompt, id);
                for (i, option) in options.iter().enumerate() {
                    let line_type = if i + 1 == options.len() {
                        LineType::LastStep
                    } else {
                        LineType::Step
                    };
                    output.push_str(&line_type.format_line("", option));
                }
                output
            }
            DisplayFact::Recommendation { track, description } => {
                let mut table = Table::new();
                table.load_preset(UTF8_FULL);
                table.add_row(Row::from(vec![Cell::new(format!(
                    "Recommended Track:\n{}",
                    track
                ))]));
                table.add_row(Row::from(vec![Cell::new(description)]));
                format!("{}\nGood luck on your journey!\n", table)
            }
        }
    }

    pub fn format_tree_inspection(&self, tree: &RuleTable) -> String {
        let mut output = String::new();
        output.push_str(&format!("Tree: {}\n", tree.name()));
        output.push_str(&format!("Root: {}\n\n", tree.root_id()));

        let mut questions = Table::new();
        questions.load_preset(UTF8_FULL);
        questions.set_header(Row::from(vec!["Question", "Prompt", "Options"]));
        for question in tree.questions() {
            questions.add_row(Row::from(vec![
                question.id.clone(),
                question.prompt.clone(),
                question.options.join("\n"),
            ]));
        }
        output.push_str(&questions.to_string());
        output.push_str("\n\n");

        let mut rules = Table::new();
        rules.load_preset(UTF8_FULL);
        rules.set_header(Row::from(vec!["Rule", "When", "Then"]));
        for question in tree.questions() {
            for rule in tree.rules_for(&question.id) {
                rules.add_row(Row::from(vec![
                    rule.name().to_string(),
                    self.format_trigger(&question.id, rule),
                    self.format_production(rule.production()),
                ]));
            }
        }
        output.push_str(&rules.to_string());
        output.push('\n');

        output
    }

    fn format_trigger(&self, question_id: &str, rule: &Rule) -> String {
        match rule {
            Rule::ExactMatch { literal, .. } => format!("{} is \"{}\"", question_id, literal),
            Rule::WildcardCapture { binding, .. } => {
                format!("{} is any as {}", question_id, binding)
            }
        }
    }

    fn format_production(&self, production: &Production) -> String {
        match production {
            Production::Ask(question_id) => format!("ask {}", question_id),
            Production::Recommend { track, .. } => format!("recommend \"{}\"", track),
        }
    }

    pub fn format_workspace_summary(
        &self,
        file_count: usize,
        tree_count: usize,
        tree_stats: &[(String, usize, usize)],
    ) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "Workspace contains {} files, {} trees\n\n",
            file_count, tree_count
        ));
        for (name, questions, rules) in tree_stats {
            output.push_str(&format!(
                "{}: {} questions, {} rules\n",
                name, questions, rules
            ));
        }
        output
    }

    pub fn format_paths(&self, paths: &[TreePath]) -> String {
        let mut output = String::new();
        output.push_str(&format!("Found {} path(s)\n\n", paths.len()));
        for (idx, path) in paths.iter().enumerate() {
            output.push_str(&format!("Path {}:\n", idx + 1));
            for step in &path.steps {
                output.push_str(
                    &LineType::Step
                        .format_line("  ", &format!("{} = {}", step.question_id, step.answer)),
                );
            }
            output.push_str(&LineType::Outcome.format_line("  ", &path.recommendation.track));
            output.push('\n');
        }
        output
    }
}
