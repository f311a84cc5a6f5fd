use anyhow::{Context, Result};
use crate::formatter::Formatter;
use inquire::Select;
use waypoint::{DisplayFact, Engine, Session};

const RESTART: &str = "↺ Restart";
const QUIT: &str = "Quit";

pub fn select_tree(engine: &Engine) -> Result<String> {
    let trees = engine.list_trees();

    if trees.is_empty() {
        anyhow::bail!("No trees found in workspace. Add .tree files to get started.");
    }

    if trees.len() == 1 {
        return Ok(trees[0].clone());
    }

    let display_options: Vec<String> = trees
        .iter()
        .map(|name| {
            let questions = engine.get_tree(name).map_or(0, |t| t.question_count());
            format!("{} ({} questions)", name, questions)
        })
        .collect();

    let selected = Select::new("Select a tree:", display_options.clone())
        .with_help_message("Use arrow keys to navigate, Enter to select")
        .prompt()
        .context("Failed to get tree selection")?;

    let tree_index = display_options
        .iter()
        .position(|d| d == &selected)
        .context("Failed to find selected tree index")?;

    Ok(trees[tree_index].clone())
}

/// Ask the live question until a recommendation is reached and the user stops
pub fn run_interactive(session: &mut Session) -> Result<()> {
    loop {
        match session.current().clone() {
            DisplayFact::Question {
                id,
                prompt,
                mut options,
            } => {
                options.push(RESTART.to_string());
                let choice = Select::new(&prompt, options)
                    .with_help_message("Use arrow keys to navigate, Enter to answer")
                    .prompt()
                    .context(format!("Failed to get answer for {}", id))?;

                if choice == RESTART {
                    session.reset()?;
                } else {
                    session.answer(&id, &choice)?;
                }
            }
            recommendation @ DisplayFact::Recommendation { .. } => {
                print!("{}", Formatter::default().format_display(&recommendation));
                let next = Select::new("Done.", vec![QUIT.to_string(), RESTART.to_string()])
                    .prompt()
                    .context("Failed to get next step")?;

                if next == RESTART {
                    session.reset()?;
                } else {
                    return Ok(());
                }
            }
        }
    }
}
