use clap::Subcommand;

use super::{open_shell, CliResult};

#[derive(Subcommand)]
pub enum GoalAction {
    /// Print the current goal
    Show,
    /// Set the goal challenges are judged against
    Set {
        /// Goal text
        text: Vec<String>,
    },
    /// Clear the goal
    Clear,
}

pub fn run(action: GoalAction) -> CliResult {
    let (shell, _) = open_shell()?;
    match action {
        GoalAction::Show => {
            let goal = shell.goal();
            if goal.is_empty() {
                println!("(no goal set)");
            } else {
                println!("{goal}");
            }
        }
        GoalAction::Set { text } => {
            let goal = text.join(" ");
            if goal.trim().is_empty() {
                return Err("goal must not be empty".into());
            }
            shell.set_goal(&goal)?;
            println!("ok");
        }
        GoalAction::Clear => {
            shell.set_goal("")?;
            println!("goal cleared");
        }
    }
    Ok(())
}
