use clap::Subcommand;
use focushub_core::{PersonalityType, RigidityLevel};

use super::{open_shell, CliResult};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print goal, rigidity and personality as JSON
    Show,
    /// Set the rigidity level for new challenges (soft, standard, locked)
    Rigidity { level: String },
    /// Set the feedback personality (supportive, savage)
    Personality { tone: String },
}

pub fn run(action: SettingsAction) -> CliResult {
    let (shell, _) = open_shell()?;
    match action {
        SettingsAction::Show => {
            let json = serde_json::json!({
                "goal": shell.goal(),
                "rigidity": shell.rigidity(),
                "personality": shell.personality(),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        SettingsAction::Rigidity { level } => {
            let level: RigidityLevel = level.parse()?;
            shell.set_rigidity(level)?;
            println!("rigidity: {level}");
        }
        SettingsAction::Personality { tone } => {
            let tone: PersonalityType = tone.parse()?;
            shell.set_personality(tone)?;
            println!("personality: {tone}");
        }
    }
    Ok(())
}
