use clap::Subcommand;

use super::{open_shell, CliResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Wellbeing summary
    Show {
        /// Print raw counters and the derived summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Append a focus score (0-100) to the rolling history
    Record {
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        score: u8,
    },
}

pub fn run(action: StatsAction) -> CliResult {
    let (shell, _) = open_shell()?;
    match action {
        StatsAction::Show { json } => {
            let stats = shell.stats();
            let summary = stats.summary();
            if json {
                let out = serde_json::json!({ "stats": stats, "summary": summary });
                println!("{}", serde_json::to_string_pretty(&out)?);
                return Ok(());
            }
            println!("Interceptions:  {}", summary.interceptions);
            println!("Unlocks:        {}", summary.unlocks);
            println!("Time saved:     {}m", summary.time_saved_minutes);
            println!("Streak:         {} days", summary.streak);
            println!(
                "Focus:          {:.0} avg, {} peak ({:?})",
                summary.average_focus, summary.peak_focus, summary.focus_level
            );
            println!("Resistance:     {:.0}%", summary.resistance_rate * 100.0);
            println!("History:        {}", history(&stats.focus_history));
        }
        StatsAction::Record { score } => {
            let stats = shell.record_focus_score(score)?;
            println!("Focus history: {}", history(&stats.focus_history));
        }
    }
    Ok(())
}

fn history(scores: &[u8]) -> String {
    scores.iter().map(u8::to_string).collect::<Vec<_>>().join(" ")
}
