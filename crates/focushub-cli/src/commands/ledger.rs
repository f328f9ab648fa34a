use clap::Subcommand;
use focushub_core::ledger::share_report;
use focushub_core::{ActivityCategory, ActivityRow, GeminiClient, RowUpdate};

use super::{open_shell, runtime, CliResult};

#[derive(Subcommand)]
pub enum LedgerAction {
    /// List rows, newest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a row at the top of the ledger
    Add {
        /// Time label (defaults to now, HH:MM)
        #[arg(long)]
        time: Option<String>,
        /// What you did
        #[arg(long)]
        activity: Option<String>,
        /// Work, Leisure, Errand or Distraction
        #[arg(long)]
        category: Option<ActivityCategory>,
        /// Duration in minutes
        #[arg(long)]
        minutes: Option<u32>,
    },
    /// Update fields of a row
    Update {
        /// Row ID
        id: String,
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        activity: Option<String>,
        #[arg(long)]
        category: Option<ActivityCategory>,
        #[arg(long)]
        minutes: Option<u32>,
    },
    /// Remove a row
    Remove {
        /// Row ID
        id: String,
    },
    /// Ask the generation service to analyze the ledger
    Analyze {
        /// Also print a one-line shareable report
        #[arg(long)]
        share: bool,
    },
}

pub fn run(action: LedgerAction) -> CliResult {
    let (shell, config) = open_shell()?;
    match action {
        LedgerAction::List { json } => {
            let ledger = shell.ledger();
            if json {
                println!("{}", serde_json::to_string_pretty(&ledger)?);
                return Ok(());
            }
            if ledger.is_empty() {
                println!("(ledger is empty)");
                return Ok(());
            }
            for row in ledger.rows() {
                println!(
                    "{}  {:>5}  {:<11} {:>4}m  {}",
                    row.id, row.time, row.category, row.duration_minutes, row.activity
                );
            }
            for (category, minutes) in ledger.minutes_by_category() {
                println!("{category}: {minutes}m");
            }
            println!("Total: {}m", ledger.total_minutes());
        }
        LedgerAction::Add {
            time,
            activity,
            category,
            minutes,
        } => {
            let blank = ActivityRow::blank();
            let row = shell.add_row(ActivityRow {
                time: time.unwrap_or(blank.time),
                activity: activity.unwrap_or_default(),
                category: category.unwrap_or(blank.category),
                duration_minutes: minutes.unwrap_or(blank.duration_minutes),
                id: blank.id,
            })?;
            println!("Row added: {}", row.id);
        }
        LedgerAction::Update {
            id,
            time,
            activity,
            category,
            minutes,
        } => {
            let row = shell.update_row(
                &id,
                RowUpdate {
                    time,
                    activity,
                    category,
                    duration_minutes: minutes,
                },
            )?;
            println!("{}", serde_json::to_string_pretty(&row)?);
        }
        LedgerAction::Remove { id } => {
            shell.remove_row(&id)?;
            println!("Row removed: {id}");
        }
        LedgerAction::Analyze { share } => {
            let service = GeminiClient::from_config(&config.generation)?;
            let analysis = runtime()?.block_on(shell.analyze_ledger(&service))?;

            println!("{}", analysis.summary);
            println!("Time wasted:  {}m", analysis.time_wasted_minutes);
            println!("Time saved:   {}m", analysis.time_saved_minutes);
            println!("Score:        {}%", analysis.productivity_score);
            for tip in &analysis.recommendations {
                println!("- {tip}");
            }
            if share {
                println!();
                println!("{}", share_report(&analysis, &shell.goal()));
            }
        }
    }
    Ok(())
}
