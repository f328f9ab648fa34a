use std::io::{self, BufRead, Write};

use clap::Subcommand;
use focushub_core::challenge::PhaseData;
use focushub_core::{
    dispatch, Category, ChallengePhase, ChallengeSession, ClickOutcome, CoreError, GeminiClient,
    GenerationService, PendingRequest, Resolution, Shell, ShellError,
};

use super::{open_shell, runtime, CliResult};

#[derive(Subcommand)]
pub enum AppsAction {
    /// List tracked apps
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Track a new app (blocked by default)
    Add {
        /// Display name
        name: String,
        /// Icon glyph
        #[arg(long)]
        icon: Option<String>,
        /// Social, Entertainment, Work, Utility or Other
        #[arg(long)]
        category: Option<Category>,
    },
    /// Flip the blocked flag of an app
    Toggle {
        /// App ID
        id: String,
    },
    /// Stop tracking an app
    Remove {
        /// App ID
        id: String,
    },
    /// Open an app, running the challenge if it is blocked
    Open {
        /// App ID or name
        target: String,
    },
}

pub fn run(action: AppsAction) -> CliResult {
    let (mut shell, config) = open_shell()?;
    match action {
        AppsAction::List { json } => {
            let list = shell.blocklist();
            if json {
                println!("{}", serde_json::to_string_pretty(&list)?);
                return Ok(());
            }
            for entry in list.entries() {
                let state = if entry.is_blocked { "blocked" } else { "open" };
                println!(
                    "{:<38} {} {:<16} {:<14} {state}",
                    entry.id,
                    entry.icon,
                    entry.display_name,
                    entry.category.as_str()
                );
            }
        }
        AppsAction::Add {
            name,
            icon,
            category,
        } => {
            let entry = shell.add_entry(&name, icon.as_deref(), category)?;
            println!("App added: {} ({})", entry.display_name, entry.id);
        }
        AppsAction::Toggle { id } => {
            let blocked = shell.toggle_entry(&id)?;
            println!("{id}: {}", if blocked { "blocked" } else { "open" });
        }
        AppsAction::Remove { id } => {
            let entry = shell.remove_entry(&id)?;
            println!("App removed: {}", entry.display_name);
        }
        AppsAction::Open { target } => {
            let entry = shell
                .blocklist()
                .lookup(&target)
                .cloned()
                .ok_or(ShellError::UnknownEntry(target))?;

            // Only blocked entries need the service; resolve the key before the
            // interception is counted.
            let service = if entry.is_blocked {
                Some(GeminiClient::from_config(&config.generation)?)
            } else {
                None
            };

            match shell.click(&entry.id)? {
                ClickOutcome::Opened(entry) => println!("Opening {}", entry.display_name),
                ClickOutcome::GoalRequired => {
                    return Err("set a goal first: focushub goal set <text>".into());
                }
                ClickOutcome::Intercepted { request } => {
                    let service = service.ok_or("generation client unavailable")?;
                    runtime()?.block_on(challenge(&mut shell, &service, request))?;
                }
            }
        }
    }
    Ok(())
}

/// Interactive challenge loop. Type `cancel` at any prompt to give up and
/// `retry` after a service failure; Ctrl-C cancels a pending request.
async fn challenge(
    shell: &mut Shell,
    service: &dyn GenerationService,
    mut pending: Option<PendingRequest>,
) -> CliResult {
    loop {
        if let Some(request) = pending.take() {
            eprintln!("... {}", request.request.describe());
            let outcome = tokio::select! {
                outcome = dispatch(service, &request.request) => outcome,
                _ = tokio::signal::ctrl_c() => {
                    cancel(shell);
                    return Ok(());
                }
            };
            match shell.resolve(request.ticket, outcome) {
                Resolution::Advanced { followup } => pending = followup,
                Resolution::IntentRejected => {
                    let feedback = shell.session().and_then(ChallengeSession::intent_feedback);
                    if let Some(feedback) = feedback {
                        println!("Not convinced: {feedback}");
                    }
                }
                Resolution::Failed => {
                    if let Some(notice) = shell.session().and_then(ChallengeSession::notice) {
                        println!("Service error: {}", notice.message);
                    }
                    println!("Type 'retry' or 'cancel'.");
                }
                Resolution::ContentReady | Resolution::Stale => {}
            }
            continue;
        }

        let Some(session) = shell.session() else {
            return Ok(());
        };
        render(session);
        let can_retry = session.can_retry();
        let phase = session.phase();

        let Some(input) = prompt()? else {
            cancel(shell);
            return Ok(());
        };
        let input = input.trim();
        if input.eq_ignore_ascii_case("cancel") {
            cancel(shell);
            return Ok(());
        }
        if can_retry {
            if input.eq_ignore_ascii_case("retry") {
                pending = Some(shell.retry()?);
            } else {
                println!("Type 'retry' or 'cancel'.");
            }
            continue;
        }

        let step = match phase {
            ChallengePhase::Intent => shell.submit_intent(input).map(Some),
            ChallengePhase::Arithmetic => shell.submit_answer(input).map(|_| None),
            ChallengePhase::Physical | ChallengePhase::Grounding => shell.confirm(),
            ChallengePhase::Completed => {
                let entry = shell.proceed()?;
                println!("Access granted. Opening {}", entry.display_name);
                return Ok(());
            }
        };
        match step {
            Ok(next) => pending = next,
            Err(CoreError::Challenge(e)) => println!("{e}"),
            Err(e) => return Err(e.into()),
        }
    }
}

fn render(session: &ChallengeSession) {
    println!();
    println!(
        "[{}] {} ({}%)",
        session.target().display_name,
        session.phase(),
        session.progress_pct()
    );
    match session.data() {
        PhaseData::Intent { feedback, .. } => {
            println!("Goal: {}", session.goal());
            if feedback.is_none() {
                println!("Why do you need this right now?");
            }
        }
        PhaseData::Arithmetic { problem, .. } => match problem {
            Some(problem) => println!("Solve: {}", problem.question),
            None => println!("(problem not loaded)"),
        },
        PhaseData::Physical { task } => {
            println!("{}", task.title);
            println!("{}", task.detail);
            println!("Press Enter once you are done.");
        }
        PhaseData::Grounding { prompt } => match prompt {
            Some(prompt) => {
                println!("{}", prompt.prompt);
                println!("{}", prompt.guidance);
                println!("Press Enter once you are done.");
            }
            None => println!("(exercise not loaded)"),
        },
        PhaseData::Completed => println!("Challenge complete. Press Enter to proceed."),
    }
}

/// Read one line from stdin. `None` on end of input.
fn prompt() -> io::Result<Option<String>> {
    print!("> ");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

fn cancel(shell: &mut Shell) {
    if let Some(entry) = shell.cancel() {
        println!("Cancelled. {} stays closed.", entry.display_name);
    }
}
