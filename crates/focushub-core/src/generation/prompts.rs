//! Structured prompts for each generation operation.

use indoc::formatdoc;

use crate::ledger::ActivityRow;
use crate::settings::{Difficulty, PersonalityType};

fn intent_tone(tone: PersonalityType) -> &'static str {
    match tone {
        PersonalityType::Supportive => {
            "Be a wise mentor. If the intent is weak, challenge the user to do better; \
             if it is sound, encourage them warmly."
        }
        PersonalityType::Savage => {
            "Be highly skeptical. Call out weak excuses bluntly and with sarcasm."
        }
    }
}

fn analysis_tone(tone: PersonalityType) -> &'static str {
    match tone {
        PersonalityType::Supportive => {
            "Act as a motivational coach and time-management expert. \
             Use energising, respectful language that builds momentum."
        }
        PersonalityType::Savage => {
            "Be ruthless and sarcastic, like a frustrated friend who is tired of excuses."
        }
    }
}

pub(super) fn arithmetic_problem(difficulty: Difficulty) -> String {
    formatdoc! {"
        Generate a single arithmetic problem. Difficulty: {difficulty}.
        The answer must be a single exact value written as plain text.
        Output strictly in JSON.
    "}
}

pub(super) fn grounding_prompt() -> String {
    formatdoc! {"
        Generate a short natural grounding exercise.
        Provide the prompt and guidance in English with a simple, calm tone.
        Output strictly in JSON.
    "}
}

pub(super) fn validate_intent(intent: &str, goal: &str, tone: PersonalityType) -> String {
    let tone = intent_tone(tone);
    formatdoc! {"
        Goal: {goal:?}.
        User intent: {intent:?}.
        Tone: {tone}
        Decide whether opening a distracting app for this reason serves the goal
        or is procrastination. Explain the verdict in the feedback field.
        Output strictly in JSON.
    "}
}

pub(super) fn analyze_activity_log(
    rows: &[ActivityRow],
    goal: &str,
    tone: PersonalityType,
) -> Result<String, serde_json::Error> {
    let rows = serde_json::to_string(rows)?;
    let tone = analysis_tone(tone);
    Ok(formatdoc! {"
        The user's goal is: {goal:?}.
        Tone instructions: {tone}
        Analyze these activities: {rows}
        Estimate minutes wasted and saved, give concrete recommendations and a
        productivity score between 0 and 100.
        Output strictly in JSON.
    "})
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::ActivityCategory;

    #[test]
    fn arithmetic_prompt_names_difficulty() {
        assert!(arithmetic_problem(Difficulty::Hard).contains("Difficulty: hard."));
    }

    #[test]
    fn intent_prompt_carries_goal_and_tone() {
        let p = validate_intent(
            "check DMs from my editor",
            "Finish report",
            PersonalityType::Savage,
        );
        assert!(p.contains("\"Finish report\""));
        assert!(p.contains("\"check DMs from my editor\""));
        assert!(p.contains("skeptical"));
    }

    #[test]
    fn analysis_prompt_embeds_rows_as_json() {
        let rows = vec![ActivityRow {
            id: "1".into(),
            time: "10:00".into(),
            activity: "Email".into(),
            category: ActivityCategory::Errand,
            duration_minutes: 20,
        }];
        let p = analyze_activity_log(&rows, "Ship v2", PersonalityType::Supportive).unwrap();
        assert!(p.contains(r#""durationMinutes":20"#));
        assert!(p.contains("coach"));
    }
}
