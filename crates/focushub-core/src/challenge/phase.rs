//! Phase sequence policy.
//!
//! One table maps each rigidity level to its ordered phase sequence. It is
//! the only place that decides the initial phase, every advance and the
//! progress figure.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::settings::RigidityLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChallengePhase {
    Intent,
    Arithmetic,
    Physical,
    Grounding,
    Completed,
}

impl ChallengePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Intent => "intent",
            Self::Arithmetic => "arithmetic",
            Self::Physical => "physical",
            Self::Grounding => "grounding",
            Self::Completed => "completed",
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Completed
    }
}

impl fmt::Display for ChallengePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

use ChallengePhase::*;

const SOFT: &[ChallengePhase] = &[Arithmetic, Completed];
const STANDARD: &[ChallengePhase] = &[Arithmetic, Physical, Completed];
const LOCKED: &[ChallengePhase] = &[Intent, Arithmetic, Physical, Grounding, Completed];

/// Full sequence for a rigidity level, ending in `Completed`.
pub fn sequence(rigidity: RigidityLevel) -> &'static [ChallengePhase] {
    match rigidity {
        RigidityLevel::Soft => SOFT,
        RigidityLevel::Standard => STANDARD,
        RigidityLevel::Locked => LOCKED,
    }
}

/// The phases a user has to pass, without the terminal `Completed`.
pub fn active_phases(rigidity: RigidityLevel) -> &'static [ChallengePhase] {
    let seq = sequence(rigidity);
    &seq[..seq.len() - 1]
}

pub fn first_phase(rigidity: RigidityLevel) -> ChallengePhase {
    sequence(rigidity)[0]
}

/// Phase after `current`, or `None` if `current` is terminal or not part
/// of the sequence.
pub fn next_phase(rigidity: RigidityLevel, current: ChallengePhase) -> Option<ChallengePhase> {
    let seq = sequence(rigidity);
    let idx = seq.iter().position(|&p| p == current)?;
    seq.get(idx + 1).copied()
}

/// Share of active phases already passed, as a whole percentage.
///
/// 0 on the first phase, 100 exactly at `Completed`.
pub fn progress_pct(rigidity: RigidityLevel, current: ChallengePhase) -> u8 {
    let seq = sequence(rigidity);
    let total = seq.len() - 1;
    let passed = seq.iter().position(|&p| p == current).unwrap_or(0);
    ((passed * 100) / total) as u8
}

/// Self-reported movement task for the physical phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalTask {
    pub title: String,
    pub detail: String,
}

impl PhysicalTask {
    pub fn for_rigidity(rigidity: RigidityLevel) -> Self {
        let title = match rigidity {
            RigidityLevel::Locked => "40 push-ups",
            RigidityLevel::Soft | RigidityLevel::Standard => "20 air squats",
        };
        Self {
            title: title.into(),
            detail: "Stand up and move before you scroll. Confirm once you are done.".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn sequences_match_policy_table() {
        assert_eq!(active_phases(RigidityLevel::Soft), &[Arithmetic]);
        assert_eq!(active_phases(RigidityLevel::Standard), &[Arithmetic, Physical]);
        assert_eq!(
            active_phases(RigidityLevel::Locked),
            &[Intent, Arithmetic, Physical, Grounding]
        );
    }

    #[test]
    fn first_phase_per_rigidity() {
        assert_eq!(first_phase(RigidityLevel::Soft), Arithmetic);
        assert_eq!(first_phase(RigidityLevel::Standard), Arithmetic);
        assert_eq!(first_phase(RigidityLevel::Locked), Intent);
    }

    #[test]
    fn advance_follows_table() {
        assert_eq!(next_phase(RigidityLevel::Soft, Arithmetic), Some(Completed));
        assert_eq!(next_phase(RigidityLevel::Standard, Arithmetic), Some(Physical));
        assert_eq!(next_phase(RigidityLevel::Standard, Physical), Some(Completed));
        assert_eq!(next_phase(RigidityLevel::Locked, Physical), Some(Grounding));
        assert_eq!(next_phase(RigidityLevel::Locked, Completed), None);
        assert_eq!(next_phase(RigidityLevel::Soft, Intent), None);
    }

    #[test]
    fn locked_progress_steps_by_quarters() {
        let values: Vec<u8> = sequence(RigidityLevel::Locked)
            .iter()
            .map(|&p| progress_pct(RigidityLevel::Locked, p))
            .collect();
        assert_eq!(values, vec![0, 25, 50, 75, 100]);
    }

    #[test]
    fn physical_task_is_harder_when_locked() {
        assert_eq!(PhysicalTask::for_rigidity(RigidityLevel::Standard).title, "20 air squats");
        assert_eq!(PhysicalTask::for_rigidity(RigidityLevel::Locked).title, "40 push-ups");
    }

    fn rigidity() -> impl Strategy<Value = RigidityLevel> {
        prop_oneof![
            Just(RigidityLevel::Soft),
            Just(RigidityLevel::Standard),
            Just(RigidityLevel::Locked),
        ]
    }

    proptest! {
        #[test]
        fn progress_is_monotonic_and_ends_at_100(r in rigidity()) {
            let mut phase = first_phase(r);
            let mut last = progress_pct(r, phase);
            let mut steps = 0;
            while let Some(next) = next_phase(r, phase) {
                let pct = progress_pct(r, next);
                prop_assert!(pct > last);
                prop_assert_eq!(pct == 100, next == Completed);
                last = pct;
                phase = next;
                steps += 1;
            }
            prop_assert_eq!(phase, Completed);
            prop_assert_eq!(steps, active_phases(r).len());
        }
    }
}
