//! Character actions and their vendor animation presets.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Preset used when an action name is not recognized.
pub const DEFAULT_PRESET: &str = "talking_01";

/// Actions offered to the user, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
pub enum Action {
    Walking,
    Running,
    Dancing,
    Waving,
    #[default]
    Talking,
    Wedding,
    Party,
    Speech,
    Thinking,
    Presenting,
    Fighting,
    Sports,
}

impl Action {
    /// All available actions.
    pub const ALL: &'static [Action] = &[
        Action::Walking,
        Action::Running,
        Action::Dancing,
        Action::Waving,
        Action::Talking,
        Action::Wedding,
        Action::Party,
        Action::Speech,
        Action::Thinking,
        Action::Presenting,
        Action::Fighting,
        Action::Sports,
    ];

    /// Human-readable name, as shown in the action selector.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Walking => "Walking",
            Action::Running => "Running",
            Action::Dancing => "Dancing",
            Action::Waving => "Waving",
            Action::Talking => "Talking",
            Action::Wedding => "Wedding",
            Action::Party => "Party",
            Action::Speech => "Speech",
            Action::Thinking => "Thinking",
            Action::Presenting => "Presenting",
            Action::Fighting => "Fighting",
            Action::Sports => "Sports",
        }
    }

    /// Vendor animation preset for this action.
    pub fn preset_id(&self) -> &'static str {
        match self {
            Action::Walking => "walking_01",
            Action::Running => "running_01",
            Action::Dancing => "dancing_01",
            Action::Waving => "waving_01",
            Action::Talking => "talking_01",
            Action::Wedding => "wedding_ceremony",
            Action::Party => "party_celebration",
            Action::Speech => "public_speaking",
            Action::Thinking => "thinking_01",
            Action::Presenting => "presenting_01",
            Action::Fighting => "fighting_01",
            Action::Sports => "sports_01",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Action {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| ActionParseError(s.to_string()))
    }
}

#[derive(Debug, Error)]
#[error("Unknown action: {0}")]
pub struct ActionParseError(String);

/// Resolve an action name to its animation preset.
///
/// Unrecognized names fall back to [`DEFAULT_PRESET`] instead of failing.
pub fn resolve_preset(action: &str) -> &'static str {
    action
        .parse::<Action>()
        .map(|a| a.preset_id())
        .unwrap_or(DEFAULT_PRESET)
}
