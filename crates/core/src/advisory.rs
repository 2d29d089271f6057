//! The advisory brief — the per-run configuration record.
//!
//! Three required keys describe the analysis intent and the model to
//! consult. Keys are modeled as `Option` so an absent key (a hard
//! error) is distinguishable from a present-but-empty one (a warning:
//! answer quality degrades but the run proceeds).

use serde::{Deserialize, Serialize};

/// Required brief keys, in canonical order.
pub const REQUIRED_KEYS: [&str; 3] = ["data_background", "policy_question", "model"];

/// The configuration for one advisory request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdvisoryBrief {
    /// Free-text description of what the data represents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_background: Option<String>,

    /// The specific policy/decision-making question to answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_question: Option<String>,

    /// Model identifier (e.g. "qwen3:14b").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl AdvisoryBrief {
    pub fn new(
        data_background: impl Into<String>,
        policy_question: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            data_background: Some(data_background.into()),
            policy_question: Some(policy_question.into()),
            model: Some(model.into()),
        }
    }

    /// True when no key is present at all.
    pub fn is_empty(&self) -> bool {
        self.data_background.is_none() && self.policy_question.is_none() && self.model.is_none()
    }

    /// Names of the required keys that are absent, in canonical order.
    pub fn missing_keys(&self) -> Vec<String> {
        let present = [
            self.data_background.is_some(),
            self.policy_question.is_some(),
            self.model.is_some(),
        ];
        REQUIRED_KEYS
            .iter()
            .zip(present)
            .filter(|(_, p)| !p)
            .map(|(k, _)| (*k).to_string())
            .collect()
    }
}
