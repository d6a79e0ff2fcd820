use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString, IntoStaticStr};

use crate::data::timestamp;

/// Logged contact with the account behind an opportunity. Logging an interaction refreshes the
/// opportunity's last interaction date on the server.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Interaction {
    pub id: i64,
    pub opportunity_id: i64,
    #[serde(rename = "type")]
    pub interaction_type: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, with = "timestamp")]
    pub date: Option<DateTime<Utc>>,
}

/// Request body to log a new [Interaction] against an opportunity
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NewInteraction {
    #[serde(rename = "type")]
    pub interaction_type: InteractionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub date: DateTime<Utc>,
}

impl NewInteraction {
    /// Create a new interaction of the specified `kind` happening at `date`. Blank notes are
    /// dropped.
    pub fn new(kind: InteractionKind, notes: Option<String>, date: DateTime<Utc>) -> Self {
        Self {
            interaction_type: kind,
            notes: notes.filter(|n| !n.trim().is_empty()),
            date,
        }
    }
}

/// Kinds of contact a salesperson can log
#[derive(
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    IntoStaticStr,
    AsRefStr,
    PartialEq,
    Eq,
    Debug,
    Copy,
    Clone,
)]
pub enum InteractionKind {
    #[serde(rename = "call")]
    #[strum(serialize = "call")]
    Call,
    #[serde(rename = "email")]
    #[strum(serialize = "email")]
    Email,
    #[serde(rename = "meeting")]
    #[strum(serialize = "meeting")]
    Meeting,
}

impl InteractionKind {
    /// Display label shown in the interaction form
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Call => "Ligação",
            Self::Email => "E-mail",
            Self::Meeting => "Reunião",
        }
    }
}
