use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

use crate::data::{interaction::Interaction, timestamp};

/// Sales pipeline record as returned by the CRM API. The portal never owns the authoritative
/// copy, so raw string fields (status, temperature, product) are kept as sent and interpreted
/// through the typed accessors.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Opportunity {
    pub id: i64,
    #[serde(default)]
    pub cnpj: Option<String>,
    #[serde(default)]
    pub razao_social: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub temperatura: Option<String>,
    #[serde(default)]
    pub produto: Option<String>,
    #[serde(default)]
    pub valor_estimado: Option<f64>,
    #[serde(default, with = "timestamp")]
    pub last_interaction_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub owner_id: Option<i64>,
    #[serde(default, with = "timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub interactions: Vec<Interaction>,
}

impl Opportunity {
    /// Pipeline stage of the opportunity. [None] if the status is missing or not one of the known
    /// stages.
    pub fn stage(&self) -> Option<PipelineStage> {
        self.status.as_deref()?.parse().ok()
    }

    /// Urgency tag of the opportunity. [None] if the tag is missing or unrecognized.
    pub fn temperature(&self) -> Option<Temperature> {
        self.temperatura.as_deref()?.parse().ok()
    }

    /// Estimated value of the deal where a missing or non-finite value counts as zero
    pub fn estimated_value(&self) -> f64 {
        match self.valor_estimado {
            Some(value) if value.is_finite() => value,
            _ => 0.0,
        }
    }

    /// Whole days since the last logged interaction, relative to `now`. [None] when the
    /// opportunity has no interaction date.
    pub fn days_since_interaction(&self, now: DateTime<Utc>) -> Option<i64> {
        self.last_interaction_date
            .map(|date| timestamp::elapsed_days(date, now))
    }
}

/// Fixed pipeline stages in board order
#[derive(
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    IntoStaticStr,
    AsRefStr,
    Display,
    PartialEq,
    Eq,
    Hash,
    Debug,
    Copy,
    Clone,
)]
pub enum PipelineStage {
    #[serde(rename = "Qualificação")]
    #[strum(serialize = "Qualificação")]
    Qualificacao,
    #[serde(rename = "Prospecção")]
    #[strum(serialize = "Prospecção")]
    Prospeccao,
    #[serde(rename = "Proposta")]
    #[strum(serialize = "Proposta")]
    Proposta,
    #[serde(rename = "Negociação")]
    #[strum(serialize = "Negociação")]
    Negociacao,
}

/// Qualitative urgency tag of an opportunity
#[derive(
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    IntoStaticStr,
    AsRefStr,
    Display,
    PartialEq,
    Eq,
    Debug,
    Copy,
    Clone,
)]
pub enum Temperature {
    Frio,
    Morno,
    Quente,
    Fervendo,
}

impl Temperature {
    /// CSS class of the badge displaying this temperature
    pub const fn badge_class(&self) -> &'static str {
        match self {
            Self::Frio => "badge-frio",
            Self::Morno => "badge-morno",
            Self::Quente => "badge-quente",
            Self::Fervendo => "badge-fervendo",
        }
    }

    /// Font Awesome icon class shown next to the badge label
    pub const fn icon(&self) -> &'static str {
        match self {
            Self::Frio => "fa-droplet",
            Self::Morno => "fa-wind",
            Self::Quente => "fa-temperature-half",
            Self::Fervendo => "fa-fire",
        }
    }
}

/// Product lines an opportunity can be opened for
#[derive(
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    IntoStaticStr,
    AsRefStr,
    Display,
    PartialEq,
    Eq,
    Debug,
    Copy,
    Clone,
)]
pub enum Product {
    Cooper,
    #[serde(rename = "4L")]
    #[strum(serialize = "4L")]
    QuartaLinha,
    Personalizados,
}

/// Request body to create a new [Opportunity]
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NewOpportunity {
    pub cnpj: String,
    pub razao_social: String,
    pub status: PipelineStage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperatura: Option<Temperature>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub produto: Option<Product>,
    pub valor_estimado: f64,
}

/// Request body to update an existing [Opportunity]. Unset fields are not sent so the server
/// leaves them untouched.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct OpportunityUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperatura: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub produto: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valor_estimado: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl OpportunityUpdate {
    /// Update that only moves the opportunity to another pipeline `stage`
    pub fn move_to(stage: PipelineStage) -> Self {
        Self {
            status: Some(stage.as_ref().to_owned()),
            ..Default::default()
        }
    }

    /// Update that re-submits the `current_status` of an opportunity. The server treats any edit
    /// of a free opportunity by another salesperson as a claim of ownership.
    pub fn claim(current_status: Option<String>) -> Self {
        Self {
            status: current_status.filter(|s| !s.is_empty()),
            ..Default::default()
        }
    }
}
