//! Pure derivations over the opportunity list. Everything here takes the current time as a
//! parameter so the portal can render consistently within a single request.

use chrono::{DateTime, Utc};
use crm_api::data::opportunity::{Opportunity, PipelineStage};
use strum::IntoEnumIterator;

/// Opportunities without contact for more days than this are counted as at risk on the dashboard
pub const AT_RISK_THRESHOLD_DAYS: i64 = 85;
/// Opportunities without contact for more days than this are flagged as free on the board
pub const FREE_THRESHOLD_DAYS: i64 = 90;
/// Chart label grouping opportunities that were sent without a status
pub const MISSING_STATUS_LABEL: &str = "Sem status";

/// `true` if the opportunity has gone without contact for more than `threshold` days. An
/// opportunity that never had an interaction logged counts as exceeding every threshold.
fn exceeds_threshold(opportunity: &Opportunity, now: DateTime<Utc>, threshold: i64) -> bool {
    match opportunity.days_since_interaction(now) {
        Some(days) => days > threshold,
        None => true,
    }
}

/// Number of opportunities sharing a status value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCount {
    pub status: String,
    pub count: usize,
}

impl StatusCount {
    /// Width of this status's bar as a percentage of the largest bar
    pub fn share_of(&self, max: usize) -> f64 {
        if max == 0 {
            return 0.0;
        }
        self.count as f64 * 100.0 / max as f64
    }
}

/// Headline numbers shown on the dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardMetrics {
    pub total_opportunities: usize,
    pub total_value: f64,
    pub at_risk: usize,
    /// Count per distinct raw status, in order of first appearance
    pub status_counts: Vec<StatusCount>,
}

impl DashboardMetrics {
    pub fn compute(opportunities: &[Opportunity], now: DateTime<Utc>) -> Self {
        let mut status_counts: Vec<StatusCount> = Vec::new();
        for opportunity in opportunities {
            let status = opportunity
                .status
                .as_deref()
                .unwrap_or(MISSING_STATUS_LABEL);
            match status_counts.iter_mut().find(|s| s.status == status) {
                Some(entry) => entry.count += 1,
                None => status_counts.push(StatusCount {
                    status: status.to_owned(),
                    count: 1,
                }),
            }
        }
        Self {
            total_opportunities: opportunities.len(),
            total_value: opportunities.iter().map(Opportunity::estimated_value).sum(),
            at_risk: opportunities
                .iter()
                .filter(|o| exceeds_threshold(o, now, AT_RISK_THRESHOLD_DAYS))
                .count(),
            status_counts,
        }
    }

    /// Largest single status count, used to scale the chart
    pub fn max_status_count(&self) -> usize {
        self.status_counts
            .iter()
            .map(|s| s.count)
            .max()
            .unwrap_or_default()
    }
}

/// Opportunity as displayed on a board card
#[derive(Debug, Clone, PartialEq)]
pub struct KanbanCard {
    pub opportunity: Opportunity,
    pub days_since_interaction: Option<i64>,
    /// No contact for more than [FREE_THRESHOLD_DAYS], so any salesperson may claim it
    pub is_free: bool,
}

impl KanbanCard {
    fn new(opportunity: &Opportunity, now: DateTime<Utc>) -> Self {
        Self {
            days_since_interaction: opportunity.days_since_interaction(now),
            is_free: exceeds_threshold(opportunity, now, FREE_THRESHOLD_DAYS),
            opportunity: opportunity.clone(),
        }
    }

    pub fn interaction_label(&self) -> String {
        match self.days_since_interaction {
            Some(days) if days <= 0 => "Hoje".to_owned(),
            Some(days) => format!("{days} dias sem contato"),
            None => "Sem contato registrado".to_owned(),
        }
    }

    pub fn value_label(&self) -> String {
        format_brl(self.opportunity.estimated_value())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KanbanColumn {
    pub stage: PipelineStage,
    pub cards: Vec<KanbanCard>,
}

/// Opportunities partitioned into one column per [PipelineStage]. Opportunities whose status is
/// not a known stage appear in no column.
#[derive(Debug, Clone, PartialEq)]
pub struct KanbanBoard {
    pub columns: Vec<KanbanColumn>,
}

impl KanbanBoard {
    pub fn build(opportunities: &[Opportunity], now: DateTime<Utc>) -> Self {
        let columns = PipelineStage::iter()
            .map(|stage| KanbanColumn {
                stage,
                cards: opportunities
                    .iter()
                    .filter(|o| o.stage() == Some(stage))
                    .map(|o| KanbanCard::new(o, now))
                    .collect(),
            })
            .collect();
        Self { columns }
    }
}

/// Format `value` as Brazilian Real, e.g. `R$ 1.500,00`. Non-finite values format as zero.
pub fn format_brl(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let cents = (value.abs() * 100.0).round() as u64;
    let integer = (cents / 100).to_string();
    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}R$ {grouped},{:02}", cents % 100)
}
