//! Field (Campo) records consumed by the aggregation layer.
//!
//! Lots, tasks and harvests are maintained elsewhere; here they are plain
//! input data for cost, harvest and task-recency figures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const FRESH_DAYS: i64 = 14;
const WARNING_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTask {
    pub task_type: String,
    pub cost_value: Option<f64>,
    pub start_date: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl FieldTask {
    /// Most meaningful date of the task: completion, else start, else creation
    pub fn activity_date(&self) -> DateTime<Utc> {
        self.completed_at
            .or(self.start_date)
            .unwrap_or(self.created_at)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarvestRecord {
    pub crop_type: String,
    pub kilos: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lot {
    pub name: String,
    pub tasks: Vec<FieldTask>,
    pub harvests: Vec<HarvestRecord>,
}

/// Colour band for how long ago a task type was last done on a lot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecencyBucket {
    Fresh,
    Warning,
    Stale,
}

impl RecencyBucket {
    pub fn classify(last: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        let Some(last) = last else {
            return Self::Stale;
        };
        let days = (now - last).num_milliseconds() as f64 / 86_400_000.0;
        if days <= FRESH_DAYS as f64 {
            Self::Fresh
        } else if days <= WARNING_DAYS as f64 {
            Self::Warning
        } else {
            Self::Stale
        }
    }
}

pub fn task_cost(lot: &Lot) -> f64 {
    lot.tasks.iter().filter_map(|t| t.cost_value).sum()
}

pub fn total_harvest_kilos(lot: &Lot) -> f64 {
    lot.harvests.iter().map(|h| h.kilos).sum()
}

pub fn harvest_by_crop(lot: &Lot) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    for harvest in &lot.harvests {
        *totals.entry(harvest.crop_type.clone()).or_insert(0.0) += harvest.kilos;
    }
    totals
}

/// Latest activity date among the lot's tasks of `task_type`
pub fn task_recency(lot: &Lot, task_type: &str) -> Option<DateTime<Utc>> {
    lot.tasks
        .iter()
        .filter(|t| t.task_type == task_type)
        .map(FieldTask::activity_date)
        .max()
}

/// Per-lot figures shown on the field overview
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LotSummary {
    pub name: String,
    pub task_cost: f64,
    pub total_harvest_kilos: f64,
    pub harvest_by_crop: BTreeMap<String, f64>,
    pub last_task_at: Option<DateTime<Utc>>,
    pub task_recency: BTreeMap<String, DateTime<Utc>>,
}

impl LotSummary {
    pub fn from_lot(lot: &Lot) -> Self {
        let mut recency: BTreeMap<String, DateTime<Utc>> = BTreeMap::new();
        for task in &lot.tasks {
            let date = task.activity_date();
            recency
                .entry(task.task_type.clone())
                .and_modify(|d| *d = (*d).max(date))
                .or_insert(date);
        }

        Self {
            name: lot.name.clone(),
            task_cost: task_cost(lot),
            total_harvest_kilos: total_harvest_kilos(lot),
            harvest_by_crop: harvest_by_crop(lot),
            last_task_at: recency.values().max().copied(),
            task_recency: recency,
        }
    }

    pub fn bucket(&self, task_type: &str, now: DateTime<Utc>) -> RecencyBucket {
        RecencyBucket::classify(self.task_recency.get(task_type).copied(), now)
    }
}
