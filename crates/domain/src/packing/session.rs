use crate::error::{DomainError, EntityKind, Result};
use crate::kpi::{hours_between, round2};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

string_enum! {
    /// Lifecycle shared by preselection and process sessions
    pub enum SessionStatus("status") {
        InProgress => "IN_PROGRESS",
        Paused => "PAUSED",
        Completed => "COMPLETED",
    }
}

impl Default for SessionStatus {
    fn default() -> Self {
        Self::InProgress
    }
}

impl SessionStatus {
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Completed)
    }
}

/// Wall-clock bookkeeping of a work session
///
/// `total_duration_hours` is raw elapsed time since start; pauses are
/// tracked separately in `total_pause_hours` and never subtracted from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTiming {
    pub status: SessionStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub paused_at: Option<DateTime<Utc>>,
    pub pause_count: i32,
    pub total_pause_hours: f64,
    pub total_duration_hours: Option<f64>,
}

impl SessionTiming {
    pub fn start(now: DateTime<Utc>) -> Self {
        Self {
            status: SessionStatus::InProgress,
            start_time: now,
            end_time: None,
            paused_at: None,
            pause_count: 0,
            total_pause_hours: 0.0,
            total_duration_hours: None,
        }
    }

    fn reject(&self, entity: EntityKind, to: SessionStatus) -> DomainError {
        DomainError::invalid_transition(entity, self.status, to)
    }

    /// Fails unless the session still accepts bins, workers or records
    pub fn ensure_open(&self, entity: EntityKind) -> Result<()> {
        if self.status.is_open() {
            Ok(())
        } else {
            Err(self.reject(entity, self.status))
        }
    }

    /// IN_PROGRESS → PAUSED
    pub fn pause(&mut self, entity: EntityKind, now: DateTime<Utc>) -> Result<()> {
        if self.status != SessionStatus::InProgress {
            return Err(self.reject(entity, SessionStatus::Paused));
        }
        self.status = SessionStatus::Paused;
        self.paused_at = Some(now);
        self.pause_count += 1;
        Ok(())
    }

    /// PAUSED → IN_PROGRESS, folding the pause into `total_pause_hours`
    pub fn resume(&mut self, entity: EntityKind, now: DateTime<Utc>) -> Result<()> {
        if self.status != SessionStatus::Paused {
            return Err(self.reject(entity, SessionStatus::InProgress));
        }
        self.close_pause(now);
        self.status = SessionStatus::InProgress;
        Ok(())
    }

    /// Terminal transition; stamps end time and raw elapsed hours
    pub fn finalize(&mut self, entity: EntityKind, now: DateTime<Utc>) -> Result<()> {
        if !self.status.is_open() {
            return Err(self.reject(entity, SessionStatus::Completed));
        }
        self.close_pause(now);
        self.status = SessionStatus::Completed;
        self.end_time = Some(now);
        self.total_duration_hours = Some(round2(hours_between(self.start_time, now)));
        Ok(())
    }

    fn close_pause(&mut self, now: DateTime<Utc>) {
        if let Some(paused_at) = self.paused_at.take() {
            self.total_pause_hours =
                round2(self.total_pause_hours + hours_between(paused_at, now));
        }
    }

    /// Elapsed hours minus accumulated pauses, for completed sessions
    pub fn net_duration_hours(&self) -> Option<f64> {
        self.total_duration_hours
            .map(|total| round2((total - self.total_pause_hours).max(0.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const KIND: EntityKind = EntityKind::Preselection;

    #[test]
    fn test_pause_resume_accumulates() {
        let t0 = Utc::now();
        let mut timing = SessionTiming::start(t0);

        timing.pause(KIND, t0 + Duration::minutes(30)).unwrap();
        assert_eq!(timing.status, SessionStatus::Paused);
        assert_eq!(timing.pause_count, 1);

        timing.resume(KIND, t0 + Duration::minutes(60)).unwrap();
        assert_eq!(timing.status, SessionStatus::InProgress);
        assert_eq!(timing.paused_at, None);
        assert_eq!(timing.total_pause_hours, 0.5);
    }

    #[test]
    fn test_finalize_keeps_raw_elapsed_time() {
        let t0 = Utc::now();
        let mut timing = SessionTiming::start(t0);
        timing.pause(KIND, t0 + Duration::hours(1)).unwrap();
        timing.resume(KIND, t0 + Duration::hours(2)).unwrap();

        timing.finalize(KIND, t0 + Duration::minutes(200)).unwrap();
        assert_eq!(timing.status, SessionStatus::Completed);
        // 200 min = 3.333.. h, pauses are not subtracted
        assert_eq!(timing.total_duration_hours, Some(3.33));
        assert_eq!(timing.total_pause_hours, 1.0);
        assert_eq!(timing.net_duration_hours(), Some(2.33));
    }

    #[test]
    fn test_finalize_while_paused_closes_pause() {
        let t0 = Utc::now();
        let mut timing = SessionTiming::start(t0);
        timing.pause(KIND, t0 + Duration::hours(1)).unwrap();
        timing.finalize(KIND, t0 + Duration::hours(3)).unwrap();
        assert_eq!(timing.total_pause_hours, 2.0);
        assert_eq!(timing.paused_at, None);
    }

    #[test]
    fn test_guards() {
        let t0 = Utc::now();
        let mut timing = SessionTiming::start(t0);
        assert!(timing.resume(KIND, t0).is_err());

        timing.pause(KIND, t0).unwrap();
        assert!(timing.pause(KIND, t0).is_err());

        timing.finalize(KIND, t0).unwrap();
        assert!(timing.finalize(KIND, t0).is_err());
        assert!(timing.pause(KIND, t0).is_err());
        assert!(matches!(
            timing.ensure_open(KIND),
            Err(DomainError::InvalidTransition { .. })
        ));
    }
}
