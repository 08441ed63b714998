//! Timer Entity
//!
//! Server-held stopwatch row. `elapsed_time` is the accumulated duration as
//! of the last status transition.

use serde::{Deserialize, Serialize};

use super::boss::BossId;
use super::entity::Entity;

/// Stopwatch status. `Finished` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    #[default]
    Stopped,
    Running,
    Paused,
    Finished,
}

impl TimerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerStatus::Stopped => "stopped",
            TimerStatus::Running => "running",
            TimerStatus::Paused => "paused",
            TimerStatus::Finished => "finished",
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, TimerStatus::Finished)
    }
}

/// Row of the `timers` table (keyed by boss)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    pub boss_id: BossId,
    pub elapsed_time: u64,
    pub status: TimerStatus,
}

impl Timer {
    /// Initial row inserted alongside a new boss
    pub fn new(boss_id: BossId) -> Self {
        Self {
            boss_id,
            elapsed_time: 0,
            status: TimerStatus::Stopped,
        }
    }

    pub fn apply(&mut self, patch: &TimerPatch) {
        if let Some(elapsed) = patch.elapsed_time {
            self.elapsed_time = elapsed;
        }
        self.status = patch.status;
    }
}

impl Entity for Timer {
    type Id = BossId;

    fn id(&self) -> Self::Id {
        self.boss_id
    }
}

/// Partial update body for a timer row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimerPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_time: Option<u64>,
    pub status: TimerStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_string(&TimerStatus::Running).unwrap(), "\"running\"");
        let status: TimerStatus = serde_json::from_str("\"finished\"").unwrap();
        assert!(status.is_finished());
        assert_eq!(TimerStatus::Paused.as_str(), "paused");
    }

    #[test]
    fn test_status_only_patch_omits_elapsed() {
        let patch = TimerPatch { elapsed_time: None, status: TimerStatus::Running };
        assert_eq!(serde_json::to_value(patch).unwrap(), serde_json::json!({ "status": "running" }));
    }

    #[test]
    fn test_apply_patch() {
        let mut timer = Timer::new(3);
        timer.apply(&TimerPatch { elapsed_time: Some(42), status: TimerStatus::Paused });
        assert_eq!(timer.elapsed_time, 42);
        assert_eq!(timer.status, TimerStatus::Paused);
        timer.apply(&TimerPatch { elapsed_time: None, status: TimerStatus::Running });
        assert_eq!(timer.elapsed_time, 42);
        assert_eq!(timer.id(), 3);
    }
}
