use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::counters::CounterRegistry;
use crate::dag::millis_to_utc;
use crate::{AttemptId, TaskId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    New,
    Scheduled,
    Running,
    Succeeded,
    Failed,
    Killed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInformation {
    pub task_id: TaskId,
    pub state: TaskState,
    pub diagnostics: Option<String>,
    /// Tiempos en epoch millis; 0 si el servicio no los informa.
    pub start_time: i64,
    pub scheduled_time: i64,
    pub end_time: Option<i64>,
    pub successful_attempt_id: Option<AttemptId>,
    pub failed_attempts: u32,
    pub counters: Option<CounterRegistry>,
}

impl TaskInformation {
    pub fn scheduled_at(&self) -> Option<DateTime<Utc>> {
        millis_to_utc(Some(self.scheduled_time).filter(|t| *t > 0))
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        millis_to_utc(Some(self.start_time).filter(|t| *t > 0))
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        millis_to_utc(self.end_time)
    }

    /// Duración en ms, sólo si la tarea empezó y terminó.
    pub fn duration_ms(&self) -> Option<i64> {
        match self.end_time {
            Some(end) if self.start_time > 0 && end >= self.start_time => {
                Some(end - self.start_time)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> TaskInformation {
        TaskInformation {
            task_id: "task_1".to_string(),
            state: TaskState::Succeeded,
            diagnostics: None,
            start_time: 1470778337429,
            scheduled_time: 1470778337429,
            end_time: Some(1470778368202),
            successful_attempt_id: None,
            failed_attempts: 0,
            counters: None,
        }
    }

    #[test]
    fn duracion_de_tarea_terminada() {
        assert_eq!(task().duration_ms(), Some(30773));
    }

    #[test]
    fn sin_fin_no_hay_duracion() {
        let t = TaskInformation { end_time: None, ..task() };
        assert_eq!(t.duration_ms(), None);
        assert!(t.finished_at().is_none());
        assert!(t.started_at().is_some());
    }

    #[test]
    fn scheduled_en_cero_no_tiene_fecha() {
        assert_eq!(
            task().scheduled_at().map(|d| d.timestamp_millis()),
            Some(1470778337429)
        );
        let t = TaskInformation { scheduled_time: 0, ..task() };
        assert!(t.scheduled_at().is_none());
    }
}
