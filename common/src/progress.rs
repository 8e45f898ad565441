use serde::Serialize;
use std::iter::Sum;
use std::ops::Add;
use tracing::warn;

/// Conteo de tareas de un DAG o de un vértice.
///
/// `running` nunca viene en el JSON: se deriva siempre aquí como
/// `total - failed - killed - succeeded`. Si los datos son inconsistentes
/// y el resultado sería negativo, se deja en 0 y se registra un warning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    total_task_count: u32,
    failed_task_count: u32,
    killed_task_count: u32,
    succeeded_task_count: u32,
    running_task_count: u32,
}

impl Progress {
    pub fn new(total: u32, failed: u32, killed: u32, succeeded: u32) -> Self {
        let finished = u64::from(failed) + u64::from(killed) + u64::from(succeeded);
        let running = match u64::from(total).checked_sub(finished) {
            Some(r) => r as u32,
            None => {
                warn!(
                    "conteo inconsistente: total={} < failed={} + killed={} + succeeded={}, running queda en 0",
                    total, failed, killed, succeeded
                );
                0
            }
        };

        Self {
            total_task_count: total,
            failed_task_count: failed,
            killed_task_count: killed,
            succeeded_task_count: succeeded,
            running_task_count: running,
        }
    }

    pub fn total_task_count(&self) -> u32 {
        self.total_task_count
    }

    pub fn failed_task_count(&self) -> u32 {
        self.failed_task_count
    }

    pub fn killed_task_count(&self) -> u32 {
        self.killed_task_count
    }

    pub fn succeeded_task_count(&self) -> u32 {
        self.succeeded_task_count
    }

    pub fn running_task_count(&self) -> u32 {
        self.running_task_count
    }

    /// false si failed + killed + succeeded supera al total.
    pub fn is_consistent(&self) -> bool {
        u64::from(self.failed_task_count)
            + u64::from(self.killed_task_count)
            + u64::from(self.succeeded_task_count)
            <= u64::from(self.total_task_count)
    }
}

impl Add for Progress {
    type Output = Progress;

    fn add(self, other: Progress) -> Progress {
        Progress::new(
            self.total_task_count.saturating_add(other.total_task_count),
            self.failed_task_count.saturating_add(other.failed_task_count),
            self.killed_task_count.saturating_add(other.killed_task_count),
            self.succeeded_task_count
                .saturating_add(other.succeeded_task_count),
        )
    }
}

impl Sum for Progress {
    fn sum<I: Iterator<Item = Progress>>(iter: I) -> Progress {
        iter.fold(Progress::default(), Add::add)
    }
}
