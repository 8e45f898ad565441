use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::counters::CounterRegistry;
use crate::progress::Progress;
use crate::{VertexId, VertexName};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DagState {
    Submitted,
    Initing,
    Running,
    Succeeded,
    Failed,
    Killed,
    Error,
}

impl DagState {
    /// true si el DAG ya no va a cambiar de estado.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DagState::Succeeded | DagState::Failed | DagState::Killed | DagState::Error
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VertexState {
    New,
    Initializing,
    Inited,
    Running,
    Committing,
    Succeeded,
    Failed,
    Killed,
    Error,
    Terminating,
}

/// Opciones de consulta de estado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusGetOpts {
    /// Parsear también los contadores (`otherinfo.counters`).
    GetCounters,
}

pub fn wants_counters(opts: &[StatusGetOpts]) -> bool {
    opts.contains(&StatusGetOpts::GetCounters)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DagStatus {
    pub state: DagState,
    /// Cero o un mensaje: el servicio devuelve un único string.
    pub diagnostics: Vec<String>,
    pub dag_progress: Progress,
    pub vertex_progress: BTreeMap<VertexName, Progress>,
    pub dag_counters: Option<CounterRegistry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VertexStatus {
    /// Id del vértice (`entity`), si el servicio lo incluye.
    pub vertex_id: Option<VertexId>,
    pub state: VertexState,
    pub diagnostics: Vec<String>,
    pub progress: Progress,
    pub vertex_counters: Option<CounterRegistry>,
}
