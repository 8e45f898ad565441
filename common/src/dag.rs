use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::counters::CounterRegistry;
use crate::status::DagState;
use crate::{ApplicationId, DagId, VertexId, VertexName};

/// Resumen del plan de ejecución (`otherinfo.dagPlan`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DagPlanSummary {
    pub name: Option<String>,
    pub vertices: Vec<PlanVertex>,
    pub edges: Vec<PlanEdge>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanVertex {
    pub name: VertexName,
    pub processor_class: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanEdge {
    pub from: VertexName,
    pub to: VertexName,
    /// ONE_TO_ONE, BROADCAST, SCATTER_GATHER, ...
    pub data_movement: Option<String>,
}

impl DagPlanSummary {
    /// Vértices que consumen la salida de `vertex`.
    pub fn successors(&self, vertex: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|e| e.from == vertex)
            .map(|e| e.to.as_str())
            .collect()
    }
}

/// Foto inmutable de un DAG. La igualdad es estructural.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DagInformation {
    pub dag_id: DagId,
    pub name: String,
    /// Epoch en milisegundos; 0 si el servicio no lo informa.
    pub start_time: i64,
    pub end_time: Option<i64>,
    pub application_id: Option<ApplicationId>,
    pub status: Option<DagState>,
    pub vertex_name_to_id: BTreeMap<VertexName, VertexId>,
    pub dag_plan: Option<DagPlanSummary>,
    pub counters: Option<CounterRegistry>,
}

impl DagInformation {
    pub fn vertex_id(&self, name: &str) -> Option<&str> {
        self.vertex_name_to_id.get(name).map(String::as_str)
    }

    pub fn vertex_name(&self, id: &str) -> Option<&str> {
        self.vertex_name_to_id
            .iter()
            .find(|(_, v)| v.as_str() == id)
            .map(|(k, _)| k.as_str())
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        millis_to_utc(Some(self.start_time).filter(|t| *t > 0))
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        millis_to_utc(self.end_time)
    }
}

pub(crate) fn millis_to_utc(millis: Option<i64>) -> Option<DateTime<Utc>> {
    millis.and_then(DateTime::<Utc>::from_timestamp_millis)
}
