use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::json;
use crate::parser::parse_vertex_progress;
use crate::progress::Progress;
use crate::status::DagStatus;
use crate::VertexName;

/// Progreso del DAG completo más el progreso por nombre de vértice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexProgressSummary {
    pub dag_progress: Progress,
    pub vertex_progress: BTreeMap<VertexName, Progress>,
}

/// Suma los conteos de todos los vértices de una respuesta de lista
/// (`TEZ_VERTEX_ID?primaryFilter=TEZ_DAG_ID:<dag>`).
///
/// - total/failed/killed/succeeded se suman; running se vuelve a derivar.
/// - si dos entidades traen el mismo nombre gana la última.
/// - sin entidades el resultado es todo cero.
pub fn aggregate_vertex_progress(vertex_list_doc: &Value) -> VertexProgressSummary {
    let mut vertex_progress = BTreeMap::new();
    let mut per_vertex: Vec<Progress> = Vec::new();

    for entity in json::entities(vertex_list_doc) {
        match parse_vertex_progress(entity) {
            Some((name, progress)) => {
                if !progress.is_consistent() {
                    warn!(
                        "vértice {} con más tareas terminadas que totales",
                        name.as_deref().unwrap_or("<sin nombre>")
                    );
                }
                per_vertex.push(progress);
                match name {
                    Some(name) => {
                        vertex_progress.insert(name, progress);
                    }
                    None => warn!("vértice sin vertexName: cuenta para el DAG pero no aparece en el mapa"),
                }
            }
            None => debug!("entidad de vértice sin otherinfo, se ignora"),
        }
    }

    VertexProgressSummary {
        dag_progress: per_vertex.into_iter().sum(),
        vertex_progress,
    }
}

/// Completa el progreso de un `DagStatus` ya parseado.
pub fn apply_vertex_progress(status: &mut DagStatus, vertex_list_doc: &Value) {
    let summary = aggregate_vertex_progress(vertex_list_doc);
    status.dag_progress = summary.dag_progress;
    status.vertex_progress = summary.vertex_progress;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_dag_status;
    use crate::status::DagState;
    use serde_json::json;

    fn vertices(list: Vec<Value>) -> Value {
        json!({ "entities": list })
    }

    #[test]
    fn suma_vertices_y_deriva_running() {
        let doc = vertices(vec![
            json!({"otherinfo": {"vertexName": "v1", "numTasks": 5, "numFailedTasks": 1,
                "numSucceededTasks": 2, "numKilledTasks": 3, "numCompletedTasks": 3}}),
            json!({"otherinfo": {"vertexName": "v2", "numTasks": 10, "numFailedTasks": 1,
                "numSucceededTasks": 5, "numKilledTasks": 3, "numCompletedTasks": 4}}),
        ]);

        let summary = aggregate_vertex_progress(&doc);
        let p = summary.dag_progress;
        assert_eq!(p.total_task_count(), 15);
        assert_eq!(p.failed_task_count(), 2);
        assert_eq!(p.killed_task_count(), 6);
        assert_eq!(p.succeeded_task_count(), 7);
        assert_eq!(p.running_task_count(), 0);

        assert_eq!(summary.vertex_progress.len(), 2);
        assert!(summary.vertex_progress.contains_key("v1"));
        assert!(summary.vertex_progress.contains_key("v2"));
    }

    #[test]
    fn running_del_dag_con_tareas_en_curso() {
        let doc = vertices(vec![
            json!({"otherinfo": {"vertexName": "a", "numTasks": 5, "numFailedTasks": 1,
                "numKilledTasks": 1, "numSucceededTasks": 1}}),
            json!({"otherinfo": {"vertexName": "b", "numTasks": 10, "numFailedTasks": 1,
                "numKilledTasks": 2, "numSucceededTasks": 1}}),
        ]);

        let p = aggregate_vertex_progress(&doc).dag_progress;
        assert_eq!(p.total_task_count(), 15);
        assert_eq!(p.failed_task_count(), 2);
        assert_eq!(p.killed_task_count(), 3);
        assert_eq!(p.succeeded_task_count(), 2);
        assert_eq!(p.running_task_count(), 8);
    }

    #[test]
    fn sin_vertices_todo_en_cero() {
        let summary = aggregate_vertex_progress(&json!({ "entities": [] }));
        assert_eq!(summary, VertexProgressSummary::default());

        let summary = aggregate_vertex_progress(&json!({}));
        assert!(summary.vertex_progress.is_empty());
        assert_eq!(summary.dag_progress.total_task_count(), 0);
    }

    #[test]
    fn nombre_duplicado_gana_el_ultimo() {
        let doc = vertices(vec![
            json!({"otherinfo": {"vertexName": "v", "numTasks": 1}}),
            json!({"otherinfo": {"vertexName": "v", "numTasks": 4}}),
        ]);
        let summary = aggregate_vertex_progress(&doc);
        assert_eq!(summary.vertex_progress["v"].total_task_count(), 4);
        assert_eq!(summary.dag_progress.total_task_count(), 5);
    }

    #[test]
    fn vertice_sin_nombre_suma_pero_no_entra_al_mapa() {
        let doc = vertices(vec![
            json!({"otherinfo": {"numTasks": 3}}),
            json!({"entity": "sin_otherinfo"}),
        ]);
        let summary = aggregate_vertex_progress(&doc);
        assert!(summary.vertex_progress.is_empty());
        assert_eq!(summary.dag_progress.total_task_count(), 3);
    }

    #[test]
    fn apply_vertex_progress_completa_el_estado_del_dag() {
        let dag = json!({"otherinfo": {"status": "RUNNING", "diagnostics": "d"}});
        let verts = vertices(vec![
            json!({"otherinfo": {"vertexName": "v1", "numTasks": 4, "numSucceededTasks": 1}}),
        ]);

        let mut status = parse_dag_status(&dag, false).unwrap();
        apply_vertex_progress(&mut status, &verts);
        assert_eq!(status.state, DagState::Running);
        assert_eq!(status.dag_progress.running_task_count(), 3);
        assert_eq!(status.vertex_progress["v1"].succeeded_task_count(), 1);
    }

    #[test]
    fn vertice_inconsistente_se_suma_igual() {
        let doc = vertices(vec![
            json!({"otherinfo": {"vertexName": "v", "numTasks": 2, "numSucceededTasks": 3}}),
        ]);
        let summary = aggregate_vertex_progress(&doc);
        let p = summary.vertex_progress["v"];
        assert!(!p.is_consistent());
        assert_eq!(p.running_task_count(), 0);
        assert_eq!(summary.dag_progress.succeeded_task_count(), 3);
    }
}
