use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::counters::CounterRegistry;
use crate::dag::{DagInformation, DagPlanSummary, PlanEdge, PlanVertex};
use crate::error::ParseError;
use crate::json::{self, JsonObject};
use crate::progress::Progress;
use crate::status::{DagState, DagStatus, VertexState, VertexStatus};
use crate::task::{TaskInformation, TaskState};
use crate::VertexName;

/// Tipo de entidad que se informa cuando no aparece un vértice en la lista.
pub const VERTEX_ENTITY_TYPE: &str = "TEZ_VERTEX_ID";

/* =========================
   DAG
   ========================= */

/// Estado de un DAG a partir de su documento (`TEZ_DAG_ID/<id>`).
/// El progreso queda en cero: lo completa el agregador con la lista de vértices.
pub fn parse_dag_status(doc: &Value, with_counters: bool) -> Result<DagStatus, ParseError> {
    let other = json::other_info(doc)?;
    let state: DagState = json::required_enum(other, json::STATUS)?;

    Ok(DagStatus {
        state,
        diagnostics: diagnostics(other),
        dag_progress: Progress::default(),
        vertex_progress: BTreeMap::new(),
        dag_counters: if with_counters {
            read_counters(other)
        } else {
            None
        },
    })
}

pub fn parse_dag_information(doc: &Value) -> Result<DagInformation, ParseError> {
    let root = root_object(doc)?;
    let other = json::other_info(doc)?;
    let dag_id = json::required_str(root, json::ENTITY)?;
    let primary = json::optional_object(root, json::PRIMARY_FILTERS);

    let dag_plan = json::optional_object(other, json::DAG_PLAN).map(parse_dag_plan);

    // el nombre sale del plan y, si no está, de los primary filters
    let name = dag_plan
        .as_ref()
        .and_then(|p| p.name.clone())
        .or_else(|| primary.and_then(|p| json::first_str_in_array(p, json::DAG_NAME)))
        .unwrap_or_default();

    let application_id = json::optional_str(other, json::APPLICATION_ID)
        .or_else(|| primary.and_then(|p| json::first_str_in_array(p, json::APPLICATION_ID)));

    let vertex_name_to_id = json::optional_object(other, json::VERTEX_NAME_ID_MAPPING)
        .map(|mapping| {
            mapping
                .iter()
                .filter_map(|(name, id)| id.as_str().map(|id| (name.clone(), id.to_string())))
                .collect()
        })
        .unwrap_or_default();

    Ok(DagInformation {
        dag_id,
        name,
        start_time: json::optional_i64(root, json::START_TIME_TOP)
            .or_else(|| json::optional_i64(other, json::START_TIME))
            .unwrap_or(0),
        end_time: json::optional_i64(other, json::END_TIME),
        application_id,
        status: json::optional_enum(other, json::STATUS),
        vertex_name_to_id,
        dag_plan,
        counters: read_counters(other),
    })
}

fn parse_dag_plan(plan: &JsonObject) -> DagPlanSummary {
    let vertices = array_objects(plan, json::PLAN_VERTICES)
        .filter_map(|v| {
            Some(PlanVertex {
                name: json::optional_str(v, json::VERTEX_NAME)?,
                processor_class: json::optional_str(v, json::PROCESSOR_CLASS),
            })
        })
        .collect();

    let edges = array_objects(plan, json::PLAN_EDGES)
        .filter_map(|e| {
            Some(PlanEdge {
                from: json::optional_str(e, json::INPUT_VERTEX_NAME)?,
                to: json::optional_str(e, json::OUTPUT_VERTEX_NAME)?,
                data_movement: json::optional_str(e, json::DATA_MOVEMENT_TYPE),
            })
        })
        .collect();

    DagPlanSummary {
        name: json::optional_str(plan, json::DAG_NAME),
        vertices,
        edges,
    }
}

/* =========================
   Vértices
   ========================= */

/// Conteos de tareas de un `otherinfo` de vértice.
pub fn parse_progress(other: &JsonObject) -> Progress {
    let count = |key| json::optional_u32(other, key).unwrap_or(0);
    let progress = Progress::new(
        count(json::NUM_TASKS),
        count(json::NUM_FAILED_TASKS),
        count(json::NUM_KILLED_TASKS),
        count(json::NUM_SUCCEEDED_TASKS),
    );

    // numCompletedTasks no se usa para derivar nada, sólo se compara
    if let Some(completed) = json::optional_u32(other, json::NUM_COMPLETED_TASKS) {
        let finished = u64::from(progress.failed_task_count())
            + u64::from(progress.killed_task_count())
            + u64::from(progress.succeeded_task_count());
        if u64::from(completed) != finished {
            debug!(
                "numCompletedTasks={} distinto de failed+killed+succeeded={}",
                completed, finished
            );
        }
    }

    progress
}

/// Par (nombre, progreso) de una entidad de vértice de una respuesta de lista.
/// `None` si la entidad no trae `otherinfo`.
pub fn parse_vertex_progress(entity: &Value) -> Option<(Option<VertexName>, Progress)> {
    let other = entity.get(json::OTHER_INFO).and_then(Value::as_object)?;
    Some((json::optional_str(other, json::VERTEX_NAME), parse_progress(other)))
}

/// Estado del vértice `vertex_name` dentro de una respuesta de lista;
/// las demás entidades se ignoran.
pub fn parse_vertex_status(
    list_doc: &Value,
    vertex_name: &str,
    with_counters: bool,
) -> Result<VertexStatus, ParseError> {
    let entity = json::entities(list_doc)
        .iter()
        .find(|e| {
            e.get(json::OTHER_INFO)
                .and_then(|o| o.get(json::VERTEX_NAME))
                .and_then(Value::as_str)
                == Some(vertex_name)
        })
        .ok_or_else(|| ParseError::EntityNotFound {
            entity_type: VERTEX_ENTITY_TYPE.to_string(),
            id: vertex_name.to_string(),
        })?;

    let other = json::other_info(entity)?;
    let state: VertexState = json::required_enum(other, json::STATUS)?;

    Ok(VertexStatus {
        vertex_id: entity
            .get(json::ENTITY)
            .and_then(Value::as_str)
            .map(str::to_string),
        state,
        diagnostics: diagnostics(other),
        progress: parse_progress(other),
        vertex_counters: if with_counters {
            read_counters(other)
        } else {
            None
        },
    })
}

/* =========================
   Tareas
   ========================= */

pub fn parse_task_information(doc: &Value) -> Result<TaskInformation, ParseError> {
    let root = root_object(doc)?;
    let other = json::other_info(doc)?;
    let task_id = json::required_str(root, json::ENTITY)?;

    // el servicio publica `status`; versiones viejas usan `state`
    let state: TaskState = if json::optional_str(other, json::STATUS).is_some() {
        json::required_enum(other, json::STATUS)?
    } else {
        json::required_enum(other, json::STATE)?
    };

    Ok(TaskInformation {
        task_id,
        state,
        diagnostics: json::optional_str(other, json::DIAGNOSTICS),
        start_time: json::optional_i64(other, json::START_TIME)
            .or_else(|| json::optional_i64(root, json::START_TIME_TOP))
            .unwrap_or(0),
        scheduled_time: json::optional_i64(other, json::SCHEDULED_TIME).unwrap_or(0),
        end_time: json::optional_i64(other, json::END_TIME),
        successful_attempt_id: json::optional_str(other, json::SUCCESSFUL_ATTEMPT_ID),
        failed_attempts: json::optional_u32(other, json::NUM_FAILED_TASK_ATTEMPTS).unwrap_or(0),
        counters: read_counters(other),
    })
}

/// Aplica `parse_task_information` a cada entidad respetando el orden del servicio.
pub fn parse_task_information_list(doc: &Value) -> Result<Vec<TaskInformation>, ParseError> {
    json::entities(doc)
        .iter()
        .map(parse_task_information)
        .collect()
}

/* =========================
   Contadores
   ========================= */

/// `otherinfo.counters` si viene; su ausencia nunca es un error.
pub fn read_counters(other: &JsonObject) -> Option<CounterRegistry> {
    other.get(json::COUNTERS).map(parse_counters)
}

/// Convierte `{ counterGroups: [ { counterGroupName, counters: [...] } ] }`
/// en un registro. Entradas sin nombre se descartan.
pub fn parse_counters(counters: &Value) -> CounterRegistry {
    let mut registry = CounterRegistry::new();

    let groups = counters
        .get(json::COUNTER_GROUPS)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    for group_json in groups.iter().filter_map(Value::as_object) {
        let Some(group_name) = json::optional_str(group_json, json::COUNTER_GROUP_NAME) else {
            warn!("grupo de contadores sin '{}', se ignora", json::COUNTER_GROUP_NAME);
            continue;
        };
        let group_display = json::optional_str(group_json, json::COUNTER_GROUP_DISPLAY_NAME)
            .unwrap_or_else(|| group_name.clone());

        let group = registry.group_or_insert(&group_name, &group_display);

        for counter in array_objects(group_json, json::COUNTERS) {
            let Some(name) = json::optional_str(counter, json::COUNTER_NAME) else {
                warn!("contador sin nombre en el grupo {}, se ignora", group_name);
                continue;
            };
            let display = json::optional_str(counter, json::COUNTER_DISPLAY_NAME)
                .unwrap_or_else(|| name.clone());
            let value = json::optional_i64(counter, json::COUNTER_VALUE).unwrap_or(0);
            group.increment(&name, &display, value);
        }
    }

    registry
}

/* --------- helpers --------- */

fn root_object(doc: &Value) -> Result<&JsonObject, ParseError> {
    doc.as_object()
        .ok_or_else(|| ParseError::MalformedResponse("el documento no es un objeto".to_string()))
}

fn diagnostics(other: &JsonObject) -> Vec<String> {
    json::optional_str(other, json::DIAGNOSTICS)
        .filter(|d| !d.is_empty())
        .into_iter()
        .collect()
}

fn array_objects<'a>(obj: &'a JsonObject, key: &str) -> impl Iterator<Item = &'a JsonObject> {
    obj.get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}
