use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::ParseError;

/// Objeto JSON genérico tal como lo devuelve el timeline service.
pub type JsonObject = Map<String, Value>;

/* --------- Nombres de campos del timeline service --------- */

pub const ENTITY: &str = "entity";
pub const ENTITIES: &str = "entities";
pub const START_TIME_TOP: &str = "starttime";
pub const PRIMARY_FILTERS: &str = "primaryfilters";
pub const OTHER_INFO: &str = "otherinfo";

pub const STATUS: &str = "status";
pub const STATE: &str = "state";
pub const DIAGNOSTICS: &str = "diagnostics";
pub const COUNTERS: &str = "counters";
pub const COUNTER_GROUPS: &str = "counterGroups";
pub const COUNTER_GROUP_NAME: &str = "counterGroupName";
pub const COUNTER_GROUP_DISPLAY_NAME: &str = "counterGroupDisplayName";
pub const COUNTER_NAME: &str = "counterName";
pub const COUNTER_DISPLAY_NAME: &str = "counterDisplayName";
pub const COUNTER_VALUE: &str = "counterValue";

pub const VERTEX_NAME: &str = "vertexName";
pub const NUM_TASKS: &str = "numTasks";
pub const NUM_FAILED_TASKS: &str = "numFailedTasks";
pub const NUM_SUCCEEDED_TASKS: &str = "numSucceededTasks";
pub const NUM_KILLED_TASKS: &str = "numKilledTasks";
pub const NUM_COMPLETED_TASKS: &str = "numCompletedTasks";

pub const DAG_NAME: &str = "dagName";
pub const DAG_PLAN: &str = "dagPlan";
pub const APPLICATION_ID: &str = "applicationId";
pub const START_TIME: &str = "startTime";
pub const END_TIME: &str = "endTime";
pub const SCHEDULED_TIME: &str = "scheduledTime";
pub const VERTEX_NAME_ID_MAPPING: &str = "vertexNameIdMapping";
pub const SUCCESSFUL_ATTEMPT_ID: &str = "successfulAttemptId";
pub const NUM_FAILED_TASK_ATTEMPTS: &str = "numFailedTaskAttempts";

// dagPlan
pub const PLAN_VERTICES: &str = "vertices";
pub const PLAN_EDGES: &str = "edges";
pub const PROCESSOR_CLASS: &str = "processorClass";
pub const INPUT_VERTEX_NAME: &str = "inputVertexName";
pub const OUTPUT_VERTEX_NAME: &str = "outputVertexName";
pub const DATA_MOVEMENT_TYPE: &str = "dataMovementType";

/* --------- Navegación --------- */

/// Devuelve el objeto `otherinfo` del documento.
/// Un documento sin `otherinfo` (ej: `{}`) no describe ninguna entidad.
pub fn other_info(doc: &Value) -> Result<&JsonObject, ParseError> {
    doc.get(OTHER_INFO)
        .and_then(Value::as_object)
        .ok_or_else(|| ParseError::MalformedResponse(format!("falta el objeto '{OTHER_INFO}'")))
}

/// Lista `entities[]` de una respuesta de tipo lista. Sin lista => vacío.
pub fn entities(doc: &Value) -> &[Value] {
    doc.get(ENTITIES)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub fn optional_object<'a>(obj: &'a JsonObject, key: &str) -> Option<&'a JsonObject> {
    obj.get(key).and_then(Value::as_object)
}

/* --------- Extracción de escalares --------- */

pub fn optional_str(obj: &JsonObject, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

pub fn required_str(obj: &JsonObject, key: &str) -> Result<String, ParseError> {
    optional_str(obj, key)
        .ok_or_else(|| ParseError::MalformedResponse(format!("falta el campo '{key}'")))
}

/// Primer string de un arreglo, como en `primaryfilters.dagName: ["x"]`.
pub fn first_str_in_array(obj: &JsonObject, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_array)
        .and_then(|arr| arr.first())
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Entero tolerante: acepta números JSON y strings numéricos.
/// Cualquier otra cosa cuenta como ausente.
pub fn optional_i64(obj: &JsonObject, key: &str) -> Option<i64> {
    match obj.get(key)? {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Igual que `optional_i64` pero descarta negativos y desbordes.
pub fn optional_u32(obj: &JsonObject, key: &str) -> Option<u32> {
    optional_i64(obj, key).and_then(|v| u32::try_from(v).ok())
}

/// Parsea un enum serializado como string (ej: "SUCCEEDED").
pub fn required_enum<T: DeserializeOwned>(obj: &JsonObject, key: &str) -> Result<T, ParseError> {
    let raw = required_str(obj, key)?;
    serde_json::from_value(Value::String(raw.clone())).map_err(|_| {
        ParseError::MalformedResponse(format!("valor '{raw}' no válido para '{key}'"))
    })
}

/// Variante opcional: un valor no reconocido se registra y se trata como ausente.
pub fn optional_enum<T: DeserializeOwned>(obj: &JsonObject, key: &str) -> Option<T> {
    let raw = optional_str(obj, key)?;
    match serde_json::from_value(Value::String(raw.clone())) {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("valor '{}' no reconocido para '{}', se ignora", raw, key);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::DagState;
    use serde_json::json;

    fn obj(v: Value) -> JsonObject {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn optional_i64_acepta_numeros_y_strings() {
        let o = obj(json!({"a": 7, "b": "42", "c": 3.0, "d": "x", "e": true, "f": 2.5}));
        assert_eq!(optional_i64(&o, "a"), Some(7));
        assert_eq!(optional_i64(&o, "b"), Some(42));
        assert_eq!(optional_i64(&o, "c"), Some(3));
        assert_eq!(optional_i64(&o, "d"), None);
        assert_eq!(optional_i64(&o, "e"), None);
        assert_eq!(optional_i64(&o, "f"), None);
        assert_eq!(optional_i64(&o, "missing"), None);
    }

    #[test]
    fn optional_u32_descarta_negativos() {
        let o = obj(json!({"neg": -1, "ok": 5}));
        assert_eq!(optional_u32(&o, "neg"), None);
        assert_eq!(optional_u32(&o, "ok"), Some(5));
    }

    #[test]
    fn required_enum_falla_con_valor_desconocido() {
        let o = obj(json!({"status": "SUCCEEDED", "bad": "DONE"}));
        let ok: DagState = required_enum(&o, "status").unwrap();
        assert_eq!(ok, DagState::Succeeded);

        let err = required_enum::<DagState>(&o, "bad").unwrap_err();
        assert!(matches!(err, ParseError::MalformedResponse(_)));

        let missing = required_enum::<DagState>(&o, "nope").unwrap_err();
        assert!(matches!(missing, ParseError::MalformedResponse(_)));
    }

    #[test]
    fn optional_enum_ignora_valores_no_reconocidos() {
        let o = obj(json!({"status": "WHATEVER"}));
        assert_eq!(optional_enum::<DagState>(&o, "status"), None);
    }

    #[test]
    fn other_info_ausente_es_respuesta_mal_formada() {
        assert!(other_info(&json!({})).is_err());
        assert!(other_info(&json!({"otherinfo": 3})).is_err());
        assert!(other_info(&json!({"otherinfo": {}})).is_ok());
    }

    #[test]
    fn entities_sin_lista_devuelve_vacio() {
        assert!(entities(&json!({})).is_empty());
        assert_eq!(entities(&json!({"entities": [{}, {}]})).len(), 2);
    }

    #[test]
    fn first_str_in_array_toma_el_primero() {
        let o = obj(json!({"dagName": ["Test DAG", "otro"], "vacio": []}));
        assert_eq!(first_str_in_array(&o, "dagName").as_deref(), Some("Test DAG"));
        assert_eq!(first_str_in_array(&o, "vacio"), None);
    }
}
