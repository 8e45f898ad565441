use std::fmt;

/// Campos que se piden siempre al timeline service.
pub const FIELDS: &str = "primaryfilters,otherinfo";

/// Clave del filtro secundario para buscar un vértice por nombre.
pub const VERTEX_NAME_FILTER: &str = "vertexName";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Application,
    Dag,
    Vertex,
    Task,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Application => "TEZ_APPLICATION",
            EntityType::Dag => "TEZ_DAG_ID",
            EntityType::Vertex => "TEZ_VERTEX_ID",
            EntityType::Task => "TEZ_TASK_ID",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `<base>/<TYPE>/<id>?fields=primaryfilters,otherinfo`
pub fn entity_url(base: &str, entity_type: EntityType, entity_id: &str) -> String {
    format!(
        "{}/{}/{}?fields={}",
        base.trim_end_matches('/'),
        entity_type,
        entity_id,
        FIELDS
    )
}

/// Consulta de lista:
/// `<base>/<TYPE>?primaryFilter=k:v[&secondaryFilter=k:v]&fields=...[&limit=n][&fromId=id]`
///
/// El orden de los parámetros es fijo. Los valores van tal cual, sin
/// URL-encoding: los ids del servicio ya son seguros para una URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery<'a> {
    entity_type: EntityType,
    primary_filter: (&'a str, &'a str),
    secondary_filter: Option<(&'a str, &'a str)>,
    limit: Option<u32>,
    from_id: Option<&'a str>,
}

impl<'a> ListQuery<'a> {
    pub fn new(entity_type: EntityType, key: &'a str, value: &'a str) -> Self {
        Self {
            entity_type,
            primary_filter: (key, value),
            secondary_filter: None,
            limit: None,
            from_id: None,
        }
    }

    pub fn secondary_filter(mut self, key: &'a str, value: &'a str) -> Self {
        self.secondary_filter = Some((key, value));
        self
    }

    /// Sólo un tamaño de página positivo agrega `limit`.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit).filter(|l| *l > 0);
        self
    }

    /// Token de continuación; `None` pide la primera página.
    pub fn from_id(mut self, from_id: Option<&'a str>) -> Self {
        self.from_id = from_id;
        self
    }

    pub fn url(&self, base: &str) -> String {
        let (key, value) = self.primary_filter;
        let mut url = format!(
            "{}/{}?primaryFilter={}:{}",
            base.trim_end_matches('/'),
            self.entity_type,
            key,
            value
        );

        if let Some((key, value)) = self.secondary_filter {
            url.push_str(&format!("&secondaryFilter={}:{}", key, value));
        }

        url.push_str(&format!("&fields={}", FIELDS));

        if let Some(limit) = self.limit {
            url.push_str(&format!("&limit={}", limit));
        }
        if let Some(from_id) = self.from_id {
            url.push_str(&format!("&fromId={}", from_id));
        }

        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://yarn.ats.webapp/ws/v1/timeline";

    #[test]
    fn url_de_una_entidad() {
        assert_eq!(
            entity_url(BASE, EntityType::Dag, "EXAMPLE_DAG_ID"),
            "http://yarn.ats.webapp/ws/v1/timeline/TEZ_DAG_ID/EXAMPLE_DAG_ID?fields=primaryfilters,otherinfo"
        );
        assert_eq!(
            entity_url(BASE, EntityType::Task, "task_1468518877269_3815_1_01_000001"),
            "http://yarn.ats.webapp/ws/v1/timeline/TEZ_TASK_ID/task_1468518877269_3815_1_01_000001?fields=primaryfilters,otherinfo"
        );
    }

    #[test]
    fn base_con_barra_final() {
        assert_eq!(
            entity_url("http://h/ws/v1/timeline/", EntityType::Application, "tez_app_1"),
            "http://h/ws/v1/timeline/TEZ_APPLICATION/tez_app_1?fields=primaryfilters,otherinfo"
        );
    }

    #[test]
    fn lista_con_filtro_primario() {
        let url = ListQuery::new(EntityType::Vertex, "TEZ_DAG_ID", "EXAMPLE_DAG_ID").url(BASE);
        assert_eq!(
            url,
            "http://yarn.ats.webapp/ws/v1/timeline/TEZ_VERTEX_ID?primaryFilter=TEZ_DAG_ID:EXAMPLE_DAG_ID&fields=primaryfilters,otherinfo"
        );
    }

    #[test]
    fn lista_con_filtro_secundario() {
        let url = ListQuery::new(EntityType::Vertex, "TEZ_DAG_ID", "EXAMPLE_DAG_ID")
            .secondary_filter(VERTEX_NAME_FILTER, "vertex1name")
            .url(BASE);
        assert_eq!(
            url,
            "http://yarn.ats.webapp/ws/v1/timeline/TEZ_VERTEX_ID?primaryFilter=TEZ_DAG_ID:EXAMPLE_DAG_ID&secondaryFilter=vertexName:vertex1name&fields=primaryfilters,otherinfo"
        );
    }

    #[test]
    fn paginacion_sin_from_id() {
        let url = ListQuery::new(EntityType::Task, "TEZ_VERTEX_ID", "vertex_1468518877269_3815_1_01")
            .limit(2)
            .from_id(None)
            .url(BASE);
        assert_eq!(
            url,
            "http://yarn.ats.webapp/ws/v1/timeline/TEZ_TASK_ID?primaryFilter=TEZ_VERTEX_ID:vertex_1468518877269_3815_1_01&fields=primaryfilters,otherinfo&limit=2"
        );
        assert!(!url.contains("fromId"));
    }

    #[test]
    fn paginacion_con_from_id() {
        let url = ListQuery::new(EntityType::Task, "TEZ_VERTEX_ID", "vertex_1468518877269_3815_1_01")
            .limit(2)
            .from_id(Some("task_1468518877269_3815_1_01_000002"))
            .url(BASE);
        assert_eq!(
            url,
            "http://yarn.ats.webapp/ws/v1/timeline/TEZ_TASK_ID?primaryFilter=TEZ_VERTEX_ID:vertex_1468518877269_3815_1_01&fields=primaryfilters,otherinfo&limit=2&fromId=task_1468518877269_3815_1_01_000002"
        );
    }

    #[test]
    fn limit_cero_no_agrega_parametro() {
        let url = ListQuery::new(EntityType::Task, "TEZ_VERTEX_ID", "v")
            .limit(0)
            .from_id(Some("t2"))
            .url(BASE);
        assert!(!url.contains("limit="));
        assert!(url.ends_with("&fields=primaryfilters,otherinfo&fromId=t2"));
    }
}
