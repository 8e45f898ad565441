use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use timeline_common::{
    apply_vertex_progress, parse_dag_information, parse_dag_status, parse_task_information,
    parse_task_information_list, parse_vertex_status, wants_counters, DagId, DagInformation,
    DagStatus, StatusGetOpts, TaskInformation, VertexStatus,
};

use crate::config::TimelineConfig;
use crate::discovery::{ApplicationBaseUri, BaseUriResolver, StaticBaseUri};
use crate::error::Result;
use crate::fetch::{HttpJsonFetcher, JsonFetcher};
use crate::query::{entity_url, EntityType, ListQuery, VERTEX_NAME_FILTER};

/// Cliente de sólo lectura del estado de un DAG en el timeline service.
///
/// No guarda nada entre llamadas salvo el id del DAG y la URL base,
/// que se resuelve una única vez en el primer uso. Cada operación hace
/// exactamente las consultas HTTP que necesita y devuelve el primer error.
pub struct TimelineClient {
    dag_id: DagId,
    fetcher: Arc<dyn JsonFetcher>,
    resolver: Arc<dyn BaseUriResolver>,
    base_uri: OnceCell<String>,
}

impl TimelineClient {
    pub fn new(
        dag_id: impl Into<DagId>,
        fetcher: Arc<dyn JsonFetcher>,
        resolver: Arc<dyn BaseUriResolver>,
    ) -> Self {
        Self {
            dag_id: dag_id.into(),
            fetcher,
            resolver,
            base_uri: OnceCell::new(),
        }
    }

    /// Cliente con URL base fija.
    pub fn with_base_uri(
        dag_id: impl Into<DagId>,
        base_uri: impl Into<String>,
        fetcher: Arc<dyn JsonFetcher>,
    ) -> Self {
        Self::new(dag_id, fetcher, Arc::new(StaticBaseUri::new(base_uri)))
    }

    /// Cliente HTTP armado desde la configuración. Con `application_id`
    /// la URL base se descubre comprobando que la aplicación exista.
    pub fn from_config(
        dag_id: impl Into<DagId>,
        application_id: Option<String>,
        config: &TimelineConfig,
    ) -> Result<Self> {
        let fetcher: Arc<dyn JsonFetcher> = Arc::new(HttpJsonFetcher::from_config(config)?);
        let resolver: Arc<dyn BaseUriResolver> = match application_id {
            Some(app_id) => Arc::new(ApplicationBaseUri::new(
                config.clone(),
                app_id,
                fetcher.clone(),
            )),
            None => Arc::new(StaticBaseUri::new(config.base_uri())),
        };
        Ok(Self::new(dag_id, fetcher, resolver))
    }

    pub fn dag_id(&self) -> &str {
        &self.dag_id
    }

    /// URL base; la primera llamada la resuelve y las concurrentes esperan
    /// ese mismo resultado. Un fallo no queda guardado.
    async fn base_uri(&self) -> Result<&str> {
        let base = self
            .base_uri
            .get_or_try_init(|| async {
                let base = self.resolver.resolve().await?;
                info!("usando timeline service en {}", base);
                Ok::<_, crate::error::TimelineError>(base)
            })
            .await?;
        Ok(base.as_str())
    }

    /// Estado del DAG: documento del DAG y luego la lista de sus vértices
    /// para calcular el progreso.
    pub async fn get_dag_status(&self, opts: &[StatusGetOpts]) -> Result<DagStatus> {
        let base = self.base_uri().await?;

        let dag_url = entity_url(base, EntityType::Dag, &self.dag_id);
        let dag_doc = self.fetcher.fetch_json(&dag_url).await?;
        let mut status = parse_dag_status(&dag_doc, wants_counters(opts))?;

        let vertex_url =
            ListQuery::new(EntityType::Vertex, EntityType::Dag.as_str(), &self.dag_id).url(base);
        let vertex_doc = self.fetcher.fetch_json(&vertex_url).await?;
        apply_vertex_progress(&mut status, &vertex_doc);

        Ok(status)
    }

    pub async fn get_vertex_status(
        &self,
        vertex_name: &str,
        opts: &[StatusGetOpts],
    ) -> Result<VertexStatus> {
        let base = self.base_uri().await?;

        let url = ListQuery::new(EntityType::Vertex, EntityType::Dag.as_str(), &self.dag_id)
            .secondary_filter(VERTEX_NAME_FILTER, vertex_name)
            .url(base);
        let doc = self.fetcher.fetch_json(&url).await?;

        Ok(parse_vertex_status(&doc, vertex_name, wants_counters(opts))?)
    }

    pub async fn get_dag_information(&self) -> Result<DagInformation> {
        let base = self.base_uri().await?;
        let url = entity_url(base, EntityType::Dag, &self.dag_id);
        let doc = self.fetcher.fetch_json(&url).await?;
        Ok(parse_dag_information(&doc)?)
    }

    /// Una tarea concreta. `vertex_id` no interviene en la URL: el id de la
    /// tarea ya identifica la entidad.
    pub async fn get_task_information(
        &self,
        vertex_id: &str,
        task_id: &str,
    ) -> Result<TaskInformation> {
        let base = self.base_uri().await?;
        debug!("tarea {} del vértice {}", task_id, vertex_id);

        let url = entity_url(base, EntityType::Task, task_id);
        let doc = self.fetcher.fetch_json(&url).await?;
        Ok(parse_task_information(&doc)?)
    }

    /// Página de tareas de un vértice. Sin `from_task_id` se pide la primera
    /// página; la última puede traer menos de `limit` tareas (o ninguna).
    pub async fn list_task_information(
        &self,
        vertex_id: &str,
        from_task_id: Option<&str>,
        limit: u32,
    ) -> Result<Vec<TaskInformation>> {
        let base = self.base_uri().await?;

        let url = ListQuery::new(EntityType::Task, EntityType::Vertex.as_str(), vertex_id)
            .limit(limit)
            .from_id(from_task_id)
            .url(base);
        let doc = self.fetcher.fetch_json(&url).await?;
        Ok(parse_task_information_list(&doc)?)
    }
}
