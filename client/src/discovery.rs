use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::TimelineConfig;
use crate::error::{Result, TimelineError};
use crate::fetch::JsonFetcher;
use crate::query::{entity_url, EntityType};

/// Resuelve la URL base del timeline service (`<scheme>://<host>/ws/v1/timeline`).
#[async_trait]
pub trait BaseUriResolver: Send + Sync {
    async fn resolve(&self) -> Result<String>;
}

/// URL base fija.
#[derive(Debug, Clone)]
pub struct StaticBaseUri(String);

impl StaticBaseUri {
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self(base_uri.into())
    }
}

#[async_trait]
impl BaseUriResolver for StaticBaseUri {
    async fn resolve(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Arma la URL base desde la configuración y comprueba que la aplicación
/// exista consultando su entidad `TEZ_APPLICATION/tez_<appId>`.
pub struct ApplicationBaseUri {
    config: TimelineConfig,
    application_id: String,
    fetcher: Arc<dyn JsonFetcher>,
}

impl ApplicationBaseUri {
    pub fn new(
        config: TimelineConfig,
        application_id: impl Into<String>,
        fetcher: Arc<dyn JsonFetcher>,
    ) -> Self {
        Self {
            config,
            application_id: application_id.into(),
            fetcher,
        }
    }
}

#[async_trait]
impl BaseUriResolver for ApplicationBaseUri {
    async fn resolve(&self) -> Result<String> {
        let base = self.config.base_uri();
        let url = entity_url(
            &base,
            EntityType::Application,
            &format!("tez_{}", self.application_id),
        );

        match self.fetcher.fetch_json(&url).await {
            Ok(doc) if doc.as_object().map_or(false, |o| !o.is_empty()) => {
                info!(
                    "timeline service para la aplicación {} en {}",
                    self.application_id, base
                );
                Ok(base)
            }
            Ok(_) => {
                warn!("el timeline service no conoce la aplicación {}", self.application_id);
                Err(TimelineError::ApplicationNotFound(self.application_id.clone()))
            }
            Err(e) => {
                warn!(
                    "no se pudo consultar la aplicación {} en {}: {}",
                    self.application_id, base, e
                );
                Err(TimelineError::ApplicationNotFound(self.application_id.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    /// Devuelve siempre el mismo resultado y anota las URLs pedidas.
    struct OneDocFetcher {
        doc: Option<Value>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl JsonFetcher for OneDocFetcher {
        async fn fetch_json(&self, url: &str) -> Result<Value> {
            self.calls.lock().unwrap().push(url.to_string());
            self.doc
                .clone()
                .ok_or_else(|| TimelineError::io(url, "connection refused"))
        }
    }

    fn config() -> TimelineConfig {
        TimelineConfig {
            webapp_address: "ats:8188".to_string(),
            ..TimelineConfig::default()
        }
    }

    #[tokio::test]
    async fn static_devuelve_la_base_fija() {
        let r = StaticBaseUri::new("http://yarn.ats.webapp/ws/v1/timeline");
        assert_eq!(r.resolve().await.unwrap(), "http://yarn.ats.webapp/ws/v1/timeline");
    }

    #[tokio::test]
    async fn aplicacion_existente_resuelve_la_base() {
        let fetcher = Arc::new(OneDocFetcher {
            doc: Some(json!({"entity": "tez_application_1_2", "otherinfo": {}})),
            calls: Mutex::new(Vec::new()),
        });
        let r = ApplicationBaseUri::new(config(), "application_1_2", fetcher.clone());

        assert_eq!(r.resolve().await.unwrap(), "http://ats:8188/ws/v1/timeline");
        assert_eq!(
            fetcher.calls.lock().unwrap().as_slice(),
            ["http://ats:8188/ws/v1/timeline/TEZ_APPLICATION/tez_application_1_2?fields=primaryfilters,otherinfo"]
        );
    }

    #[tokio::test]
    async fn documento_vacio_es_application_not_found() {
        let fetcher = Arc::new(OneDocFetcher {
            doc: Some(json!({})),
            calls: Mutex::new(Vec::new()),
        });
        let r = ApplicationBaseUri::new(config(), "application_1_2", fetcher);
        let err = r.resolve().await.unwrap_err();
        assert!(matches!(err, TimelineError::ApplicationNotFound(ref id) if id == "application_1_2"));
    }

    #[tokio::test]
    async fn fallo_de_transporte_es_application_not_found() {
        let fetcher = Arc::new(OneDocFetcher {
            doc: None,
            calls: Mutex::new(Vec::new()),
        });
        let r = ApplicationBaseUri::new(config(), "application_1_2", fetcher);
        assert!(r.resolve().await.unwrap_err().is_application_not_found());
    }
}
