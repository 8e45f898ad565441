use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::config::TimelineConfig;
use crate::error::{Result, TimelineError};

/// Capacidad de hacer un GET y devolver el cuerpo como JSON.
///
/// Cualquier respuesta no 2xx o error de conexión es un error de transporte;
/// el cliente no interpreta códigos HTTP. Reintentos, timeouts y
/// autenticación quedan del lado de la implementación.
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    async fn fetch_json(&self, url: &str) -> Result<Value>;
}

/// Implementación sobre reqwest.
#[derive(Debug, Clone)]
pub struct HttpJsonFetcher {
    http: Client,
}

impl HttpJsonFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TimelineError::Config(format!("no se pudo crear el cliente HTTP: {e}")))?;
        Ok(Self { http })
    }

    pub fn from_config(config: &TimelineConfig) -> Result<Self> {
        Self::new(config.http_timeout)
    }

    /// Usa un `reqwest::Client` ya armado (proxy, TLS, auth, ...).
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl JsonFetcher for HttpJsonFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Value> {
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| TimelineError::io(url, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TimelineError::io(
                url,
                format!("el servidor devolvió status {}", status),
            ));
        }

        let body = resp.text().await.map_err(|e| TimelineError::io(url, e))?;

        serde_json::from_str(&body).map_err(|e| {
            TimelineError::MalformedResponse(format!("JSON inválido desde {}: {}", url, e))
        })
    }
}
