use std::{env, time::Duration};

pub const DEFAULT_WEBAPP_ADDRESS: &str = "localhost:8188";
pub const DEFAULT_WEBAPP_HTTPS_ADDRESS: &str = "localhost:8190";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Ruta del API de consultas del timeline service.
pub const TIMELINE_PATH: &str = "/ws/v1/timeline";

/// Configuración del cliente.
///
/// Se lee de variables de entorno con valores por defecto:
/// - `TIMELINE_BASE_URL`: URL base completa (ignora dirección y esquema)
/// - `TIMELINE_WEBAPP_ADDRESS` / `TIMELINE_WEBAPP_HTTPS_ADDRESS`
/// - `TIMELINE_HTTPS`: `true`/`1`/`yes` para usar https
/// - `TIMELINE_HTTP_TIMEOUT_SECS`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineConfig {
    pub base_url: Option<String>,
    pub webapp_address: String,
    pub webapp_https_address: String,
    pub https: bool,
    pub http_timeout: Duration,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            webapp_address: DEFAULT_WEBAPP_ADDRESS.to_string(),
            webapp_https_address: DEFAULT_WEBAPP_HTTPS_ADDRESS.to_string(),
            https: false,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl TimelineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero con una función de búsqueda arbitraria.
    /// Valores que no se pueden parsear caen al default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            base_url: non_empty("TIMELINE_BASE_URL"),
            webapp_address: non_empty("TIMELINE_WEBAPP_ADDRESS").unwrap_or(defaults.webapp_address),
            webapp_https_address: non_empty("TIMELINE_WEBAPP_HTTPS_ADDRESS")
                .unwrap_or(defaults.webapp_https_address),
            https: non_empty("TIMELINE_HTTPS")
                .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
                .unwrap_or(defaults.https),
            http_timeout: non_empty("TIMELINE_HTTP_TIMEOUT_SECS")
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeout),
        }
    }

    /// `<scheme>://<address>/ws/v1/timeline`
    pub fn base_uri(&self) -> String {
        if let Some(ref base) = self.base_url {
            return base.trim_end_matches('/').to_string();
        }

        if self.https {
            format!("https://{}{}", self.webapp_https_address, TIMELINE_PATH)
        } else {
            format!("http://{}{}", self.webapp_address, TIMELINE_PATH)
        }
    }
}
