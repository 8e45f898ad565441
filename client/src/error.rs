use thiserror::Error;
use timeline_common::ParseError;

/// Errores del cliente del timeline service.
#[derive(Debug, Error)]
pub enum TimelineError {
    /// Documento vacío o sin un campo obligatorio.
    #[error("respuesta mal formada: {0}")]
    MalformedResponse(String),

    /// Ninguna entidad de la respuesta de lista coincide.
    #[error("no se encontró {entity_type} '{id}'")]
    EntityNotFound { entity_type: String, id: String },

    /// La aplicación (o el timeline service) ya no está disponible.
    #[error("no se encontró la aplicación {0}")]
    ApplicationNotFound(String),

    /// Fallo de transporte; se propaga tal cual lo entregó el fetcher.
    #[error("error HTTP al pedir {url}: {source}")]
    Io {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("configuración inválida: {0}")]
    Config(String),
}

impl TimelineError {
    pub fn io(
        url: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        TimelineError::Io {
            url: url.into(),
            source: source.into(),
        }
    }

    /// true si conviene tratar el job como desaparecido.
    pub fn is_application_not_found(&self) -> bool {
        matches!(self, TimelineError::ApplicationNotFound(_))
    }
}

impl From<ParseError> for TimelineError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::MalformedResponse(msg) => TimelineError::MalformedResponse(msg),
            ParseError::EntityNotFound { entity_type, id } => {
                TimelineError::EntityNotFound { entity_type, id }
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, TimelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_se_traduce_variante_a_variante() {
        let e: TimelineError = ParseError::MalformedResponse("x".into()).into();
        assert!(matches!(e, TimelineError::MalformedResponse(m) if m == "x"));

        let e: TimelineError = ParseError::EntityNotFound {
            entity_type: "TEZ_VERTEX_ID".into(),
            id: "v1".into(),
        }
        .into();
        assert!(matches!(e, TimelineError::EntityNotFound { ref id, .. } if id == "v1"));
    }

    #[test]
    fn io_muestra_url_y_causa() {
        let e = TimelineError::io("http://h/ws/v1/timeline/X", "connection refused");
        let msg = e.to_string();
        assert!(msg.contains("http://h/ws/v1/timeline/X"));
        assert!(msg.contains("connection refused"));
        assert!(!e.is_application_not_found());
        assert!(TimelineError::ApplicationNotFound("app_1".into()).is_application_not_found());
    }
}
