use thiserror::Error;

/// Errores al mapear documentos del timeline service a tipos del dominio.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Documento vacío o sin un campo obligatorio (status/state, id de entidad).
    #[error("respuesta mal formada: {0}")]
    MalformedResponse(String),

    /// Respuesta de lista sin ninguna entidad que coincida.
    #[error("no se encontró {entity_type} '{id}'")]
    EntityNotFound { entity_type: String, id: String },
}
