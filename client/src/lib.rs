//! Cliente de sólo lectura del timeline service para DAGs de Tez.
//!
//! El parseo y la agregación viven en `timeline-common`; aquí sólo está
//! el transporte (HTTP), la resolución de la URL base y la fachada.

pub mod client;
pub mod config;
pub mod discovery;
pub mod error;
pub mod fetch;
pub mod query;

pub use client::TimelineClient;
pub use config::TimelineConfig;
pub use discovery::{ApplicationBaseUri, BaseUriResolver, StaticBaseUri};
pub use error::{Result, TimelineError};
pub use fetch::{HttpJsonFetcher, JsonFetcher};
pub use query::{entity_url, EntityType, ListQuery};

pub use timeline_common::{
    CounterRegistry, DagInformation, DagState, DagStatus, Progress, StatusGetOpts,
    TaskInformation, TaskState, VertexState, VertexStatus,
};
