pub mod aggregate;
pub mod counters;
pub mod dag;
pub mod error;
pub mod json;
pub mod parser;
pub mod progress;
pub mod status;
pub mod task;

// Identificadores opacos del timeline service (ej: dag_<ts>_<app>_<seq>).
pub type DagId = String;
pub type VertexId = String;
pub type VertexName = String;
pub type TaskId = String;
pub type AttemptId = String;
pub type ApplicationId = String;

pub use aggregate::{
    aggregate_vertex_progress, apply_vertex_progress, VertexProgressSummary,
};
pub use counters::{Counter, CounterGroup, CounterRegistry};
pub use dag::{DagInformation, DagPlanSummary, PlanEdge, PlanVertex};
pub use error::ParseError;
pub use parser::{
    parse_counters, parse_dag_information, parse_dag_status, parse_task_information,
    parse_task_information_list, parse_vertex_status,
};
pub use progress::Progress;
pub use status::{wants_counters, DagState, DagStatus, StatusGetOpts, VertexState, VertexStatus};
pub use task::{TaskInformation, TaskState};
