use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use timeline_client::{
    CounterRegistry, DagInformation, DagStatus, Progress, StatusGetOpts, TaskInformation,
    TimelineClient, TimelineConfig, VertexStatus,
};

/// La URL del timeline service sale del entorno:
/// - `TIMELINE_BASE_URL=http://ats:8188/ws/v1/timeline`
/// - o `TIMELINE_WEBAPP_ADDRESS` (default localhost:8188)
#[derive(Parser)]
#[command(name = "dag-status")]
#[command(about = "Consulta el estado de un DAG de Tez en el timeline service")]
struct Cli {
    /// Id del DAG (ej: dag_1468518877269_2795_1)
    #[arg(long, value_name = "DAG_ID")]
    dag_id: String,

    /// Id de la aplicación YARN; si se indica, se comprueba que exista
    #[arg(long, value_name = "APP_ID")]
    app_id: Option<String>,

    /// Incluye contadores en dag / vertex / tasks
    #[arg(long)]
    counters: bool,

    /// Salida en JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estado del DAG y progreso por vértice
    Dag,
    /// Estado de un vértice por nombre
    Vertex {
        #[arg(value_name = "NOMBRE")]
        name: String,
    },
    /// Información estática del DAG
    Info,
    /// Una tarea
    Task {
        #[arg(value_name = "VERTEX_ID")]
        vertex_id: String,
        #[arg(value_name = "TASK_ID")]
        task_id: String,
    },
    /// Página de tareas de un vértice
    Tasks {
        #[arg(value_name = "VERTEX_ID")]
        vertex_id: String,

        /// Primera tarea de la página (incluida: fromId no la salta)
        #[arg(long, value_name = "TASK_ID")]
        from: Option<String>,

        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = TimelineConfig::from_env();
    let client = TimelineClient::from_config(cli.dag_id.clone(), cli.app_id.clone(), &config)
        .context("no se pudo crear el cliente HTTP")?;

    let opts: &[StatusGetOpts] = if cli.counters {
        &[StatusGetOpts::GetCounters]
    } else {
        &[]
    };

    match cli.command {
        Commands::Dag => {
            let status = client.get_dag_status(opts).await?;
            if cli.json {
                print_json(&status)?;
            } else {
                print_dag_status(client.dag_id(), &status);
            }
        }

        Commands::Vertex { name } => {
            let status = client.get_vertex_status(&name, opts).await?;
            if cli.json {
                print_json(&status)?;
            } else {
                print_vertex_status(&name, &status);
            }
        }

        Commands::Info => {
            let info = client.get_dag_information().await?;
            if cli.json {
                print_json(&info)?;
            } else {
                print_dag_information(&info);
            }
        }

        Commands::Task { vertex_id, task_id } => {
            let task = client.get_task_information(&vertex_id, &task_id).await?;
            if cli.json {
                print_json(&task)?;
            } else {
                print_task(&task);
            }
        }

        Commands::Tasks {
            vertex_id,
            from,
            limit,
        } => {
            let tasks = client
                .list_task_information(&vertex_id, from.as_deref(), limit)
                .await?;
            if cli.json {
                print_json(&tasks)?;
            } else if tasks.is_empty() {
                println!("No hay tareas para el vértice {}", vertex_id);
            } else {
                println!("Tareas de {} ({}):", vertex_id, tasks.len());
                for t in &tasks {
                    print_task(t);
                }
                if cli.counters {
                    let mut total = CounterRegistry::new();
                    for counters in tasks.iter().filter_map(|t| t.counters.as_ref()) {
                        total.merge(counters);
                    }
                    println!("Contadores sumados de la página:");
                    print_counters(&total);
                }
                if let Some(hint) = next_page_hint(&tasks, limit) {
                    println!("{}", hint);
                }
            }
        }
    }

    Ok(())
}

/// Pista para pedir la página siguiente. `fromId` es inclusivo, así que
/// la siguiente página arranca repitiendo la última tarea de ésta.
fn next_page_hint(tasks: &[TaskInformation], limit: u32) -> Option<String> {
    if limit == 0 || tasks.len() as u64 != u64::from(limit) {
        return None;
    }
    tasks.last().map(|last| {
        format!(
            "Siguiente página: --from {} (la primera fila repite {})",
            last.task_id, last.task_id
        )
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn progress_line(p: &Progress) -> String {
    let done = u64::from(p.succeeded_task_count())
        + u64::from(p.failed_task_count())
        + u64::from(p.killed_task_count());
    let pct = if p.total_task_count() > 0 {
        format!("{:.1}%", (done as f64 / p.total_task_count() as f64) * 100.0)
    } else {
        "(sin tareas)".to_string()
    };
    format!(
        "total={}, ok={}, fallidas={}, muertas={}, corriendo={} [{}]",
        p.total_task_count(),
        p.succeeded_task_count(),
        p.failed_task_count(),
        p.killed_task_count(),
        p.running_task_count(),
        pct
    )
}

fn print_counters(counters: &CounterRegistry) {
    if counters.is_empty() {
        println!("  contadores: (vacío)");
        return;
    }
    println!("  contadores:");
    for group in counters.groups() {
        println!("    {}", group.display_name);
        for c in group.counters() {
            println!("      {:<40} {}", c.display_name, c.value);
        }
    }
}

fn print_dag_status(dag_id: &str, status: &DagStatus) {
    println!("DAG {}:", dag_id);
    println!("  estado: {:?}", status.state);
    println!(
        "  terminado: {}",
        if status.state.is_terminal() { "sí" } else { "no" }
    );
    for d in &status.diagnostics {
        println!("  diagnóstico: {}", d);
    }
    println!("  progreso: {}", progress_line(&status.dag_progress));
    if !status.vertex_progress.is_empty() {
        println!("  vértices:");
        for (name, p) in &status.vertex_progress {
            println!("    {:<20} {}", name, progress_line(p));
        }
    }
    if let Some(ref counters) = status.dag_counters {
        print_counters(counters);
    }
}

fn print_vertex_status(name: &str, status: &VertexStatus) {
    println!("Vértice {}:", name);
    if let Some(ref id) = status.vertex_id {
        println!("  id: {}", id);
    }
    println!("  estado: {:?}", status.state);
    for d in &status.diagnostics {
        println!("  diagnóstico: {}", d);
    }
    println!("  progreso: {}", progress_line(&status.progress));
    if let Some(ref counters) = status.vertex_counters {
        print_counters(counters);
    }
}

fn print_dag_information(info: &DagInformation) {
    println!("DAG:");
    println!("  id: {}", info.dag_id);
    println!("  nombre: {}", info.name);
    if let Some(ref app) = info.application_id {
        println!("  aplicación: {}", app);
    }
    if let Some(state) = info.status {
        println!("  estado: {:?}", state);
    }
    if let Some(started) = info.started_at() {
        println!("  iniciado: {}", started);
    }
    if let Some(finished) = info.finished_at() {
        println!("  finalizado: {}", finished);
    }
    if !info.vertex_name_to_id.is_empty() {
        println!("  vértices:");
        for (name, id) in &info.vertex_name_to_id {
            println!("    {:<20} {}", name, id);
        }
    }
    if let Some(ref plan) = info.dag_plan {
        for edge in &plan.edges {
            match edge.data_movement {
                Some(ref kind) => println!("  arista: {} -> {} ({})", edge.from, edge.to, kind),
                None => println!("  arista: {} -> {}", edge.from, edge.to),
            }
        }
    }
    if let Some(ref counters) = info.counters {
        print_counters(counters);
    }
}

fn print_task(task: &TaskInformation) {
    println!("Tarea {}:", task.task_id);
    println!("  estado: {:?}", task.state);
    if let Some(ref d) = task.diagnostics {
        println!("  diagnóstico: {}", d);
    }
    if let Some(ref attempt) = task.successful_attempt_id {
        println!("  intento exitoso: {}", attempt);
    }
    if let Some(scheduled) = task.scheduled_at() {
        println!("  programada: {}", scheduled);
    }
    println!("  intentos fallidos: {}", task.failed_attempts);
    if let Some(ms) = task.duration_ms() {
        println!("  duración: {} ms", ms);
    }
    if let Some(ref counters) = task.counters {
        print_counters(counters);
    }
}
