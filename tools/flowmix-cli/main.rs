use clap::Parser;
use flowmix::prelude::*;
use std::time::Instant;

/// A workflow parameter-resolution and multi-input merge engine CLI.
///
/// Loads a persisted workflow snapshot, executes its nodes in file order
/// (list producers before consumers), and prints each node's result. The
/// agent step uses a canned echo client so runs are reproducible offline.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the workflow snapshot JSON file
    workflow_path: String,

    /// The user text fed into input nodes
    #[arg(short, long, default_value = "Hello from flowmix")]
    message: String,

    /// Print binding recommendations for every connected node pair instead
    /// of executing
    #[arg(short, long)]
    recommend: bool,
}

/// Stands in for the host's chat service so the CLI works offline.
struct EchoAgent;

impl AgentClient for EchoAgent {
    fn complete(
        &self,
        request: AgentRequest<'_>,
    ) -> std::result::Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let temperature = request
            .model
            .and_then(|m| m.temperature)
            .unwrap_or(0.7);
        Ok(format!("[agent t={temperature}] {}", request.input))
    }
}

fn main() {
    tracing_subscriber::fmt().init();

    let cli = Cli::parse();

    let total_start = Instant::now();

    // --- 1. Load and resolve the workflow ---
    let load_start = Instant::now();
    let snapshot = WorkflowSnapshot::from_file(&cli.workflow_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to load workflow '{}': {}",
            &cli.workflow_path, e
        ))
    });
    let mut graph = snapshot.into_graph();
    let pruned = graph.prune_dangling_edges();
    if pruned > 0 {
        println!("Pruned {pruned} dangling edge(s)");
    }
    let load_duration = load_start.elapsed();

    if cli.recommend {
        print_recommendations(&graph);
        return;
    }

    // --- 2. Execute in file order ---
    println!(
        "\nExecuting {} nodes ({} edges)...",
        graph.nodes.len(),
        graph.edges.len()
    );
    let exec_start = Instant::now();
    let executor = NodeExecutor::builder(Box::new(EchoAgent)).build();
    let mut ctx = ExecutionContext::new(cli.message);
    let report = executor.execute_sequence(&graph.nodes, &graph.edges, &mut ctx);
    let exec_duration = exec_start.elapsed();

    // --- 3. Results and summary ---
    println!("\nExecution finished!");
    for record in &report.records {
        match (&record.output, &record.error) {
            (Some(output), _) => println!("  [ok]   {} -> {}", record.node_id, output),
            (None, Some(error)) => println!("  [fail] {}", error),
            (None, None) => println!("  [??]   {}", record.node_id),
        }
    }

    println!("\n--- Summary ---");
    println!("Completed: {}/{}", report.completed(), report.records.len());
    println!("Loading:   {:?}", load_duration);
    println!("Execution: {:?}", exec_duration);
    println!("Total:     {:?}", total_start.elapsed());
}

/// Prints ranked binding recommendations for every edge's node pair.
fn print_recommendations(graph: &WorkflowGraph) {
    let mut registry = SchemaRegistry::builder().build();

    for edge in &graph.edges {
        let (Some(source), Some(target)) = (graph.node(&edge.source), graph.node(&edge.target))
        else {
            continue;
        };

        let bindings = recommend_bindings(&mut registry, source, target);
        println!("\n{} -> {}:", source.id, target.id);
        if bindings.is_empty() {
            println!("  (no compatible parameter pairs)");
        }
        for binding in bindings {
            println!(
                "  {}.{} -> {}.{}  confidence {:.2}{}",
                binding.source.node_id,
                binding.source.parameter_name,
                binding.target.node_id,
                binding.target.parameter_name,
                binding.confidence,
                binding
                    .transform_expression
                    .as_deref()
                    .map(|expr| format!("  via {expr}"))
                    .unwrap_or_default()
            );
        }
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
