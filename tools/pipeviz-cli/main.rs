use clap::{Parser, ValueEnum};
use pipeviz::prelude::*;
use std::fs;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Define a CLI-specific enum for clap to parse.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum LayoutCli {
    Horizontal,
    Vertical,
}

impl From<LayoutCli> for LayoutType {
    fn from(layout: LayoutCli) -> Self {
        match layout {
            LayoutCli::Horizontal => LayoutType::DagreHorizontal,
            LayoutCli::Vertical => LayoutType::DagreVertical,
        }
    }
}

/// Renders pipeline resources as a node/edge graph model
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the resources JSON file (a list of routes and pipes)
    resources_path: String,

    /// Hide the flow with this id (repeatable)
    #[arg(long = "hide", value_name = "FLOW_ID")]
    hidden: Vec<String>,

    /// Layout direction written into the graph settings
    #[arg(short, long, value_enum)]
    layout: Option<LayoutCli>,

    /// Print the visualization trees instead of the graph model
    #[arg(short, long)]
    tree: bool,

    /// Optional path to a canvas settings JSON file
    #[arg(short, long)]
    settings: Option<String>,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,pipeviz=debug")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    run(cli);
}

fn run(cli: Cli) {
    let start = Instant::now();

    // --- 1. Loading ---
    let json = fs::read_to_string(&cli.resources_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read resources file '{}': {}",
            &cli.resources_path, e
        ))
    });
    let entities = load_entities(&json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load resources: {}", e)));

    let settings = match &cli.settings {
        Some(path) => CanvasSettings::from_file(path).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to load settings from '{}': {}", path, e))
        }),
        None => CanvasSettings::default(),
    };
    info!(entities = entities.len(), "Loaded resources");

    // --- 2. Session ---
    let mut builder = EditorSession::builder(entities).with_settings(settings);
    if let Some(layout) = cli.layout {
        builder = builder.with_layout(layout.into());
    }
    for flow_id in &cli.hidden {
        builder = builder.with_hidden_flow(flow_id);
    }
    let session = builder
        .build()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to render flows: {}", e)));

    // --- 3. Output ---
    if cli.tree {
        for flow in session.flows() {
            let display = TreeDisplay {
                tree: &flow.tree,
                root: flow.root,
                name: &flow.flow_id,
            };
            println!("{}", display);
        }
    } else {
        let model = serde_json::to_string_pretty(&session.graph_model()).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to serialize graph model: {}", e))
        });
        println!("{}", model);
    }

    if session.should_show_empty_state() {
        info!("No visible flows");
    }
    info!(
        flows = session.flows().len(),
        nodes = session.diagram().nodes.len(),
        edges = session.diagram().edges.len(),
        elapsed = ?start.elapsed(),
        "Done"
    );
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
