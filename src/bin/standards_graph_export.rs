//! Export a laid-out standards graph
//!
//! Loads a standards payload, builds one graph for the requested mode, runs
//! the layout and writes the result to stdout.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::sync::Arc;
use tracing::{info, warn};

use standards_graph::commands::parse_depth;
use standards_graph::handlers::{attach_resources, GraphBuilder};
use standards_graph::infrastructure::{EntityStore, JsonRecordSource, RecordSource};
use standards_graph::{
    BridgeConfig, BuildCommand, Dimension, Grade, GraphService, GraphSummary, LabelMode,
    LayoutAlgorithm, LayoutBridge, LayoutConfig, LayoutRequest, RenderOutcome, StandardsTable,
};

#[derive(Parser)]
#[command(
    name = "standards-graph-export",
    version,
    about = "Build and lay out a curriculum standards graph"
)]
struct Cli {
    /// JSON payload with standards, categories and providers
    #[arg(long)]
    data: String,

    /// JSON layout configuration
    #[arg(long)]
    config: Option<String>,

    /// Override the configured layout algorithm
    #[arg(long)]
    algorithm: Option<Algorithm>,

    /// Label standards by ASN Id or NGSS code
    #[arg(long, default_value = "ngss")]
    labels: Labels,

    /// Provider whose resources are overlaid (repeatable)
    #[arg(long = "provider")]
    providers: Vec<String>,

    /// Overlay resources of every provider
    #[arg(long)]
    all_providers: bool,

    #[arg(long, default_value = "json")]
    format: OutputFormat,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Clone, Copy, ValueEnum)]
enum Labels {
    Asn,
    Ngss,
}

#[derive(Clone, Copy, ValueEnum)]
enum Algorithm {
    KamadaKawai,
    FruchtermanReingold,
}

#[derive(Clone, Copy, ValueEnum)]
enum View {
    Cc,
    Dci,
    Sep,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Graph with coordinates
    Json,
    /// Layout request in GML, without running the layout
    Gml,
    Summary,
    Table,
}

#[derive(Subcommand)]
enum Mode {
    /// Neighborhood of one standard, by Id or NGSS code
    Neighborhood {
        root: String,
        #[arg(long, default_value_t = 2)]
        depth: u8,
    },
    /// Gradeband progression of a topic category
    Topic {
        category: String,
        #[arg(long, default_value_t = 2)]
        depth: u8,
    },
    /// Grade bucket progression of a CC, DCI or SEP category
    Category {
        view: View,
        category: String,
        #[arg(long, default_value_t = 2)]
        depth: u8,
    },
    /// Topics within a grade range; grades are K or 1-12
    Gradeband {
        low: String,
        high: String,
        #[arg(long, default_value_t = 1)]
        depth: u8,
    },
}

impl Mode {
    fn into_command(self) -> Result<BuildCommand> {
        let depth = parse_depth;
        Ok(match self {
            Mode::Neighborhood { root, depth: d } => BuildCommand::StandardsNeighborhood {
                root_id: root,
                depth: depth(d)?,
            },
            Mode::Topic { category, depth: d } => BuildCommand::TopicCategory {
                category_id: category,
                depth: depth(d)?,
            },
            Mode::Category {
                view,
                category,
                depth: d,
            } => BuildCommand::Category3D {
                view: match view {
                    View::Cc => Dimension::Cc,
                    View::Dci => Dimension::Dci,
                    View::Sep => Dimension::Sep,
                },
                category_id: category,
                depth: depth(d)?,
            },
            Mode::Gradeband { low, high, depth: d } => BuildCommand::Gradeband {
                low_grade: Grade::parse(&low).map_err(anyhow::Error::msg)?.value(),
                high_grade: Grade::parse(&high).map_err(anyhow::Error::msg)?.value(),
                depth: depth(d)?,
            },
        })
    }
}

fn layout_config(cli: &Cli) -> Result<LayoutConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
            LayoutConfig::from_json(&text).with_context(|| format!("parsing {path}"))?
        }
        None => LayoutConfig::default(),
    };
    if let Some(algorithm) = cli.algorithm {
        config.algorithm = match algorithm {
            Algorithm::KamadaKawai => LayoutAlgorithm::KamadaKawai,
            Algorithm::FruchtermanReingold => LayoutAlgorithm::FruchtermanReingold,
        };
    }
    Ok(config)
}

fn select_providers(store: &mut EntityStore, cli: &Cli) {
    if cli.all_providers {
        store.select_all_providers(true);
    }
    for provider in &cli.providers {
        if !store.set_provider_selected(provider, true) {
            warn!("Unknown provider {provider}");
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let labels = match cli.labels {
        Labels::Asn => LabelMode::Asn,
        Labels::Ngss => LabelMode::Ngss,
    };
    let layout = layout_config(&cli)?;

    let batch = JsonRecordSource::new(&cli.data)
        .fetch()
        .await
        .with_context(|| format!("loading {}", cli.data))?;
    let (mut store, report) = EntityStore::from_batch(batch);
    if !report.is_clean() {
        warn!("{} records or references skipped while loading", report.warning_count());
    }
    select_providers(&mut store, &cli);

    let format = cli.format;
    let command = cli.mode.into_command()?;

    if let OutputFormat::Gml = format {
        let mut graph = GraphBuilder::new(&store).with_labels(labels).build(&command)?;
        attach_resources(&mut graph, &store);
        println!("{}", LayoutRequest::from_graph(&graph)?.to_gml());
        return Ok(());
    }

    let bridge = LayoutBridge::from_config(BridgeConfig {
        layout,
        ..BridgeConfig::default()
    })?;
    let service = Arc::new(GraphService::new(store, bridge));
    let outcome = service.clone().render_async(command, labels).await?;
    let RenderOutcome::Published(graph) = outcome else {
        bail!("render was superseded");
    };
    if let Some(err) = graph.layout_error() {
        warn!("Graph exported without coordinates: {err}");
    }
    info!(nodes = graph.node_count(), edges = graph.edge_count(), "Exporting graph");

    let output = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&graph.snapshot())?,
        OutputFormat::Summary => serde_json::to_string_pretty(&GraphSummary::from_graph(&graph))?,
        OutputFormat::Table => serde_json::to_string_pretty(&StandardsTable::from_graph(&graph))?,
        OutputFormat::Gml => unreachable!("handled before layout"),
    };
    println!("{output}");

    service.bridge().shutdown();
    Ok(())
}
