use crate::config::load_config;
use crate::ir::SankeyGraph;
use crate::layout::compute_sankey_layout;
use crate::layout_dump::write_layout_dump;
use crate::parser::parse_sankey;
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "sankey-layout",
    version,
    about = "Compute Sankey diagram layouts (nodes, columns, link bands)"
)]
pub struct Args {
    /// Input file (.json/.json5 graph or source,target,value rows) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output JSON file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Config JSON file ({"sankey": {...}})
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Canvas width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Canvas height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Relaxation rounds
    #[arg(short = 'n', long = "iterations")]
    pub iterations: Option<usize>,

    /// Node thickness
    #[arg(long = "nodeWidth")]
    pub node_width: Option<f32>,

    /// Minimum vertical gap between nodes in a column
    #[arg(long = "nodePadding")]
    pub node_padding: Option<f32>,

    /// Link curvature in [0, 1]
    #[arg(long = "curvature")]
    pub curvature: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputFormat {
    Json,
    Json5,
    Rows,
}

pub fn run() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    let layout_config = &mut config.layout;
    if let Some(v) = args.width {
        layout_config.width = v;
    }
    if let Some(v) = args.height {
        layout_config.height = v;
    }
    if let Some(v) = args.iterations {
        layout_config.iterations = v;
    }
    if let Some(v) = args.node_width {
        layout_config.node_width = v;
    }
    if let Some(v) = args.node_padding {
        layout_config.node_padding = v;
    }
    if let Some(v) = args.curvature {
        layout_config.curvature = v;
    }

    let (input, format) = read_input(args.input.as_deref())?;
    let graph = parse_graph(&input, format)?;
    let layout = compute_sankey_layout(&graph, &config.layout)?;
    write_layout_dump(args.output.as_deref(), &layout, config.layout.curvature)?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn read_input(path: Option<&Path>) -> Result<(String, InputFormat)> {
    if let Some(path) = path {
        if path != Path::new("-") {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let format = match path.extension().and_then(|e| e.to_str()) {
                Some(ext) if ext.eq_ignore_ascii_case("json") => InputFormat::Json,
                Some(ext) if ext.eq_ignore_ascii_case("json5") => InputFormat::Json5,
                _ => sniff_format(&content),
            };
            return Ok((content, format));
        }
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    let format = sniff_format(&buf);
    Ok((buf, format))
}

fn sniff_format(content: &str) -> InputFormat {
    if content.trim_start().starts_with('{') {
        InputFormat::Json
    } else {
        InputFormat::Rows
    }
}

fn parse_graph(input: &str, format: InputFormat) -> Result<SankeyGraph> {
    match format {
        InputFormat::Json => serde_json::from_str(input).context("invalid graph JSON"),
        InputFormat::Json5 => json5::from_str(input).context("invalid graph JSON5"),
        InputFormat::Rows => parse_sankey(input),
    }
}
