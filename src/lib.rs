#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, SankeyConfig, load_config};
pub use ir::{Endpoint, LinkSpec, NodeSpec, SankeyGraph};
pub use layout::{
    CurvePath, LayoutError, SankeyLayout, SankeyLink, SankeyNode, compute_sankey_layout,
    curve_path,
};
pub use parser::parse_sankey;
