//! CLI module for Impact.
//!
//! One command: load a symbol index, compute the impact of the requested
//! files, locations and names, write the graph as DOT.

use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::config::ImpactConfig;
use crate::error::{ImpactError, Result};
use crate::graph::{edge_kind_writer, write_dot, ReferenceWriter};
use crate::impact::{analyze, ImpactOptions, ImpactRequest};
use crate::referencer::Referencer;
use crate::resolver::memory::MemoryResolver;
use crate::resolver::Position;

#[derive(Parser, Debug)]
#[command(name = "impact")]
#[command(about = "Impact - Symbol impact graphs from a code index", long_about = None)]
pub struct Cli {
    /// Symbol index (JSON) to query
    pub index: PathBuf,

    /// Where to write the DOT graph
    pub output: PathBuf,

    // ─── Input ───────────────────────────────────────────────────
    /// Query the impact of every symbol in a file
    #[arg(long = "file", value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Query the impact of the symbol at path:line:column (0-based)
    #[arg(long = "location", value_name = "PATH:LINE:COL")]
    pub locations: Vec<String>,

    /// Query the impact of symbols with this name
    #[arg(long = "name")]
    pub names: Vec<String>,

    /// Query the impact of symbols fuzzily matching this name
    #[arg(long = "name-fuzzy")]
    pub fuzzy_names: Vec<String>,

    /// Follow contain-by impacts
    #[arg(long)]
    pub follow_contain_by: bool,

    /// Follow call impacts (implies --follow-contain-by)
    #[arg(long)]
    pub follow_call: bool,

    /// Follow supertype impacts (implies --follow-contain-by)
    #[arg(long)]
    pub follow_supertype: bool,

    /// Follow subtype impacts (implies --follow-contain-by)
    #[arg(long)]
    pub follow_subtype: bool,

    // ─── Output ──────────────────────────────────────────────────
    /// Collapse the graph to one vertex per file
    #[arg(long)]
    pub file_level: bool,

    /// Render paths relative to this directory
    #[arg(long, value_name = "DIR")]
    pub workspace_root: Option<PathBuf>,

    /// Config file (default: ./impact.toml)
    #[arg(long, default_value = "impact.toml")]
    pub config: PathBuf,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Default log filter when `RUST_LOG` is not set.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Config values with command-line flags layered on top.
    pub fn options(&self, config: &ImpactConfig) -> ImpactOptions {
        let base = config.impact_options();
        ImpactOptions {
            follow_containment: base.follow_containment || self.follow_contain_by,
            follow_calls: base.follow_calls || self.follow_call,
            follow_supertypes: base.follow_supertypes || self.follow_supertype,
            follow_subtypes: base.follow_subtypes || self.follow_subtype,
            file_level_only: base.file_level_only || self.file_level,
        }
        .normalized()
    }

    /// The query, with paths made absolute to match the index.
    pub fn request(&self) -> Result<ImpactRequest> {
        let files = self
            .files
            .iter()
            .map(|file| std::path::absolute(file).map_err(ImpactError::from))
            .collect::<Result<Vec<_>>>()?;
        let locations = self
            .locations
            .iter()
            .map(|location| -> Result<(PathBuf, Position)> {
                let (path, pos) = parse_location(location)?;
                Ok((std::path::absolute(path)?, pos))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(ImpactRequest {
            files,
            locations,
            names: self.names.clone(),
            fuzzy_names: self.fuzzy_names.clone(),
        })
    }

    /// Root that output paths are shown relative to, from the flag or else
    /// the config. Always absolute, like the paths in the index.
    pub fn workspace_root(&self, config: &ImpactConfig) -> Result<Option<PathBuf>> {
        let root = self
            .workspace_root
            .clone()
            .or_else(|| config.resolve_workspace_root(&self.config));
        Ok(root.map(std::path::absolute).transpose()?)
    }
}

/// Split `path:line:column` into a path and a 0-based position.
///
/// The path itself may contain colons; the last two fields are the numbers.
pub fn parse_location(location: &str) -> Result<(PathBuf, Position)> {
    let invalid = || ImpactError::InvalidLocation(location.to_string());
    let mut fields = location.rsplitn(3, ':');
    let character = fields.next().ok_or_else(invalid)?;
    let line = fields.next().ok_or_else(invalid)?;
    let path = fields.next().filter(|p| !p.is_empty()).ok_or_else(invalid)?;

    let line = line.parse().map_err(|_| invalid())?;
    let character = character.parse().map_err(|_| invalid())?;
    Ok((PathBuf::from(path), Position::new(line, character)))
}

/// Run the impact command end to end.
pub fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = ImpactConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    let options = cli.options(&config);
    let request = cli.request()?;
    if request.is_empty() {
        anyhow::bail!("nothing to query: pass --file, --location, --name or --name-fuzzy");
    }
    debug!(?options, ?request, "impact query");

    let index = MemoryResolver::load(&cli.index)
        .with_context(|| format!("loading index {}", cli.index.display()))?;
    let referencer = Referencer::new(index);
    let graph = analyze(&referencer, options, &request)?;

    let writer = ReferenceWriter::new(cli.workspace_root(&config)?);

    let file = File::create(&cli.output)
        .with_context(|| format!("creating {}", cli.output.display()))?;
    let mut out = BufWriter::new(file);
    write_dot(
        &mut out,
        &graph,
        |id, reference| writer.write(id, reference),
        edge_kind_writer,
    )?;
    out.flush()?;

    info!(
        output = %cli.output.display(),
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "impact graph written"
    );
    Ok(())
}
