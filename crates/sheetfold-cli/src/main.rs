//! sheetfold CLI - flat patterns for tilted-lid sheet-metal boxes
//!
//! Builds the cut pattern of one box, the base plate for a grid of boxes,
//! debug views of the folded box, or a whole batch of boxes handed to an
//! external post-processor.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use serde::Serialize;

use sheetfold::{
    base_plate, build, debug_views, run_batch, BatchDocument, BatchItem, CommandPostProcessor,
    FlatPattern, PostProcessError, PostProcessor,
};

mod config;

use config::{BoxArgs, CliConfig};

#[derive(Parser)]
#[command(name = "sheetfold")]
#[command(about = "Flat patterns for sheet-metal boxes with a tilted lid", long_about = None)]
struct Cli {
    /// TOML config with [box], [post_process] and [[batch]] tables
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the flat pattern of one box
    Flat {
        #[command(flatten)]
        params: BoxArgs,
        /// Print the visible primitives as JSON instead of a summary
        #[arg(long)]
        json: bool,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Build the base plate for a grid of boxes
    BasePlate {
        #[command(flatten)]
        params: BoxArgs,
        /// Boxes along X
        #[arg(long, default_value_t = 5)]
        columns: usize,
        /// Boxes along Y
        #[arg(long, default_value_t = 5)]
        rows: usize,
        /// Print the primitives as JSON instead of a summary
        #[arg(long)]
        json: bool,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Orthographic top, front and right views of the folded box
    Views {
        #[command(flatten)]
        params: BoxArgs,
        /// Print the projected edges as JSON instead of a summary
        #[arg(long)]
        json: bool,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Build every [[batch]] item of the config in order
    Batch {
        #[command(flatten)]
        params: BoxArgs,
        /// Write one JSON document per item into this directory
        #[arg(long, conflicts_with = "program")]
        out_dir: Option<PathBuf>,
        /// Program fed each item's JSON document on stdin, overriding [post_process]
        #[arg(long)]
        program: Option<String>,
        /// Arguments for --program, `{label}` substituted
        #[arg(last = true)]
        args: Vec<String>,
    },
}

/// Writes each document to `<dir>/box_<label>.json`.
struct JsonDirPostProcessor {
    dir: PathBuf,
}

impl PostProcessor for JsonDirPostProcessor {
    fn process(&self, item: &BatchItem, pattern: &FlatPattern) -> Result<(), PostProcessError> {
        let path = self
            .dir
            .join(format!("box_{}.json", item.label.replace(' ', "_")));
        let json = serde_json::to_vec_pretty(&BatchDocument::new(item, pattern))?;
        fs::write(&path, json)?;
        info!("wrote {}", path.display());
        Ok(())
    }
}

fn emit(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn to_json(value: &impl Serialize) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to encode JSON")
}

fn flat(config: &CliConfig, args: &BoxArgs, json: bool, output: Option<&Path>) -> Result<()> {
    let params = args.apply(&config.box_params)?;
    let pattern = build(&params).context("flat pattern build failed")?;
    let text = if json {
        let item = BatchItem {
            label: params.label.clone().unwrap_or_default(),
            normal: params.normal.unwrap_or([
                pattern.plane_normal.x,
                pattern.plane_normal.y,
                pattern.plane_normal.z,
            ]),
        };
        to_json(&BatchDocument::new(&item, &pattern))?
    } else {
        let mut lines = Vec::new();
        let n = pattern.plane_normal;
        lines.push(format!("lid normal  {:.4} {:.4} {:.4}", n.x, n.y, n.z));
        for bend in &pattern.bends {
            lines.push(format!(
                "{:<5} bend  {:>7.3}°  allowance {:.4}",
                bend.side.to_string(),
                bend.angle().to_degrees(),
                bend.spec.bend_allowance()
            ));
        }
        let bounds = pattern.outline_bounds();
        lines.push(format!(
            "outline     {:.3} x {:.3} mm",
            bounds.width(),
            bounds.height()
        ));
        lines.push(format!("primitives  {}", pattern.primitives().count()));
        for warning in &pattern.warnings {
            lines.push(format!("warning     {warning}"));
        }
        lines.join("\n")
    };
    emit(&text, output)
}

fn plate(
    config: &CliConfig,
    args: &BoxArgs,
    columns: usize,
    rows: usize,
    json: bool,
    output: Option<&Path>,
) -> Result<()> {
    let params = args.apply(&config.box_params)?;
    let drawing = base_plate(&params, columns, rows).context("base plate build failed")?;
    let text = if json {
        to_json(&drawing.records())?
    } else {
        let bounds = drawing.bounds();
        format!(
            "base plate {columns} x {rows}: {:.3} x {:.3} mm, {} primitives",
            bounds.width(),
            bounds.height(),
            drawing.primitives().count()
        )
    };
    emit(&text, output)
}

fn views(config: &CliConfig, args: &BoxArgs, json: bool, output: Option<&Path>) -> Result<()> {
    let params = args.apply(&config.box_params)?;
    let views = debug_views(&params).context("debug views failed")?;
    let text = if json {
        to_json(&views)?
    } else {
        views
            .iter()
            .map(|view| {
                format!(
                    "{:?}: {} edges, {:.3} x {:.3} mm",
                    view.view_direction,
                    view.edges.len(),
                    view.bounds.width(),
                    view.bounds.height()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };
    emit(&text, output)
}

fn batch(
    config: &CliConfig,
    args: &BoxArgs,
    out_dir: Option<PathBuf>,
    program: Option<String>,
    program_args: Vec<String>,
) -> Result<()> {
    if config.batch.is_empty() {
        anyhow::bail!("no [[batch]] items configured");
    }
    let base = args.apply(&config.box_params)?;

    let post: Box<dyn PostProcessor> = match (out_dir, program, &config.post_process) {
        (Some(dir), _, _) => {
            fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
            Box::new(JsonDirPostProcessor { dir })
        }
        (None, Some(program), _) => Box::new(CommandPostProcessor::new(program, program_args)),
        (None, None, Some(command)) => Box::new(command.clone()),
        (None, None, None) => {
            anyhow::bail!("no post-processor: pass --out-dir or --program, or add [post_process]")
        }
    };

    let report = run_batch(&base, &config.batch, post.as_ref());
    info!(
        "batch finished: {} done, {} failed",
        report.completed.len(),
        report.failures.len()
    );
    if !report.is_success() {
        for failure in &report.failures {
            warn!("{} ({:?}): {}", failure.label, failure.stage, failure.message);
        }
        anyhow::bail!("{} of {} batch items failed", report.failures.len(), config.batch.len());
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };

    match cli.command {
        Commands::Flat {
            params,
            json,
            output,
        } => flat(&config, &params, json, output.as_deref()),
        Commands::BasePlate {
            params,
            columns,
            rows,
            json,
            output,
        } => plate(&config, &params, columns, rows, json, output.as_deref()),
        Commands::Views {
            params,
            json,
            output,
        } => views(&config, &params, json, output.as_deref()),
        Commands::Batch {
            params,
            out_dir,
            program,
            args,
        } => batch(&config, &params, out_dir, program, args),
    }
}
