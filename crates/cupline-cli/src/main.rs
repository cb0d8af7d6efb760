//! cupline CLI - cup outline extraction
//!
//! Runs configured models, inspects model documents, and summarises ICP
//! files.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{error, info, Level};

use cupline::cupline_geom::SurfaceKind;
use cupline::cupline_outline::{read_icp_file, WriteOutcome};
use cupline::cupline_sample::{sample_grid, save_gnuplot_grid};
use cupline::{inspect, load_model, ModelConfig, Pipeline, VIEWER_GRID_STEPS};

#[derive(Parser)]
#[command(name = "cupline")]
#[command(about = "Wall profiles and fiducials for hip-implant cups", long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract and write the outline of each configured model
    Run {
        /// Model configs (.toml); each is processed independently
        #[arg(required = true)]
        configs: Vec<PathBuf>,
    },
    /// List the faces of a model document
    Inspect {
        /// Model document (.json)
        model: PathBuf,
        /// Dump a gnuplot grid per face into this directory
        #[arg(long)]
        gnuplot: Option<PathBuf>,
    },
    /// Summarise an ICP file
    Show {
        /// ICP file
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run { configs } => run_models(&configs),
        Commands::Inspect { model, gnuplot } => inspect_model(&model, gnuplot.as_deref()),
        Commands::Show { file } => show_icp(&file),
    }
}

fn run_models(configs: &[PathBuf]) -> Result<()> {
    let mut failed = 0;
    for path in configs {
        if let Err(e) = run_model(path) {
            error!(config = %path.display(), "{e:#}");
            failed += 1;
        }
    }
    if failed > 0 {
        anyhow::bail!("{failed} of {} models failed", configs.len());
    }
    Ok(())
}

fn run_model(path: &Path) -> Result<()> {
    let config = ModelConfig::load(path)?;
    let mut pipeline = Pipeline::new(&config);
    let shape = pipeline.load_model()?;
    let output = pipeline.run(&shape)?;
    let report = pipeline.write(&output)?;

    match report.icp {
        Some(WriteOutcome::Written) => info!(model = %config.name, "ICP written"),
        Some(WriteOutcome::Skipped) => info!(model = %config.name, "ICP skipped: a wall is empty"),
        None => {}
    }
    println!(
        "{}: outer {} points, inner {} points, fiducial {} points",
        output.name,
        output.outer.len(),
        output.inner.len(),
        output.fiducial.as_ref().map_or(0, |f| f.len()),
    );
    Ok(())
}

fn inspect_model(path: &Path, gnuplot: Option<&Path>) -> Result<()> {
    let shape = load_model(path)?;

    println!("{} faces", shape.faces.len());
    for face in inspect::face_report(&shape) {
        let kind = match (face.kind, face.basis_kind) {
            (Some(SurfaceKind::RectangularTrimmed), Some(basis)) => format!("trimmed {basis}"),
            (kind, _) => kind.map_or("?", |k| k.label()).to_string(),
        };
        let closed = match (face.u_closed, face.v_closed) {
            (true, true) => " closed u,v",
            (true, false) => " closed u",
            (false, true) => " closed v",
            (false, false) => "",
        };
        match face.bounds {
            Some(b) => println!(
                "  {:4} {:16} wires {} u [{:.4}, {:.4}] v [{:.4}, {:.4}]{closed}",
                face.index, kind, face.wires, b.u_min, b.u_max, b.v_min, b.v_max
            ),
            None => println!(
                "  {:4} {:16} wires {} unbounded{closed}",
                face.index, kind, face.wires
            ),
        }
    }

    let rims = inspect::circular_rims(&shape)?;
    if !rims.is_empty() {
        println!("rims");
        for rim in &rims {
            println!(
                "  {:4} r {:.4} / {:.4}",
                rim.face, rim.radii[0], rim.radii[1]
            );
        }
    }

    if let Some(dir) = gnuplot {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("cannot create {}", dir.display()))?;
        for (index, face) in shape.faces.iter().enumerate() {
            let Some(surface) = shape.face_surface(index) else {
                continue;
            };
            let Some(grid) = sample_grid(surface, VIEWER_GRID_STEPS, VIEWER_GRID_STEPS) else {
                continue;
            };
            let label = cupline::cupline_geom::classify_surface(&face.surface, &shape.store)
                .map_or("face", |k| k.label());
            let written = save_gnuplot_grid(dir, label, index, &grid)
                .with_context(|| format!("cannot write grid for face {index}"))?;
            info!(path = %written.display(), "grid written");
        }
    }
    Ok(())
}

fn show_icp(path: &Path) -> Result<()> {
    let doc = read_icp_file(path).with_context(|| format!("cannot read {}", path.display()))?;
    println!("id        {}", doc.header.id);
    println!("outer cup {}", doc.header.outer_cup);
    println!("inner cup {}", doc.header.inner_cup);
    for (name, wall) in [("inner", &doc.inner), ("outer", &doc.outer)] {
        let (lo, hi) = wall
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.x), hi.max(p.x))
            });
        let r_max = wall.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);
        if wall.is_empty() {
            println!("{name}: empty");
        } else {
            println!(
                "{name}: {} points, axial [{lo}, {hi}], max radius {r_max}",
                wall.len()
            );
        }
    }
    Ok(())
}
