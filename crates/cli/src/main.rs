//! lisagrid CLI - Hot spot analysis of point density on a square grid

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use lisagrid_algorithms::density::aggregate;
use lisagrid_algorithms::pipeline::{run_with_store, AnalysisParams};
use lisagrid_algorithms::statistics::{DEFAULT_ALPHA, DEFAULT_PERMUTATIONS};
use lisagrid_algorithms::tessellation::{build_grid, DEFAULT_CELL_SIZE};
use lisagrid_core::io::{
    grid_to_geojson, inspect_geojson, read_boundary, read_points, write_feature_collection,
    GeoJsonStore,
};
use lisagrid_core::{AnalysisReport, Boundary, Contiguity, Point, Projection, CRS};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "lisagrid")]
#[command(author, version, about = "Spatial autocorrelation hot spot analysis", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FrameArgs {
    /// Project WGS84 input into this UTM zone (EPSG 326xx / 327xx, e.g. 32719)
    #[arg(long)]
    utm_epsg: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show feature counts and bounds of a GeoJSON file
    Info {
        /// Input GeoJSON file
        input: PathBuf,
    },
    /// Build the analysis grid over a boundary
    Grid {
        /// Boundary GeoJSON (Polygon / MultiPolygon features)
        boundary: PathBuf,
        /// Output GeoJSON file
        output: PathBuf,
        /// Cell side length in metres
        #[arg(short, long, default_value_t = DEFAULT_CELL_SIZE)]
        cell_size: f64,
        /// Count the features of this GeoJSON file per cell
        #[arg(short, long)]
        points: Option<PathBuf>,
        #[command(flatten)]
        frame: FrameArgs,
    },
    /// Global and local Moran's I with cluster labels
    Analyze {
        /// Boundary GeoJSON (Polygon / MultiPolygon features)
        boundary: PathBuf,
        /// Point features GeoJSON
        points: PathBuf,
        /// Output GeoJSON file
        output: PathBuf,
        /// Also write the labeled grid as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Cell side length in metres
        #[arg(short, long, default_value_t = DEFAULT_CELL_SIZE)]
        cell_size: f64,
        /// Number of permutations for the pseudo p-values
        #[arg(short, long, default_value_t = DEFAULT_PERMUTATIONS)]
        permutations: usize,
        /// Significance level
        #[arg(short, long, default_value_t = DEFAULT_ALPHA)]
        alpha: f64,
        /// Random seed (drawn from entropy and logged when omitted)
        #[arg(short, long)]
        seed: Option<u64>,
        /// Neighbor rule: queen (shared edge or corner) or rook (shared edge)
        #[arg(long, default_value_t = Contiguity::Queen)]
        contiguity: Contiguity,
        #[command(flatten)]
        frame: FrameArgs,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set default subscriber")
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn projection(frame: &FrameArgs) -> Result<Projection> {
    match frame.utm_epsg {
        None => Ok(Projection::Identity),
        Some(code) => {
            let projection = Projection::to_crs(CRS::from_epsg(code))
                .with_context(|| format!("EPSG:{} is not a UTM zone", code))?;
            if let Some(target) = projection.target() {
                info!("Projecting WGS84 input to {}", target);
            }
            Ok(projection)
        }
    }
}

fn load_boundary(path: &Path, projection: &Projection) -> Result<Boundary> {
    let pb = spinner("Reading boundary...");
    let polygons = read_boundary(path)
        .with_context(|| format!("Failed to read boundary {}", path.display()))?;
    pb.finish_and_clear();
    let polygons = polygons.iter().map(|p| projection.project(p)).collect();
    let boundary = Boundary::from_polygons(polygons).context("Invalid boundary")?;
    info!("Boundary: {:.0} m² in {} parts", boundary.area(), boundary.geometry().0.len());
    Ok(boundary)
}

fn load_points(path: &Path, projection: &Projection) -> Result<Vec<Point>> {
    let pb = spinner("Reading points...");
    let points = read_points(path)
        .with_context(|| format!("Failed to read points {}", path.display()))?;
    pb.finish_and_clear();
    info!("Points: {}", points.len());
    Ok(points.into_iter().map(|p| projection.forward_point(p)).collect())
}

fn print_report(report: &AnalysisReport) {
    let g = &report.global;
    let s = &report.summary;
    println!("Global Moran's I: {:.6} (E[I] = {:.6})", g.i, g.expected);
    println!(
        "  p-value: {:.4} ({} permutations, z_sim = {:.3}, seed = {})",
        g.p_value, g.permutations, g.z_sim, report.seed
    );
    println!(
        "Clusters at alpha = {}: HH {}, LL {}, HL {}, LH {}, NS {} ({} cells)",
        report.alpha,
        s.hh,
        s.ll,
        s.hl,
        s.lh,
        s.ns,
        s.total()
    );
    println!("  Significant cells: {}", s.significant());
}

fn done(name: &str, path: &Path, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Info { input } => {
            let info = inspect_geojson(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;

            println!("File: {}", input.display());
            println!("Features: {}", info.features);
            println!(
                "  Polygons: {}, Points: {}, Other: {}, Without geometry: {}",
                info.polygons, info.points, info.other, info.empty
            );
            match info.bounds {
                Some(b) => println!(
                    "Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})",
                    b.min_x, b.min_y, b.max_x, b.max_y
                ),
                None => println!("Bounds: none"),
            }
        }

        Commands::Grid {
            boundary,
            output,
            cell_size,
            points,
            frame,
        } => {
            let projection = projection(&frame)?;
            let region = load_boundary(&boundary, &projection)?;
            let points = match &points {
                Some(path) => Some(load_points(path, &projection)?),
                None => None,
            };

            let start = Instant::now();
            let pb = spinner("Building grid...");
            let grid = build_grid(&region, cell_size).context("Failed to build grid")?;
            let counts = points.as_deref().map(|p| aggregate(&grid, p));
            pb.finish_and_clear();
            let elapsed = start.elapsed();

            let (rows, cols) = grid.shape();
            let lattice = grid.lattice_bbox();
            info!("Grid: {} cells kept of a {} x {} lattice", grid.len(), rows, cols);
            info!(
                "Lattice extent: ({:.1}, {:.1}) - ({:.1}, {:.1})",
                lattice.min_x, lattice.min_y, lattice.max_x, lattice.max_y
            );
            if let Some(c) = &counts {
                info!("Counted {} points", c.total());
            }

            let fc = grid_to_geojson(&grid, counts.as_ref(), &projection);
            let file = File::create(&output)
                .with_context(|| format!("Failed to create {}", output.display()))?;
            write_feature_collection(&fc, file).context("Failed to write grid")?;
            done("Grid", &output, elapsed);
        }

        Commands::Analyze {
            boundary,
            points,
            output,
            csv,
            cell_size,
            permutations,
            alpha,
            seed,
            contiguity,
            frame,
        } => {
            let params = AnalysisParams {
                cell_size,
                permutations,
                alpha,
                seed,
                contiguity,
            };
            params.validate().context("Invalid parameters")?;

            let mut store =
                GeoJsonStore::new(&boundary, &points, &output).with_projection(projection(&frame)?);
            if let Some(path) = &csv {
                store = store.with_csv(path);
            }

            let start = Instant::now();
            let pb = spinner("Analyzing...");
            let report = run_with_store(&mut store, &params);
            pb.finish_and_clear();
            let report = report.context("Analysis failed")?;
            let elapsed = start.elapsed();

            print_report(&report);
            done("Clusters", &output, elapsed);
            if let Some(path) = &csv {
                println!("  Table: {}", path.display());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    fn analyze_contiguity(extra: &[&str]) -> Option<Contiguity> {
        let mut args = vec!["lisagrid", "analyze", "b.geojson", "p.geojson", "out.geojson"];
        args.extend_from_slice(extra);
        match Cli::try_parse_from(args).ok()?.command {
            Commands::Analyze { contiguity, .. } => Some(contiguity),
            _ => None,
        }
    }

    #[test]
    fn test_contiguity_flag() {
        assert_eq!(analyze_contiguity(&[]), Some(Contiguity::Queen));
        assert_eq!(analyze_contiguity(&["--contiguity", "rook"]), Some(Contiguity::Rook));
        assert_eq!(analyze_contiguity(&["--contiguity", "Queen"]), Some(Contiguity::Queen));
        assert_eq!(analyze_contiguity(&["--contiguity", "bishop"]), None);
    }
}
