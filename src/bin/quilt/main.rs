//! Quilt CLI - seam-aware subdivision from the command line.
//!
//! Usage: quilt <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `quilt --help` for available commands.

use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use clap::{Parser, Subcommand};

use quilt::algo::subdivide::{self, SubdivideOptions};
use quilt::algo::Progress;
use quilt::io;
use quilt::mesh::WeldMode;

#[derive(Parser)]
#[command(name = "quilt")]
#[command(author, version, about = "Seam-aware Catmull-Clark subdivision", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display welding and seam statistics for each mesh in a file
    Info {
        /// Input mesh file
        input: PathBuf,

        /// Weld positions closer than this distance instead of exact matches
        #[arg(long)]
        weld_epsilon: Option<f32>,

        /// Texture coordinates closer than this count as equal
        #[arg(long, default_value = "1e-6")]
        uv_epsilon: f64,
    },

    /// Subdivide every mesh in a file
    Subdivide {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Number of subdivision iterations
        #[arg(short, long, default_value = "1")]
        iterations: usize,

        /// Weld positions closer than this distance instead of exact matches
        #[arg(long)]
        weld_epsilon: Option<f32>,

        /// Texture coordinates closer than this count as equal
        #[arg(long, default_value = "1e-6")]
        uv_epsilon: f64,

        /// Use single-threaded execution (for benchmarking)
        #[arg(long)]
        sequential: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info {
            input,
            weld_epsilon,
            uv_epsilon,
        } => {
            let options = SubdivideOptions::default()
                .with_weld(weld_mode(weld_epsilon))
                .with_uv_epsilon(uv_epsilon);
            cmd_info(&input, &options)?;
        }

        Commands::Subdivide {
            input,
            output,
            iterations,
            weld_epsilon,
            uv_epsilon,
            sequential,
        } => {
            let options = SubdivideOptions::new(iterations)
                .with_weld(weld_mode(weld_epsilon))
                .with_uv_epsilon(uv_epsilon)
                .with_parallel(!sequential);
            cmd_subdivide(&input, &output, &options)?;
        }
    }

    Ok(())
}

fn weld_mode(epsilon: Option<f32>) -> WeldMode {
    match epsilon {
        Some(eps) => WeldMode::Tolerance(eps),
        None => WeldMode::Exact,
    }
}

/// Progress line on stderr, redrawn whenever the whole percentage grows.
fn create_progress() -> Progress {
    const WIDTH: usize = 24;
    let shown = AtomicUsize::new(0);

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }
        let percent = (current.min(total) * 100) / total;
        let done = current >= total;
        if shown.fetch_max(percent, Ordering::Relaxed) >= percent && !done {
            return;
        }

        let ticks = percent * WIDTH / 100;
        eprint!("\r{:>3}% |{}{}| {:<32}", percent, "#".repeat(ticks), ".".repeat(WIDTH - ticks), message);
        let _ = std::io::stderr().flush();
        if done {
            eprintln!();
        }
    })
}

fn cmd_info(input: &PathBuf, options: &SubdivideOptions) -> Result<(), Box<dyn std::error::Error>> {
    let meshes = io::load(input)?;

    println!("File: {}", input.display());
    println!("Meshes: {}", meshes.len());

    for (i, mesh) in meshes.iter().enumerate() {
        println!();
        println!("[{}] {}", i, mesh.name.as_deref().unwrap_or("(unnamed)"));
        println!("  Corners: {}", mesh.num_corners());
        println!("  Triangles: {}", mesh.num_triangles());

        match subdivide::analyze(mesh, options) {
            Ok(stats) => {
                println!("  Welded points: {}", stats.points);
                println!("  Edges: {} ({} boundary, {} seam)", stats.edges, stats.boundary_edges, stats.seam_edges);
                if stats.boundary_edges == 0 {
                    println!("  Topology: Closed");
                } else {
                    println!("  Topology: Open");
                }
                println!(
                    "  One pass: {} vertices, {} triangles",
                    stats.faces + stats.edge_points() + stats.points,
                    stats.faces * 6
                );
            }
            Err(e) => println!("  Not subdividable: {}", e),
        }
    }

    Ok(())
}

fn cmd_subdivide(
    input: &PathBuf,
    output: &PathBuf,
    options: &SubdivideOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let meshes = io::load(input)?;

    let triangles: usize = meshes.iter().map(|m| m.num_triangles()).sum();
    println!("Loaded: {} meshes, {} triangles", meshes.len(), triangles);

    let mode = if options.parallel { "parallel" } else { "sequential" };
    println!(
        "Applying Catmull-Clark subdivision ({} iterations, {})...",
        options.iterations, mode
    );

    let start = Instant::now();
    let results = if meshes.len() == 1 {
        let progress = create_progress();
        vec![subdivide::subdivide_with_progress(&meshes[0], options, &progress)]
    } else {
        subdivide::subdivide_batch(&meshes, options)
    };
    let elapsed = start.elapsed();

    let smooth = results.into_iter().collect::<Result<Vec<_>, _>>()?;

    let vertices: usize = smooth.iter().map(|m| m.num_vertices()).sum();
    let triangles: usize = smooth.iter().map(|m| m.num_triangles()).sum();
    println!("Result: {} vertices, {} triangles", vertices, triangles);

    io::save(&smooth, output)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}
