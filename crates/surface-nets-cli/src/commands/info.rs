//! snets info command - display extraction statistics.

use std::time::Instant;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use surface_nets::{MeshExtractor, OutputBuffers, SurfaceNetsParams, required_capacity};

use super::{BoundsInfo, build_shape, sample};
use crate::{Cli, OutputFormat, ShapeArgs, output};

#[derive(Serialize)]
struct ExtractionInfo {
    shape: String,
    size: usize,
    cells: usize,
    vertices: usize,
    triangles: usize,
    /// Fraction of cells that produced a vertex.
    active_cells: f64,
    /// Fraction of the worst-case index buffer that was used.
    index_buffer_usage: f64,
    degenerate_normals: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    bounds: Option<BoundsInfo>,
    elapsed_ms: f64,
}

pub fn run(args: &ShapeArgs, cli: &Cli) -> Result<()> {
    let shape = build_shape(args)?;
    let grid = sample(&shape, args.size, cli.quiet)
        .with_context(|| format!("Failed to sample {:?}", args.shape))?;
    let field = grid.as_field()?;

    let cap = required_capacity(args.size)?;
    let mut vertices = vec![[0.0f32; 3]; cap.vertices];
    let mut normals = vec![[0.0f32; 3]; cap.vertices];
    let mut triangles = vec![0u32; cap.triangle_indices];

    let params = SurfaceNetsParams::default().with_tangents(false);
    let mut extractor = MeshExtractor::new(field, params)?;

    let started = Instant::now();
    let summary = {
        let mut out = OutputBuffers::new(&mut vertices, &mut triangles).with_normals(&mut normals);
        extractor.run(&mut out)?
    };
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    let cells = field.cells_per_axis().pow(3);
    let ratio = |n: usize, d: usize| if d == 0 { 0.0 } else { n as f64 / d as f64 };

    let info = ExtractionInfo {
        shape: format!("{:?}", args.shape).to_lowercase(),
        size: args.size,
        cells,
        vertices: summary.vertex_count,
        triangles: summary.triangle_count(),
        active_cells: ratio(summary.vertex_count, cells),
        index_buffer_usage: ratio(summary.triangle_index_count, cap.triangle_indices),
        degenerate_normals: summary.degenerate_normals,
        bounds: summary.bounds.map(BoundsInfo::from),
        elapsed_ms,
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&info, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", "Extraction Information".bold().underline());
                println!("  {}: {}", "Shape".cyan(), info.shape);
                println!("  {}: {}³ samples, {} cells", "Grid".cyan(), info.size, info.cells);
                println!("  {}: {}", "Vertices".cyan(), info.vertices);
                println!("  {}: {}", "Triangles".cyan(), info.triangles);
                println!(
                    "  {}: {:.2}%",
                    "Active cells".cyan(),
                    info.active_cells * 100.0
                );
                println!(
                    "  {}: {:.2}%",
                    "Index buffer usage".cyan(),
                    info.index_buffer_usage * 100.0
                );

                if let Some(ref b) = info.bounds {
                    println!(
                        "  {}: ({:.2}, {:.2}, {:.2})",
                        "Min bounds".cyan(),
                        b.min[0],
                        b.min[1],
                        b.min[2]
                    );
                    println!(
                        "  {}: ({:.2}, {:.2}, {:.2})",
                        "Max bounds".cyan(),
                        b.max[0],
                        b.max[1],
                        b.max[2]
                    );
                } else {
                    println!("  {}: {}", "Bounds".cyan(), "empty".dimmed());
                }

                if info.degenerate_normals > 0 {
                    println!(
                        "  {}: {}",
                        "Zero normals".yellow(),
                        info.degenerate_normals
                    );
                }
                println!("  {}: {:.2} ms", "Time".cyan(), info.elapsed_ms);
            }
        }
    }

    Ok(())
}
