//! snets extract command - sample a shape, extract and export its surface.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use surface_nets::{BoundsLayout, SurfaceNetsParams, extract_mesh};
use tracing::info;

use super::{BoundsInfo, build_shape, sample};
use crate::{BoundsFormat, Cli, OutputFormat, ShapeArgs, output};

#[derive(Serialize)]
struct ExtractResult {
    shape: String,
    size: usize,
    vertices: usize,
    triangles: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    bounds: Option<BoundsInfo>,
    /// Bounds in the requested flat layout; zeros when empty.
    bounds_array: [f32; 6],
    surface_area: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<String>,
    elapsed_ms: f64,
}

pub fn run(
    args: &ShapeArgs,
    output_path: Option<&Path>,
    normals: bool,
    tangents: bool,
    parallel: bool,
    bounds_format: BoundsFormat,
    cli: &Cli,
) -> Result<()> {
    let shape = build_shape(args)?;
    let layout = match bounds_format {
        BoundsFormat::CenterExtent => BoundsLayout::CenterExtent,
        BoundsFormat::MinMax => BoundsLayout::MinMax,
    };
    let params = SurfaceNetsParams::default()
        .with_normals(normals)
        .with_tangents(tangents)
        .with_parallel(parallel)
        .with_bounds_layout(layout);

    output::info(
        &format!("Extracting {:?} on a {}³ grid...", args.shape, args.size),
        cli.format,
        cli.quiet,
    );

    let started = Instant::now();
    let grid = sample(&shape, args.size, cli.quiet)
        .with_context(|| format!("Failed to sample {:?}", args.shape))?;
    let field = grid.as_field()?;
    let mesh = extract_mesh(&field, &params)?;
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    info!(
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        elapsed_ms,
        "Extraction finished"
    );

    if let Some(path) = output_path {
        mesh.save_obj(path)
            .with_context(|| format!("Failed to save mesh to {:?}", path))?;
    }

    let result = ExtractResult {
        shape: format!("{:?}", args.shape).to_lowercase(),
        size: args.size,
        vertices: mesh.vertex_count(),
        triangles: mesh.triangle_count(),
        bounds: mesh.bounds.map(BoundsInfo::from),
        bounds_array: mesh.bounds.map_or([0.0; 6], |b| b.to_array(layout)),
        surface_area: mesh.surface_area(),
        output: output_path.map(|p| p.display().to_string()),
        elapsed_ms,
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&result, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                match output_path {
                    Some(path) => output::success(
                        &format!("Mesh saved to {}", path.display()),
                        cli.format,
                        cli.quiet,
                    ),
                    None => output::success("Extraction complete", cli.format, cli.quiet),
                }
                println!("  {}: {}", "Vertices".cyan(), result.vertices);
                println!("  {}: {}", "Triangles".cyan(), result.triangles);
                println!("  {}: {:.2}", "Surface area".cyan(), result.surface_area);

                let b = result.bounds_array;
                let label = match layout {
                    BoundsLayout::CenterExtent => "Bounds (center, extent)",
                    BoundsLayout::MinMax => "Bounds (min, max)",
                };
                println!(
                    "  {}: ({:.2}, {:.2}, {:.2}) ({:.2}, {:.2}, {:.2})",
                    label.cyan(),
                    b[0],
                    b[1],
                    b[2],
                    b[3],
                    b[4],
                    b[5]
                );
                println!("  {}: {:.2} ms", "Time".cyan(), result.elapsed_ms);
            }
        }
    }

    Ok(())
}
