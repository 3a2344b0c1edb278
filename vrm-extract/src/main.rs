//! vrm-extract - VRM/GLB texture extraction tool
//!
//! Pulls embedded texture images out of single-file avatar containers and
//! reports which material uses which texture.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use vrm_extract::{
    build_report, extract_textures, Document, Glb, ImageSource, DEFAULT_OUTPUT_DIR,
};

#[derive(Parser)]
#[command(name = "vrm-extract")]
#[command(about = "VRM/GLB texture extraction tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract all embedded textures from a container
    Extract {
        /// Input .vrm/.glb file
        input: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
        out: PathBuf,

        /// Also write the structured report as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Inspect a container without writing any file
    Info {
        /// Input .vrm/.glb file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract { input, out, report } => {
            let (glb, doc) = load_container(&input)?;

            let outcomes = extract_textures(&doc, glb.binary.as_deref(), &out)?;
            let summary = build_report(&doc, outcomes);
            print!("{summary}");

            if let Some(path) = report {
                let file = std::fs::File::create(&path)
                    .with_context(|| format!("Failed to create report: {:?}", path))?;
                serde_json::to_writer_pretty(std::io::BufWriter::new(file), &summary)
                    .with_context(|| format!("Failed to write report: {:?}", path))?;
                tracing::info!("Report written to {:?}", path);
            }

            // Per-image failures are part of the report, not the exit code;
            // only container-level errors abort with a non-zero status.
        }

        Commands::Info { input } => {
            let (glb, doc) = load_container(&input)?;

            println!(
                "{}: {} images, {} textures, {} materials, binary chunk: {}",
                input.display(),
                doc.images.len(),
                doc.textures.len(),
                doc.materials.len(),
                match &glb.binary {
                    Some(bin) => format!("{} bytes", bin.len()),
                    None => "none".to_string(),
                },
            );

            for (index, image) in doc.images.iter().enumerate() {
                let source = match image.source() {
                    Some(ImageSource::BufferView(view)) => format!("bufferView {view}"),
                    Some(ImageSource::DataUri(_)) => "inline data URI".to_string(),
                    Some(ImageSource::ExternalUri(uri)) => format!("external: {uri}"),
                    None => "no source".to_string(),
                };
                println!(
                    "  image {index:2}: {source} ({})",
                    image.mime_type.as_deref().unwrap_or("unknown mime"),
                );
            }

            let bindings = build_report(&doc, Vec::new());
            for binding in &bindings.materials {
                println!(
                    "  material {:2} {}: base color -> {}, normal -> {}",
                    binding.material_index,
                    binding.material_name.as_deref().unwrap_or("(unnamed)"),
                    binding
                        .base_color
                        .as_ref()
                        .map(|slot| format!("image {}", slot.image_index))
                        .unwrap_or_else(|| "(none)".to_string()),
                    binding
                        .normal
                        .as_ref()
                        .map(|slot| format!("image {}", slot.image_index))
                        .unwrap_or_else(|| "(none)".to_string()),
                );
            }
        }
    }

    Ok(())
}

/// Read a container from disk and parse both the chunk layer and the JSON
/// scene description. All errors here are fatal.
fn load_container(input: &std::path::Path) -> Result<(Glb, Document)> {
    let bytes = std::fs::read(input)
        .with_context(|| format!("Failed to read container: {:?}", input))?;
    let glb =
        Glb::parse(&bytes).with_context(|| format!("Invalid container: {:?}", input))?;
    let doc = Document::from_json(&glb.json)
        .with_context(|| format!("Invalid scene JSON in {:?}", input))?;
    Ok((glb, doc))
}
