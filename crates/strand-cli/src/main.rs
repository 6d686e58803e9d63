//! strand CLI - inspect, render and preview HAIR curve files.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};
use std::time::Instant;

use strand_raytrace::{render_frame, HairCurves, Primitive};

mod config;
mod export;
mod logger;
mod summary;

use config::RenderSettings;
use export::export_stl_bytes;
use summary::HairSummary;

#[derive(Parser)]
#[command(name = "strand")]
#[command(about = "Ray traced hair curves", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display information about a HAIR file
    Info {
        /// Path to the HAIR file
        file: PathBuf,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Ray trace a HAIR file to a PNG image
    Render {
        /// Input HAIR file
        file: PathBuf,
        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,
        /// TOML render settings
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Image width, overriding the settings
        #[arg(long)]
        width: Option<u32>,
        /// Image height, overriding the settings
        #[arg(long)]
        height: Option<u32>,
    },
    /// Export the preview ribbon mesh as binary STL
    Proxy {
        /// Input HAIR file
        file: PathBuf,
        /// Output STL file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose)?;

    match cli.command {
        Commands::Info { file, json } => show_info(&file, json)?,
        Commands::Render {
            file,
            output,
            config,
            width,
            height,
        } => {
            let mut settings = match config {
                Some(path) => RenderSettings::load(&path)?,
                None => RenderSettings::default(),
            };
            if let Some(width) = width {
                settings.width = width;
            }
            if let Some(height) = height {
                settings.height = height;
            }
            settings.validate()?;
            render_file(&file, &output, &settings)?;
        }
        Commands::Proxy { file, output } => export_proxy(&file, &output)?,
    }

    Ok(())
}

fn show_info(file: &Path, json: bool) -> Result<()> {
    let hair = strand_hair::read_hair(file)?;
    let summary = HairSummary::new(&hair);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        summary.print(&file.display().to_string());
    }
    Ok(())
}

fn render_file(file: &Path, output: &Path, settings: &RenderSettings) -> Result<()> {
    let mut hair = HairCurves::from_file(file)?;
    hair.set_transform(settings.placement.transform());
    let prepared = hair.prepare_for_render();

    let camera = settings.camera(&prepared.bounds());
    let start = Instant::now();
    let frame = render_frame(prepared.as_ref(), &camera, settings.near);
    info!(
        "traced {}x{} in {:.1?}, {} pixels hit",
        frame.width(),
        frame.height(),
        start.elapsed(),
        frame.hit_count()
    );

    let pixels = frame.to_rgb8(settings.shading.into(), prepared.curves());
    let image = image::RgbImage::from_raw(frame.width(), frame.height(), pixels)
        .context("frame buffer does not match image size")?;
    image
        .save(output)
        .with_context(|| format!("failed to write {}", output.display()))?;

    drop(prepared);
    hair.cleanup_after_render()?;

    println!("Rendered {} to {}", file.display(), output.display());
    Ok(())
}

fn export_proxy(file: &Path, output: &Path) -> Result<()> {
    let mut hair = HairCurves::from_file(file)?;
    let mesh = hair.prepare_for_render().build_proxy();
    hair.cleanup_after_render()?;

    std::fs::write(output, export_stl_bytes(&mesh))
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!(
        "Exported {} triangles to {}",
        mesh.num_triangles(),
        output.display()
    );
    Ok(())
}
