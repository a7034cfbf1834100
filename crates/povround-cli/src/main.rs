//! povround CLI - rounded extrusions for POV-Ray
//!
//! Turns text, a polygon or an SVG path into a `#declare`d union of a prism
//! and bicubic bevel patches.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use povround::{OutlineSource, RoundedSolid, RoundingSettings, TextStyle, Transform2};

mod batch;

#[derive(Parser)]
#[command(name = "povround")]
#[command(about = "Rounded text and shape extrusions for POV-Ray", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Round a line of text rendered in a font
    Text {
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        source: TextArgs,
    },
    /// Round a polygon given as "(x1,y1),(x2,y2),..."
    Polygon {
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        source: PolygonArgs,
    },
    /// Round an SVG path
    Svgpath {
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        source: SvgArgs,
    },
    /// Run every job of a TOML job file
    Batch {
        /// Job file with [[job]] tables
        jobs: PathBuf,
    },
    /// Print a JSON summary instead of writing a scene
    Inspect {
        #[command(subcommand)]
        source: SourceCommand,
    },
}

#[derive(Subcommand)]
enum SourceCommand {
    /// Inspect a line of text rendered in a font
    Text(TextArgs),
    /// Inspect a polygon
    Polygon(PolygonArgs),
    /// Inspect an SVG path
    Svgpath(SvgArgs),
}

#[derive(Args)]
struct OutputArgs {
    /// Output file
    #[arg(short, long)]
    output: PathBuf,
    /// Identifier declared in the scene
    #[arg(short, long)]
    name: String,
}

#[derive(Args)]
struct RoundingArgs {
    /// Extrusion depth
    #[arg(short, long, default_value_t = 6.0)]
    depth: f64,
    /// Rounding radius
    #[arg(short, long, default_value_t = 1.0)]
    radius: f64,
    /// Rounding factor, between 0 and 1
    #[arg(short, long, default_value_t = 0.76)]
    factor: f64,
    /// Patch smoothness (u_steps/v_steps)
    #[arg(short, long, default_value_t = 4)]
    smoothness: u32,
    /// File whose contents are added to every prism and patch block
    #[arg(short, long)]
    extra: Option<PathBuf>,
    /// Skip the front bevel
    #[arg(long = "skip-front", visible_alias = "sf")]
    skip_front: bool,
    /// Skip the back bevel
    #[arg(long = "skip-back", visible_alias = "sb")]
    skip_back: bool,
}

impl RoundingArgs {
    fn settings(&self) -> Result<RoundingSettings> {
        let extra_code = self.extra.as_deref().map(read_extra).transpose()?;
        Ok(RoundingSettings {
            depth: self.depth,
            radius: self.radius,
            factor: self.factor,
            smoothness: self.smoothness,
            skip_front: self.skip_front,
            skip_back: self.skip_back,
            extra_code,
        })
    }
}

#[derive(Args)]
struct TextArgs {
    /// Text to render; "\n" starts a new line
    text: String,
    /// TrueType/OpenType font file or collection
    #[arg(long)]
    font: PathBuf,
    /// Em size in output units
    #[arg(long, default_value_t = 64.0)]
    size: f64,
    /// Use a bold face
    #[arg(long)]
    bold: bool,
    /// Use an italic face (or a synthetic oblique)
    #[arg(long)]
    italic: bool,
    #[command(flatten)]
    rounding: RoundingArgs,
}

#[derive(Args)]
struct PolygonArgs {
    /// Vertices, e.g. "(0,0),(10,0),(10,10)"
    vertices: String,
    #[command(flatten)]
    rounding: RoundingArgs,
}

#[derive(Args)]
struct SvgArgs {
    /// Inline path data (M, L, C, Z)
    #[arg(short = 'p', long = "path", conflicts_with = "file", required_unless_present = "file")]
    data: Option<String>,
    /// Transform for inline path data, e.g. "matrix(1,0,0,1,0,0)"
    #[arg(long, requires = "data")]
    matrix: Option<String>,
    /// SVG file containing the path
    #[arg(long, requires = "id")]
    file: Option<PathBuf>,
    /// id attribute of the path element in --file
    #[arg(long, requires = "file")]
    id: Option<String>,
    #[command(flatten)]
    rounding: RoundingArgs,
}

impl SourceCommand {
    fn resolve(&self) -> Result<(OutlineSource, RoundingSettings)> {
        match self {
            SourceCommand::Text(args) => Ok((args.source(), args.rounding.settings()?)),
            SourceCommand::Polygon(args) => Ok((
                OutlineSource::Polygon(args.vertices.clone()),
                args.rounding.settings()?,
            )),
            SourceCommand::Svgpath(args) => Ok((args.source()?, args.rounding.settings()?)),
        }
    }
}

impl TextArgs {
    fn source(&self) -> OutlineSource {
        OutlineSource::Text {
            text: unescape_newlines(&self.text),
            font: self.font.clone(),
            size: self.size,
            style: TextStyle {
                bold: self.bold,
                italic: self.italic,
            },
        }
    }
}

impl SvgArgs {
    fn source(&self) -> Result<OutlineSource> {
        match (&self.data, &self.file, &self.id) {
            (Some(data), None, None) => {
                let transform = match &self.matrix {
                    Some(m) => povround::parse_matrix(m)?,
                    None => Transform2::identity(),
                };
                Ok(OutlineSource::SvgPath {
                    data: data.clone(),
                    transform,
                })
            }
            (None, Some(file), Some(id)) => Ok(OutlineSource::SvgFile {
                file: file.clone(),
                id: id.clone(),
            }),
            _ => anyhow::bail!("give either --path or both --file and --id"),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Text { output, source } => {
            write_solid(&output, &source.source(), source.rounding.settings()?)?;
        }
        Commands::Polygon { output, source } => {
            let outline = OutlineSource::Polygon(source.vertices.clone());
            write_solid(&output, &outline, source.rounding.settings()?)?;
        }
        Commands::Svgpath { output, source } => {
            write_solid(&output, &source.source()?, source.rounding.settings()?)?;
        }
        Commands::Batch { jobs } => {
            batch::run_batch(&jobs)?;
        }
        Commands::Inspect { source } => {
            let (outline, settings) = source.resolve()?;
            println!("{}", inspect(&outline, settings)?);
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn write_solid(output: &OutputArgs, source: &OutlineSource, settings: RoundingSettings) -> Result<()> {
    let solid = RoundedSolid::from_source(&output.name, source, settings)
        .with_context(|| format!("failed to build {}", output.name))?;
    solid
        .write_pov(&output.output)
        .with_context(|| format!("failed to write {}", output.output.display()))?;
    println!(
        "Wrote {} ({} patches) to {}",
        solid.name,
        solid.outline.patch_count(),
        output.output.display()
    );
    Ok(())
}

fn inspect(source: &OutlineSource, settings: RoundingSettings) -> Result<String> {
    let solid = RoundedSolid::from_source("Inspect", source, settings)?;
    Ok(serde_json::to_string_pretty(&solid.summary())?)
}

fn read_extra(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read extra code {}", path.display()))
}

/// Shells pass `\n` literally; treat it as a line break.
fn unescape_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}
