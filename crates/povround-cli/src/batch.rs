//! Batch jobs read from a TOML file.
//!
//! ```toml
//! output_dir = "out"
//!
//! [defaults]
//! radius = 0.5
//!
//! [[job]]
//! output = "hello.inc"
//! name = "Hello"
//! text = "Hello"
//! font = "fonts/DejaVuSans.ttf"
//!
//! [[job]]
//! output = "tri.inc"
//! name = "Tri"
//! polygon = "(0,0),(10,0),(5,8)"
//! rounding = { depth = 3, skip_back = true }
//! ```
//!
//! Relative font, SVG and extra-code paths are resolved against the job
//! file's directory; outputs against `output_dir`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use povround::{OutlineSource, RoundedSolid, RoundingSettings, TextStyle, Transform2};

/// A parsed job file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct JobFile {
    #[serde(default)]
    output_dir: Option<PathBuf>,
    #[serde(default)]
    defaults: RoundingOverrides,
    #[serde(default, rename = "job")]
    jobs: Vec<Job>,
}

/// Rounding settings that a job may change.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RoundingOverrides {
    depth: Option<f64>,
    radius: Option<f64>,
    factor: Option<f64>,
    smoothness: Option<u32>,
    skip_front: Option<bool>,
    skip_back: Option<bool>,
    extra: Option<PathBuf>,
}

impl RoundingOverrides {
    fn apply(&self, settings: &mut RoundingSettings, base_dir: &Path) -> Result<()> {
        if let Some(v) = self.depth {
            settings.depth = v;
        }
        if let Some(v) = self.radius {
            settings.radius = v;
        }
        if let Some(v) = self.factor {
            settings.factor = v;
        }
        if let Some(v) = self.smoothness {
            settings.smoothness = v;
        }
        if let Some(v) = self.skip_front {
            settings.skip_front = v;
        }
        if let Some(v) = self.skip_back {
            settings.skip_back = v;
        }
        if let Some(extra) = &self.extra {
            let path = base_dir.join(extra);
            let code = fs::read_to_string(&path)
                .with_context(|| format!("failed to read extra code {}", path.display()))?;
            settings.extra_code = Some(code);
        }
        Ok(())
    }
}

/// One `[[job]]` table.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Job {
    output: PathBuf,
    name: String,
    text: Option<String>,
    font: Option<PathBuf>,
    size: Option<f64>,
    #[serde(default)]
    bold: bool,
    #[serde(default)]
    italic: bool,
    polygon: Option<String>,
    svg_path: Option<String>,
    svg_matrix: Option<String>,
    svg_file: Option<PathBuf>,
    svg_id: Option<String>,
    #[serde(default)]
    rounding: RoundingOverrides,
}

impl Job {
    /// The outline source this job names; exactly one kind must be given.
    fn source(&self, base_dir: &Path) -> Result<OutlineSource> {
        let kinds = [
            self.text.is_some(),
            self.polygon.is_some(),
            self.svg_path.is_some(),
            self.svg_file.is_some(),
        ];
        if kinds.iter().filter(|k| **k).count() != 1 {
            anyhow::bail!(
                "job {} must have exactly one of text, polygon, svg_path or svg_file",
                self.name
            );
        }

        if let Some(text) = &self.text {
            let font = self
                .font
                .as_ref()
                .with_context(|| format!("job {} has text but no font", self.name))?;
            return Ok(OutlineSource::Text {
                text: text.clone(),
                font: base_dir.join(font),
                size: self.size.unwrap_or(64.0),
                style: TextStyle {
                    bold: self.bold,
                    italic: self.italic,
                },
            });
        }
        if let Some(polygon) = &self.polygon {
            return Ok(OutlineSource::Polygon(polygon.clone()));
        }
        if let Some(data) = &self.svg_path {
            let transform = match &self.svg_matrix {
                Some(m) => povround::parse_matrix(m)?,
                None => Transform2::identity(),
            };
            return Ok(OutlineSource::SvgPath {
                data: data.clone(),
                transform,
            });
        }
        match (&self.svg_file, &self.svg_id) {
            (Some(file), Some(id)) => Ok(OutlineSource::SvgFile {
                file: base_dir.join(file),
                id: id.clone(),
            }),
            _ => anyhow::bail!("job {} has svg_file but no svg_id", self.name),
        }
    }
}

impl JobFile {
    /// Parse a job file.
    fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Settings for `job`: defaults, then file-wide overrides, then the job's own.
    fn settings(&self, job: &Job, base_dir: &Path) -> Result<RoundingSettings> {
        let mut settings = RoundingSettings::default();
        self.defaults.apply(&mut settings, base_dir)?;
        job.rounding.apply(&mut settings, base_dir)?;
        Ok(settings)
    }

    /// Where `job` writes its scene.
    fn output_path(&self, job: &Job, base_dir: &Path) -> PathBuf {
        match &self.output_dir {
            Some(dir) => base_dir.join(dir).join(&job.output),
            None => base_dir.join(&job.output),
        }
    }
}

/// Run every job in `path`, in order. Stops at the first failure.
pub fn run_batch(path: &Path) -> Result<()> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read job file {}", path.display()))?;
    let file = JobFile::parse(&text)
        .with_context(|| format!("failed to parse job file {}", path.display()))?;
    let base_dir = path.parent().unwrap_or(Path::new("."));

    if file.jobs.is_empty() {
        log::warn!("{} contains no jobs", path.display());
    }
    if let Some(dir) = &file.output_dir {
        fs::create_dir_all(base_dir.join(dir))?;
    }

    for (i, job) in file.jobs.iter().enumerate() {
        let source = job.source(base_dir)?;
        let settings = file.settings(job, base_dir)?;
        let output = file.output_path(job, base_dir);
        log::info!("job {}/{}: {}", i + 1, file.jobs.len(), job.name);

        let solid = RoundedSolid::from_source(&job.name, &source, settings)
            .with_context(|| format!("job {} failed", job.name))?;
        solid
            .write_pov(&output)
            .with_context(|| format!("failed to write {}", output.display()))?;
        println!("Wrote {} to {}", job.name, output.display());
    }

    Ok(())
}
