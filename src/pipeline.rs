use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::{Config, OutputFormat, OutputLayout};
use crate::convert::{ConversionRequest, Converter};
use crate::decode::HeicDecoder;
use crate::encode::OutputEncoder;
use crate::walk::heic_candidates;

/// Log target for skip records. The CLI renders these as `[SKIP]` lines.
pub const SKIP_TARGET: &str = "heic_convert::skip";

/// Everything a batch run needs to know.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    pub layout: OutputLayout,
    pub keep_exif: bool,
}

impl BatchConfig {
    /// Build a batch config from positional arguments plus persisted settings.
    pub fn new(input_dir: PathBuf, output_dir: PathBuf, format: OutputFormat, config: &Config) -> Self {
        Self {
            input_dir,
            output_dir,
            format,
            layout: config.layout,
            keep_exif: config.keep_exif,
        }
    }
}

/// A candidate that was not converted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkipRecord {
    pub input: PathBuf,
    pub reason: String,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Candidates found by the walk.
    pub found: usize,
    pub converted: usize,
    pub skipped: usize,
    pub failures: Vec<SkipRecord>,
}

impl BatchSummary {
    /// True when at least one file was attempted and none converted.
    pub fn all_failed(&self) -> bool {
        self.found > 0 && self.converted == 0
    }
}

/// Compute where a candidate's output goes.
///
/// With [`OutputLayout::Flat`] everything lands directly in `output_dir`
/// as `<file stem>.<format>`. With [`OutputLayout::Mirror`] the candidate's
/// directory relative to `input_dir` is kept.
///
/// ```rust
/// use heic_convert::config::{OutputFormat, OutputLayout};
/// use heic_convert::pipeline::output_path_for;
/// use std::path::Path;
///
/// let out = output_path_for(
///     Path::new("in"),
///     Path::new("out"),
///     Path::new("in/2023/IMG_0001.HEIC"),
///     OutputFormat::Png,
///     OutputLayout::Flat,
/// );
/// assert_eq!(out, Path::new("out/IMG_0001.png"));
/// ```
pub fn output_path_for(
    input_dir: &Path,
    output_dir: &Path,
    candidate: &Path,
    format: OutputFormat,
    layout: OutputLayout,
) -> PathBuf {
    let stem = candidate.file_stem().unwrap_or_default();
    let mut file_name = stem.to_os_string();
    file_name.push(".");
    file_name.push(format.extension());

    let parent = match layout {
        OutputLayout::Flat => output_dir.to_path_buf(),
        OutputLayout::Mirror => candidate
            .parent()
            .and_then(|p| p.strip_prefix(input_dir).ok())
            .map(|rel| output_dir.join(rel))
            .unwrap_or_else(|| output_dir.to_path_buf()),
    };
    parent.join(file_name)
}

/// Convert every HEIC file under `config.input_dir`.
///
/// The output directory is created first; failing that aborts the run.
/// After that no single file can stop the batch: each failure is logged as
/// a skip record on [`SKIP_TARGET`] and collected in the summary.
///
/// ```rust,ignore
/// use heic_convert::config::{Config, OutputFormat};
/// use heic_convert::decode::LibHeifDecoder;
/// use heic_convert::encode::ImageFileEncoder;
/// use heic_convert::pipeline::{run_batch, BatchConfig};
///
/// let config = Config::default();
/// let batch = BatchConfig::new("photos".into(), "converted".into(), OutputFormat::Png, &config);
/// let summary = run_batch(&batch, &LibHeifDecoder::new(), &ImageFileEncoder::default()).unwrap();
/// println!("{} of {} converted", summary.converted, summary.found);
/// ```
pub fn run_batch(
    config: &BatchConfig,
    decoder: &dyn HeicDecoder,
    encoder: &dyn OutputEncoder,
) -> Result<BatchSummary> {
    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            config.output_dir.display()
        )
    })?;

    let converter = Converter::new(decoder, encoder).keep_exif(config.keep_exif);
    let mut summary = BatchSummary::default();

    for input_path in heic_candidates(&config.input_dir) {
        summary.found += 1;

        let output_path = output_path_for(
            &config.input_dir,
            &config.output_dir,
            &input_path,
            config.format,
            config.layout,
        );
        log::info!(
            "Converting {} to {}",
            input_path.display(),
            output_path.display()
        );

        let request = ConversionRequest {
            input_path,
            output_path,
            target_format: config.format,
        };

        match converter.convert(&request) {
            Ok(done) => {
                summary.converted += 1;
                log::debug!(
                    "Wrote {} ({}x{})",
                    done.output_path.display(),
                    done.width,
                    done.height
                );
            }
            Err(e) => {
                summary.skipped += 1;
                log::warn!(
                    target: SKIP_TARGET,
                    "Failed to convert {}: {e}",
                    request.input_path.display()
                );
                summary.failures.push(SkipRecord {
                    input: request.input_path,
                    reason: e.to_string(),
                });
            }
        }
    }

    log::debug!(
        "Done: {} converted, {} skipped out of {} candidate(s)",
        summary.converted,
        summary.skipped,
        summary.found
    );
    Ok(summary)
}
