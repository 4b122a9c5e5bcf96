//! # heic-convert
//!
//! Batch-convert HEIC photos in a directory tree to PNG or JPEG.
//!
//! Every `.heic` / `.HEIC` file under the input directory is decoded with
//! libheif. If the container carries an Exif metadata block, the pixels are
//! re-encoded into the output directory as `<name>.png` or `<name>.jpeg`.
//! Files without Exif, files that fail to decode and files that fail to
//! write are logged as skipped and the batch moves on.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use heic_convert::config::{Config, OutputFormat};
//! use heic_convert::decode::LibHeifDecoder;
//! use heic_convert::encode::ImageFileEncoder;
//! use heic_convert::pipeline::{run_batch, BatchConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let batch = BatchConfig::new(
//!         "./photos".into(),
//!         "./converted".into(),
//!         OutputFormat::Jpeg,
//!         &config,
//!     );
//!
//!     let decoder = LibHeifDecoder::new();
//!     let encoder = ImageFileEncoder::new(config.jpeg_quality);
//!     let summary = run_batch(&batch, &decoder, &encoder)?;
//!
//!     for skip in &summary.failures {
//!         eprintln!("{}: {}", skip.input.display(), skip.reason);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Single Files
//!
//! ```rust,ignore
//! use heic_convert::config::OutputFormat;
//! use heic_convert::convert::{ConversionRequest, Converter};
//! use heic_convert::decode::LibHeifDecoder;
//! use heic_convert::encode::ImageFileEncoder;
//!
//! # fn main() -> anyhow::Result<()> {
//! let decoder = LibHeifDecoder::new();
//! let encoder = ImageFileEncoder::default();
//! let converter = Converter::new(&decoder, &encoder).keep_exif(true);
//!
//! let done = converter.convert(&ConversionRequest {
//!     input_path: "IMG_0001.HEIC".into(),
//!     output_path: "IMG_0001.png".into(),
//!     target_format: OutputFormat::Png,
//! })?;
//! println!("{}x{}", done.width, done.height);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`walk`]: HEIC file discovery
//! - [`decode`]: decoder trait and the libheif implementation
//! - [`encode`]: PNG/JPEG output
//! - [`exif`]: Exif passthrough
//! - [`convert`]: single-file conversion with the Exif gate
//! - [`pipeline`]: batch driver and summary
//! - [`config`]: output format, layout and persisted settings
//! - [`error`]: per-stage error types
//! - `logging`: console log format for the binary (`cli` feature)

pub mod config;
pub mod convert;
pub mod decode;
pub mod encode;
pub mod error;
pub mod exif;
#[cfg(feature = "cli")]
pub mod logging;
pub mod pipeline;
pub mod walk;
