//! Console logging for the binary.
//!
//! Records go to stdout as `[LEVEL] message`. Skip records from the batch
//! driver are rendered as `[SKIP] message`.

use std::io::{self, Write};

use crate::pipeline::SKIP_TARGET;

/// Render one log record as a single output line.
pub fn format_record<W: Write + ?Sized>(buf: &mut W, record: &log::Record<'_>) -> io::Result<()> {
    if record.target() == SKIP_TARGET {
        writeln!(buf, "[SKIP] {}", record.args())
    } else {
        writeln!(buf, "[{}] {}", record.level(), record.args())
    }
}

/// Install the stdout logger. `RUST_LOG` wins over `verbose`.
pub fn init(verbose: bool) {
    let log_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .target(env_logger::Target::Stdout)
        .format(|buf, record| format_record(buf, record))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    fn render(level: Level, target: &str, message: std::fmt::Arguments<'_>) -> String {
        let record = log::Record::builder()
            .level(level)
            .target(target)
            .args(message)
            .build();
        let mut out = Vec::new();
        format_record(&mut out, &record).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn info_line() {
        let line = render(
            Level::Info,
            "heic_convert::pipeline",
            format_args!("Converting in/a.heic to out/a.png"),
        );
        assert_eq!(line, "[INFO] Converting in/a.heic to out/a.png\n");
    }

    #[test]
    fn skip_line() {
        let line = render(
            Level::Warn,
            SKIP_TARGET,
            format_args!("Failed to convert in/a.heic: no Exif metadata found in in/a.heic"),
        );
        assert_eq!(
            line,
            "[SKIP] Failed to convert in/a.heic: no Exif metadata found in in/a.heic\n"
        );
    }

    #[test]
    fn other_warnings_keep_their_level() {
        let line = render(
            Level::Warn,
            "heic_convert::config",
            format_args!("Config file not found"),
        );
        assert_eq!(line, "[WARN] Config file not found\n");
    }

    #[test]
    fn debug_line() {
        let line = render(Level::Debug, "heic_convert::pipeline", format_args!("Wrote out/a.png (3x2)"));
        assert_eq!(line, "[DEBUG] Wrote out/a.png (3x2)\n");
    }
}
