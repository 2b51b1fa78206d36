//! stool - Convert files to and from RFC 2397 data URLs
//!
//! `stool dataurl` encodes a file (or stdin) as a `data:` URL, or decodes one
//! back into raw bytes. `stool version` prints build metadata.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use stool_core::{BuildInfo, ConvertConfig, Converter, Source};
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

/// Small utilities for working with data URLs
#[derive(Parser, Debug)]
#[command(name = "stool")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate Data URL for file
    ///
    /// FILE is the input filename, set to "-" to use stdin. Output goes to stdout.
    Dataurl(DataurlArgs),

    /// Display program version
    Version,
}

#[derive(Args, Debug)]
struct DataurlArgs {
    /// Input file, or "-" for stdin
    file: PathBuf,

    /// Decode mode instead of default encode mode
    #[arg(long)]
    decode: bool,

    /// Force ascii encoding instead of base64
    #[arg(long)]
    ascii: bool,

    /// Force mime type
    #[arg(long, value_name = "TYPE")]
    mimetype: Option<String>,
}

impl DataurlArgs {
    fn config(&self) -> ConvertConfig {
        let config = ConvertConfig::new().decode(self.decode).ascii(self.ascii);
        match &self.mimetype {
            Some(mimetype) => config.mime_type(mimetype.clone()),
            None => config,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Command::Dataurl(args) => run_dataurl(args),
        Command::Version => run_version(),
    }
}

/// Encode or decode one input to stdout
fn run_dataurl(args: &DataurlArgs) -> Result<()> {
    let source = Source::from_arg(&args.file);
    let converter = Converter::with_config(args.config());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let conversion = converter
        .run(&source, &mut out)
        .with_context(|| format!("dataurl failed for {}", source))?;

    debug!(
        "{} -> {} bytes ({})",
        conversion.bytes_read, conversion.bytes_written, conversion.media_type
    );
    Ok(())
}

fn run_version() -> Result<()> {
    let mut out = std::io::stdout().lock();
    write!(out, "{}", BuildInfo::current()).context("Failed to write version")?;
    out.flush().context("Failed to write version")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stool_core::Encoding;

    #[test]
    fn test_dataurl_args_config() {
        let cli = Cli::try_parse_from([
            "stool",
            "dataurl",
            "--ascii",
            "--mimetype",
            "text/plain",
            "in.bin",
        ])
        .unwrap();

        let Command::Dataurl(args) = cli.command else {
            panic!("expected dataurl command");
        };
        let config = args.config();
        assert!(!config.decode);
        assert_eq!(config.encoding(), Encoding::Ascii);
        assert_eq!(config.mime_type.as_deref(), Some("text/plain"));
        assert_eq!(args.file, PathBuf::from("in.bin"));
    }

    #[test]
    fn test_dataurl_defaults() {
        let cli = Cli::try_parse_from(["stool", "-v", "dataurl", "-"]).unwrap();
        assert_eq!(cli.verbose, 1);

        let Command::Dataurl(args) = cli.command else {
            panic!("expected dataurl command");
        };
        assert_eq!(Source::from_arg(&args.file), Source::Stdin);
        let config = args.config();
        assert_eq!(config.encoding(), Encoding::Base64);
        assert!(config.mime_type.is_none());
    }

    #[test]
    fn test_dataurl_requires_exactly_one_file() {
        assert!(Cli::try_parse_from(["stool", "dataurl"]).is_err());
        assert!(Cli::try_parse_from(["stool", "dataurl", "a", "b"]).is_err());
        assert!(Cli::try_parse_from(["stool", "version", "extra"]).is_err());
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
