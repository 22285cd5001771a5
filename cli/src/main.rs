mod error;
mod settings;
mod wav;

use clap::{Args, Parser, Subcommand, ValueEnum};
use error::Result;
use kcsmodem_core::{DecodeReport, Decoder, Encoder, ParityMode};
use serde::Serialize;
use settings::CodecSettings;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "kcsmodem")]
#[command(about = "Kansas City Standard audio modem: bytes to WAV tones and back")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode binary data to a WAV audio file
    Encode {
        /// Input binary file
        #[arg(value_name = "INPUT.BIN")]
        input: PathBuf,

        /// Output WAV file (default: INPUT with a .wav extension)
        #[arg(value_name = "OUTPUT.WAV")]
        output: Option<PathBuf>,

        #[command(flatten)]
        codec: CodecArgs,
    },

    /// Decode a WAV audio file to binary data
    Decode {
        /// Input WAV file (mono, 8/16/32-bit integer)
        #[arg(value_name = "INPUT.WAV")]
        input: PathBuf,

        /// Output binary file (default: INPUT with a .txt extension)
        #[arg(value_name = "OUTPUT.BIN")]
        output: Option<PathBuf>,

        /// Print decoded data to stdout instead of writing a file
        #[arg(short = 'C', long)]
        console: bool,

        /// Print the decode report as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        codec: CodecArgs,
    },
}

#[derive(Args, Debug, Default)]
struct CodecArgs {
    /// Baud rate (300, 600 or 1200)
    #[arg(short = 'B', long)]
    baud: Option<u32>,

    /// Data bits per byte (7 drops the most significant bit)
    #[arg(short = 'D', long)]
    data_bits: Option<u8>,

    /// Stop bits per byte (1 or 2)
    #[arg(short = 'S', long)]
    stop_bits: Option<u8>,

    /// Parity bit after the data bits
    #[arg(short = 'P', long, value_enum)]
    parity: Option<ParityArg>,

    /// Leader carrier tone before and after the data, in seconds
    #[arg(short = 'L', long, value_name = "SECONDS")]
    leader: Option<f64>,

    /// TOML file with codec parameters; flags override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ParityArg {
    None,
    Odd,
    Even,
}

impl From<ParityArg> for ParityMode {
    fn from(arg: ParityArg) -> Self {
        match arg {
            ParityArg::None => ParityMode::None,
            ParityArg::Odd => ParityMode::Odd,
            ParityArg::Even => ParityMode::Even,
        }
    }
}

impl CodecArgs {
    fn resolve(&self) -> Result<kcsmodem_core::CodecParams> {
        let file = match &self.config {
            Some(path) => CodecSettings::load(path)?,
            None => CodecSettings::default(),
        };
        let flags = CodecSettings {
            baud: self.baud,
            data_bits: self.data_bits,
            stop_bits: self.stop_bits,
            start_bits: None,
            parity: self.parity.map(|p| ParityMode::from(p).to_string()),
            leader_seconds: self.leader,
        };
        file.merge(flags).to_params()
    }
}

#[derive(Serialize)]
struct ReportJson<'a> {
    bytes: usize,
    parity_errors: usize,
    stop_bit_errors: usize,
    stop_bit_clipped: bool,
    truncated_frame: bool,
    sync_offset: Option<usize>,
    leader_cycles: usize,
    output: Option<&'a Path>,
}

impl<'a> ReportJson<'a> {
    fn new(report: &DecodeReport, output: Option<&'a Path>) -> Self {
        Self {
            bytes: report.data.len(),
            parity_errors: report.parity_errors,
            stop_bit_errors: report.stop_bit_errors,
            stop_bit_clipped: report.stop_bit_clipped,
            truncated_frame: report.truncated_frame,
            sync_offset: report.sync_offset,
            leader_cycles: report.leader_cycles,
            output,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Commands::Encode { input, output, codec } => encode_command(&input, output, &codec),
        Commands::Decode { input, output, console, json, codec } => {
            decode_command(&input, output, console, json, &codec)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn encode_command(input_path: &Path, output: Option<PathBuf>, codec: &CodecArgs) -> Result<()> {
    let params = codec.resolve()?;
    let output_path = output.unwrap_or_else(|| input_path.with_extension("wav"));

    let data = std::fs::read(input_path)?;
    println!("INFILE:  {}", input_path.display());
    println!("OUTFILE: {}", output_path.display());

    let start = Instant::now();
    let encoder = Encoder::new(params)?;
    let samples = wav::write_wav(&output_path, &encoder, &data)?;

    println!("{} bytes encoded into {} samples", data.len(), samples);
    println!("done in {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}

fn decode_command(
    input_path: &Path,
    output: Option<PathBuf>,
    console: bool,
    json: bool,
    codec: &CodecArgs,
) -> Result<()> {
    let params = codec.resolve()?;

    let start = Instant::now();
    let input = wav::read_wav(input_path)?;
    log::info!(
        "Read WAV: {} Hz, {} channel(s), {} bits, {} samples",
        input.spec.sample_rate,
        input.spec.channels,
        input.spec.bits_per_sample,
        input.samples.len()
    );

    let decoder = Decoder::new(params)?;
    let report = input.samples.decode(&decoder);

    let output_path = if console {
        println!("{}", String::from_utf8_lossy(&report.data));
        None
    } else {
        let path = output.unwrap_or_else(|| input_path.with_extension("txt"));
        std::fs::write(&path, &report.data)?;
        Some(path)
    };

    if json {
        let summary = ReportJson::new(&report, output_path.as_deref());
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    if let Some(path) = &output_path {
        println!("INFILE:  {}", input_path.display());
        println!("OUTFILE: {}", path.display());
    }
    if params.parity.is_enabled() {
        println!(
            "{} bytes decoded, {} parity errors.",
            report.data.len(),
            report.parity_errors
        );
    } else {
        println!("{} bytes decoded", report.data.len());
    }
    for warning in report_warnings(&report) {
        println!("warning: {}", warning);
    }
    println!("done in {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}

/// Framing problems worth a line in the decode summary
fn report_warnings(report: &DecodeReport) -> Vec<String> {
    let mut warnings = Vec::new();
    if report.sync_offset.is_none() {
        warnings.push("no start bit found".to_string());
    }
    if report.stop_bit_errors > 0 {
        warnings.push(format!("{} stop bit(s) read as 0", report.stop_bit_errors));
    }
    if report.truncated_frame {
        warnings.push("recording ends inside a frame".to_string());
    }
    if report.stop_bit_clipped {
        warnings.push("final stop bit clipped".to_string());
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synced() -> DecodeReport {
        DecodeReport { sync_offset: Some(0), ..Default::default() }
    }

    #[test]
    fn test_clean_report_has_no_warnings() {
        assert!(report_warnings(&synced()).is_empty());
    }

    #[test]
    fn test_report_warnings_cover_framing_problems() {
        let report = DecodeReport {
            stop_bit_errors: 3,
            truncated_frame: true,
            stop_bit_clipped: true,
            ..synced()
        };
        assert_eq!(
            report_warnings(&report),
            vec![
                "3 stop bit(s) read as 0".to_string(),
                "recording ends inside a frame".to_string(),
                "final stop bit clipped".to_string(),
            ]
        );
    }

    #[test]
    fn test_report_warnings_without_sync() {
        let warnings = report_warnings(&DecodeReport::default());
        assert_eq!(warnings, vec!["no start bit found".to_string()]);
    }
}
