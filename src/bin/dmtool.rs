use clap::Parser;
use env_logger::Env;
use rust_dmtx::report::{self, FileResult, ReportFormat};
use rust_dmtx::{DataMatrixReader, DecodeHints};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(
    name = "dmtool",
    version,
    about = "Finds and decodes Data Matrix symbols in images"
)]
struct Cli {
    /// Output format
    #[arg(long, short = 'r', value_enum, default_value_t = ReportFormat::Basic)]
    report: ReportFormat,
    /// Single pass only, without the try-harder search
    #[arg(long)]
    fast: bool,
    /// Each image holds one upright symbol and nothing else
    #[arg(long)]
    pure: bool,
    /// Log decode progress to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
    /// Images or directories of images
    #[arg(required = true)]
    paths: Vec<PathBuf>,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    let reader = DataMatrixReader::new(
        DecodeHints::new()
            .try_harder(!cli.fast)
            .pure_barcode(cli.pure),
    );
    let mut reporter = report::reporter(cli.report);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    reporter.begin(&mut out)?;
    let start = Instant::now();
    for path in report::expand_paths(&cli.paths) {
        let values = decode(&reader, &path);
        let result = FileResult {
            path,
            values,
            elapsed: start.elapsed(),
        };
        reporter.result(&mut out, &result)?;
    }
    out.flush()
}

fn decode(reader: &DataMatrixReader, path: &Path) -> Vec<String> {
    let decoded = std::fs::read(path)
        .map_err(rust_dmtx::DecodeError::from)
        .and_then(|bytes| reader.decode_all_bytes(&bytes));
    match decoded {
        Ok(symbols) => symbols
            .into_iter()
            .map(|symbol| {
                log::debug!(
                    "{}: {}x{} symbol, {} corrected",
                    path.display(),
                    symbol.version.rows,
                    symbol.version.cols,
                    symbol.corrected_errors
                );
                symbol.text
            })
            .collect(),
        Err(err) => {
            log::debug!("{}: {err}", path.display());
            Vec::new()
        }
    }
}
