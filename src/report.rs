//! Result reporters for the batch tool.
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use walkdir::WalkDir;

/// Symbology name shown next to decoded values
const SYMBOLOGY: &str = "Data Matrix";

/// What was read from one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileResult {
    pub path: PathBuf,
    /// Decoded values; empty when nothing was found or the file was
    /// unreadable
    pub values: Vec<String>,
    /// Time since the batch started
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    /// Path, count and one line per value
    #[default]
    Basic,
    /// One line per file
    Terse,
    /// Comma-separated values with a header row
    Csv,
}

pub trait Reporter {
    /// Called once before any result
    fn begin(&mut self, _out: &mut dyn Write) -> io::Result<()> {
        Ok(())
    }

    fn result(&mut self, out: &mut dyn Write, result: &FileResult) -> io::Result<()>;
}

pub fn reporter(format: ReportFormat) -> Box<dyn Reporter> {
    match format {
        ReportFormat::Basic => Box::new(BasicReporter),
        ReportFormat::Terse => Box::new(TerseReporter),
        ReportFormat::Csv => Box::new(CsvReporter::new(std::env::consts::OS)),
    }
}

pub struct BasicReporter;

impl Reporter for BasicReporter {
    fn result(&mut self, out: &mut dyn Write, result: &FileResult) -> io::Result<()> {
        writeln!(out, "{}", result.path.display())?;
        writeln!(out, "Found [{}] barcodes:", result.values.len())?;
        for (index, value) in result.values.iter().enumerate() {
            writeln!(out, "[{index}] [{SYMBOLOGY}] [{value}]")?;
        }
        Ok(())
    }
}

pub struct TerseReporter;

impl Reporter for TerseReporter {
    fn result(&mut self, out: &mut dyn Write, result: &FileResult) -> io::Result<()> {
        write!(out, "{}", result.path.display())?;
        for value in &result.values {
            write!(out, " [{value}]")?;
        }
        writeln!(out)
    }
}

pub struct CsvReporter {
    os: String,
}

impl CsvReporter {
    pub fn new(os: &str) -> Self {
        Self { os: os.to_string() }
    }
}

impl Reporter for CsvReporter {
    fn begin(&mut self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "OS,Directory,File,Elapsed,N.found,Values")
    }

    fn result(&mut self, out: &mut dyn Write, result: &FileResult) -> io::Result<()> {
        let values = result
            .values
            .iter()
            .map(|v| format!("[{SYMBOLOGY}:{v}]"))
            .collect::<Vec<_>>()
            .join(" ");
        let fields = [
            self.os.clone(),
            parent_name(&result.path),
            file_stem(&result.path),
            format!("{:.3}", result.elapsed.as_secs_f64()),
            result.values.len().to_string(),
            values,
        ];
        let row = fields
            .iter()
            .map(|f| csv_field(f))
            .collect::<Vec<_>>()
            .join(",");
        writeln!(out, "{row}")
    }
}

fn parent_name(path: &Path) -> String {
    path.parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Files named by `paths`, with directories walked recursively in sorted
/// order. Symbolic links inside a directory are not followed. Entries that
/// cannot be listed are logged and skipped.
pub fn expand_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }
        let entries = WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| {
                entry
                    .map_err(|err| log::warn!("{}: {err}", path.display()))
                    .ok()
            })
            .filter(|entry| !entry.path().is_dir())
            .map(|entry| entry.into_path());
        files.extend(entries);
    }
    files
}

/// Quote a field if it contains a delimiter, quote or line break
fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
