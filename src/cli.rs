//! `decode_data_matrix <image-file-path>`
//!
//! Prints the decoded text (empty when nothing could be read) and exits 0.
//! Any other number of arguments exits 1 without printing.
use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

use crate::config::DecodeHints;
use crate::reader::{DataMatrixReader, SymbolReader};

#[derive(Parser, Debug)]
#[command(
    name = "decode_data_matrix",
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Args {
    /// Image file to decode; anything but exactly one is a usage error
    #[arg(allow_hyphen_values = true)]
    paths: Vec<PathBuf>,
}

/// What the process should do on exit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub exit_code: i32,
    /// Line to print, without the trailing newline
    pub stdout: Option<String>,
}

impl Outcome {
    fn usage() -> Self {
        Self {
            exit_code: 1,
            stdout: None,
        }
    }
}

/// The reader the CLI uses: Data Matrix with the try-harder hint
pub fn default_reader() -> DataMatrixReader {
    DataMatrixReader::new(DecodeHints::new().try_harder(true))
}

/// Run with the process arguments (including the program name)
pub fn run<I, T>(args: I) -> Outcome
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    run_with(args, &default_reader())
}

pub fn run_with<I, T, R>(args: I, reader: &R) -> Outcome
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    R: SymbolReader,
{
    let args = match Args::try_parse_from(args) {
        Ok(args) => args,
        Err(err) => {
            log::debug!("bad arguments: {err}");
            return Outcome::usage();
        }
    };
    let [path] = args.paths.as_slice() else {
        log::debug!("expected one path, got {}", args.paths.len());
        return Outcome::usage();
    };

    let text = crate::decode_file(path, reader).unwrap_or_else(|err| {
        log::debug!("{}: {err}", path.display());
        String::new()
    });
    Outcome {
        exit_code: 0,
        stdout: Some(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use std::cell::Cell;
    use std::io::Write;

    /// Returns the file contents as text, or a canned error
    struct EchoReader {
        fail: bool,
        calls: Cell<usize>,
    }

    impl EchoReader {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                calls: Cell::new(0),
            }
        }
    }

    impl SymbolReader for EchoReader {
        fn read_symbol(&self, image: &[u8]) -> Result<String, DecodeError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(DecodeError::Checksum);
            }
            Ok(String::from_utf8_lossy(image).into_owned())
        }
    }

    fn fixture(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file
    }

    #[test]
    fn test_single_path_prints_text() {
        let file = fixture(b"BM000012345");
        let reader = EchoReader::new(false);
        let outcome = run_with(["decode_data_matrix".into(), file.path().as_os_str().to_owned()], &reader);
        assert_eq!(
            outcome,
            Outcome {
                exit_code: 0,
                stdout: Some("BM000012345".to_string())
            }
        );
        assert_eq!(reader.calls.get(), 1);
    }

    #[test]
    fn test_failures_print_empty_line() {
        let file = fixture(b"anything");
        let reader = EchoReader::new(true);
        let outcome = run_with(["prog".into(), file.path().as_os_str().to_owned()], &reader);
        assert_eq!(outcome.exit_code, 0);
        assert_eq!(outcome.stdout.as_deref(), Some(""));
    }

    #[test]
    fn test_missing_file_prints_empty_line() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.png");
        let reader = EchoReader::new(false);
        let outcome = run_with([OsString::from("prog"), missing.into_os_string()], &reader);
        assert_eq!(outcome.stdout.as_deref(), Some(""));
        // The reader never sees a file that could not be opened
        assert_eq!(reader.calls.get(), 0);
    }

    #[test]
    fn test_wrong_argument_count() {
        let reader = EchoReader::new(false);
        assert_eq!(run_with(["prog"], &reader), Outcome::usage());
        assert_eq!(run_with(["prog", "a.png", "b.png"], &reader), Outcome::usage());
        assert_eq!(reader.calls.get(), 0);
    }
}
