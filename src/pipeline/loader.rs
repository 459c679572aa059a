//! Dataset loader and writer for CSV and Parquet files

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use polars::prelude::*;
use tracing::debug;

use super::error::{CleanError, CleanResult};

/// Options controlling how delimited text is parsed
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Field separator byte
    pub separator: u8,
    /// Number of rows used for type inference. 0 means full table scan.
    pub infer_schema_length: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            separator: b',',
            infer_schema_length: 10_000,
        }
    }
}

/// Supported on-disk formats, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Csv,
    /// Tab-separated text; read with a tab unless another separator is given
    Tsv,
    Parquet,
}

impl FileFormat {
    /// Effective options for reading this format
    fn read_options(self, options: &LoadOptions) -> LoadOptions {
        match self {
            FileFormat::Tsv if options.separator == b',' => LoadOptions {
                separator: b'\t',
                ..*options
            },
            _ => *options,
        }
    }
}

fn detect_format(path: &Path) -> CleanResult<FileFormat> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "csv" | "txt" => Ok(FileFormat::Csv),
        "tsv" => Ok(FileFormat::Tsv),
        "parquet" => Ok(FileFormat::Parquet),
        _ => Err(CleanError::Parse {
            path: path.to_path_buf(),
            message: format!(
                "Unsupported file format: '{}'. Supported formats: csv, tsv, txt, parquet",
                extension
            ),
        }),
    }
}

fn open(path: &Path) -> CleanResult<File> {
    File::open(path).map_err(|source| CleanError::FileAccess {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a dataset from a file (CSV or Parquet based on extension).
///
/// The file handle lives only for the duration of the read. CSV records
/// whose field count differs from the header are rejected with a parse
/// error naming the offending line.
pub fn load_dataset(path: &Path, options: &LoadOptions) -> CleanResult<DataFrame> {
    let format = detect_format(path)?;

    let df = match format {
        FileFormat::Csv | FileFormat::Tsv => {
            let bytes = {
                let mut file = open(path)?;
                let mut buf = Vec::new();
                file.read_to_end(&mut buf)
                    .map_err(|source| CleanError::FileAccess {
                        path: path.to_path_buf(),
                        source,
                    })?;
                buf
            };
            parse_csv_bytes(bytes, path, &format.read_options(options))?
        }
        FileFormat::Parquet => {
            let file = open(path)?;
            ParquetReader::new(file)
                .finish()
                .map_err(|e| CleanError::Parse {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?
        }
    };

    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "dataset loaded"
    );

    Ok(df)
}

/// Parse an in-memory CSV buffer. `origin` is only used in error messages.
pub fn parse_csv_bytes(bytes: Vec<u8>, origin: &Path, options: &LoadOptions) -> CleanResult<DataFrame> {
    validate_field_counts(&bytes, options.separator).map_err(|message| CleanError::Parse {
        path: origin.to_path_buf(),
        message,
    })?;

    // 0 means full scan
    let schema_length = if options.infer_schema_length == 0 {
        None
    } else {
        Some(options.infer_schema_length)
    };

    let separator = options.separator;
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(schema_length)
        .map_parse_options(|opts| opts.with_separator(separator))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(|e| CleanError::Parse {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
}

/// Check that every record has as many fields as the header.
///
/// Quoted fields may contain separators and newlines. Blank lines are
/// skipped. Returns a message naming the first bad record's line number.
fn validate_field_counts(bytes: &[u8], separator: u8) -> Result<(), String> {
    let mut expected: Option<usize> = None;
    let mut in_quotes = false;
    let mut fields = 1usize;
    let mut record_len = 0usize;
    let mut line = 1usize;
    let mut record_line = 1usize;

    let mut finish_record = |fields: usize, record_len: usize, record_line: usize| {
        if record_len == 0 {
            return Ok(());
        }
        match expected {
            None => {
                expected = Some(fields);
                Ok(())
            }
            Some(n) if n != fields => Err(format!(
                "line {} has {} field(s), expected {}",
                record_line, fields, n
            )),
            Some(_) => Ok(()),
        }
    };

    for &byte in bytes {
        match byte {
            b'"' => {
                in_quotes = !in_quotes;
                record_len += 1;
            }
            b'\n' => {
                line += 1;
                if in_quotes {
                    record_len += 1;
                } else {
                    finish_record(fields, record_len, record_line)?;
                    fields = 1;
                    record_len = 0;
                    record_line = line;
                }
            }
            b'\r' if !in_quotes => {}
            b if b == separator && !in_quotes => {
                fields += 1;
                record_len += 1;
            }
            _ => record_len += 1,
        }
    }

    if in_quotes {
        return Err(format!("unterminated quoted field starting near line {}", record_line));
    }
    finish_record(fields, record_len, record_line)?;

    if expected.is_none() {
        return Err("file is empty (no header line)".to_string());
    }

    Ok(())
}

/// Read only the column names of a dataset
pub fn get_column_names(path: &Path, options: &LoadOptions) -> CleanResult<Vec<String>> {
    if !path.exists() {
        return Err(CleanError::FileAccess {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file does not exist"),
        });
    }

    let to_parse_error = |e: PolarsError| CleanError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let format = detect_format(path)?;
    let mut lf = match format {
        FileFormat::Csv | FileFormat::Tsv => LazyCsvReader::new(path)
            .with_separator(format.read_options(options).separator)
            .with_has_header(true)
            .finish()
            .map_err(to_parse_error)?,
        FileFormat::Parquet => {
            LazyFrame::scan_parquet(path, Default::default()).map_err(to_parse_error)?
        }
    };

    let schema = lf.collect_schema().map_err(to_parse_error)?;
    Ok(schema.iter_names().map(|name| name.to_string()).collect())
}

/// Save dataset to file (CSV or Parquet based on extension)
pub fn save_dataset(df: &mut DataFrame, path: &Path) -> CleanResult<()> {
    let format = detect_format(path)?;

    let mut file = File::create(path).map_err(|source| CleanError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;

    match format {
        FileFormat::Csv => {
            CsvWriter::new(&mut file).finish(df)?;
        }
        FileFormat::Tsv => {
            CsvWriter::new(&mut file).with_separator(b'\t').finish(df)?;
        }
        FileFormat::Parquet => {
            ParquetWriter::new(file).finish(df)?;
        }
    }

    debug!(path = %path.display(), rows = df.height(), "dataset saved");
    Ok(())
}
