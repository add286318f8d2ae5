//! File loading for delimited text, spreadsheets and Parquet.
//!
//! Every failure becomes an [`InsightError`] naming the file; nothing here
//! panics on bad input.

use crate::config::PipelineConfig;
use crate::error::{InsightError, Result};
use calamine::{DataType as _, Reader as _, open_workbook_auto};
use polars::prelude::*;
use std::fs::File;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Options for reading delimited files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Field separator for `.csv` and `.txt` files (`.tsv` always uses tab).
    pub separator: u8,
    /// Rows scanned to infer column types.
    pub infer_schema_length: usize,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            separator: b',',
            infer_schema_length: 100,
        }
    }
}

impl From<&PipelineConfig> for LoaderOptions {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            separator: config.csv_separator,
            infer_schema_length: config.infer_schema_length,
        }
    }
}

/// Table formats recognised by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Delimited,
    TabSeparated,
    Spreadsheet,
    Parquet,
}

impl TableFormat {
    /// Detect the format from a path's extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" | "txt" => Some(Self::Delimited),
            "tsv" => Some(Self::TabSeparated),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Spreadsheet),
            "parquet" => Some(Self::Parquet),
            _ => None,
        }
    }
}

/// Load a file into a table.
pub fn load_table(path: impl AsRef<Path>, options: &LoaderOptions) -> Result<DataFrame> {
    let path = path.as_ref();
    let load_failed = |reason: String| InsightError::LoadFailed {
        path: path.display().to_string(),
        reason,
    };

    if !path.is_file() {
        return Err(load_failed("file not found".to_string()));
    }

    let format = TableFormat::from_path(path).ok_or_else(|| {
        InsightError::UnsupportedFormat(
            path.extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_else(|| path.display().to_string()),
        )
    })?;

    debug!("Loading {} as {:?}", path.display(), format);

    let df = match format {
        TableFormat::Delimited => load_csv_with_fallbacks(path, options.separator, options),
        TableFormat::TabSeparated => load_csv_with_fallbacks(path, b'\t', options),
        TableFormat::Spreadsheet => load_spreadsheet(path, options),
        TableFormat::Parquet => load_parquet(path),
    }
    .map_err(|e| load_failed(e.to_string()))?;

    info!(
        "Loaded {}: {} rows x {} columns",
        path.display(),
        df.height(),
        df.width()
    );
    Ok(df)
}

fn csv_options(separator: u8, options: &LoaderOptions) -> CsvReadOptions {
    CsvReadOptions::default()
        .with_infer_schema_length(Some(options.infer_schema_length))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_separator(separator))
}

/// Load delimited text with multiple fallback strategies.
fn load_csv_with_fallbacks(path: &Path, separator: u8, options: &LoaderOptions) -> Result<DataFrame> {
    // Strategy 1: Standard loading with quote handling
    match csv_options(separator, options)
        .map_parse_options(|p| p.with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => debug!("Standard loading failed: {}", e),
    }

    // Strategy 2: Without quote handling
    match csv_options(separator, options)
        .map_parse_options(|p| p.with_quote_char(None))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => debug!("Loading without quotes failed: {}", e),
    }

    // Strategy 3: Pre-clean content
    let content = std::fs::read_to_string(path)?;
    parse_csv_text(clean_csv_content(&content), separator, options)
}

fn parse_csv_text(content: String, separator: u8, options: &LoaderOptions) -> Result<DataFrame> {
    Ok(csv_options(separator, options)
        .into_reader_with_file_handle(Cursor::new(content))
        .finish()?)
}

/// Collapse doubled quotes and drop blank lines.
fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Load the first worksheet of a workbook.
///
/// Cells are rendered to text and parsed by the CSV reader so spreadsheet
/// and delimited inputs get the same type inference.
fn load_spreadsheet(path: &Path, options: &LoaderOptions) -> Result<DataFrame> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| InsightError::Internal("No worksheet found".to_string()))??;

    let csv_lines: Vec<String> = range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| {
                    let text = cell.as_string().unwrap_or_else(|| cell.to_string());
                    escape_csv_field(&text)
                })
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect();

    if csv_lines.is_empty() {
        return Err(InsightError::Internal("Worksheet is empty".to_string()));
    }

    debug!("Converted worksheet to {} CSV lines", csv_lines.len());
    parse_csv_text(csv_lines.join("\n"), b',', options)
}

/// Quote a field when it holds a comma, quote or newline.
fn escape_csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn load_parquet(path: &Path) -> Result<DataFrame> {
    let file = File::open(path)?;
    Ok(ParquetReader::new(file).finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("data_insight_loader_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(TableFormat::from_path(Path::new("a.CSV")), Some(TableFormat::Delimited));
        assert_eq!(TableFormat::from_path(Path::new("a.tsv")), Some(TableFormat::TabSeparated));
        assert_eq!(TableFormat::from_path(Path::new("a.xlsx")), Some(TableFormat::Spreadsheet));
        assert_eq!(TableFormat::from_path(Path::new("a.ods")), Some(TableFormat::Spreadsheet));
        assert_eq!(TableFormat::from_path(Path::new("a.parquet")), Some(TableFormat::Parquet));
        assert_eq!(TableFormat::from_path(Path::new("a.json")), None);
        assert_eq!(TableFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_load_csv() {
        let path = write_temp("people.csv", "name,age\nalice,25\nbob,None\n");
        let df = load_table(&path, &LoaderOptions::default()).unwrap();
        assert_eq!(df.shape(), (2, 2));
        assert_eq!(df.column("name").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_load_tsv() {
        let path = write_temp("people.tsv", "name\tage\nalice\t25\n");
        let df = load_table(&path, &LoaderOptions::default()).unwrap();
        assert_eq!(df.shape(), (1, 2));
    }

    #[test]
    fn test_load_custom_separator() {
        let path = write_temp("semi.csv", "a;b\n1;2\n3;4\n");
        let options = LoaderOptions {
            separator: b';',
            ..LoaderOptions::default()
        };
        let df = load_table(&path, &options).unwrap();
        assert_eq!(df.shape(), (2, 2));
    }

    #[test]
    fn test_missing_file() {
        let err = load_table("definitely/not/here.csv", &LoaderOptions::default()).unwrap_err();
        assert!(err.is_load_failure());
        assert_eq!(err.error_code(), "LOAD_FAILED");
    }

    #[test]
    fn test_unsupported_extension() {
        let path = write_temp("data.json", "{}");
        let err = load_table(&path, &LoaderOptions::default()).unwrap_err();
        assert!(err.is_load_failure());
        assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
    }

    #[test]
    fn test_corrupt_spreadsheet() {
        let path = write_temp("broken.xlsx", "this is not a zip archive");
        let err = load_table(&path, &LoaderOptions::default()).unwrap_err();
        assert_eq!(err.error_code(), "LOAD_FAILED");
    }

    #[test]
    fn test_escape_csv_field() {
        assert_eq!(escape_csv_field("plain"), "plain");
        assert_eq!(escape_csv_field("a,b"), "\"a,b\"");
        assert_eq!(escape_csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_clean_csv_content() {
        assert_eq!(clean_csv_content("a,b\n\n1,2\n"), "a,b\n1,2");
    }
}
