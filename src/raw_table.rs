use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::Field;
use tracing::debug;

use crate::error::LoadError;

/// Untyped rows exactly as they came out of the source file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let headers = headers.into_iter().map(|h| h.trim().to_string()).collect();
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell text; ragged rows read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(|s| s.as_str())
            .unwrap_or("")
    }
}

/// Load a CSV/TSV or Parquet file, picking the reader from the extension.
pub fn load_raw_table(path: &Path) -> Result<RawTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    let table = match ext.as_str() {
        "csv" | "txt" => read_delimited(open(path)?, b',')?,
        "tsv" => read_delimited(open(path)?, b'\t')?,
        "parquet" | "pq" => read_parquet(open(path)?)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };
    debug!(
        path = %path.display(),
        rows = table.len(),
        columns = table.headers().len(),
        "raw table loaded"
    );
    Ok(table)
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_delimited<R: Read>(reader: R, delimiter: u8) -> Result<RawTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);
    let headers = reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|c| c.to_string()).collect());
    }
    Ok(RawTable::new(headers, rows))
}

pub fn read_parquet(file: File) -> Result<RawTable, LoadError> {
    let reader = SerializedFileReader::new(file)?;
    let headers: Vec<String> = reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .root_schema()
        .get_fields()
        .iter()
        .map(|f| f.name().to_string())
        .collect();
    let by_name: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, h)| (h.as_str(), idx))
        .collect();

    let mut rows = Vec::new();
    for row in reader.get_row_iter(None)? {
        let row = row?;
        let mut cells = vec![String::new(); headers.len()];
        for (name, field) in row.get_column_iter() {
            if let Some(&idx) = by_name.get(name.as_str()) {
                cells[idx] = field_text(field);
            }
        }
        rows.push(cells);
    }
    Ok(RawTable::new(headers, rows))
}

/// Cell text for a Parquet value. Numbers are written in plain decimal form;
/// `Field`'s own `Display` uses exponent notation for floats.
fn field_text(field: &Field) -> String {
    match field {
        Field::Null => String::new(),
        Field::Str(s) => s.clone(),
        Field::Double(v) => format!("{v}"),
        Field::Float(v) => format!("{v}"),
        Field::Byte(v) => v.to_string(),
        Field::Short(v) => v.to_string(),
        Field::Int(v) => v.to_string(),
        Field::Long(v) => v.to_string(),
        Field::UByte(v) => v.to_string(),
        Field::UShort(v) => v.to_string(),
        Field::UInt(v) => v.to_string(),
        Field::ULong(v) => v.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_csv_with_ragged_rows() {
        let raw = "Player, Squad ,Gls\nA,X,3\nB,Y\n";
        let table = read_delimited(raw.as_bytes(), b',').unwrap();
        assert_eq!(table.headers(), &["Player", "Squad", "Gls"]);
        assert_eq!(table.len(), 2);
        let gls = table.column_index("Gls").unwrap();
        assert_eq!(table.cell(0, gls), "3");
        assert_eq!(table.cell(1, gls), "");
        assert_eq!(table.cell(1, 1), "Y");
        assert!(!table.has_column("Ast"));
    }

    #[test]
    fn parquet_numbers_are_written_in_plain_decimal() {
        assert_eq!(field_text(&Field::Double(-15.0)), "-15");
        assert_eq!(field_text(&Field::Double(44.2)), "44.2");
        assert_eq!(field_text(&Field::Double(0.0)), "0");
        assert_eq!(
            field_text(&Field::Double(1e20)),
            "100000000000000000000"
        );
        assert_eq!(field_text(&Field::Float(2.5)), "2.5");
        assert_eq!(field_text(&Field::Long(2900)), "2900");
        assert_eq!(field_text(&Field::Int(-3)), "-3");
        assert_eq!(field_text(&Field::Str("Arsenal".to_string())), "Arsenal");
        assert_eq!(field_text(&Field::Null), "");

        for value in [-15.0, 1e20, 1e-20, 0.13, 2550.0] {
            let text = field_text(&Field::Double(value));
            assert_eq!(crate::prepare::parse_number(&text), Some(value), "{text}");
        }
    }

    #[test]
    fn reads_tab_separated() {
        let raw = "Player\tSquad\tMin\nA\tX\t1,200\n";
        let table = read_delimited(raw.as_bytes(), b'\t').unwrap();
        assert_eq!(table.headers(), &["Player", "Squad", "Min"]);
        assert_eq!(table.cell(0, 2), "1,200");
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = load_raw_table(Path::new("players.xls")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(ext) if ext == "xls"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_raw_table(Path::new("definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
