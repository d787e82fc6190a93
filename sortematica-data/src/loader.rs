use std::fmt::Display;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::{Path, PathBuf};

use calamine::{open_workbook, open_workbook_auto_from_rs, Data, Ods, Range, Reader, Xls, Xlsx};
use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::error::{DataError, Result};
use crate::models::{normalize_lottery, Lottery};
use crate::table::{header_label, Cell, RawTable};

/// Extensions tried, in order, next to the variant's file stem.
pub const EXTENSIONS: [&str; 4] = ["xlsx", "xls", "ods", "csv"];

/// Reads the results sheet of each variant from a data directory.
/// Nothing is cached here; callers keep what they need.
#[derive(Debug, Clone)]
pub struct DrawStore {
    data_dir: PathBuf,
}

impl DrawStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn resolve(&self, lottery: Lottery) -> Result<PathBuf> {
        let candidates: Vec<PathBuf> = EXTENSIONS
            .iter()
            .map(|ext| self.data_dir.join(format!("{}.{}", lottery.file_stem(), ext)))
            .collect();

        candidates
            .iter()
            .find(|p| p.is_file())
            .cloned()
            .ok_or_else(|| DataError::FileNotFound(candidates[0].clone()))
    }

    pub fn load(&self, lottery: Lottery) -> Result<RawTable> {
        let path = self.resolve(lottery)?;
        let table = load_path(&path)?;
        debug!(
            lottery = %lottery,
            path = %path.display(),
            rows = table.len(),
            columns = table.columns.len(),
            "planilha carregada"
        );
        Ok(table)
    }

    pub fn load_by_name(&self, name: &str) -> Result<(Lottery, RawTable)> {
        let lottery = normalize_lottery(name)?;
        Ok((lottery, self.load(lottery)?))
    }
}

pub fn load_path(path: &Path) -> Result<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if ext == "csv" {
        load_csv(path)
    } else {
        load_workbook(path, &ext)
    }
}

// Reader picked by extension first, then by sniffing the file content.
fn load_workbook(path: &Path, ext: &str) -> Result<RawTable> {
    let primary = match ext {
        "xlsx" => open_workbook::<Xlsx<_>, _>(path)
            .map_err(|e| e.to_string())
            .and_then(first_sheet::<BufReader<File>, _>),
        "xls" => open_workbook::<Xls<_>, _>(path)
            .map_err(|e| e.to_string())
            .and_then(first_sheet::<BufReader<File>, _>),
        "ods" => open_workbook::<Ods<_>, _>(path)
            .map_err(|e| e.to_string())
            .and_then(first_sheet::<BufReader<File>, _>),
        other => Err(format!("extensão não suportada: '{other}'")),
    };

    let range = match primary {
        Ok(range) => range,
        Err(reason) => {
            warn!(path = %path.display(), %reason, "leitor principal falhou, tentando leitor alternativo");
            sniffed_sheet(path).map_err(|reason| DataError::Workbook {
                path: path.to_path_buf(),
                reason,
            })?
        }
    };

    Ok(range_to_table(&range))
}

fn sniffed_sheet(path: &Path) -> std::result::Result<Range<Data>, String> {
    let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
    open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| e.to_string())
        .and_then(first_sheet::<Cursor<Vec<u8>>, _>)
}

fn first_sheet<RS, R>(mut workbook: R) -> std::result::Result<Range<Data>, String>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: Display,
{
    match workbook.worksheet_range_at(0) {
        Some(Ok(range)) => Ok(range),
        Some(Err(e)) => Err(e.to_string()),
        None => Err("planilha sem abas".to_string()),
    }
}

fn range_to_table(range: &Range<Data>) -> RawTable {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return RawTable::default();
    };

    let columns = header
        .iter()
        .enumerate()
        .map(|(i, data)| header_label(&label_text(&data_to_cell(data)), i))
        .collect();

    let mut table = RawTable::new(columns);
    for row in rows {
        table.push_row(row.iter().map(data_to_cell).collect());
    }
    table
}

fn label_text(cell: &Cell) -> String {
    match cell {
        Cell::Float(_) | Cell::Int(_) => cell
            .as_integer()
            .map(|i| i.to_string())
            .unwrap_or_else(|| cell.to_text()),
        other => other.to_text(),
    }
}

fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::float(*f),
        Data::String(s) => Cell::text(s.as_str()),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(Cell::DateTime)
            .unwrap_or_else(|| Cell::float(dt.as_f64())),
        Data::DateTimeIso(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
            .map(Cell::DateTime)
            .unwrap_or_else(|_| Cell::text(s.as_str())),
        Data::DurationIso(s) => Cell::text(s.as_str()),
        _ => Cell::Empty,
    }
}

// Strict reader first; ragged files go through the flexible one.
fn load_csv(path: &Path) -> Result<RawTable> {
    let bytes = std::fs::read(path).map_err(|e| DataError::Csv {
        path: path.to_path_buf(),
        source: csv::Error::from(e),
    })?;
    let delimiter = sniff_delimiter(&bytes);

    match read_csv(&bytes, delimiter, false) {
        Ok(table) => Ok(table),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "leitura estrita do CSV falhou, tentando modo flexível");
            read_csv(&bytes, delimiter, true).map_err(|source| DataError::Csv {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

fn sniff_delimiter(bytes: &[u8]) -> u8 {
    let first_line = bytes.split(|&b| b == b'\n').next().unwrap_or_default();
    let semicolons = first_line.iter().filter(|&&b| b == b';').count();
    let commas = first_line.iter().filter(|&&b| b == b',').count();
    if semicolons > commas {
        b';'
    } else {
        b','
    }
}

fn read_csv(bytes: &[u8], delimiter: u8, flexible: bool) -> std::result::Result<RawTable, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(flexible)
        .from_reader(bytes);

    let columns = reader
        .byte_headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| header_label(&String::from_utf8_lossy(h), i))
        .collect();

    let mut table = RawTable::new(columns);
    for record in reader.byte_records() {
        let record = record?;
        table.push_row(
            record
                .iter()
                .map(|field| csv_cell(&String::from_utf8_lossy(field)))
                .collect(),
        );
    }
    Ok(table)
}

fn csv_cell(field: &str) -> Cell {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Cell::Empty;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Cell::Int(i);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        return Cell::float(f);
    }
    Cell::Text(field.to_string())
}
