use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use sortematica_data::extract::row_numbers;
use sortematica_data::loader::DrawStore;
use sortematica_data::models::{ContestId, Lottery};
use sortematica_data::sniff::{sniff_columns, ColumnRoles};
use sortematica_data::table::{Cell, RawTable};
use sortematica_data::DataError;

pub const DEFAULT_LATEST: usize = 2;
pub const NO_WINNER: &str = "Sem ganhador";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestResult {
    pub concurso: ContestId,
    pub numeros: Vec<u8>,
    pub ganhadores: String,
    pub data: String,
}

pub fn latest_results(
    store: &DrawStore,
    lottery: Lottery,
    n: usize,
) -> Result<Vec<LatestResult>, DataError> {
    let table = store.load(lottery)?;
    let roles = sniff_columns(&table, lottery);
    Ok(format_latest(&table, &roles, lottery, n))
}

/// Last `n` rows in sheet order; rows without a valid number are left out,
/// so fewer than `n` results may come back.
pub fn format_latest(
    table: &RawTable,
    roles: &ColumnRoles,
    lottery: Lottery,
    n: usize,
) -> Vec<LatestResult> {
    let cell = |row: usize, column: Option<usize>| column.map(|c| table.get(row, c));

    table
        .tail(n)
        .filter_map(|row| {
            let numeros = row_numbers(table, row, &roles.numbers, lottery.max_number());
            if numeros.is_empty() {
                return None;
            }
            Some(LatestResult {
                concurso: cell(row, roles.contest).map_or(ContestId::Text(String::new()), contest_id),
                numeros,
                ganhadores: cell(row, roles.winners).map_or(NO_WINNER.to_string(), winners),
                data: cell(row, roles.date).map_or(String::new(), format_date),
            })
        })
        .collect()
}

fn contest_id(cell: &Cell) -> ContestId {
    match cell {
        Cell::Empty => ContestId::Text(String::new()),
        Cell::Int(i) => ContestId::Number(*i),
        Cell::Float(f) if f.is_finite() => ContestId::Number(f.trunc() as i64),
        Cell::Text(s) => s
            .trim()
            .parse()
            .map(ContestId::Number)
            .unwrap_or_else(|_| ContestId::Text(s.clone())),
        other => ContestId::Text(other.to_text()),
    }
}

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];

/// `DD/MM/YYYY` when the cell reads as a date, its raw text otherwise.
pub fn format_date(cell: &Cell) -> String {
    match cell {
        Cell::Empty => String::new(),
        Cell::DateTime(dt) => dt.format("%d/%m/%Y").to_string(),
        other => {
            let raw = other.to_text();
            parse_date(raw.trim())
                .map(|d| d.format("%d/%m/%Y").to_string())
                .unwrap_or(raw)
        }
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok().map(|dt| dt.date()))
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        })
}

fn winners(cell: &Cell) -> String {
    if let Cell::Int(_) | Cell::Float(_) = cell {
        if let Some(i) = cell.as_integer() {
            return i.to_string();
        }
    }
    let s = cell.to_text();
    let s = s.trim();
    if s.is_empty() {
        NO_WINNER.to_string()
    } else if s.bytes().all(|b| b.is_ascii_digit()) {
        let stripped = s.trim_start_matches('0');
        let digits = if stripped.is_empty() { "0" } else { stripped };
        digits.to_string()
    } else {
        s.to_string()
    }
}
