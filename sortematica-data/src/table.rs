use chrono::NaiveDateTime;

/// A spreadsheet cell as read from disk. Blank text and NaN are `Empty`.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s)
        }
    }

    pub fn float(f: f64) -> Self {
        if f.is_nan() {
            Cell::Empty
        } else {
            Cell::Float(f)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Renders the value the way a spreadsheet value prints as text.
    /// Integral floats keep their `.0` suffix ("7.0").
    pub fn to_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Int(i) => i.to_string(),
            Cell::Float(f) => format!("{f:?}"),
            Cell::Text(s) => s.clone(),
            Cell::Bool(true) => "True".to_string(),
            Cell::Bool(false) => "False".to_string(),
            Cell::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// Integer value of a numeric cell, or of text made only of digits.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Cell::Int(i) => Some(*i),
            Cell::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(*f as i64),
            Cell::Text(s) => {
                let s = s.trim();
                if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
                    s.parse().ok()
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

/// Rows of a results sheet, positional. Labels may repeat.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Pads or truncates the row to the header width. All-empty rows are skipped.
    pub fn push_row(&mut self, mut row: Vec<Cell>) -> bool {
        if row.iter().all(Cell::is_empty) {
            return false;
        }
        row.resize(self.columns.len(), Cell::Empty);
        self.rows.push(row);
        true
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, row: usize, column: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&Cell::Empty)
    }

    pub fn column(&self, column: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().map(move |r| r.get(column).unwrap_or(&Cell::Empty))
    }

    /// Indices of the last `n` rows, in table order.
    pub fn tail(&self, n: usize) -> std::ops::Range<usize> {
        self.rows.len().saturating_sub(n)..self.rows.len()
    }
}

pub fn header_label(raw: &str, index: usize) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        format!("Unnamed: {index}")
    } else {
        trimmed.to_string()
    }
}
