use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DataError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lottery {
    Lotofacil,
    MegaSena,
    Quina,
    DiaDeSorte,
    MaisMilionaria,
}

impl Lottery {
    pub const ALL: [Lottery; 5] = [
        Lottery::Lotofacil,
        Lottery::MegaSena,
        Lottery::Quina,
        Lottery::DiaDeSorte,
        Lottery::MaisMilionaria,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Lottery::Lotofacil => "lotofacil",
            Lottery::MegaSena => "megasena",
            Lottery::Quina => "quina",
            Lottery::DiaDeSorte => "diadesorte",
            Lottery::MaisMilionaria => "maismilionaria",
        }
    }

    /// Results file name, without extension.
    pub fn file_stem(&self) -> &'static str {
        match self {
            Lottery::Lotofacil => "LOTOFACIL",
            Lottery::MegaSena => "MEGA_SENA",
            Lottery::Quina => "QUINA",
            Lottery::DiaDeSorte => "DIA_DE_SORTE",
            Lottery::MaisMilionaria => "MAIS_MILIONARIA",
        }
    }

    pub fn pick_count(&self) -> usize {
        match self {
            Lottery::Lotofacil => 15,
            Lottery::MegaSena => 6,
            Lottery::Quina => 5,
            Lottery::DiaDeSorte => 7,
            Lottery::MaisMilionaria => 6,
        }
    }

    pub fn max_number(&self) -> u8 {
        match self {
            Lottery::Lotofacil => 25,
            Lottery::MegaSena => 60,
            Lottery::Quina => 80,
            Lottery::DiaDeSorte => 31,
            Lottery::MaisMilionaria => 50,
        }
    }

    pub fn contains(&self, n: i64) -> bool {
        (1..=self.max_number() as i64).contains(&n)
    }
}

impl fmt::Display for Lottery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Lottery {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        normalize_lottery(s)
    }
}

/// Public view of a variant, as exposed by `/api/loterias`.
#[derive(Debug, Clone, Serialize)]
pub struct LotteryInfo {
    pub id: Lottery,
    pub arquivo: &'static str,
    pub n: usize,
    pub max: u8,
}

impl From<Lottery> for LotteryInfo {
    fn from(lottery: Lottery) -> Self {
        Self {
            id: lottery,
            arquivo: lottery.file_stem(),
            n: lottery.pick_count(),
            max: lottery.max_number(),
        }
    }
}

fn strip_accents(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' => 'a',
        'é' | 'ê' => 'e',
        'í' => 'i',
        'ó' | 'ô' | 'õ' => 'o',
        'ú' => 'u',
        'ç' => 'c',
        other => other,
    }
}

/// Maps free text typed by a user ("Mega-Sena", "+Milionária", "DIA_DE_SORTE")
/// to one of the five variants.
pub fn normalize_lottery(name: &str) -> Result<Lottery> {
    let lowered = name
        .trim()
        .to_lowercase()
        .replace('+', "mais ")
        .replace(['-', '_'], " ");

    let cleaned: String = lowered
        .chars()
        .map(strip_accents)
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    let s = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    let rule = if s.contains("lotof") {
        Some(Lottery::Lotofacil)
    } else if s.contains("mega") && s.contains("sena") {
        Some(Lottery::MegaSena)
    } else if s.contains("quina") {
        Some(Lottery::Quina)
    } else if s.contains("dia") && s.contains("sorte") {
        Some(Lottery::DiaDeSorte)
    } else if s.contains("mais") && s.contains("milion") {
        Some(Lottery::MaisMilionaria)
    } else {
        None
    };

    if let Some(lottery) = rule {
        return Ok(lottery);
    }

    let compact = s.replace(' ', "");
    Lottery::ALL
        .into_iter()
        .find(|l| l.id() == compact)
        .ok_or_else(|| DataError::UnknownLottery(name.to_string()))
}

/// Contest identifier: numeric when the sheet holds a number, raw text otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ContestId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ContestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContestId::Number(n) => write!(f, "{n}"),
            ContestId::Text(s) => f.write_str(s),
        }
    }
}

/// One historical result, numbers sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawRecord {
    pub row: usize,
    pub numbers: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct NumberStats {
    pub number: u8,
    pub frequency: u32,
    pub gap: u32,
    /// Position of the first occurrence in the flattened draw sequence.
    pub first_seen: Option<usize>,
}

pub type Ticket = Vec<u8>;
