pub mod latest;
pub mod sampler;
pub mod simulator;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use sortematica_data::extract::extract_draws;
use sortematica_data::loader::DrawStore;
use sortematica_data::models::{DrawRecord, Lottery, NumberStats};
use sortematica_data::sniff::sniff_columns;
use sortematica_data::DataError;

pub const TOP_K: usize = 10;
pub const NO_DATA_MESSAGE: &str = "Sem dados válidos para análise.";

/// Frequency, delay and first appearance for every number in `[1, max]`.
/// Records are expected oldest first.
pub fn compute_stats(draws: &[DrawRecord], max: u8) -> Vec<NumberStats> {
    let mut stats: Vec<NumberStats> = (1..=max)
        .map(|n| NumberStats {
            number: n,
            frequency: 0,
            gap: 0,
            first_seen: None,
        })
        .collect();

    let total = draws.len();
    let mut last_seen: Vec<Option<usize>> = vec![None; max as usize];
    let mut position = 0usize;

    for (i, draw) in draws.iter().enumerate() {
        for &n in &draw.numbers {
            let idx = (n as usize).wrapping_sub(1);
            if idx < stats.len() {
                stats[idx].frequency += 1;
                stats[idx].first_seen.get_or_insert(position);
                last_seen[idx] = Some(i);
            }
            position += 1;
        }
    }

    for (stat, last) in stats.iter_mut().zip(&last_seen) {
        stat.gap = match last {
            Some(i) => (total - 1 - i) as u32,
            None => total as u32,
        };
    }

    stats
}

/// Most drawn numbers. Equal counts keep the order in which the numbers first
/// showed up in the data; numbers never drawn are left out.
pub fn top_frequent(stats: &[NumberStats], k: usize) -> Vec<u8> {
    let mut seen: Vec<&NumberStats> = stats.iter().filter(|s| s.frequency > 0).collect();
    seen.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then(a.first_seen.cmp(&b.first_seen))
    });
    seen.into_iter().take(k).map(|s| s.number).collect()
}

/// Longest delays first, lowest number first among equal delays.
pub fn most_overdue(stats: &[NumberStats], k: usize) -> Vec<u8> {
    let mut sorted: Vec<&NumberStats> = stats.iter().collect();
    sorted.sort_by(|a, b| b.gap.cmp(&a.gap).then(a.number.cmp(&b.number)));
    sorted.into_iter().take(k).map(|s| s.number).collect()
}

/// Mean count of even and odd numbers per draw, rounded to 2 decimals.
pub fn parity_means(draws: &[DrawRecord]) -> (f64, f64) {
    if draws.is_empty() {
        return (0.0, 0.0);
    }
    let (even, odd) = draws.iter().fold((0usize, 0usize), |(e, o), d| {
        let evens = d.numbers.iter().filter(|&&n| n % 2 == 0).count();
        (e + evens, o + d.numbers.len() - evens)
    });
    let total = draws.len() as f64;
    (round2(even as f64 / total), round2(odd as f64 / total))
}

// Ties go to the even neighbour: 0.125 -> 0.12, 0.875 -> 0.88.
fn round2(x: f64) -> f64 {
    (x * 100.0).round_ties_even() / 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    #[serde(rename = "total_concursos")]
    pub total_draws: usize,
    pub top10: Vec<u8>,
    #[serde(rename = "numeros_mais_atrasados")]
    pub most_overdue: Vec<u8>,
    #[serde(rename = "media_pares", skip_serializing_if = "Option::is_none")]
    pub even_mean: Option<f64>,
    #[serde(rename = "media_impares", skip_serializing_if = "Option::is_none")]
    pub odd_mean: Option<f64>,
}

/// Outcome of an analysis. `NoData` is a regular result, not an error:
/// callers must check it before reading statistics.
#[derive(Debug, Clone, PartialEq)]
pub enum Analysis {
    NoData,
    Report(AnalysisReport),
}

impl Analysis {
    pub fn report(&self) -> Option<&AnalysisReport> {
        match self {
            Analysis::NoData => None,
            Analysis::Report(r) => Some(r),
        }
    }
}

impl Serialize for Analysis {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Analysis::NoData => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("erro", NO_DATA_MESSAGE)?;
                map.end()
            }
            Analysis::Report(report) => report.serialize(serializer),
        }
    }
}

pub fn analyse(draws: &[DrawRecord], lottery: Lottery) -> Analysis {
    if draws.is_empty() {
        return Analysis::NoData;
    }

    let stats = compute_stats(draws, lottery.max_number());
    let (even_mean, odd_mean) = if lottery == Lottery::Lotofacil {
        let (even, odd) = parity_means(draws);
        (Some(even), Some(odd))
    } else {
        (None, None)
    };

    Analysis::Report(AnalysisReport {
        total_draws: draws.len(),
        top10: top_frequent(&stats, TOP_K),
        most_overdue: most_overdue(&stats, TOP_K),
        even_mean,
        odd_mean,
    })
}

/// Load, sniff, extract and analyse one variant's sheet.
pub fn analyse_lottery(store: &DrawStore, lottery: Lottery) -> Result<Analysis, DataError> {
    let draws = load_draws(store, lottery)?;
    Ok(analyse(&draws, lottery))
}

pub fn load_draws(store: &DrawStore, lottery: Lottery) -> Result<Vec<DrawRecord>, DataError> {
    let table = store.load(lottery)?;
    let roles = sniff_columns(&table, lottery);
    let draws = extract_draws(&table, &roles, lottery);
    tracing::debug!(
        lottery = %lottery,
        rows = table.len(),
        draws = draws.len(),
        "linhas de dezenas extraídas"
    );
    Ok(draws)
}

#[cfg(test)]
pub(crate) fn make_draws(rows: &[&[u8]]) -> Vec<DrawRecord> {
    rows.iter()
        .enumerate()
        .map(|(row, numbers)| {
            let mut numbers = numbers.to_vec();
            numbers.sort_unstable();
            DrawRecord { row, numbers }
        })
        .collect()
}
