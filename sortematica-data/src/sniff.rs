//! Column role detection for results sheets with no fixed layout.
//!
//! Each column is visited once, in sheet order. Label rules assign the
//! metadata roles (first match wins per role); the value sample decides
//! independently whether the column holds drawn numbers, so a column can end
//! up with both a metadata role and a place among the number columns.

use crate::extract::parse_number;
use crate::models::Lottery;
use crate::table::RawTable;

/// Non-missing cells inspected per column.
pub const SAMPLE_SIZE: usize = 20;
/// Valid numbers needed in the sample to call a column a number column.
pub const MIN_HITS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaRole {
    Date,
    Contest,
    Winners,
}

impl MetaRole {
    pub const ALL: [MetaRole; 3] = [MetaRole::Contest, MetaRole::Date, MetaRole::Winners];
}

struct LabelRule {
    role: MetaRole,
    keywords: &'static [&'static str],
}

const LABEL_RULES: [LabelRule; 3] = [
    LabelRule {
        role: MetaRole::Date,
        keywords: &["data"],
    },
    LabelRule {
        role: MetaRole::Contest,
        keywords: &["concurso", "nr", "numero", "nº", "nro"],
    },
    LabelRule {
        role: MetaRole::Winners,
        keywords: &["ganh"],
    },
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnRoles {
    pub numbers: Vec<usize>,
    pub contest: Option<usize>,
    pub date: Option<usize>,
    pub winners: Option<usize>,
}

impl ColumnRoles {
    fn slot(&mut self, role: MetaRole) -> &mut Option<usize> {
        match role {
            MetaRole::Date => &mut self.date,
            MetaRole::Contest => &mut self.contest,
            MetaRole::Winners => &mut self.winners,
        }
    }

    pub fn role(&self, role: MetaRole) -> Option<usize> {
        match role {
            MetaRole::Date => self.date,
            MetaRole::Contest => self.contest,
            MetaRole::Winners => self.winners,
        }
    }
}

pub fn sniff_columns(table: &RawTable, lottery: Lottery) -> ColumnRoles {
    let max = lottery.max_number();
    let mut roles = ColumnRoles::default();

    for (idx, label) in table.columns.iter().enumerate() {
        let low = label.to_lowercase();

        for rule in &LABEL_RULES {
            let slot = roles.slot(rule.role);
            if slot.is_none() && rule.keywords.iter().any(|k| low.contains(k)) {
                *slot = Some(idx);
            }
        }

        if holds_numbers(table, idx, max) {
            roles.numbers.push(idx);
        }
    }

    if roles.numbers.is_empty() {
        let n = lottery.pick_count().min(table.columns.len());
        roles.numbers = (0..n).collect();
    }

    roles
}

fn holds_numbers(table: &RawTable, column: usize, max: u8) -> bool {
    table
        .column(column)
        .filter(|c| !c.is_empty())
        .take(SAMPLE_SIZE)
        .filter(|c| parse_number(c, max).is_some())
        .count()
        >= MIN_HITS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    fn table(columns: &[&str], rows: Vec<Vec<Cell>>) -> RawTable {
        let mut t = RawTable::new(columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            t.push_row(row);
        }
        t
    }

    fn ints(values: &[i64]) -> Vec<Cell> {
        values.iter().map(|&v| Cell::Int(v)).collect()
    }

    #[test]
    fn test_detects_metadata_and_numbers() {
        let t = table(
            &["Concurso", "Data Sorteio", "Bola1", "Bola2", "Ganhadores 5 acertos"],
            vec![
                vec![Cell::Int(1000), Cell::text("01/01/2020"), Cell::Int(5), Cell::Int(12), Cell::Int(0)],
                vec![Cell::Int(1001), Cell::text("04/01/2020"), Cell::Int(33), Cell::Int(41), Cell::Int(2)],
            ],
        );
        let roles = sniff_columns(&t, Lottery::MegaSena);
        assert_eq!(roles.contest, Some(0));
        assert_eq!(roles.date, Some(1));
        assert_eq!(roles.winners, Some(4));
        // winners column has only one value in range
        assert_eq!(roles.numbers, vec![2, 3]);
    }

    #[test]
    fn test_column_can_hold_role_and_numbers() {
        let t = table(
            &["nr", "b1"],
            vec![ints(&[3, 10]), ints(&[4, 20]), ints(&[5, 30])],
        );
        let roles = sniff_columns(&t, Lottery::MegaSena);
        assert_eq!(roles.contest, Some(0));
        assert_eq!(roles.numbers, vec![0, 1]);
    }

    #[test]
    fn test_first_label_match_wins() {
        let t = table(&["data", "data2", "concurso", "nro"], vec![]);
        let roles = sniff_columns(&t, Lottery::Quina);
        assert_eq!(roles.date, Some(0));
        assert_eq!(roles.contest, Some(2));
        assert_eq!(roles.role(MetaRole::Winners), None);
    }

    #[test]
    fn test_float_artifacts_count_as_numbers() {
        let t = table(
            &["x"],
            vec![vec![Cell::Float(7.0)], vec![Cell::text("8.0")], vec![Cell::Empty]],
        );
        assert_eq!(sniff_columns(&t, Lottery::Lotofacil).numbers, vec![0]);
    }

    #[test]
    fn test_only_first_twenty_values_are_sampled() {
        let mut rows: Vec<Vec<Cell>> = (0..20).map(|_| vec![Cell::text("x"), Cell::Int(1)]).collect();
        rows.push(ints(&[1, 1]));
        rows.push(ints(&[2, 1]));
        let t = table(&["a", "b"], rows);
        let roles = sniff_columns(&t, Lottery::Quina);
        assert_eq!(roles.numbers, vec![1]);
    }

    #[test]
    fn test_positional_fallback() {
        let t = table(
            &["a", "b", "c", "d", "e", "f", "g"],
            vec![vec![Cell::text("x"); 7]],
        );
        assert_eq!(sniff_columns(&t, Lottery::Quina).numbers, vec![0, 1, 2, 3, 4]);

        let narrow = table(&["a", "b"], vec![vec![Cell::text("x"); 2]]);
        assert_eq!(sniff_columns(&narrow, Lottery::Quina).numbers, vec![0, 1]);
    }
}
