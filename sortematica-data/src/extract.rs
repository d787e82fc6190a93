use crate::models::{DrawRecord, Lottery};
use crate::sniff::ColumnRoles;
use crate::table::{Cell, RawTable};

/// Reads a drawn number out of a cell. Missing, non-integer and out-of-range
/// values give `None`; a trailing `.0` left by float-typed columns is ignored.
pub fn parse_number(cell: &Cell, max: u8) -> Option<u8> {
    if cell.is_empty() {
        return None;
    }
    let text = cell.to_text();
    let text = text.trim();
    let text = text.strip_suffix(".0").unwrap_or(text);

    let digits = text.trim_start_matches('-');
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let value: i64 = text.parse().ok()?;
    if (1..=max as i64).contains(&value) {
        Some(value as u8)
    } else {
        None
    }
}

/// Valid numbers of one row across the number columns, sorted ascending.
pub fn row_numbers(table: &RawTable, row: usize, columns: &[usize], max: u8) -> Vec<u8> {
    let mut numbers: Vec<u8> = columns
        .iter()
        .filter_map(|&c| parse_number(table.get(row, c), max))
        .collect();
    numbers.sort_unstable();
    numbers
}

/// One record per row that yields at least one valid number, in table order.
pub fn extract_draws(table: &RawTable, roles: &ColumnRoles, lottery: Lottery) -> Vec<DrawRecord> {
    let max = lottery.max_number();
    (0..table.len())
        .filter_map(|row| {
            let numbers = row_numbers(table, row, &roles.numbers, max);
            (!numbers.is_empty()).then_some(DrawRecord { row, numbers })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sniff::sniff_columns;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(&Cell::Int(5), 25), Some(5));
        assert_eq!(parse_number(&Cell::Float(25.0), 25), Some(25));
        assert_eq!(parse_number(&Cell::text(" 07 "), 25), Some(7));
        assert_eq!(parse_number(&Cell::text("10.0"), 60), Some(10));
        assert_eq!(parse_number(&Cell::Int(26), 25), None);
        assert_eq!(parse_number(&Cell::Int(0), 25), None);
        assert_eq!(parse_number(&Cell::Int(-3), 25), None);
        assert_eq!(parse_number(&Cell::Float(2.5), 25), None);
        assert_eq!(parse_number(&Cell::text("--3"), 25), None);
        assert_eq!(parse_number(&Cell::text("abc"), 25), None);
        assert_eq!(parse_number(&Cell::text("99999999999999999999999"), 25), None);
        assert_eq!(parse_number(&Cell::Empty, 25), None);
    }

    #[test]
    fn test_extract_draws_sorts_and_drops_empty_rows() {
        let mut table = RawTable::new(vec!["b1".into(), "b2".into(), "b3".into()]);
        table.push_row(vec![Cell::Int(9), Cell::Int(2), Cell::Int(99)]);
        table.push_row(vec![Cell::text("x"), Cell::text("y"), Cell::text("z")]);
        table.push_row(vec![Cell::Float(4.0), Cell::Empty, Cell::Int(1)]);

        let roles = ColumnRoles {
            numbers: vec![0, 1, 2],
            ..ColumnRoles::default()
        };
        let draws = extract_draws(&table, &roles, Lottery::MegaSena);
        assert_eq!(
            draws,
            vec![
                DrawRecord { row: 0, numbers: vec![2, 9] },
                DrawRecord { row: 2, numbers: vec![1, 4] },
            ]
        );
    }

    #[test]
    fn test_records_respect_variant_bounds() {
        let mut table = RawTable::new((1..=16).map(|i| format!("Bola{i}")).collect());
        for shift in [0i64, 1, 0, 10] {
            table.push_row((1..=16).map(|i| Cell::Int(i + shift)).collect());
        }
        let lottery = Lottery::Lotofacil;
        let roles = sniff_columns(&table, lottery);
        for draw in extract_draws(&table, &roles, lottery) {
            assert!(draw.numbers.windows(2).all(|w| w[0] <= w[1]));
            assert!(draw.numbers.iter().all(|&n| (1..=25).contains(&n)));
        }
    }
}
