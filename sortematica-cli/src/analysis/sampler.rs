use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use thiserror::Error;

use sortematica_data::models::{Lottery, Ticket};

pub const DEFAULT_QUANTITY: usize = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PickError {
    #[error("Quantidade de dezenas por jogo inválida: {requested} (permitido de 1 a {max})")]
    InvalidTicketSize { requested: usize, max: usize },

    #[error("Quantidade de jogos acima do limite: {requested} (máximo {limit})")]
    TooManyTickets { requested: usize, limit: usize },
}

/// Uniform picks: each ticket is an independent sample without replacement
/// from `[1, max]`, sorted. History plays no part.
pub fn generate_tickets(
    lottery: Lottery,
    quantity: usize,
    per_ticket: Option<usize>,
    seed: Option<u64>,
) -> Result<Vec<Ticket>, PickError> {
    let max = lottery.max_number() as usize;
    let size = per_ticket.unwrap_or_else(|| lottery.pick_count());
    if size == 0 || size > max {
        return Err(PickError::InvalidTicketSize {
            requested: size,
            max,
        });
    }

    let mut rng: StdRng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let tickets = (0..quantity)
        .map(|_| {
            let mut ticket: Ticket = index::sample(&mut rng, max, size)
                .into_iter()
                .map(|i| (i + 1) as u8)
                .collect();
            ticket.sort_unstable();
            ticket
        })
        .collect();

    Ok(tickets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tickets_are_valid() {
        for lottery in Lottery::ALL {
            let tickets = generate_tickets(lottery, 20, None, Some(7)).unwrap();
            assert_eq!(tickets.len(), 20);
            for t in &tickets {
                assert_eq!(t.len(), lottery.pick_count());
                assert!(t.windows(2).all(|w| w[0] < w[1]), "not sorted/distinct: {t:?}");
                assert!(t.iter().all(|&n| n >= 1 && n <= lottery.max_number()));
            }
        }
    }

    #[test]
    fn test_per_ticket_override() {
        let tickets = generate_tickets(Lottery::MegaSena, 3, Some(10), Some(1)).unwrap();
        assert!(tickets.iter().all(|t| t.len() == 10));

        let full = generate_tickets(Lottery::Lotofacil, 1, Some(25), None).unwrap();
        assert_eq!(full[0], (1..=25).collect::<Vec<u8>>());
    }

    #[test]
    fn test_invalid_ticket_size() {
        assert_eq!(
            generate_tickets(Lottery::Lotofacil, 1, Some(26), None),
            Err(PickError::InvalidTicketSize { requested: 26, max: 25 })
        );
        assert!(generate_tickets(Lottery::Quina, 1, Some(0), None).is_err());
    }

    #[test]
    fn test_seed_reproducibility() {
        let a = generate_tickets(Lottery::Quina, 4, None, Some(42)).unwrap();
        let b = generate_tickets(Lottery::Quina, 4, None, Some(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_quantity() {
        assert!(generate_tickets(Lottery::Quina, 0, None, None).unwrap().is_empty());
    }
}
