use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimulationError {
    #[error("Dezenas sorteadas inválidas.")]
    InvalidDrawn,

    #[error("Forneça a lista de jogos a serem simulados (parâmetro 'jogos').")]
    MissingTickets,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub jogo: usize,
    pub acertos: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Key {
    Null,
    Bool(bool),
    Int(i64),
    Float(u64),
    Text(String),
}

// Arrays and objects have no key; integral floats compare as integers.
fn key(value: &Value) -> Option<Key> {
    match value {
        Value::Null => Some(Key::Null),
        Value::Bool(b) => Some(Key::Bool(*b)),
        Value::Number(n) => Some(match n.as_i64() {
            Some(i) => Key::Int(i),
            None => {
                let f = n.as_f64().unwrap_or(f64::NAN);
                if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                    Key::Int(f as i64)
                } else {
                    Key::Float(f.to_bits())
                }
            }
        }),
        Value::String(s) => Some(Key::Text(s.clone())),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn key_set(values: &[Value]) -> Option<HashSet<Key>> {
    values.iter().map(key).collect()
}

/// Match counts for loosely-typed input, e.g. a JSON request body.
/// Only a wrong shape for the whole arguments is an error; a ticket that
/// cannot be compared counts zero.
pub fn simulate_matches(
    drawn: &Value,
    tickets: Option<&Value>,
) -> Result<Vec<MatchResult>, SimulationError> {
    let drawn = drawn.as_array().ok_or(SimulationError::InvalidDrawn)?;
    let tickets = tickets
        .and_then(Value::as_array)
        .ok_or(SimulationError::MissingTickets)?;

    let drawn = key_set(drawn);

    Ok(tickets
        .iter()
        .enumerate()
        .map(|(i, ticket)| {
            let acertos = match (&drawn, ticket.as_array().and_then(|t| key_set(t))) {
                (Some(drawn), Some(ticket)) => ticket.intersection(drawn).count(),
                _ => 0,
            };
            MatchResult { jogo: i + 1, acertos }
        })
        .collect())
}

pub fn count_matches(ticket: &[u8], drawn: &[u8]) -> usize {
    let drawn: HashSet<u8> = drawn.iter().copied().collect();
    let ticket: HashSet<u8> = ticket.iter().copied().collect();
    ticket.intersection(&drawn).count()
}
