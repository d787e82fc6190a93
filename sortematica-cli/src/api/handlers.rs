use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use tracing::warn;

use sortematica_data::models::{normalize_lottery, Lottery, LotteryInfo, Ticket};

use crate::analysis::latest::{latest_results, DEFAULT_LATEST};
use crate::analysis::sampler::{generate_tickets, PickError, DEFAULT_QUANTITY};
use crate::analysis::simulator::simulate_matches;
use crate::api::state::AppState;

type ApiResponse = Json<Value>;

fn erro(message: impl Display) -> ApiResponse {
    Json(json!({ "erro": message.to_string() }))
}

/// Missing or empty parameters are `None`; anything unparsable is an error message.
fn parse_param<T: FromStr>(params: &HashMap<String, String>, key: &str) -> Result<Option<T>, String> {
    match params.get(key).map(|v| v.trim()) {
        None | Some("") => Ok(None),
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| format!("Parâmetro '{key}' inválido: '{v}'")),
    }
}

/// GET /health
pub async fn health() -> ApiResponse {
    Json(json!({ "status": "ok" }))
}

/// GET /api/loterias
pub async fn list_lotteries() -> ApiResponse {
    let loterias: Vec<LotteryInfo> = Lottery::ALL.into_iter().map(LotteryInfo::from).collect();
    Json(json!({ "loterias": loterias }))
}

/// GET /api/ultimos/:loteria?n=2
pub async fn get_latest(
    State(state): State<AppState>,
    Path(loteria): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResponse {
    let lottery = match normalize_lottery(&loteria) {
        Ok(l) => l,
        Err(e) => return erro(e),
    };
    let n = match parse_param(&params, "n") {
        Ok(n) => n.unwrap_or(DEFAULT_LATEST),
        Err(e) => return erro(e),
    };

    let store = state.store.clone();
    match tokio::task::spawn_blocking(move || latest_results(&store, lottery, n)).await {
        Ok(Ok(ultimos)) => Json(json!({ "ultimos": ultimos })),
        Ok(Err(e)) => {
            warn!(lottery = %lottery, error = %e, "últimos resultados indisponíveis");
            erro(e)
        }
        Err(e) => erro(e),
    }
}

/// GET /api/analisar/:loteria
pub async fn get_analysis(
    State(state): State<AppState>,
    Path(loteria): Path<String>,
) -> ApiResponse {
    let lottery = match normalize_lottery(&loteria) {
        Ok(l) => l,
        Err(e) => return erro(e),
    };

    match state.analysis(lottery) {
        Some(Ok(analysis)) => match serde_json::to_value(analysis) {
            Ok(v) => Json(v),
            Err(e) => erro(e),
        },
        Some(Err(message)) => erro(message),
        None => erro(format!("Análise indisponível para {lottery}")),
    }
}

fn tickets_for(
    state: &AppState,
    loteria: &str,
    params: &HashMap<String, String>,
) -> Result<Vec<Ticket>, String> {
    let lottery = normalize_lottery(loteria).map_err(|e| e.to_string())?;
    let quantity = parse_param(params, "quantidade")?.unwrap_or(DEFAULT_QUANTITY);
    let per_ticket = parse_param(params, "dezenas_por_jogo")?;

    if quantity > state.max_tickets {
        return Err(PickError::TooManyTickets {
            requested: quantity,
            limit: state.max_tickets,
        }
        .to_string());
    }

    generate_tickets(lottery, quantity, per_ticket, None).map_err(|e| e.to_string())
}

/// GET /api/palpite/:loteria?quantidade=5&dezenas_por_jogo=
pub async fn generate(
    State(state): State<AppState>,
    Path(loteria): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResponse {
    match tickets_for(&state, &loteria, &params) {
        Ok(jogos) => Json(json!({ "jogos": jogos })),
        Err(e) => erro(e),
    }
}

/// GET /gerar/:jogo
pub async fn generate_legacy(State(state): State<AppState>, Path(jogo): Path<String>) -> ApiResponse {
    match tickets_for(&state, &jogo, &HashMap::new()) {
        Ok(jogos) => Json(json!({ "palpites": { "jogos": jogos } })),
        Err(e) => erro(e),
    }
}

/// POST /api/simular/:loteria  body: {"dezenas_sorteadas": [...], "jogos": [[...], ...]}
pub async fn simulate(Path(loteria): Path<String>, body: Bytes) -> ApiResponse {
    if let Err(e) = normalize_lottery(&loteria) {
        return erro(e);
    }
    let body: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => return erro(format!("Corpo da requisição inválido: {e}")),
    };

    let drawn = body.get("dezenas_sorteadas").unwrap_or(&Value::Null);
    match simulate_matches(drawn, body.get("jogos")) {
        Ok(resultados) => Json(json!({ "resultados": resultados })),
        Err(e) => erro(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_param() {
        let params: HashMap<String, String> = [
            ("n".to_string(), "3".to_string()),
            ("vazio".to_string(), " ".to_string()),
            ("ruim".to_string(), "abc".to_string()),
        ]
        .into_iter()
        .collect();

        assert_eq!(parse_param::<usize>(&params, "n"), Ok(Some(3)));
        assert_eq!(parse_param::<usize>(&params, "vazio"), Ok(None));
        assert_eq!(parse_param::<usize>(&params, "ausente"), Ok(None));
        assert!(parse_param::<usize>(&params, "ruim").is_err());
    }
}
