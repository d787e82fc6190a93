use std::path::Path;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api::{handlers, state::AppState};

pub fn create_router(state: AppState, static_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/loterias", get(handlers::list_lotteries))
        .route("/api/ultimos/:loteria", get(handlers::get_latest))
        .route("/api/analisar/:loteria", get(handlers::get_analysis))
        .route("/api/palpite/:loteria", get(handlers::generate))
        .route("/api/simular/:loteria", post(handlers::simulate))
        // legacy route kept for old pages
        .route("/gerar/:jogo", get(handlers::generate_legacy))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use sortematica_data::loader::DrawStore;
    use tower::ServiceExt;

    fn lotofacil_sheet() -> String {
        let header: Vec<String> = std::iter::once("Concurso".to_string())
            .chain(std::iter::once("Data Sorteio".to_string()))
            .chain((1..=15).map(|i| format!("Bola{i}")))
            .chain(std::iter::once("Ganhadores 15 acertos".to_string()))
            .collect();
        let row = |contest: u32, date: &str, start: u8, winners: &str| {
            let mut cells = vec![contest.to_string(), date.to_string()];
            cells.extend((start..start + 15).map(|n| n.to_string()));
            cells.push(winners.to_string());
            cells.join(";")
        };
        [
            header.join(";"),
            row(3000, "01/01/2024", 1, "2"),
            row(3001, "03/01/2024", 2, "0"),
            row(3002, "05/01/2024", 1, ""),
        ]
        .join("\n")
    }

    fn app() -> (tempfile::TempDir, Router) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("LOTOFACIL.csv"), lotofacil_sheet()).unwrap();
        std::fs::write(dir.path().join("QUINA.csv"), "Concurso;Obs\nextra;sem sorteio\n").unwrap();

        let state = AppState::warm(DrawStore::new(dir.path()), 50);
        let router = create_router(state, &dir.path().join("static"));
        (dir, router)
    }

    async fn call(router: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                builder = builder.header("content-type", "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let response = router.oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_analysis_endpoint() {
        let (_dir, router) = app();
        let (status, body) = call(router, Method::GET, "/api/analisar/Lotof%C3%A1cil", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_concursos"], 3);
        let top10: Vec<u64> = serde_json::from_value(body["top10"].clone()).unwrap();
        assert!(top10.iter().all(|&n| n <= 16));
        assert_eq!(body["media_pares"], 7.33);
    }

    #[tokio::test]
    async fn test_analysis_errors_are_payloads() {
        let (_dir, router) = app();
        let (status, body) = call(router.clone(), Method::GET, "/api/analisar/megasena", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["erro"].as_str().unwrap().contains("Arquivo não encontrado"));

        let (_, body) = call(router.clone(), Method::GET, "/api/analisar/quina", None).await;
        assert_eq!(body["erro"], "Sem dados válidos para análise.");

        let (status, body) = call(router, Method::GET, "/api/analisar/bingo", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["erro"].as_str().unwrap().contains("bingo"));
    }

    #[tokio::test]
    async fn test_latest_endpoint() {
        let (_dir, router) = app();
        let (_, body) = call(router, Method::GET, "/api/ultimos/lotofacil?n=2", None).await;
        let ultimos = body["ultimos"].as_array().unwrap();
        assert_eq!(ultimos.len(), 2);
        assert_eq!(ultimos[0]["concurso"], 3001);
        assert_eq!(ultimos[0]["data"], "03/01/2024");
        assert_eq!(ultimos[0]["ganhadores"], "0");
        assert_eq!(ultimos[1]["ganhadores"], "Sem ganhador");
        assert_eq!(ultimos[1]["numeros"].as_array().unwrap().len(), 15);
    }

    #[tokio::test]
    async fn test_generate_endpoint() {
        let (_dir, router) = app();
        let (_, body) = call(
            router.clone(),
            Method::GET,
            "/api/palpite/megasena?quantidade=3&dezenas_por_jogo=8",
            None,
        )
        .await;
        let jogos = body["jogos"].as_array().unwrap();
        assert_eq!(jogos.len(), 3);
        assert!(jogos.iter().all(|j| j.as_array().unwrap().len() == 8));

        let (_, body) = call(router.clone(), Method::GET, "/api/palpite/quina?quantidade=500", None).await;
        assert!(body["erro"].is_string());

        let (_, body) = call(router.clone(), Method::GET, "/api/palpite/quina?quantidade=x", None).await;
        assert!(body["erro"].is_string());

        let (_, body) = call(router, Method::GET, "/gerar/quina", None).await;
        assert_eq!(body["palpites"]["jogos"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_simulate_endpoint() {
        let (_dir, router) = app();
        let payload = json!({ "dezenas_sorteadas": [1, 2, 3], "jogos": [[1, 2, 9], [4, 5, 6]] });
        let (status, body) = call(router.clone(), Method::POST, "/api/simular/quina", Some(payload)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["resultados"],
            json!([{ "jogo": 1, "acertos": 2 }, { "jogo": 2, "acertos": 0 }])
        );

        let payload = json!({ "dezenas_sorteadas": [1, 2, 3] });
        let (_, body) = call(router.clone(), Method::POST, "/api/simular/quina", Some(payload)).await;
        assert!(body["erro"].as_str().unwrap().contains("jogos"));

        let payload = json!({ "dezenas_sorteadas": "1 2 3", "jogos": [] });
        let (_, body) = call(router, Method::POST, "/api/simular/quina", Some(payload)).await;
        assert_eq!(body["erro"], "Dezenas sorteadas inválidas.");
    }

    #[tokio::test]
    async fn test_list_and_health() {
        let (_dir, router) = app();
        let (_, body) = call(router.clone(), Method::GET, "/api/loterias", None).await;
        assert_eq!(body["loterias"].as_array().unwrap().len(), 5);
        assert_eq!(body["loterias"][0]["id"], "lotofacil");

        let (_, body) = call(router, Method::GET, "/health", None).await;
        assert_eq!(body["status"], "ok");
    }
}
