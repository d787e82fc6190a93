use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use sortematica_data::loader::DrawStore;
use sortematica_data::models::Lottery;

use crate::analysis::{analyse_lottery, Analysis};

/// An analysis computed at startup, or the message of the error that kept
/// it from being computed.
pub type CachedAnalysis = Result<Analysis, String>;

/// Shared application state for API handlers.
///
/// The analysis cache is filled once by [`AppState::warm`] and never
/// invalidated: new sheets are picked up on restart only.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DrawStore>,
    pub analyses: Arc<HashMap<Lottery, CachedAnalysis>>,
    pub max_tickets: usize,
}

impl AppState {
    pub fn warm(store: DrawStore, max_tickets: usize) -> Self {
        info!(data_dir = %store.data_dir().display(), "gerando análises iniciais");

        let analyses = Lottery::ALL
            .into_iter()
            .map(|lottery| {
                let cached = match analyse_lottery(&store, lottery) {
                    Ok(analysis) => {
                        match analysis.report() {
                            Some(r) => info!(lottery = %lottery, draws = r.total_draws, "análise pronta"),
                            None => warn!(lottery = %lottery, "nenhum concurso válido na planilha"),
                        }
                        Ok(analysis)
                    }
                    Err(e) => {
                        warn!(lottery = %lottery, error = %e, "análise indisponível");
                        Err(format!("Erro ao gerar análise: {e}"))
                    }
                };
                (lottery, cached)
            })
            .collect();

        Self {
            store: Arc::new(store),
            analyses: Arc::new(analyses),
            max_tickets,
        }
    }

    pub fn analysis(&self, lottery: Lottery) -> Option<&CachedAnalysis> {
        self.analyses.get(&lottery)
    }
}
