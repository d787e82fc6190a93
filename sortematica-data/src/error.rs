use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("Loteria desconhecida: '{0}'")]
    UnknownLottery(String),

    #[error("Arquivo não encontrado: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Falha ao ler a planilha {}: {reason}", path.display())]
    Workbook { path: PathBuf, reason: String },

    #[error("Falha ao ler o CSV {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

pub type Result<T> = std::result::Result<T, DataError>;
