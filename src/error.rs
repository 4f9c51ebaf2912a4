// Tipos de error del importador.
//
// `ImportError` termina la ejecución; `RowError` sólo descarta la fila actual.

use std::path::PathBuf;
use thiserror::Error;

/// Errores del almacenamiento de asignaturas (SQLite o Postgres).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("postgres: {0}")]
    Postgres(#[from] postgres::Error),
    #[error("DATABASE_URL uses unsupported scheme: {0}")]
    UnsupportedUrl(String),
    #[error("could not prepare database location {path:?}: {source}")]
    Location {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error fatal para la importación completa.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("No se encontró el archivo CSV! ({file}; buscado en: {})", display_paths(.searched))]
    FileNotFound { file: String, searched: Vec<PathBuf> },
    #[error("I/O error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not read CSV header row: {0}")]
    Header(#[source] csv::Error),
    #[error("error reading CSV: {0}")]
    Read(#[source] csv::Error),
    #[error("unknown source encoding label: {0}")]
    Encoding(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Error recuperable de una fila: se registra, se cuenta y se sigue.
#[derive(Debug, Error)]
pub enum RowError {
    #[error("malformed CSV record: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid value {value:?} for column {column}: must be a non-negative integer")]
    Coercion { column: &'static str, value: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
