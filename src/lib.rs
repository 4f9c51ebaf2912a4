// Biblioteca raíz del crate `asignaturas`.
// Importa asignaturas desde un CSV (Latin-1) a la tabla `subjects`;
// `run_import` orquesta localizar -> leer -> mapear -> persistir.
pub mod config;
pub mod db;
pub mod error;
pub mod importer;
pub mod mapper;
pub mod models;
pub mod progress;
pub mod reader;
pub mod storage;

pub use config::Config;
pub use error::{ImportError, RowError, StoreError};
pub use importer::{
    import_subjects, prepare_import, prepare_import_from, run_import, run_import_from, ImportSummary, PreparedImport,
    RowFailure,
};
pub use models::{Subject, SubjectRecord};
