//! Importación de asignaturas: fila -> registro -> alta, contando éxitos y errores.
//!
//! Un error en una fila se registra y se cuenta; nunca detiene la importación.
//! Sólo una falla de lectura del archivo (I/O) corta la ejecución.

use crate::config::Config;
use crate::db::SubjectStore;
use crate::error::{ImportError, RowError};
use crate::mapper::{map_row, missing_headers, COL_CODE};
use crate::progress::ProgressObserver;
use crate::reader::{Row, SourceEncoding, SubjectCsvReader};
use crate::storage::{default_sources, locate_csv, CsvSource};
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Fila que no se pudo importar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowFailure {
    /// Índice 1-based de la fila de datos procesada.
    pub row: usize,
    pub code: Option<String>,
    pub error: String,
}

impl fmt::Display for RowFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error en la fila {} ({}): {}",
            self.row,
            self.code.as_deref().unwrap_or_default(),
            self.error
        )
    }
}

/// Acumulador y resultado de la importación.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub file: Option<PathBuf>,
    pub imported: usize,
    pub errors: usize,
    pub failures: Vec<RowFailure>,
}

impl ImportSummary {
    pub fn processed(&self) -> usize {
        self.imported + self.errors
    }

    fn record_success(mut self) -> Self {
        self.imported += 1;
        self
    }

    fn record_failure(mut self, failure: RowFailure) -> Self {
        self.errors += 1;
        self.failures.push(failure);
        self
    }
}

fn import_row<S>(store: &mut S, row: &Row) -> Result<(), RowError>
where
    S: SubjectStore + ?Sized,
{
    let record = map_row(row)?;
    store.create_subject(&record)?;
    Ok(())
}

/// Recorre `rows` creando una asignatura por fila.
pub fn import_subjects<I, S, P>(rows: I, store: &mut S, progress: &mut P) -> Result<ImportSummary, ImportError>
where
    I: IntoIterator<Item = Result<Row, csv::Error>>,
    S: SubjectStore + ?Sized,
    P: ProgressObserver + ?Sized,
{
    progress.start();

    let summary = rows
        .into_iter()
        .enumerate()
        .try_fold(ImportSummary::default(), |acc, (idx, item)| {
            let n = idx + 1;
            let (code, outcome) = match item {
                Ok(row) => (row.get(COL_CODE).map(str::to_string), import_row(store, &row)),
                Err(e) if e.is_io_error() => return Err(ImportError::Read(e)),
                Err(e) => (None, Err(RowError::from(e))),
            };
            match outcome {
                Ok(()) => {
                    progress.advance();
                    Ok(acc.record_success())
                }
                Err(e) => {
                    let failure = RowFailure {
                        row: n,
                        code,
                        error: e.to_string(),
                    };
                    error!("{failure}");
                    progress.row_failed(&failure);
                    Ok(acc.record_failure(failure))
                }
            }
        });

    progress.finish();
    summary
}

/// CSV ya localizado y abierto (encabezados leídos), listo para importar.
/// Se arma antes de abrir la base: si el archivo no aparece no se toca nada.
pub struct PreparedImport {
    path: PathBuf,
    reader: SubjectCsvReader<File>,
}

impl PreparedImport {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn headers(&self) -> &[String] {
        self.reader.headers()
    }

    /// Importa todas las filas. El archivo se cierra al terminar el recorrido.
    pub fn run<S, P>(self, store: &mut S, progress: &mut P) -> Result<ImportSummary, ImportError>
    where
        S: SubjectStore + ?Sized,
        P: ProgressObserver + ?Sized,
    {
        let PreparedImport { path, reader } = self;
        let mut summary = import_subjects(reader.rows(), store, progress)?;
        summary.file = Some(path);

        info!(imported = summary.imported, errors = summary.errors, "importación completada");
        if summary.errors > 0 {
            warn!(errors = summary.errors, "hubo filas con errores");
        }
        Ok(summary)
    }
}

/// Localiza `file_name` en `sources` y lo abre con la codificación dada.
pub fn prepare_import_from(
    file_name: &str,
    sources: &[Box<dyn CsvSource>],
    encoding: SourceEncoding,
) -> Result<PreparedImport, ImportError> {
    let path = locate_csv(file_name, sources)?;
    let reader = SubjectCsvReader::open(&path, encoding)?;

    let missing = missing_headers(reader.headers());
    if !missing.is_empty() {
        warn!(?missing, "faltan encabezados esperados; esos campos quedarán vacíos o en 0");
    }
    Ok(PreparedImport { path, reader })
}

/// Resuelve codificación y ubicaciones desde `config` y abre el CSV.
pub fn prepare_import(config: &Config, file_name: &str) -> Result<PreparedImport, ImportError> {
    let encoding =
        SourceEncoding::from_label(&config.encoding).ok_or_else(|| ImportError::Encoding(config.encoding.clone()))?;
    prepare_import_from(file_name, &default_sources(config), encoding)
}

/// Importa `file_name` buscándolo en `sources`.
pub fn run_import_from<S, P>(
    file_name: &str,
    sources: &[Box<dyn CsvSource>],
    encoding: SourceEncoding,
    store: &mut S,
    progress: &mut P,
) -> Result<ImportSummary, ImportError>
where
    S: SubjectStore + ?Sized,
    P: ProgressObserver + ?Sized,
{
    prepare_import_from(file_name, sources, encoding)?.run(store, progress)
}

/// Punto de entrada del comando `import:subjects` con la configuración dada.
pub fn run_import<S, P>(config: &Config, file_name: &str, store: &mut S, progress: &mut P) -> Result<ImportSummary, ImportError>
where
    S: SubjectStore + ?Sized,
    P: ProgressObserver + ?Sized,
{
    prepare_import(config, file_name)?.run(store, progress)
}
