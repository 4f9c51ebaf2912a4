//! Localización del CSV de entrada.
//!
//! Se consultan, en orden:
//! - `ManagedStorage`: almacenamiento gestionado, espacio `csv/`
//! - `DataDirectory`: directorio de datos de respaldo, espacio `data/`

use crate::config::Config;
use crate::error::ImportError;
use std::path::PathBuf;
use tracing::{debug, info};

/// Ubicación donde puede vivir un CSV.
pub trait CsvSource {
    /// Nombre corto para logs.
    fn label(&self) -> &str;
    fn exists(&self, file_name: &str) -> bool;
    /// Ruta legible para `file_name` (exista o no).
    fn resolve(&self, file_name: &str) -> PathBuf;
}

/// Almacenamiento gestionado: `<storage_root>/csv/<archivo>`.
#[derive(Debug, Clone)]
pub struct ManagedStorage {
    root: PathBuf,
}

impl ManagedStorage {
    pub const NAMESPACE: &'static str = "csv";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        ManagedStorage { root: root.into() }
    }
}

impl CsvSource for ManagedStorage {
    fn label(&self) -> &str {
        "storage"
    }

    fn exists(&self, file_name: &str) -> bool {
        self.resolve(file_name).is_file()
    }

    fn resolve(&self, file_name: &str) -> PathBuf {
        self.root.join(Self::NAMESPACE).join(file_name)
    }
}

/// Directorio de datos: `<data_root>/data/<archivo>`.
#[derive(Debug, Clone)]
pub struct DataDirectory {
    root: PathBuf,
}

impl DataDirectory {
    pub const SUBDIR: &'static str = "data";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        DataDirectory { root: root.into() }
    }
}

impl CsvSource for DataDirectory {
    fn label(&self) -> &str {
        "data"
    }

    fn exists(&self, file_name: &str) -> bool {
        self.resolve(file_name).is_file()
    }

    fn resolve(&self, file_name: &str) -> PathBuf {
        self.root.join(Self::SUBDIR).join(file_name)
    }
}

/// Fuentes por defecto según la configuración, en orden de búsqueda.
pub fn default_sources(config: &Config) -> Vec<Box<dyn CsvSource>> {
    vec![
        Box::new(ManagedStorage::new(&config.storage_path)),
        Box::new(DataDirectory::new(&config.data_path)),
    ]
}

/// Devuelve la ruta del primer `source` que contenga `file_name`.
pub fn locate_csv(file_name: &str, sources: &[Box<dyn CsvSource>]) -> Result<PathBuf, ImportError> {
    let mut searched = Vec::with_capacity(sources.len());
    for source in sources {
        let candidate = source.resolve(file_name);
        if source.exists(file_name) {
            info!(source = source.label(), path = %candidate.display(), "CSV encontrado");
            return Ok(candidate);
        }
        debug!(source = source.label(), path = %candidate.display(), "CSV no está aquí");
        searched.push(candidate);
    }
    Err(ImportError::FileNotFound {
        file: file_name.to_string(),
        searched,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn sources(storage: &Path, data: &Path) -> Vec<Box<dyn CsvSource>> {
        vec![
            Box::new(ManagedStorage::new(storage)),
            Box::new(DataDirectory::new(data)),
        ]
    }

    #[test]
    fn prefers_managed_storage() {
        let dir = tempfile::tempdir().unwrap();
        let storage = dir.path().join("storage");
        let data = dir.path().join("db");
        fs::create_dir_all(storage.join("csv")).unwrap();
        fs::create_dir_all(data.join("data")).unwrap();
        fs::write(storage.join("csv/subjects.csv"), "Clave\n").unwrap();
        fs::write(data.join("data/subjects.csv"), "Clave\n").unwrap();

        let found = locate_csv("subjects.csv", &sources(&storage, &data)).unwrap();
        assert_eq!(found, storage.join("csv/subjects.csv"));
    }

    #[test]
    fn falls_back_to_data_directory() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("db");
        fs::create_dir_all(data.join("data")).unwrap();
        fs::write(data.join("data/malla.csv"), "Clave\n").unwrap();

        let found = locate_csv("malla.csv", &sources(&dir.path().join("storage"), &data)).unwrap();
        assert_eq!(found, data.join("data/malla.csv"));
    }

    #[test]
    fn reports_every_searched_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = locate_csv("nope.csv", &sources(&dir.path().join("s"), &dir.path().join("d"))).unwrap_err();
        match err {
            ImportError::FileNotFound { file, searched } => {
                assert_eq!(file, "nope.csv");
                assert_eq!(searched.len(), 2);
                assert!(searched[0].ends_with("csv/nope.csv"));
                assert!(searched[1].ends_with("data/nope.csv"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn directory_with_same_name_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("csv/subjects.csv")).unwrap();
        let storage = ManagedStorage::new(dir.path());
        assert!(!storage.exists("subjects.csv"));
    }
}
