use std::env;
use std::path::PathBuf;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://database/database.sqlite";
pub const DEFAULT_STORAGE_PATH: &str = "storage/app";
pub const DEFAULT_DATA_PATH: &str = "database";
pub const DEFAULT_ENCODING: &str = "ISO-8859-1";
pub const DEFAULT_FILE_NAME: &str = "subjects.csv";

/// Configuración del comando. Se arma desde variables de entorno (y `.env`);
/// los flags de la CLI sobrescriben campo a campo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    /// Raíz del almacenamiento gestionado; los CSV viven bajo `csv/`.
    pub storage_path: PathBuf,
    /// Raíz de datos; los CSV de respaldo viven bajo `data/`.
    pub data_path: PathBuf,
    pub encoding: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            encoding: DEFAULT_ENCODING.to_string(),
        }
    }
}

// load .env if present
fn load_dotenv() {
    let _ = dotenv::dotenv();
}

impl Config {
    pub fn from_env() -> Self {
        load_dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero con una función de búsqueda inyectable.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Config {
            database_url: non_empty("DATABASE_URL").unwrap_or(defaults.database_url),
            storage_path: non_empty("STORAGE_PATH").map(PathBuf::from).unwrap_or(defaults.storage_path),
            data_path: non_empty("DATA_PATH").map(PathBuf::from).unwrap_or(defaults.data_path),
            encoding: non_empty("IMPORT_ENCODING").unwrap_or(defaults.encoding),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_when_nothing_set() {
        let cfg = Config::from_lookup(|_| None);
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.storage_path, PathBuf::from("storage/app"));
    }

    #[test]
    fn env_values_override_defaults() {
        let vars: HashMap<&str, &str> = [
            ("DATABASE_URL", "sqlite://:memory:"),
            ("DATA_PATH", "/srv/db"),
            ("IMPORT_ENCODING", "  "),
        ]
        .into_iter()
        .collect();
        let cfg = Config::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.database_url, "sqlite://:memory:");
        assert_eq!(cfg.data_path, PathBuf::from("/srv/db"));
        // blank values fall back to the default
        assert_eq!(cfg.encoding, DEFAULT_ENCODING);
        assert_eq!(cfg.storage_path, PathBuf::from(DEFAULT_STORAGE_PATH));
    }
}
