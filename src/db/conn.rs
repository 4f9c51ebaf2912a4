use crate::error::StoreError;
use postgres::{Client, NoTls};
use rusqlite::Connection;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Conexión a la base de asignaturas: SQLite local o Postgres remoto.
pub enum SubjectDb {
    Sqlite(Connection),
    Postgres(Client),
}

impl fmt::Debug for SubjectDb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubjectDb::Sqlite(_) => write!(f, "SubjectDb::Sqlite(..)"),
            SubjectDb::Postgres(_) => write!(f, "SubjectDb::Postgres(..)"),
        }
    }
}

const SQLITE_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS subjects (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    code TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    theoretical_hours INTEGER NOT NULL CHECK (theoretical_hours >= 0),
    practical_hours INTEGER NOT NULL CHECK (practical_hours >= 0),
    credits INTEGER NOT NULL CHECK (credits >= 0),
    prerequisites TEXT,
    semester INTEGER NOT NULL CHECK (semester >= 0),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)";

const POSTGRES_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS subjects (
    id BIGSERIAL PRIMARY KEY,
    code TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    theoretical_hours BIGINT NOT NULL CHECK (theoretical_hours >= 0),
    practical_hours BIGINT NOT NULL CHECK (practical_hours >= 0),
    credits BIGINT NOT NULL CHECK (credits >= 0),
    prerequisites TEXT,
    semester BIGINT NOT NULL CHECK (semester >= 0),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)";

/// Ruta local para una URL sqlite:// o file:// (o ruta simple).
/// `None` si la URL apunta a Postgres.
pub fn sqlite_path(url: &str) -> Result<Option<PathBuf>, StoreError> {
    if let Some(rest) = url.strip_prefix("sqlite://") {
        Ok(Some(PathBuf::from(rest)))
    } else if let Some(rest) = url.strip_prefix("file://") {
        Ok(Some(PathBuf::from(rest)))
    } else if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        Ok(None)
    } else if url.contains("://") {
        Err(StoreError::UnsupportedUrl(url.to_string()))
    } else {
        Ok(Some(PathBuf::from(url)))
    }
}

fn ensure_parent_dir(path: &Path) -> Result<(), StoreError> {
    if path.as_os_str() == ":memory:" {
        return Ok(());
    }
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir).map_err(|source| StoreError::Location {
                path: dir.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(())
}

/// Abre la conexión indicada por `url` y asegura que la tabla exista.
/// Acepta sqlite://, file://, postgres://, postgresql://, una ruta o `:memory:`.
pub fn open_connection(url: &str) -> Result<SubjectDb, StoreError> {
    let mut db = match sqlite_path(url)? {
        Some(path) => {
            ensure_parent_dir(&path)?;
            debug!(path = %path.display(), "abriendo sqlite");
            SubjectDb::Sqlite(Connection::open(&path)?)
        }
        None => {
            debug!("conectando a postgres");
            SubjectDb::Postgres(Client::connect(url, NoTls)?)
        }
    };
    init_schema(&mut db)?;
    info!(backend = ?db, "base de datos lista");
    Ok(db)
}

/// SQLite en memoria con el esquema creado. Útil para pruebas y `--dry-run`.
pub fn open_in_memory() -> Result<SubjectDb, StoreError> {
    let mut db = SubjectDb::Sqlite(Connection::open_in_memory()?);
    init_schema(&mut db)?;
    Ok(db)
}

/// Crea la tabla `subjects` si no existe.
pub fn init_schema(db: &mut SubjectDb) -> Result<(), StoreError> {
    match db {
        SubjectDb::Sqlite(conn) => {
            conn.execute(SQLITE_SCHEMA, [])?;
        }
        SubjectDb::Postgres(client) => {
            client.batch_execute(POSTGRES_SCHEMA)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_urls() {
        assert_eq!(sqlite_path("sqlite://db/a.sqlite").unwrap(), Some(PathBuf::from("db/a.sqlite")));
        assert_eq!(sqlite_path("file:///tmp/a.db").unwrap(), Some(PathBuf::from("/tmp/a.db")));
        assert_eq!(sqlite_path("local.db").unwrap(), Some(PathBuf::from("local.db")));
        assert_eq!(sqlite_path("postgresql://u@h/db").unwrap(), None);
        assert!(matches!(sqlite_path("mysql://h/db"), Err(StoreError::UnsupportedUrl(_))));
    }

    #[test]
    fn creates_parent_directory_for_sqlite_file() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested/database.sqlite");
        let url = format!("sqlite://{}", db_path.display());
        let db = open_connection(&url).unwrap();
        assert!(matches!(db, SubjectDb::Sqlite(_)));
        assert!(db_path.exists());
    }

    #[test]
    fn schema_creation_is_idempotent() {
        let mut db = open_in_memory().unwrap();
        init_schema(&mut db).unwrap();
    }
}
