use crate::db::conn::SubjectDb;
use crate::db::queries::{subject_from_pg_row, subject_from_sqlite_row, SUBJECT_COLUMNS};
use crate::error::StoreError;
use crate::models::{Subject, SubjectRecord};
use chrono::Utc;
use rusqlite::params;

/// Inserta una asignatura nueva y devuelve la fila tal como quedó guardada.
/// Nunca actualiza filas existentes: una clave repetida falla por `UNIQUE`.
pub fn insert_subject(db: &mut SubjectDb, record: &SubjectRecord) -> Result<Subject, StoreError> {
    let ts = Utc::now().to_rfc3339();
    match db {
        SubjectDb::Sqlite(conn) => {
            conn.execute(
                "INSERT INTO subjects (
                    code, name, theoretical_hours, practical_hours,
                    credits, prerequisites, semester, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
                params![
                    record.code,
                    record.name,
                    record.theoretical_hours,
                    record.practical_hours,
                    record.credits,
                    record.prerequisites,
                    record.semester,
                    ts,
                ],
            )?;
            let id = conn.last_insert_rowid();
            let subject = conn.query_row(
                &format!("SELECT {SUBJECT_COLUMNS} FROM subjects WHERE id = ?1"),
                params![id],
                subject_from_sqlite_row,
            )?;
            Ok(subject)
        }
        SubjectDb::Postgres(client) => {
            let sql = format!(
                "INSERT INTO subjects (
                    code, name, theoretical_hours, practical_hours,
                    credits, prerequisites, semester, created_at, updated_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
                RETURNING {SUBJECT_COLUMNS}"
            );
            let row = client.query_one(
                sql.as_str(),
                &[
                    &record.code,
                    &record.name,
                    &i64::from(record.theoretical_hours),
                    &i64::from(record.practical_hours),
                    &i64::from(record.credits),
                    &record.prerequisites,
                    &i64::from(record.semester),
                    &ts,
                ],
            )?;
            Ok(subject_from_pg_row(&row))
        }
    }
}
