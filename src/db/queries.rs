use crate::db::conn::SubjectDb;
use crate::error::StoreError;
use crate::models::Subject;
use rusqlite::params;

pub(crate) const SUBJECT_COLUMNS: &str = "id, code, name, theoretical_hours, practical_hours, \
     credits, prerequisites, semester, created_at, updated_at";

pub(crate) fn subject_from_sqlite_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Subject> {
    Ok(Subject {
        id: row.get(0)?,
        code: row.get(1)?,
        name: row.get(2)?,
        theoretical_hours: row.get(3)?,
        practical_hours: row.get(4)?,
        credits: row.get(5)?,
        prerequisites: row.get(6)?,
        semester: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

// el CHECK (>= 0) del esquema garantiza que entren en u32
fn pg_u32(row: &postgres::Row, idx: usize) -> u32 {
    u32::try_from(row.get::<_, i64>(idx)).unwrap_or_default()
}

pub(crate) fn subject_from_pg_row(row: &postgres::Row) -> Subject {
    Subject {
        id: row.get(0),
        code: row.get(1),
        name: row.get(2),
        theoretical_hours: pg_u32(row, 3),
        practical_hours: pg_u32(row, 4),
        credits: pg_u32(row, 5),
        prerequisites: row.get(6),
        semester: pg_u32(row, 7),
        created_at: row.get(8),
        updated_at: row.get(9),
    }
}

pub fn count_subjects(db: &mut SubjectDb) -> Result<i64, StoreError> {
    match db {
        SubjectDb::Sqlite(conn) => Ok(conn.query_row("SELECT COUNT(*) FROM subjects", [], |r| r.get(0))?),
        SubjectDb::Postgres(client) => Ok(client.query_one("SELECT COUNT(*) FROM subjects", &[])?.get(0)),
    }
}

pub fn find_subject_by_code(db: &mut SubjectDb, code: &str) -> Result<Option<Subject>, StoreError> {
    let sql = format!("SELECT {SUBJECT_COLUMNS} FROM subjects WHERE code = ");
    match db {
        SubjectDb::Sqlite(conn) => {
            let mut stmt = conn.prepare(&format!("{sql}?1"))?;
            let mut rows = stmt.query(params![code])?;
            match rows.next()? {
                Some(row) => Ok(Some(subject_from_sqlite_row(row)?)),
                None => Ok(None),
            }
        }
        SubjectDb::Postgres(client) => {
            let row = client.query_opt(format!("{sql}$1").as_str(), &[&code])?;
            Ok(row.as_ref().map(subject_from_pg_row))
        }
    }
}

/// Todas las asignaturas ordenadas por semestre y clave.
pub fn list_subjects(db: &mut SubjectDb) -> Result<Vec<Subject>, StoreError> {
    let sql = format!("SELECT {SUBJECT_COLUMNS} FROM subjects ORDER BY semester, code");
    match db {
        SubjectDb::Sqlite(conn) => {
            let mut stmt = conn.prepare(&sql)?;
            let rows_iter = stmt.query_map([], subject_from_sqlite_row)?;
            let mut out = Vec::new();
            for r in rows_iter {
                out.push(r?);
            }
            Ok(out)
        }
        SubjectDb::Postgres(client) => {
            let rows = client.query(sql.as_str(), &[])?;
            Ok(rows.iter().map(subject_from_pg_row).collect())
        }
    }
}
