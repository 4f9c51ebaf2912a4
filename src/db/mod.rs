pub mod conn;
pub mod insertions;
pub mod queries;

pub use conn::{init_schema, open_connection, open_in_memory, SubjectDb};
pub use insertions::insert_subject;
pub use queries::{count_subjects, find_subject_by_code, list_subjects};

use crate::error::StoreError;
use crate::models::{Subject, SubjectRecord};

/// Operación de alta que necesita el importador. Las reglas de unicidad y
/// validación son del almacenamiento, no del importador.
pub trait SubjectStore {
    fn create_subject(&mut self, record: &SubjectRecord) -> Result<Subject, StoreError>;
}

impl SubjectStore for SubjectDb {
    fn create_subject(&mut self, record: &SubjectRecord) -> Result<Subject, StoreError> {
        insert_subject(self, record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_read_back() {
        let mut db = open_in_memory().unwrap();
        let created = db
            .create_subject(&SubjectRecord::new("MAT101", "Cálculo I").hours(4, 2).credits(6).semester(1))
            .unwrap();
        assert_eq!(created.code, "MAT101");
        assert_eq!(created.prerequisites, None);
        assert_eq!(created.created_at, created.updated_at);

        let found = find_subject_by_code(&mut db, "MAT101").unwrap().unwrap();
        assert_eq!(found, created);
        assert_eq!(count_subjects(&mut db).unwrap(), 1);
    }

    #[test]
    fn duplicate_code_is_rejected() {
        let mut db = open_in_memory().unwrap();
        db.create_subject(&SubjectRecord::new("FIS110", "Física")).unwrap();
        let err = db.create_subject(&SubjectRecord::new("FIS110", "Física bis")).unwrap_err();
        assert!(err.to_string().contains("UNIQUE"), "{err}");
        assert_eq!(count_subjects(&mut db).unwrap(), 1);
    }

    #[test]
    fn missing_code_violates_not_null() {
        let mut db = open_in_memory().unwrap();
        let record = SubjectRecord {
            code: None,
            name: Some("Sin clave".into()),
            ..Default::default()
        };
        let err = db.create_subject(&record).unwrap_err();
        assert!(err.to_string().contains("NOT NULL"), "{err}");
    }

    #[test]
    fn list_orders_by_semester_then_code() {
        let mut db = open_in_memory().unwrap();
        db.create_subject(&SubjectRecord::new("B2", "b").semester(2)).unwrap();
        db.create_subject(&SubjectRecord::new("Z1", "z").semester(1)).unwrap();
        db.create_subject(&SubjectRecord::new("A1", "a").semester(1)).unwrap();
        let codes: Vec<String> = list_subjects(&mut db).unwrap().into_iter().map(|s| s.code).collect();
        assert_eq!(codes, ["A1", "Z1", "B2"]);
    }
}
