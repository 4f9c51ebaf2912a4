// Estructuras de datos principales

use serde::{Deserialize, Serialize};

/// Asignatura persistida en la tabla `subjects`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub theoretical_hours: u32,
    pub practical_hours: u32,
    pub credits: u32,
    /// Lista libre de claves prerequisito; `None` cuando la celda viene vacía.
    pub prerequisites: Option<String>,
    pub semester: u32,
    pub created_at: String,
    pub updated_at: String,
}

/// Registro candidato construido a partir de una fila del CSV, antes de
/// persistirse. `code` y `name` quedan en `None` si la columna no existe;
/// el almacenamiento decide si lo acepta.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRecord {
    pub code: Option<String>,
    pub name: Option<String>,
    pub theoretical_hours: u32,
    pub practical_hours: u32,
    pub credits: u32,
    pub prerequisites: Option<String>,
    pub semester: u32,
}

impl SubjectRecord {
    /// Constructor rápido para tests y semillas: sólo clave y nombre, el resto en cero.
    pub fn new(code: &str, name: &str) -> Self {
        SubjectRecord {
            code: Some(code.to_string()),
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    pub fn hours(mut self, theoretical: u32, practical: u32) -> Self {
        self.theoretical_hours = theoretical;
        self.practical_hours = practical;
        self
    }

    pub fn credits(mut self, credits: u32) -> Self {
        self.credits = credits;
        self
    }

    pub fn semester(mut self, semester: u32) -> Self {
        self.semester = semester;
        self
    }

    pub fn prerequisites(mut self, prereqs: &str) -> Self {
        self.prerequisites = Some(prereqs.to_string());
        self
    }
}
