use crate::error::RowError;
use crate::models::SubjectRecord;
use crate::reader::Row;
use tracing::debug;

pub const COL_CODE: &str = "Clave";
pub const COL_NAME: &str = "Asignatura";
pub const COL_THEORETICAL: &str = "HT";
pub const COL_PRACTICAL: &str = "HP";
pub const COL_CREDITS: &str = "CR";
pub const COL_PREREQUISITES: &str = "Prerequisitos";
pub const COL_SEMESTER: &str = "Semestre";

/// Mapeo de encabezados del CSV a columnas de la tabla `subjects`.
pub const COLUMN_MAP: [(&str, &str); 7] = [
    (COL_CODE, "code"),
    (COL_NAME, "name"),
    (COL_THEORETICAL, "theoretical_hours"),
    (COL_PRACTICAL, "practical_hours"),
    (COL_CREDITS, "credits"),
    (COL_PREREQUISITES, "prerequisites"),
    (COL_SEMESTER, "semester"),
];

/// Encabezados esperados que no aparecen en `headers`.
pub fn missing_headers(headers: &[String]) -> Vec<&'static str> {
    COLUMN_MAP
        .iter()
        .map(|(h, _)| *h)
        .filter(|h| !headers.iter().any(|x| x == h))
        .collect()
}

/// Cast entero truncante: toma el prefijo numérico (con signo, decimales y
/// exponente opcionales) y descarta el resto. Sin prefijo numérico -> 0.
///
/// `"4"` -> 4, `"3.7"` -> 3, `" 12abc"` -> 12, `"1e3"` -> 1000, `"x"` -> 0.
pub fn coerce_int(raw: &str) -> i64 {
    let s = raw.trim_start_matches([' ', '\t', '\n', '\r', '\x0b', '\x0c']);
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = i - int_start;

    let mut is_float = false;
    if i < bytes.len() && bytes[i] == b'.' {
        let mut j = i + 1;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if int_digits > 0 || j > i + 1 {
            is_float = true;
            i = j;
        }
    }
    if int_digits == 0 && !is_float {
        return 0;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            is_float = true;
            i = j;
        }
    }

    let prefix = &s[..i];
    if is_float {
        // `as` satura y manda NaN a 0
        prefix.parse::<f64>().map(|f| f as i64).unwrap_or(0)
    } else {
        prefix.parse::<i64>().unwrap_or_else(|_| {
            if prefix.starts_with('-') { i64::MIN } else { i64::MAX }
        })
    }
}

/// `raw` no vacío sin prefijo numérico: el cast lo deja en 0 sin avisar.
fn is_silent_zero(raw: &str) -> bool {
    let trimmed = raw.trim_start();
    // un único signo, igual que `coerce_int`
    let unsigned = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
    let numeric = unsigned.starts_with(|c: char| c.is_ascii_digit())
        || unsigned
            .strip_prefix('.')
            .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_digit()));
    !raw.trim().is_empty() && !numeric
}

fn hours_field(row: &Row, column: &'static str) -> Result<u32, RowError> {
    let raw = row.get(column).unwrap_or("");
    let value = coerce_int(raw);
    if value == 0 && is_silent_zero(raw) {
        debug!(column, value = raw, "valor no numérico convertido a 0");
    }
    u32::try_from(value).map_err(|_| RowError::Coercion {
        column,
        value: raw.to_string(),
    })
}

/// Construye el registro candidato de una fila.
pub fn map_row(row: &Row) -> Result<SubjectRecord, RowError> {
    Ok(SubjectRecord {
        code: row.get(COL_CODE).map(str::to_string),
        name: row.get(COL_NAME).map(str::to_string),
        theoretical_hours: hours_field(row, COL_THEORETICAL)?,
        practical_hours: hours_field(row, COL_PRACTICAL)?,
        credits: hours_field(row, COL_CREDITS)?,
        // "" y "0" se consideran vacíos
        prerequisites: row
            .get(COL_PREREQUISITES)
            .filter(|p| !p.is_empty() && *p != "0")
            .map(str::to_string),
        semester: hours_field(row, COL_SEMESTER)?,
    })
}
