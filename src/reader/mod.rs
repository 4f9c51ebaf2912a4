//! Lectura del CSV de asignaturas.
//!
//! Submódulos:
//! - `transcode`: adaptador `Read` Latin-1 -> UTF-8 en streaming

mod transcode;

pub use transcode::{SourceEncoding, TranscodingReader};

use crate::error::ImportError;
use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Una fila de datos: encabezado -> valor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    fields: HashMap<String, String>,
}

impl Row {
    /// Empareja posicionalmente encabezados y valores. Si faltan valores las
    /// claves quedan ausentes; los valores sobrantes se descartan. Con
    /// encabezados repetidos gana el último.
    pub fn zip(headers: &[String], record: &StringRecord) -> Self {
        let fields = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.clone(), v.to_string()))
            .collect();
        Row { fields }
    }

    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields.get(header).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Row {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Lector de CSV con la fila de encabezados ya consumida.
pub struct SubjectCsvReader<R: Read> {
    inner: csv::Reader<TranscodingReader<R>>,
    headers: Vec<String>,
}

impl SubjectCsvReader<File> {
    /// Abre `path` aplicando el filtro de transcodificación.
    pub fn open(path: &Path, encoding: SourceEncoding) -> Result<Self, ImportError> {
        let file = File::open(path).map_err(|source| ImportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file, encoding)
    }
}

impl<R: Read> SubjectCsvReader<R> {
    pub fn from_reader(reader: R, encoding: SourceEncoding) -> Result<Self, ImportError> {
        let mut inner = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(TranscodingReader::new(reader, encoding));

        let headers: Vec<String> = inner
            .headers()
            .map_err(ImportError::Header)?
            .iter()
            .map(str::to_string)
            .collect();
        debug!(encoding = encoding.name(), ?headers, "encabezados leídos");

        Ok(SubjectCsvReader { inner, headers })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Secuencia perezosa de filas. Al soltar el iterador se cierra el archivo.
    pub fn rows(self) -> Rows<R> {
        Rows {
            records: self.inner.into_records(),
            headers: self.headers,
        }
    }
}

/// Iterador de filas; cada item es la fila o el error del registro CSV.
pub struct Rows<R: Read> {
    records: StringRecordsIntoIter<TranscodingReader<R>>,
    headers: Vec<String>,
}

impl<R: Read> Iterator for Rows<R> {
    type Item = Result<Row, csv::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        Some(record.map(|r| Row::zip(&self.headers, &r)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(bytes: &[u8]) -> SubjectCsvReader<&[u8]> {
        SubjectCsvReader::from_reader(bytes, SourceEncoding::Latin1).unwrap()
    }

    #[test]
    fn header_row_is_read_once() {
        let r = reader(b"Clave,Asignatura,HT\nMAT101,Calculo,4\n");
        assert_eq!(r.headers(), ["Clave", "Asignatura", "HT"]);
        let rows: Vec<Row> = r.rows().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("Clave"), Some("MAT101"));
        assert_eq!(rows[0].get("HT"), Some("4"));
    }

    #[test]
    fn short_rows_leave_keys_absent_and_long_rows_drop_extras() {
        let r = reader(b"Clave,Asignatura,HT\nA1,Algebra\nB2,Fisica,3,extra,more\n");
        let rows: Vec<Row> = r.rows().map(Result::unwrap).collect();
        assert_eq!(rows[0].get("HT"), None);
        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[1].get("HT"), Some("3"));
        assert_eq!(rows[1].len(), 3);
    }

    #[test]
    fn honors_quotes_and_escaped_quotes() {
        let r = reader(b"Clave,Asignatura\nX1,\"Taller \"\"A\"\", grupo 2\"\n");
        let row = r.rows().next().unwrap().unwrap();
        assert_eq!(row.get("Asignatura"), Some("Taller \"A\", grupo 2"));
    }

    #[test]
    fn latin1_values_arrive_as_unicode() {
        let r = reader(b"Clave,Asignatura\nQUI100,Qu\xedmica General\n");
        let row = r.rows().next().unwrap().unwrap();
        assert_eq!(row.get("Asignatura"), Some("Química General"));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let r = reader(b"Clave\nA\n\nB\n");
        let codes: Vec<String> = r
            .rows()
            .map(|row| row.unwrap().get("Clave").unwrap().to_string())
            .collect();
        assert_eq!(codes, ["A", "B"]);
    }

    #[test]
    fn empty_input_has_no_headers_and_no_rows() {
        let r = reader(b"");
        assert!(r.headers().is_empty());
        assert_eq!(r.rows().count(), 0);
    }
}
