use encoding_rs::{CoderResult, Decoder, Encoding};
use std::io::{self, Read};

const IN_BUF: usize = 8 * 1024;
// Latin-1 nunca ocupa más de 2 bytes en UTF-8
const OUT_BUF: usize = IN_BUF * 2;

/// Alias que se tratan como ISO-8859-1 estricto (byte N -> U+00N),
/// igual que `iconv ISO-8859-1/UTF-8`.
const LATIN1_LABELS: &[&str] = &[
    "iso-8859-1",
    "iso8859-1",
    "iso_8859-1",
    "iso88591",
    "latin1",
    "latin-1",
    "l1",
    "cp819",
    "ibm819",
    "iso-ir-100",
];

/// Codificación de origen del archivo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    Latin1,
    /// Cualquier otra etiqueta conocida por `encoding_rs` (windows-1252, utf-8, ...).
    Other(&'static Encoding),
}

impl SourceEncoding {
    pub fn from_label(label: &str) -> Option<Self> {
        let norm = label.trim().to_ascii_lowercase();
        if LATIN1_LABELS.contains(&norm.as_str()) {
            return Some(SourceEncoding::Latin1);
        }
        Encoding::for_label(norm.as_bytes()).map(SourceEncoding::Other)
    }

    pub fn name(&self) -> &'static str {
        match self {
            SourceEncoding::Latin1 => "ISO-8859-1",
            SourceEncoding::Other(enc) => enc.name(),
        }
    }
}

enum Decoding {
    Latin1,
    Decoder(Decoder),
}

/// Adaptador `Read` que convierte en streaming desde `SourceEncoding` a UTF-8.
/// Cada lectura decodifica a lo sumo un bloque de entrada; nunca carga el
/// archivo completo.
pub struct TranscodingReader<R> {
    inner: R,
    decoding: Decoding,
    in_buf: Box<[u8]>,
    in_pos: usize,
    in_len: usize,
    out_buf: Box<[u8]>,
    out_pos: usize,
    out_len: usize,
    eof: bool,
    done: bool,
}

impl<R: Read> TranscodingReader<R> {
    pub fn new(inner: R, encoding: SourceEncoding) -> Self {
        let decoding = match encoding {
            SourceEncoding::Latin1 => Decoding::Latin1,
            SourceEncoding::Other(enc) => Decoding::Decoder(enc.new_decoder_without_bom_handling()),
        };
        TranscodingReader {
            inner,
            decoding,
            in_buf: vec![0u8; IN_BUF].into_boxed_slice(),
            in_pos: 0,
            in_len: 0,
            out_buf: vec![0u8; OUT_BUF].into_boxed_slice(),
            out_pos: 0,
            out_len: 0,
            eof: false,
            done: false,
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn fill_input(&mut self) -> io::Result<()> {
        if self.in_pos < self.in_len || self.eof {
            return Ok(());
        }
        let n = self.inner.read(&mut self.in_buf)?;
        self.in_pos = 0;
        self.in_len = n;
        if n == 0 {
            self.eof = true;
        }
        Ok(())
    }

    fn decode_block(&mut self) {
        let src = &self.in_buf[self.in_pos..self.in_len];
        self.out_pos = 0;
        match &mut self.decoding {
            Decoding::Latin1 => {
                let (read, written) = encoding_rs::mem::convert_latin1_to_utf8_partial(src, &mut self.out_buf);
                self.in_pos += read;
                self.out_len = written;
                if self.eof && self.in_pos == self.in_len {
                    self.done = true;
                }
            }
            Decoding::Decoder(decoder) => {
                let (result, read, written, _) = decoder.decode_to_utf8(src, &mut self.out_buf, self.eof);
                self.in_pos += read;
                self.out_len = written;
                if self.eof && matches!(result, CoderResult::InputEmpty) {
                    self.done = true;
                }
            }
        }
    }
}

impl<R: Read> Read for TranscodingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            if self.out_pos < self.out_len {
                let n = (self.out_len - self.out_pos).min(buf.len());
                buf[..n].copy_from_slice(&self.out_buf[self.out_pos..self.out_pos + n]);
                self.out_pos += n;
                return Ok(n);
            }
            if self.done {
                return Ok(0);
            }
            self.fill_input()?;
            self.decode_block();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcode(bytes: &[u8], encoding: SourceEncoding) -> String {
        let mut out = String::new();
        TranscodingReader::new(bytes, encoding).read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn latin1_labels_resolve_to_strict_latin1() {
        assert_eq!(SourceEncoding::from_label("ISO-8859-1"), Some(SourceEncoding::Latin1));
        assert_eq!(SourceEncoding::from_label(" latin1 "), Some(SourceEncoding::Latin1));
        assert_eq!(SourceEncoding::from_label("klingon"), None);
        assert_eq!(SourceEncoding::from_label("windows-1252").map(|e| e.name()), Some("windows-1252"));
    }

    #[test]
    fn decodes_latin1_accents() {
        // "Cálculo,Diseño" en ISO-8859-1
        let bytes = b"C\xe1lculo,Dise\xf1o\n";
        assert_eq!(transcode(bytes, SourceEncoding::Latin1), "Cálculo,Diseño\n");
    }

    #[test]
    fn latin1_maps_c1_range_to_control_points() {
        // 0x80 es U+0080 en ISO-8859-1 (no el euro de windows-1252)
        assert_eq!(transcode(b"\x80", SourceEncoding::Latin1), "\u{80}");
        let cp1252 = SourceEncoding::from_label("windows-1252").unwrap();
        assert_eq!(transcode(b"\x80", cp1252), "€");
    }

    #[test]
    fn streams_inputs_larger_than_one_block() {
        let bytes: Vec<u8> = std::iter::repeat(0xe9u8).take(IN_BUF * 3 + 17).collect();
        let out = transcode(&bytes, SourceEncoding::Latin1);
        assert_eq!(out.chars().count(), IN_BUF * 3 + 17);
        assert!(out.chars().all(|c| c == 'é'));
    }

    #[test]
    fn small_caller_buffers_still_get_whole_output() {
        let mut reader = TranscodingReader::new(&b"\xe1\xe9\xed"[..], SourceEncoding::Latin1);
        let mut collected = Vec::new();
        let mut one = [0u8; 1];
        loop {
            let n = reader.read(&mut one).unwrap();
            if n == 0 {
                break;
            }
            collected.extend_from_slice(&one[..n]);
        }
        assert_eq!(String::from_utf8(collected).unwrap(), "áéí");
    }
}
