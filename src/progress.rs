use crate::importer::RowFailure;
use std::io::Write;

/// Observador del avance de la importación.
pub trait ProgressObserver {
    fn start(&mut self) {}
    /// Una fila más quedó importada.
    fn advance(&mut self);
    /// Una fila falló; la consola la muestra entre los avances.
    fn row_failed(&mut self, _failure: &RowFailure) {}
    fn finish(&mut self) {}
}

/// No muestra nada.
#[derive(Debug, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn advance(&mut self) {}
}

/// Cuenta las señales recibidas; útil en pruebas.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CountingProgress {
    pub started: bool,
    pub advanced: usize,
    /// Índices de las filas reportadas como fallidas.
    pub failed: Vec<usize>,
    pub finished: bool,
}

impl ProgressObserver for CountingProgress {
    fn start(&mut self) {
        self.started = true;
    }

    fn advance(&mut self) {
        self.advanced += 1;
    }

    fn row_failed(&mut self, failure: &RowFailure) {
        self.failed.push(failure.row);
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}

/// Barra de progreso de consola sin total conocido (el CSV se lee en streaming).
pub struct ConsoleProgress<W: Write> {
    out: W,
    count: usize,
    width: usize,
}

impl ConsoleProgress<std::io::Stdout> {
    pub fn stdout() -> Self {
        ConsoleProgress::new(std::io::stdout())
    }
}

impl<W: Write> ConsoleProgress<W> {
    pub fn new(out: W) -> Self {
        ConsoleProgress { out, count: 0, width: 28 }
    }

    fn render(&mut self) {
        let filled = self.count % (self.width + 1);
        let bar: String = "▓".repeat(filled) + &"░".repeat(self.width - filled);
        // errores de escritura en la consola no deben cortar la importación
        let _ = write!(self.out, "\r {:>6} [{}]", self.count, bar);
        let _ = self.out.flush();
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ProgressObserver for ConsoleProgress<W> {
    fn start(&mut self) {
        self.count = 0;
        self.render();
    }

    fn advance(&mut self) {
        self.count += 1;
        self.render();
    }

    fn row_failed(&mut self, failure: &RowFailure) {
        // limpia la línea de la barra, escribe el error y vuelve a dibujarla
        let blank = " ".repeat(self.width + 10);
        let _ = writeln!(self.out, "\r{blank}\r{failure}");
        self.render();
    }

    fn finish(&mut self) {
        let bar = "▓".repeat(self.width);
        let _ = writeln!(self.out, "\r {:>6} [{}]", self.count, bar);
        let _ = writeln!(self.out);
        let _ = self.out.flush();
    }
}
