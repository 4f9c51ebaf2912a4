// --- Comandos administrativos de asignaturas ---

use anyhow::{Context, Result};
use asignaturas::config::{Config, DEFAULT_FILE_NAME};
use asignaturas::db::{count_subjects, open_connection, open_in_memory, SubjectDb};
use asignaturas::progress::{ConsoleProgress, NoProgress, ProgressObserver};
use asignaturas::importer::prepare_import;
use asignaturas::{ImportError, ImportSummary};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "asignaturas", version, about = "Administración de asignaturas")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Importa subjects desde un archivo CSV
    #[command(name = "import:subjects")]
    ImportSubjects(ImportArgs),
}

#[derive(Args)]
struct ImportArgs {
    /// Nombre del archivo CSV
    #[arg(default_value = DEFAULT_FILE_NAME)]
    file: String,
    /// URL de la base (sqlite://, file://, postgres://); por defecto DATABASE_URL
    #[arg(long)]
    database_url: Option<String>,
    /// Raíz del almacenamiento gestionado (se busca en <dir>/csv/)
    #[arg(long)]
    storage_path: Option<PathBuf>,
    /// Raíz de datos (se busca en <dir>/data/)
    #[arg(long)]
    data_path: Option<PathBuf>,
    /// Codificación del archivo de origen
    #[arg(long)]
    encoding: Option<String>,
    /// Imprime el resumen como JSON
    #[arg(long)]
    json: bool,
    /// Importa contra una base en memoria, sin tocar DATABASE_URL
    #[arg(long)]
    dry_run: bool,
}

impl ImportArgs {
    fn config(&self) -> Config {
        let mut config = Config::from_env();
        if let Some(url) = &self.database_url {
            config.database_url = url.clone();
        }
        if let Some(p) = &self.storage_path {
            config.storage_path = p.clone();
        }
        if let Some(p) = &self.data_path {
            config.data_path = p.clone();
        }
        if let Some(e) = &self.encoding {
            config.encoding = e.clone();
        }
        config
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::ImportSubjects(args) => import_subjects(args),
    };
    match result {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn import_subjects(args: ImportArgs) -> Result<ExitCode> {
    let config = args.config();
    info!(file = %args.file, dry_run = args.dry_run, "import:subjects");

    // primero el archivo: si no está, no se abre ni se crea la base
    let prepared = match prepare_import(&config, &args.file) {
        Ok(prepared) => prepared,
        Err(e @ ImportError::FileNotFound { .. }) => {
            error!("{e}");
            println!("{e}");
            return Ok(ExitCode::from(1));
        }
        Err(e) => return Err(e).context("no se pudo abrir el CSV"),
    };

    let mut db: SubjectDb = if args.dry_run {
        open_in_memory().context("no se pudo abrir la base en memoria")?
    } else {
        open_connection(&config.database_url)
            .with_context(|| format!("no se pudo abrir la base {}", config.database_url))?
    };

    let mut progress: Box<dyn ProgressObserver> = if args.json {
        Box::new(NoProgress)
    } else {
        Box::new(ConsoleProgress::stdout())
    };

    let summary = prepared
        .run(&mut db, progress.as_mut())
        .context("la importación no pudo completarse")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
        log_total(&mut db);
    }
    Ok(ExitCode::SUCCESS)
}

/// Total en la base tras importar; sólo informativo, nunca cambia el código de salida.
fn log_total(db: &mut SubjectDb) -> Option<i64> {
    match count_subjects(db) {
        Ok(total) => {
            info!(total, "asignaturas en la base");
            Some(total)
        }
        Err(e) => {
            warn!("no se pudo contar asignaturas: {e}");
            None
        }
    }
}

fn print_summary(summary: &ImportSummary) {
    println!("Importación completada:");
    println!("- Asignaturas importadas: {}", summary.imported);
    if summary.errors > 0 {
        println!("⚠️ - Errores encontrados: {}", summary.errors);
    }
}
