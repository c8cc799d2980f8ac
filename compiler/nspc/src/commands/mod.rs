//! CLI commands.
//!
//! Each command has an inner function that writes to any `Write` and
//! returns the first failure, plus a thin wrapper that prints to stdout
//! and renders failures as diagnostics.

mod explain;
mod expand;
mod run;

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use nsp_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
use nsp_engine::{Engine, EngineConfig};
use nsp_host::{HostError, LoadReport, Runtime};
use nsp_ir::SharedInterner;

pub use explain::explain_error;
pub use expand::expand_file;
pub use run::run_file;

/// Parsed arguments shared by `expand` and `run`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Options {
    pub file: PathBuf,
    pub include_dirs: Vec<PathBuf>,
    pub report: bool,
    pub color: ColorMode,
    pub separator: Option<String>,
    pub definers: Vec<String>,
    pub quoted_definers: Vec<String>,
}

impl Options {
    pub fn parse(args: &[String]) -> Result<Options, String> {
        let mut options = Options::default();
        let mut file = None;
        let mut i = 0;
        while i < args.len() {
            let arg = args[i].as_str();
            if arg == "-I" {
                let Some(dir) = args.get(i + 1) else {
                    return Err("`-I` needs a directory".to_owned());
                };
                options.include_dirs.push(PathBuf::from(dir));
                i += 2;
                continue;
            }
            if let Some(dir) = arg.strip_prefix("-I") {
                options.include_dirs.push(PathBuf::from(dir));
            } else if arg == "--report" {
                options.report = true;
            } else if let Some(separator) = arg.strip_prefix("--separator=") {
                if separator.is_empty() {
                    return Err("`--separator` needs a non-empty value".to_owned());
                }
                options.separator = Some(separator.to_owned());
            } else if let Some(head) = arg.strip_prefix("--definer=") {
                options.definers.push(head.to_owned());
            } else if let Some(head) = arg.strip_prefix("--quoted-definer=") {
                options.quoted_definers.push(head.to_owned());
            } else if let Some(mode) = arg.strip_prefix("--color=") {
                options.color = ColorMode::parse(mode)
                    .ok_or_else(|| format!("unknown color mode `{mode}`"))?;
            } else if arg.starts_with('-') {
                return Err(format!("unknown option `{arg}`"));
            } else if file.is_none() {
                file = Some(PathBuf::from(arg));
            } else {
                return Err(format!("unexpected argument `{arg}`"));
            }
            i += 1;
        }
        options.file = file.ok_or_else(|| "missing file path".to_owned())?;
        Ok(options)
    }

    /// Engine configuration with the command-line overrides applied.
    pub fn engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig::default();
        if let Some(separator) = &self.separator {
            config = config.with_separator(separator.as_str());
        }
        for head in &self.definers {
            config = config.with_direct_definer(head.as_str());
        }
        for head in &self.quoted_definers {
            config = config.with_quoted_definer(head.as_str());
        }
        config
    }
}

/// A loaded main unit with the state it left behind.
pub(crate) struct Session {
    pub runtime: Runtime,
    pub engine: Engine,
    pub report: LoadReport,
}

/// Load `options.file` as the main unit.
///
/// The file's own directory is searched first, then each `-I` directory.
pub(crate) fn load(options: &Options) -> Result<Session, HostError> {
    let source = fs::read_to_string(&options.file).map_err(|err| HostError::Unreadable {
        path: options.file.clone(),
        message: err.to_string(),
    })?;

    let interner = SharedInterner::default();
    let mut engine = Engine::new(interner.clone(), options.engine_config());
    let mut runtime = Runtime::new(interner);
    if let Some(dir) = options.file.parent() {
        let dir = if dir.as_os_str().is_empty() {
            Path::new(".")
        } else {
            dir
        };
        runtime.add_search_dir(dir);
    }
    for dir in &options.include_dirs {
        runtime.add_search_dir(dir.clone());
    }

    let label = unit_label(&options.file);
    let report = runtime.load_source(&mut engine, &label, &source)?;
    Ok(Session {
        runtime,
        engine,
        report,
    })
}

fn unit_label(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| path.display().to_string(), |stem| stem.to_string_lossy().into_owned())
}

/// Run `command` against stdout; render its failure on stderr.
pub(crate) fn report_outcome<F>(options: &Options, command: F) -> bool
where
    F: FnOnce(&Options, &mut dyn Write) -> Result<(), HostError>,
{
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = command(options, &mut out);
    let _ = out.flush();
    match result {
        Ok(()) => true,
        Err(error) => {
            tracing::debug!(code = %error.code(), "command failed");
            let is_tty = io::stderr().is_terminal();
            let mut emitter = TerminalEmitter::stderr(options.color, is_tty);
            emitter.emit(&error.to_diagnostic());
            emitter.flush();
            false
        }
    }
}
