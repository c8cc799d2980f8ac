//! The `run` command: load a unit and list the bindings it produced.

use std::io::Write;

use nsp_host::HostError;

use super::{load, report_outcome, Options};

pub fn run_file(options: &Options) -> bool {
    report_outcome(options, run)
}

/// Load the unit, then write every global binding as `name = value`.
pub fn run(options: &Options, out: &mut dyn Write) -> Result<(), HostError> {
    let session = load(options)?;
    for (name, value) in session.runtime.bindings() {
        let _ = writeln!(out, "{name} = {value}");
    }
    Ok(())
}
