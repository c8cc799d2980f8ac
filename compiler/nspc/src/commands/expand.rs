//! The `expand` command: print each top-level form after rewriting.

use std::io::Write;

use nsp_engine::Context;
use nsp_host::HostError;
use nsp_ir::StringInterner;

use super::{load, report_outcome, Options};

pub fn expand_file(options: &Options) -> bool {
    report_outcome(options, expand)
}

/// Load the unit and write its forms, one per line.
///
/// With `--report`, each finished namespace's table follows as comments.
pub fn expand(options: &Options, out: &mut dyn Write) -> Result<(), HostError> {
    let mut session = load(options)?;
    let interner = session.runtime.interner().clone();

    for form in &session.report.forms {
        let _ = writeln!(out, "{}", form.display(&interner));
    }
    if options.report {
        for context in session.runtime.take_finished() {
            write_table(out, &context, &interner);
        }
    }
    tracing::debug!(forms = session.report.forms.len(), depth = session.engine.depth(), "expanded");
    Ok(())
}

fn write_table(out: &mut dyn Write, context: &Context, interner: &StringInterner) {
    let _ = writeln!(
        out,
        ";; namespace {} ({})",
        interner.lookup(context.name()),
        context.unit()
    );
    let mut entries: Vec<_> = context.table().iter().collect();
    entries.sort_by_key(|(short, _)| interner.lookup(*short));
    for (short, entry) in entries {
        let _ = writeln!(
            out,
            ";;   {} -> {} [{}]",
            interner.lookup(short),
            interner.lookup(entry.full_name),
            entry.status
        );
    }

    let unused = context.table().unused_wildcards();
    if !unused.is_empty() {
        let names: Vec<&str> = unused.iter().map(|n| interner.lookup(*n)).collect();
        let _ = writeln!(out, ";;   unused wildcard imports: {}", names.join(" "));
    }
    let ambiguous = context.table().ambiguous();
    if !ambiguous.is_empty() {
        let names: Vec<&str> = ambiguous.iter().map(|n| interner.lookup(*n)).collect();
        let _ = writeln!(out, ";;   ambiguous: {}", names.join(" "));
    }
}
