//! Shared setup for scenario tests.

use nsp_engine::{Engine, EngineConfig};
use nsp_host::{HostError, LoadReport, Runtime, Value};
use nsp_ir::SharedInterner;

pub struct Session {
    pub runtime: Runtime,
    pub engine: Engine,
}

impl Session {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let interner = SharedInterner::default();
        Session {
            engine: Engine::new(interner.clone(), config),
            runtime: Runtime::new(interner),
        }
    }

    pub fn unit(&mut self, name: &str, source: &str) -> &mut Self {
        self.runtime.add_unit(name, source);
        self
    }

    pub fn load(&mut self, source: &str) -> Result<LoadReport, HostError> {
        self.runtime.load_source(&mut self.engine, "main", source)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        match self.runtime.value(name) {
            Some(Value::Int(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn call_int(&mut self, name: &str) -> i64 {
        match self.runtime.call(name, Vec::new()) {
            Ok(Value::Int(value)) => value,
            other => panic!("`{name}` returned {other:?}"),
        }
    }

    pub fn defined(&self, name: &str) -> bool {
        self.runtime.is_defined(name)
    }

    /// Printed forms of a load, as they reached the evaluator.
    pub fn printed(&self, report: &LoadReport) -> Vec<String> {
        report
            .forms
            .iter()
            .map(|form| form.display(self.runtime.interner()).to_string())
            .collect()
    }
}

/// A namespaced library exporting `zzzq`.
pub const TESTM2: &str = "
(namespace testm2 :export (zzzq))
(defun zzzq () 100)
(provide 'testm2)
";

/// A plain unit whose names share the `testimplicit-` prefix.
pub const TESTIMPLICIT: &str = "
(defun testimplicit-implicit () 1000)
";

pub const TESTIMPLICIT2: &str = "
(defun ti2-implicit2 () 5)
";

/// The module under test, minus its closing `provide`.
pub const TESTMODULE_HEAD: &str = "
(namespace testmodule :export (somefunction somevariable))
(import testm2 :symbols (zzzq))
(import testimplicit)
(defvar private 22)
(defvar somevariable (+ 1 private))
(defun private-function (arg) arg)
";

pub fn standard_session() -> Session {
    let mut session = Session::new();
    session
        .unit("testm2", TESTM2)
        .unit("testimplicit", TESTIMPLICIT)
        .unit("testimplicit2", TESTIMPLICIT2);
    session
}
