//! The host runtime: units, loading, and the engine hand-off.
//!
//! A unit is found in memory first, then as `NAME.nsp` on the search path.
//! Loading reads every form, then feeds them one by one through
//! [`Engine::process_form`] and evaluates what comes back. Whatever the
//! outcome, the unit's leftover namespaces are unwound when it ends.

use std::fs;
use std::path::PathBuf;

use rustc_hash::{FxHashMap, FxHashSet};

use nsp_engine::{Context, Directive, Engine, GlobalRegistry, LoadStatus, Module, NamespaceError, Processed, UnitLoader};
use nsp_ir::{Form, Name, SharedInterner, UnitId};

use crate::error::HostError;
use crate::eval::Interpreter;
use crate::reader::read_all;
use crate::value::Value;

/// Where a unit's source comes from.
enum UnitSource {
    Memory(String),
    File(PathBuf),
}

/// The result of loading one unit.
#[derive(Debug)]
pub struct LoadReport {
    pub unit: UnitId,
    /// Every top-level form as it reached the evaluator (directives as written).
    pub forms: Vec<Form>,
}

pub struct Runtime {
    interp: Interpreter,
    sources: FxHashMap<Name, String>,
    search_path: Vec<PathBuf>,
    loaded: FxHashSet<Name>,
    features: Vec<Name>,
    finished: Vec<Context>,
    next_unit: u32,
}

impl Runtime {
    pub fn new(interner: SharedInterner) -> Self {
        Runtime {
            interp: Interpreter::new(interner),
            sources: FxHashMap::default(),
            search_path: Vec::new(),
            loaded: FxHashSet::default(),
            features: Vec::new(),
            finished: Vec::new(),
            next_unit: 0,
        }
    }

    pub fn interner(&self) -> &SharedInterner {
        self.interp.interner()
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interp
    }

    pub fn interpreter_mut(&mut self) -> &mut Interpreter {
        &mut self.interp
    }

    /// Register an in-memory unit.
    pub fn add_unit(&mut self, name: &str, source: impl Into<String>) {
        let name = self.interner().intern(name);
        self.sources.insert(name, source.into());
    }

    /// Append a directory searched for `NAME.nsp`.
    pub fn add_search_dir(&mut self, dir: impl Into<PathBuf>) {
        self.search_path.push(dir.into());
    }

    /// Features recorded by `provide`, in order.
    pub fn features(&self) -> &[Name] {
        &self.features
    }

    /// Namespaces finished since the last call, in closing order.
    pub fn take_finished(&mut self) -> Vec<Context> {
        std::mem::take(&mut self.finished)
    }

    /// The value cell of `name`.
    pub fn value(&self, name: &str) -> Option<&Value> {
        let name = self.interner().get(name)?;
        self.interp.registry().value(name)
    }

    /// True if `name` has a value or function binding.
    pub fn is_defined(&self, name: &str) -> bool {
        self.interner()
            .get(name)
            .is_some_and(|name| self.interp.registry().is_bound(name))
    }

    /// Call a global function by name.
    pub fn call(&mut self, name: &str, args: Vec<Value>) -> Result<Value, HostError> {
        let symbol = self.interner().intern(name);
        self.interp
            .call(symbol, args)
            .map_err(|error| HostError::Eval {
                unit: "<call>".to_owned(),
                error,
            })
    }

    fn find_unit(&self, name: Name) -> Option<UnitSource> {
        if let Some(source) = self.sources.get(&name) {
            return Some(UnitSource::Memory(source.clone()));
        }
        let file = format!("{}.nsp", self.interner().lookup(name));
        self.search_path
            .iter()
            .map(|dir| dir.join(&file))
            .find(|path| path.is_file())
            .map(UnitSource::File)
    }

    /// Load unit `name` unless it already has been.
    pub fn load_unit(&mut self, engine: &mut Engine, name: Name) -> Result<LoadStatus, HostError> {
        if self.loaded.contains(&name) {
            return Ok(LoadStatus::AlreadyLoaded);
        }
        let source = match self.find_unit(name) {
            None => return Ok(LoadStatus::NotFound),
            Some(UnitSource::Memory(source)) => source,
            Some(UnitSource::File(path)) => fs::read_to_string(&path).map_err(|err| HostError::Unreadable {
                path,
                message: err.to_string(),
            })?,
        };

        self.loaded.insert(name);
        let label = self.interner().lookup(name);
        match self.load_source(engine, label, &source) {
            Ok(_) => Ok(LoadStatus::Loaded),
            Err(error) => {
                self.loaded.remove(&name);
                Err(error)
            }
        }
    }

    /// Load `source` as a fresh unit labelled `label`.
    pub fn load_source(
        &mut self,
        engine: &mut Engine,
        label: &str,
        source: &str,
    ) -> Result<LoadReport, HostError> {
        let unit = UnitId::new(self.next_unit);
        self.next_unit += 1;
        let _span = tracing::debug_span!("unit", name = label, %unit).entered();

        let forms = read_all(source, self.interner()).map_err(|error| HostError::Read {
            unit: label.to_owned(),
            error,
        })?;
        let result = self.run_forms(engine, unit, label, forms);

        let leftover = engine.unwind_unit(unit);
        self.finished.extend(leftover);
        result.map(|forms| LoadReport { unit, forms })
    }

    fn run_forms(
        &mut self,
        engine: &mut Engine,
        unit: UnitId,
        label: &str,
        forms: Vec<Form>,
    ) -> Result<Vec<Form>, HostError> {
        let mut processed_forms = Vec::with_capacity(forms.len());
        for mut form in forms {
            match engine.process_form(self, unit, &mut form)? {
                Processed::Evaluate => {
                    self.interp.eval(&form).map_err(|error| HostError::Eval {
                        unit: label.to_owned(),
                        error,
                    })?;
                }
                Processed::Directive { directive, closed } => {
                    if let Directive::Close(feature) = directive {
                        if !self.features.contains(&feature) {
                            self.features.push(feature);
                        }
                    }
                    self.finished.extend(closed);
                }
            }
            processed_forms.push(form);
        }
        tracing::debug!(unit = label, forms = processed_forms.len(), "unit loaded");
        Ok(processed_forms)
    }

    /// All global names, sorted by text, with their printed bindings.
    pub fn bindings(&self) -> Vec<(String, String)> {
        let interner = self.interner();
        let registry = self.interp.registry();
        let mut out: Vec<(String, String)> = registry
            .names()
            .into_iter()
            .flat_map(|name| {
                let text = interner.lookup(name);
                let value = registry
                    .value(name)
                    .map(|value| (text.to_owned(), value.display(interner).to_string()));
                let function = registry.function(name).map(|function| {
                    let shown = Value::Function(function.clone()).display(interner).to_string();
                    (text.to_owned(), shown)
                });
                value.into_iter().chain(function)
            })
            .collect();
        out.sort();
        out
    }
}

impl GlobalRegistry for Runtime {
    fn is_bound(&self, name: Name) -> bool {
        self.interp.registry().is_bound(name)
    }

    fn module(&self, name: Name) -> Option<&Module> {
        self.interp.registry().module(name)
    }

    fn bind_module(&mut self, name: Name, module: Module) {
        self.interp.registry_mut().set_value(name, Value::Module(module));
    }

    fn bound_names(&self) -> Vec<Name> {
        self.interp.registry().names()
    }
}

impl UnitLoader for Runtime {
    fn require(&mut self, engine: &mut Engine, unit: Name) -> Result<LoadStatus, NamespaceError> {
        self.load_unit(engine, unit)
            .map_err(|error| error.into_namespace_error(self.interner().lookup(unit)))
    }
}
