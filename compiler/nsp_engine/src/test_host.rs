//! In-memory host used by the engine's unit tests.

use rustc_hash::{FxHashMap, FxHashSet};

use nsp_ir::{Form, Name, SharedInterner, StringInterner, UnitId};

use crate::{
    Engine, EngineConfig, GlobalRegistry, ImportOptions, LoadStatus, Module, NamespaceError,
    Processed, UnitLoader,
};

/// Parse one s-expression. Supports symbols, integers, `'x`, lists and
/// `(a . b)`. Panics on malformed input.
pub(crate) fn read(interner: &StringInterner, source: &str) -> Form {
    let tokens: Vec<String> = source
        .replace('(', " ( ")
        .replace(')', " ) ")
        .replace('\'', " ' ")
        .split_whitespace()
        .map(str::to_owned)
        .collect();
    let mut pos = 0;
    let form = read_form(interner, &tokens, &mut pos);
    assert_eq!(pos, tokens.len(), "trailing input in {source:?}");
    form
}

fn read_form(interner: &StringInterner, tokens: &[String], pos: &mut usize) -> Form {
    let token = tokens[*pos].as_str();
    *pos += 1;
    match token {
        "'" => Form::wrap(interner.intern("quote"), read_form(interner, tokens, pos)),
        "(" => {
            let mut items = Vec::new();
            loop {
                match tokens[*pos].as_str() {
                    ")" => {
                        *pos += 1;
                        return Form::List(items);
                    }
                    "." => {
                        *pos += 1;
                        let tail = read_form(interner, tokens, pos);
                        assert_eq!(tokens[*pos], ")");
                        *pos += 1;
                        return Form::Dotted(items, Box::new(tail));
                    }
                    _ => items.push(read_form(interner, tokens, pos)),
                }
            }
        }
        _ => match token.parse::<i64>() {
            Ok(value) => Form::Int(value),
            Err(_) => Form::Symbol(interner.intern(token)),
        },
    }
}

/// Registry plus in-memory units. Evaluating a definition binds its name.
pub(crate) struct TestHost {
    pub interner: SharedInterner,
    pub bound: FxHashSet<Name>,
    pub modules: FxHashMap<Name, Module>,
    pub units: FxHashMap<Name, Vec<String>>,
    pub loaded: FxHashSet<Name>,
    /// Every form the host evaluated, after rewriting.
    pub evaluated: Vec<Form>,
    next_unit: u32,
}

impl TestHost {
    pub fn new() -> (Self, Engine) {
        let interner = SharedInterner::default();
        let engine = Engine::new(interner.clone(), EngineConfig::default());
        let host = TestHost {
            interner,
            bound: FxHashSet::default(),
            modules: FxHashMap::default(),
            units: FxHashMap::default(),
            loaded: FxHashSet::default(),
            evaluated: Vec::new(),
            next_unit: 0,
        };
        (host, engine)
    }

    pub fn name(&self, text: &str) -> Name {
        self.interner.intern(text)
    }

    pub fn text(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    pub fn form(&self, source: &str) -> Form {
        read(&self.interner, source)
    }

    /// Bind global names directly, as if some earlier code defined them.
    pub fn define(&mut self, names: &[&str]) {
        for name in names {
            let name = self.interner.intern(name);
            self.bound.insert(name);
        }
    }

    pub fn add_unit(&mut self, name: &str, forms: &[&str]) {
        let name = self.interner.intern(name);
        self.units
            .insert(name, forms.iter().map(|f| (*f).to_owned()).collect());
    }

    pub fn fresh_unit(&mut self) -> UnitId {
        let unit = UnitId::new(self.next_unit);
        self.next_unit += 1;
        unit
    }

    /// Run `forms` as one unit, unwinding whatever it leaves open.
    pub fn load(
        &mut self,
        engine: &mut Engine,
        unit: UnitId,
        forms: &[String],
    ) -> Result<(), NamespaceError> {
        let result = self.load_forms(engine, unit, forms);
        engine.unwind_unit(unit);
        result
    }

    fn load_forms(
        &mut self,
        engine: &mut Engine,
        unit: UnitId,
        forms: &[String],
    ) -> Result<(), NamespaceError> {
        for source in forms {
            let mut form = self.form(source);
            if let Processed::Evaluate = engine.process_form(self, unit, &mut form)? {
                self.evaluate(&form);
            }
        }
        Ok(())
    }

    pub fn open(
        &mut self,
        engine: &mut Engine,
        unit: UnitId,
        name: &str,
        exports: &[&str],
    ) -> Result<(), NamespaceError> {
        let name = self.name(name);
        let exports: Vec<Name> = exports.iter().map(|e| self.name(e)).collect();
        engine.open_namespace(self, unit, name, &exports)
    }

    pub fn import(
        &mut self,
        engine: &mut Engine,
        source: &str,
        options: ImportOptions,
    ) -> Result<usize, NamespaceError> {
        let source = self.name(source);
        engine.import_from(self, source, options)
    }

    /// Run inline source as a fresh unit.
    pub fn run(&mut self, engine: &mut Engine, forms: &[&str]) -> Result<UnitId, NamespaceError> {
        let unit = self.fresh_unit();
        let forms: Vec<String> = forms.iter().map(|f| (*f).to_owned()).collect();
        self.load(engine, unit, &forms)?;
        Ok(unit)
    }

    fn evaluate(&mut self, form: &Form) {
        if let Some([head, Form::Symbol(name), ..]) = form.as_list() {
            if head.as_symbol().is_some_and(|h| {
                matches!(self.text(h), "defun" | "defvar" | "defconst" | "defmacro")
            }) {
                self.bound.insert(*name);
            }
        }
        self.evaluated.push(form.clone());
    }

    /// Text of the last evaluated form.
    pub fn last(&self) -> String {
        self.evaluated
            .last()
            .map(|form| form.display(&self.interner).to_string())
            .unwrap_or_default()
    }
}

impl GlobalRegistry for TestHost {
    fn is_bound(&self, name: Name) -> bool {
        self.bound.contains(&name) || self.modules.contains_key(&name)
    }

    fn module(&self, name: Name) -> Option<&Module> {
        self.modules.get(&name)
    }

    fn bind_module(&mut self, name: Name, module: Module) {
        self.modules.insert(name, module);
    }

    fn bound_names(&self) -> Vec<Name> {
        self.bound
            .iter()
            .chain(self.modules.keys())
            .copied()
            .collect()
    }
}

impl UnitLoader for TestHost {
    fn require(&mut self, engine: &mut Engine, unit: Name) -> Result<LoadStatus, NamespaceError> {
        if self.loaded.contains(&unit) {
            return Ok(LoadStatus::AlreadyLoaded);
        }
        let Some(forms) = self.units.get(&unit).cloned() else {
            return Ok(LoadStatus::NotFound);
        };
        self.loaded.insert(unit);
        let id = self.fresh_unit();
        self.load(engine, id, &forms)?;
        Ok(LoadStatus::Loaded)
    }
}
