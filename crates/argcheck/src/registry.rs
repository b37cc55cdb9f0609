//! Library: the Lua-facing module tables
//!
//! Each [`Library`] maps function names to entry points, the way the VM sees
//! `require "argcheck.check"` and friends. Dispatch is by name; the reporter
//! is fixed when the library is built.

use std::collections::HashMap;

use argcheck_sdk::{CheckResult, LuaState};
use tracing::trace;

use crate::args::Args;
use crate::entry::{self, Returned};
use crate::kind::Kind;
use crate::report::{AnyReporter, ReporterConfig};

/// One registered function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    /// `check.<kind>`
    Check(Kind),
    /// `check.none`
    CheckNone,
    /// `check.flags`
    Flags,
    /// `checkopt.<kind>`
    CheckOpt(Kind),
    /// `is.<kind>`
    Is(Kind),
    /// `tostring`
    ToString,
}

impl Entry {
    /// Run against the arguments on `args`' stack
    pub fn invoke<S: LuaState + ?Sized>(
        self,
        args: &mut Args<'_, S, AnyReporter>,
    ) -> CheckResult<Returned> {
        match self {
            Entry::Check(kind) => entry::check(args, kind),
            Entry::CheckNone => entry::check_none(args),
            Entry::Flags => entry::flags(args),
            Entry::CheckOpt(kind) => entry::check_opt(args, kind),
            Entry::Is(kind) => entry::is(args, kind),
            Entry::ToString => entry::tostring(args),
        }
    }
}

/// A named module table
#[derive(Debug, Clone)]
pub struct Library {
    name: &'static str,
    entries: HashMap<&'static str, Entry>,
    reporter: AnyReporter,
}

/// Positive-integer widths only exist as predicates
fn is_only(kind: Kind) -> bool {
    matches!(kind, Kind::Pint8 | Kind::Pint16 | Kind::Pint32 | Kind::Pint64)
}

impl Library {
    /// Empty library
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: HashMap::new(),
            reporter: AnyReporter::default(),
        }
    }

    /// `check`: raising checks, plus `none` and `flags`
    pub fn check() -> Self {
        let mut lib = Self::new("check");
        for &kind in Kind::ALL.iter().filter(|k| !is_only(**k)) {
            let entry = match kind {
                Kind::None => Entry::CheckNone,
                kind => Entry::Check(kind),
            };
            lib.register(kind.name(), entry);
        }
        lib.register("flags", Entry::Flags);
        lib
    }

    /// `checkopt`: optional checks with a default
    pub fn check_opt() -> Self {
        let mut lib = Self::new("checkopt");
        for &kind in Kind::ALL {
            if kind != Kind::None && !is_only(kind) {
                lib.register(kind.name(), Entry::CheckOpt(kind));
            }
        }
        lib
    }

    /// `is`: predicates answering a boolean
    pub fn is() -> Self {
        let mut lib = Self::new("is");
        for &kind in Kind::ALL {
            lib.register(kind.name(), Entry::Is(kind));
        }
        lib
    }

    /// `tostring`
    pub fn tostring() -> Self {
        let mut lib = Self::new("tostring");
        lib.register("tostring", Entry::ToString);
        lib
    }

    /// Report failures through `reporter`
    pub fn with_reporter(mut self, reporter: AnyReporter) -> Self {
        self.reporter = reporter;
        self
    }

    /// Report failures through the reporter `config` describes
    pub fn with_config(self, config: &ReporterConfig) -> Self {
        self.with_reporter(config.build())
    }

    /// Add or replace a function
    pub fn register(&mut self, name: &'static str, entry: Entry) {
        self.entries.insert(name, entry);
    }

    /// Module name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The reporter used by [`Self::call`]
    pub fn reporter(&self) -> &AnyReporter {
        &self.reporter
    }

    /// Entry registered under `name`
    pub fn get(&self, name: &str) -> Option<Entry> {
        self.entries.get(name).copied()
    }

    /// Whether `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of functions
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the library has no functions
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Function names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Call `name` with the arguments on `state`'s stack.
    ///
    /// `None` when no such function is registered.
    pub fn call<S: LuaState + ?Sized>(
        &self,
        state: &mut S,
        name: &str,
    ) -> Option<CheckResult<Returned>> {
        let entry = self.get(name)?;
        trace!(library = self.name, function = name, "call");
        let mut args = Args::with_reporter(state, self.reporter.clone());
        Some(entry.invoke(&mut args))
    }
}
