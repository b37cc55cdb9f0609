//! Args: the check / opt family over a borrowed VM state
//!
//! Every `check_*` validates one slot and converts it, or returns the bad
//! argument error built by the reporter. Every `opt_*` returns its default
//! when the slot is absent or `nil`, without validating the default, and
//! otherwise behaves like the matching `check_*`.
//!
//! Both paths leave the error context reset.

mod field;
mod number;
mod value;

use argcheck_sdk::{CheckError, CheckResult, LuaState, LuaType};

use crate::errctx;
use crate::report::{ContextReporter, Reporter};

pub use field::Key;

/// Argument validator for one native call.
pub struct Args<'l, S: LuaState + ?Sized, R: Reporter = ContextReporter> {
    state: &'l mut S,
    reporter: R,
}

impl<'l, S: LuaState + ?Sized> Args<'l, S> {
    /// Validator using the error context aware reporter
    pub fn new(state: &'l mut S) -> Self {
        Self::with_reporter(state, ContextReporter::default())
    }
}

impl<'l, S: LuaState + ?Sized, R: Reporter> Args<'l, S, R> {
    /// Validator using `reporter` for failures
    pub fn with_reporter(state: &'l mut S, reporter: R) -> Self {
        Self { state, reporter }
    }

    /// The underlying state
    pub fn state(&self) -> &S {
        &*self.state
    }

    /// The underlying state, mutably
    pub fn state_mut(&mut self) -> &mut S {
        &mut *self.state
    }

    /// The reporter in use
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Number of arguments on the stack
    pub fn top(&self) -> i32 {
        self.state.top()
    }

    /// Whether a slot is absent or `nil`
    pub fn is_none_or_nil(&self, idx: i32) -> bool {
        self.state.is_none_or_nil(idx)
    }

    // ========================================================================
    // Errors
    // ========================================================================

    /// Bad argument error for slot `idx` (relative indices are resolved)
    pub fn arg_error(&self, idx: i32, extra: impl Into<String>) -> CheckError {
        let position = self.state.abs_index(idx);
        self.reporter.bad_argument(&*self.state, position, extra.into())
    }

    /// `Ok` when `cond` holds, otherwise a bad argument error for `idx`
    pub fn arg_check(&self, cond: bool, idx: i32, extra: impl FnOnce() -> String) -> CheckResult<()> {
        if cond {
            errctx::reset();
            Ok(())
        } else {
            Err(self.arg_error(idx, extra()))
        }
    }

    /// `"<expected> expected, got <actual>"` where `actual` prefers the
    /// value's `__name` metafield and says `light userdata` for pointers.
    pub fn type_error(&self, idx: i32, expected: &str) -> CheckError {
        let actual = match self.state.metafield_string(idx, "__name") {
            Some(name) => name,
            None => match self.state.type_of(idx) {
                LuaType::LightUserData => "light userdata".to_string(),
                t => t.name().to_string(),
            },
        };
        self.arg_error(idx, format!("{expected} expected, got {actual}"))
    }

    /// Slot `idx` has type `t`
    pub fn check_type(&self, idx: i32, t: LuaType) -> CheckResult<()> {
        if self.state.type_of(idx) == t {
            errctx::reset();
            Ok(())
        } else {
            Err(self.type_error(idx, t.name()))
        }
    }

    // ========================================================================
    // Shared plumbing
    // ========================================================================

    /// Accept `value`, or report `"<expected> expected, got ..."` telling a
    /// wrong type apart from an out of range number.
    fn accept<T>(&self, idx: i32, value: Option<T>, expected: impl FnOnce() -> String) -> CheckResult<T> {
        match value {
            Some(v) => {
                errctx::reset();
                Ok(v)
            }
            None => {
                let got = match self.state.type_of(idx) {
                    LuaType::Number => "an out of range value",
                    t => t.name(),
                };
                Err(self.arg_error(idx, format!("{} expected, got {got}", expected())))
            }
        }
    }

    /// `def` for an absent or `nil` slot, otherwise `check`
    fn opt_with<T>(&self, idx: i32, def: T, check: impl FnOnce() -> CheckResult<T>) -> CheckResult<T> {
        if self.state.is_none_or_nil(idx) {
            errctx::reset();
            Ok(def)
        } else {
            check()
        }
    }
}
