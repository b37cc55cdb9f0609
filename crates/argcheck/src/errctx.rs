//! Error context: how the next bad argument error names its argument
//!
//! A native entry point may prime the context right before delegating to a
//! shared check, e.g. to report `bad argument 'opts'` instead of `#2`, or
//! to blame a function further up the call stack. The next reporter call
//! takes the context and every successful check resets it, so an override
//! never leaks into an unrelated error.
//!
//! The context is thread-local: one VM instance never runs on two threads at
//! once, and separate instances on separate threads must not see each other's
//! overrides.

use std::cell::RefCell;
use std::marker::PhantomData;

use tracing::trace;

/// Override for the next bad argument error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgErrorContext {
    /// Displayed as `'name'`; wins over `index`
    pub name: Option<String>,
    /// Displayed as `#index` when non-zero
    pub index: u32,
    /// Call stack level whose function is blamed; 1 is the caller
    pub stack_level: usize,
}

impl ArgErrorContext {
    /// No overrides, blame the immediate caller
    pub const fn new() -> Self {
        Self {
            name: None,
            index: 0,
            stack_level: 1,
        }
    }

    /// Report the argument as `'name'`
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new()
        }
    }

    /// Report the argument as `#index`
    pub fn indexed(index: u32) -> Self {
        Self {
            index,
            ..Self::new()
        }
    }

    /// Blame the function `level` frames up
    pub fn at_level(mut self, level: usize) -> Self {
        self.stack_level = level;
        self
    }

    /// Whether this is the reset state
    pub fn is_default(&self) -> bool {
        *self == Self::new()
    }

    /// Displayed argument name for an error at `position`
    pub fn display_name(&self, position: i32) -> String {
        match (&self.name, self.index) {
            (Some(name), _) => format!("'{name}'"),
            (None, index) if index > 0 => format!("#{index}"),
            _ => format!("#{position}"),
        }
    }
}

impl Default for ArgErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

thread_local! {
    static CONTEXT: RefCell<ArgErrorContext> = const { RefCell::new(ArgErrorContext::new()) };
}

/// Install `ctx`; the returned guard resets the context when dropped.
#[must_use = "the context is reset as soon as the guard is dropped"]
pub fn set(ctx: ArgErrorContext) -> ContextGuard {
    trace!(name = ?ctx.name, index = ctx.index, stack_level = ctx.stack_level, "argument error context set");
    CONTEXT.with(|c| *c.borrow_mut() = ctx);
    ContextGuard {
        _not_send: PhantomData,
    }
}

/// Override the argument name
pub fn set_name(name: impl Into<String>) {
    let name = name.into();
    trace!(%name, "argument error name set");
    CONTEXT.with(|c| c.borrow_mut().name = Some(name));
}

/// Override the argument index
pub fn set_index(index: u32) {
    trace!(index, "argument error index set");
    CONTEXT.with(|c| c.borrow_mut().index = index);
}

/// Blame the function `level` frames up
pub fn set_stack_level(level: usize) {
    trace!(level, "argument error stack level set");
    CONTEXT.with(|c| c.borrow_mut().stack_level = level);
}

/// Copy of the current context
pub fn current() -> ArgErrorContext {
    CONTEXT.with(|c| c.borrow().clone())
}

/// Read the context and reset it
pub fn take() -> ArgErrorContext {
    let ctx = CONTEXT.with(|c| std::mem::take(&mut *c.borrow_mut()));
    if !ctx.is_default() {
        trace!(name = ?ctx.name, index = ctx.index, stack_level = ctx.stack_level, "argument error context taken");
    }
    ctx
}

/// Restore the defaults
pub fn reset() {
    CONTEXT.with(|c| {
        let mut c = c.borrow_mut();
        if !c.is_default() {
            trace!("argument error context reset");
            *c = ArgErrorContext::new();
        }
    });
}

/// Resets the error context on drop. Bound to the thread that created it.
#[derive(Debug)]
pub struct ContextGuard {
    _not_send: PhantomData<*const ()>,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_priority() {
        let mut ctx = ArgErrorContext::new();
        assert_eq!(ctx.display_name(3), "#3");
        ctx.index = 7;
        assert_eq!(ctx.display_name(3), "#7");
        ctx.name = Some("opts".to_string());
        assert_eq!(ctx.display_name(3), "'opts'");
    }

    #[test]
    fn test_take_resets() {
        set_name("x");
        set_stack_level(2);
        let ctx = take();
        assert_eq!(ctx.name.as_deref(), Some("x"));
        assert_eq!(ctx.stack_level, 2);
        assert!(current().is_default());
    }

    #[test]
    fn test_guard_resets_on_drop() {
        {
            let _guard = set(ArgErrorContext::indexed(4).at_level(3));
            assert_eq!(current().index, 4);
            assert_eq!(current().stack_level, 3);
        }
        assert!(current().is_default());
    }

    #[test]
    fn test_context_is_per_thread() {
        let _guard = set(ArgErrorContext::named("main"));
        let other = std::thread::spawn(current).join().unwrap();
        assert!(other.is_default());
        assert_eq!(current().name.as_deref(), Some("main"));
    }
}
