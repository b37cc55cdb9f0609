//! Argcheck - argument validation for native Lua functions
//!
//! Checks read one stack slot, convert it to a native value, or fail with the
//! exact message the VM uses for its own argument errors:
//!
//! ```text
//! bad argument #2 to 'resize' (uint8_t expected, got an out of range value)
//! ```
//!
//! # Layers
//!
//! - [`predicate`]: `is_*` tests that never fail.
//! - [`Args`]: `check_*` / `opt_*` over a borrowed [`LuaState`], reporting
//!   through a [`Reporter`].
//! - [`errctx`]: per-thread overrides for how the next error names its
//!   argument and which frame it blames.
//! - [`entry`] and [`Library`]: the same checks exposed to Lua, with trailing
//!   arguments priming the error context.
//!
//! # Example
//!
//! ```ignore
//! use argcheck::{errctx, Args};
//!
//! fn resize(state: &mut Binding) -> argcheck::CheckResult<()> {
//!     let args = Args::new(state);
//!     let width = args.check_uint8(1)?;
//!     errctx::set_name("height");
//!     let height = args.opt_uint8(2, width)?;
//!     // ...
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub mod args;
pub mod entry;
pub mod errctx;
pub mod kind;
pub mod numfmt;
pub mod predicate;
pub mod range;
pub mod registry;
pub mod report;
pub mod tostring;

pub use args::{Args, Key};
pub use entry::Returned;
pub use errctx::{ArgErrorContext, ContextGuard};
pub use kind::{is_kind, Kind, UnknownKind};
pub use range::{Bound, Bounds, FloatRange, IntRange, SizedInt, UintRange};
pub use registry::{Entry, Library};
pub use report::{
    AnyReporter, ContextReporter, ReportStyle, Reporter, ReporterConfig, StockReporter,
    DEFAULT_MAX_EXTRA_LEN,
};
pub use tostring::{to_display, to_display_string};

pub use argcheck_sdk::{
    CallStack, CheckError, CheckResult, LuaState, LuaType, NameWhat, NumberModel, Numeric,
};
