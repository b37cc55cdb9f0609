//! Argcheck SDK - VM-facing surface of the argument validators
//!
//! This crate holds the small set of types and traits a VM binding needs to
//! implement so that `argcheck` can validate native function arguments
//! against it: value tags, the numeric view of a slot, the stack and call
//! stack introspection traits, and the error type.
//!
//! # Example
//!
//! ```ignore
//! use argcheck_sdk::{CallStack, LuaState, LuaType};
//!
//! struct Binding { /* raw VM handle */ }
//!
//! impl CallStack for Binding { /* lua_getstack / lua_getinfo */ }
//! impl LuaState for Binding { /* lua_type / lua_tonumberx / ... */ }
//! ```

#![warn(missing_docs)]

pub mod context;
pub mod error;
pub mod value;

pub use context::{CallStack, Frame, FunctionName, LuaState, NameWhat};
pub use error::{CheckError, CheckResult};
pub use value::{CFunction, LuaType, NumberModel, Numeric, FILE_HANDLE};
