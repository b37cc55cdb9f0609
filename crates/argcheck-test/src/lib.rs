//! Argcheck test support
//!
//! An in-memory VM implementing [`argcheck_sdk::LuaState`] and
//! [`argcheck_sdk::CallStack`]. Values live in a plain `Vec`, metatables and
//! the call stack are scripted by the test.
//!
//! ```ignore
//! use argcheck_test::{FakeState, FakeValue};
//!
//! let mut state = FakeState::with_args([FakeValue::from(255i64)])
//!     .called_from("check", "handler");
//! ```

pub mod state;
pub mod value;

pub use state::{FakeFrame, FakeState};
pub use value::{noop_cfunction, FakeTable, FakeValue, MetaOutcome, Metatable};
