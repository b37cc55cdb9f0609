//! Named checks, as exposed to Lua
//!
//! A [`Kind`] names one check/predicate pair (`"int"`, `"uint8"`, `"file"`,
//! ...). The Lua-callable entry points dispatch on it, and native code can use
//! [`Args::check_kind`] and [`is_kind`] to pick a check at runtime.

use std::fmt;
use std::str::FromStr;

use argcheck_sdk::{CheckResult, LuaState};
use thiserror::Error;

use crate::args::Args;
use crate::errctx;
use crate::predicate;
use crate::range::SizedInt;
use crate::report::Reporter;

/// Name that is not a known check
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown check kind '{0}'")]
pub struct UnknownKind(pub String);

macro_rules! kinds {
    ($($(#[$doc:meta])* $variant:ident => $name:literal,)*) => {
        /// One named check
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Kind {
            $(
                #[doc = concat!("`", $name, "`")]
                #[doc = ""]
                $(#[$doc])*
                $variant,
            )*
        }

        impl Kind {
            /// Every kind, in declaration order
            pub const ALL: &'static [Kind] = &[$(Kind::$variant,)*];

            /// Name used by the Lua modules
            pub fn name(self) -> &'static str {
                match self {
                    $(Kind::$variant => $name,)*
                }
            }

            /// Kind for a Lua-side name
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(Kind::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

kinds! {
    /// Absent or `nil`
    None => "none",
    Bool => "bool",
    /// Light userdata
    Pointer => "pointer",
    Num => "num",
    Str => "str",
    Table => "table",
    Func => "func",
    /// Native function
    CFunc => "cfunc",
    UserData => "userdata",
    Thread => "thread",
    Finite => "finite",
    Unsigned => "unsigned",
    Int => "int",
    Uint => "uint",
    Pint => "pint",
    Int8 => "int8",
    Int16 => "int16",
    Int32 => "int32",
    Int64 => "int64",
    Uint8 => "uint8",
    Uint16 => "uint16",
    Uint32 => "uint32",
    Uint64 => "uint64",
    /// Positive integer fitting `uint8_t`
    Pint8 => "pint8",
    Pint16 => "pint16",
    Pint32 => "pint32",
    Pint64 => "pint64",
    /// io library file handle
    File => "file",
    /// Function or value with `__call`
    Callable => "callable",
}

impl Kind {
    /// Numeric kinds that accept `min`/`max` limits through the Lua modules
    pub fn is_bounded(self) -> bool {
        matches!(
            self,
            Kind::Num | Kind::Finite | Kind::Unsigned | Kind::Int | Kind::Uint | Kind::Pint
        )
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Kind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::from_name(s).ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// Whether slot `idx` passes the predicate for `kind`
pub fn is_kind<S: LuaState + ?Sized>(state: &S, idx: i32, kind: Kind) -> bool {
    match kind {
        Kind::None => predicate::is_none_or_nil(state, idx),
        Kind::Bool => predicate::is_bool(state, idx),
        Kind::Pointer => predicate::is_pointer(state, idx),
        Kind::Num => predicate::is_num(state, idx),
        Kind::Str => predicate::is_str(state, idx),
        Kind::Table => predicate::is_table(state, idx),
        Kind::Func => predicate::is_func(state, idx),
        Kind::CFunc => predicate::is_cfunc(state, idx),
        Kind::UserData => predicate::is_userdata(state, idx),
        Kind::Thread => predicate::is_thread(state, idx),
        Kind::Finite => predicate::is_finite(state, idx),
        Kind::Unsigned => predicate::is_unsigned(state, idx),
        Kind::Int => predicate::is_int(state, idx),
        Kind::Uint => predicate::is_uint(state, idx),
        Kind::Pint => predicate::is_pint(state, idx),
        Kind::Int8 => predicate::is_int8(state, idx),
        Kind::Int16 => predicate::is_int16(state, idx),
        Kind::Int32 => predicate::is_int32(state, idx),
        Kind::Int64 => predicate::is_int64(state, idx),
        Kind::Uint8 => predicate::is_uint8(state, idx),
        Kind::Uint16 => predicate::is_uint16(state, idx),
        Kind::Uint32 => predicate::is_uint32(state, idx),
        Kind::Uint64 => predicate::is_uint64(state, idx),
        Kind::Pint8 => predicate::is_pint8(state, idx),
        Kind::Pint16 => predicate::is_pint16(state, idx),
        Kind::Pint32 => predicate::is_pint32(state, idx),
        Kind::Pint64 => predicate::is_pint64(state, idx),
        Kind::File => predicate::is_file(state, idx),
        Kind::Callable => predicate::is_callable(state, idx),
    }
}

impl<'l, S: LuaState + ?Sized, R: Reporter> Args<'l, S, R> {
    /// Run the check named by `kind` on slot `idx`, discarding the value
    pub fn check_kind(&self, idx: i32, kind: Kind) -> CheckResult<()> {
        match kind {
            Kind::None => self.check_none(idx),
            Kind::Bool => self.check_bool(idx).map(drop),
            Kind::Pointer => self.check_pointer(idx).map(drop),
            Kind::Num => self.check_num(idx).map(drop),
            Kind::Str => self.check_lstr(idx).map(drop),
            Kind::Table => self.check_table(idx),
            Kind::Func => self.check_func(idx),
            Kind::CFunc => self.check_cfunc(idx).map(drop),
            Kind::UserData => self.check_userdata(idx).map(drop),
            Kind::Thread => self.check_thread(idx).map(drop),
            Kind::Finite => self.check_finite(idx).map(drop),
            Kind::Unsigned => self.check_unsigned(idx).map(drop),
            Kind::Int => self.check_int(idx).map(drop),
            Kind::Uint => self.check_uint(idx).map(drop),
            Kind::Pint => self.check_pint(idx).map(drop),
            Kind::Int8 => self.check_int8(idx).map(drop),
            Kind::Int16 => self.check_int16(idx).map(drop),
            Kind::Int32 => self.check_int32(idx).map(drop),
            Kind::Int64 => self.check_int64(idx).map(drop),
            Kind::Uint8 => self.check_uint8(idx).map(drop),
            Kind::Uint16 => self.check_uint16(idx).map(drop),
            Kind::Uint32 => self.check_uint32(idx).map(drop),
            Kind::Uint64 => self.check_uint64(idx).map(drop),
            Kind::Pint8 => self.check_pint_le(idx, <u8 as SizedInt>::MAX as u64).map(drop),
            Kind::Pint16 => self.check_pint_le(idx, <u16 as SizedInt>::MAX as u64).map(drop),
            Kind::Pint32 => self.check_pint_le(idx, <u32 as SizedInt>::MAX as u64).map(drop),
            Kind::Pint64 => self.check_pint_le(idx, <u64 as SizedInt>::MAX as u64).map(drop),
            Kind::File => self.check_file(idx).map(drop),
            Kind::Callable => self.check_callable(idx),
        }
    }

    /// Optional argument whose default sits in another slot.
    ///
    /// The default at `default_idx` is checked first, when not `nil`, and a
    /// failure names `default_idx` itself; the error context is held back
    /// for the argument. Yields the slot that supplies the value: `idx`, or
    /// `default_idx` when `idx` is absent or `nil`.
    pub fn opt_checked(&self, idx: i32, default_idx: i32, kind: Kind) -> CheckResult<i32> {
        let held = errctx::take();
        if !self.is_none_or_nil(default_idx) {
            self.check_kind(default_idx, kind)?;
        }
        let _guard = errctx::set(held);
        if self.is_none_or_nil(idx) {
            return Ok(default_idx);
        }
        self.check_kind(idx, kind).map(|()| idx)
    }
}
