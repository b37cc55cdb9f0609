//! Value tags and numeric representation
//!
//! The validators never own VM values. They only look at what a stack slot
//! holds through the tags and numeric views defined here, the same way the
//! VM's own C API reports them.
//!
//! # Type names
//!
//! ```text
//! None          "no value"   (slot past the top of the stack)
//! Nil           "nil"
//! Boolean       "boolean"
//! LightUserData "userdata"   (argument errors say "light userdata")
//! Number        "number"
//! String        "string"
//! Table         "table"
//! Function      "function"
//! UserData      "userdata"
//! Thread        "thread"
//! ```

use std::ffi::{c_int, c_void};

/// Native function signature as registered with the VM.
pub type CFunction = unsafe extern "C" fn(state: *mut c_void) -> c_int;

/// Registry name of the metatable shared by io library file handles
pub const FILE_HANDLE: &str = "FILE*";

// ============================================================================
// LuaType
// ============================================================================

/// Type tag of a stack slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LuaType {
    /// The slot is past the top of the stack
    None,
    /// `nil`
    Nil,
    /// `true` / `false`
    Boolean,
    /// A bare pointer without metatable
    LightUserData,
    /// Integer or float
    Number,
    /// Byte string
    String,
    /// Table
    Table,
    /// Lua or native function
    Function,
    /// Full userdata block
    UserData,
    /// Coroutine
    Thread,
}

impl LuaType {
    /// Name the VM uses for this tag (`lua_typename`).
    pub const fn name(self) -> &'static str {
        match self {
            LuaType::None => "no value",
            LuaType::Nil => "nil",
            LuaType::Boolean => "boolean",
            LuaType::LightUserData => "userdata",
            LuaType::Number => "number",
            LuaType::String => "string",
            LuaType::Table => "table",
            LuaType::Function => "function",
            LuaType::UserData => "userdata",
            LuaType::Thread => "thread",
        }
    }

    /// Absent slots and `nil` are interchangeable for optional arguments.
    #[inline]
    pub const fn is_none_or_nil(self) -> bool {
        matches!(self, LuaType::None | LuaType::Nil)
    }

    /// Types whose values are compared and printed by address.
    #[inline]
    pub const fn is_reference(self) -> bool {
        matches!(
            self,
            LuaType::LightUserData
                | LuaType::Table
                | LuaType::Function
                | LuaType::UserData
                | LuaType::Thread
        )
    }
}

impl std::fmt::Display for LuaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Numbers
// ============================================================================

/// How the VM represents numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NumberModel {
    /// Integers and floats are distinct subtypes (5.3 and later).
    /// A float is never an integer, even when it has no fractional part.
    #[default]
    Tagged,
    /// Every number is a float (5.1, 5.2). A number is an integer when it
    /// equals its own truncation.
    FloatBacked,
}

/// The contents of a numeric slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    /// Integer subtype
    Integer(i64),
    /// Float subtype
    Float(f64),
}

// 2^63 as f64; the first float that no longer fits in i64.
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

impl Numeric {
    /// Value as a float, the way `lua_tonumber` converts it.
    #[inline]
    pub fn as_f64(self) -> f64 {
        match self {
            Numeric::Integer(i) => i as f64,
            Numeric::Float(f) => f,
        }
    }

    /// Integer view of the number under `model`.
    ///
    /// Tagged VMs only accept the integer subtype; float-backed VMs accept
    /// any float that survives a round trip through `i64`.
    pub fn as_integer(self, model: NumberModel) -> Option<i64> {
        match (self, model) {
            (Numeric::Integer(i), _) => Some(i),
            (Numeric::Float(_), NumberModel::Tagged) => None,
            (Numeric::Float(f), NumberModel::FloatBacked) => {
                if f.trunc() == f && (-I64_UPPER..I64_UPPER).contains(&f) {
                    Some(f as i64)
                } else {
                    None
                }
            }
        }
    }
}

impl From<i64> for Numeric {
    fn from(i: i64) -> Self {
        Numeric::Integer(i)
    }
}

impl From<f64> for Numeric {
    fn from(f: f64) -> Self {
        Numeric::Float(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(LuaType::None.name(), "no value");
        assert_eq!(LuaType::LightUserData.name(), "userdata");
        assert_eq!(LuaType::UserData.to_string(), "userdata");
        assert_eq!(LuaType::Thread.to_string(), "thread");
    }

    #[test]
    fn test_none_or_nil() {
        assert!(LuaType::None.is_none_or_nil());
        assert!(LuaType::Nil.is_none_or_nil());
        assert!(!LuaType::Boolean.is_none_or_nil());
    }

    #[test]
    fn test_tagged_float_is_not_integer() {
        assert_eq!(Numeric::Float(1.0).as_integer(NumberModel::Tagged), None);
        assert_eq!(Numeric::Integer(7).as_integer(NumberModel::Tagged), Some(7));
    }

    #[test]
    fn test_float_backed_truncation() {
        let model = NumberModel::FloatBacked;
        assert_eq!(Numeric::Float(1.0).as_integer(model), Some(1));
        assert_eq!(Numeric::Float(-3.0).as_integer(model), Some(-3));
        assert_eq!(Numeric::Float(1.1).as_integer(model), None);
        assert_eq!(Numeric::Float(f64::NAN).as_integer(model), None);
        assert_eq!(Numeric::Float(f64::INFINITY).as_integer(model), None);
        assert_eq!(Numeric::Float(1e19).as_integer(model), None);
        assert_eq!(Numeric::Float(-I64_UPPER).as_integer(model), Some(i64::MIN));
    }
}
