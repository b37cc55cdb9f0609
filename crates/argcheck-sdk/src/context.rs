//! LuaState and CallStack traits: abstract VM operations
//!
//! Defines the interface a VM binding implements. The validators in
//! `argcheck` program against these traits and never touch VM internals,
//! which also lets them run against a fake VM in tests.
//!
//! Stack indices follow the VM convention: positive indices are absolute
//! and 1-based, negative indices count down from the top (`-1` is the top).

use std::ffi::c_void;

use crate::error::CheckResult;
use crate::value::{CFunction, LuaType, NumberModel, Numeric};

// ============================================================================
// Call stack introspection
// ============================================================================

/// Handle to an activation record, valid until the stack changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame(usize);

impl Frame {
    /// Wrap a VM-specific frame identifier
    #[inline]
    pub const fn new(raw: usize) -> Self {
        Frame(raw)
    }

    /// VM-specific frame identifier
    #[inline]
    pub const fn raw(self) -> usize {
        self.0
    }
}

/// How the calling code referred to a function (`namewhat`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NameWhat {
    /// Global variable
    Global,
    /// Local variable
    Local,
    /// Method call (`obj:f()`)
    Method,
    /// Table field
    Field,
    /// Upvalue
    Upvalue,
    /// Constant
    Constant,
    /// Metamethod
    Metamethod,
    /// Generic `for` iterator
    ForIterator,
    /// Debug hook
    Hook,
    /// No information
    #[default]
    Unknown,
}

/// Name information of the function running in a frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FunctionName {
    /// Name the caller used, if any
    pub name: Option<String>,
    /// Kind of name
    pub what: NameWhat,
}

impl FunctionName {
    /// A function called through a name of the given kind
    pub fn new(name: impl Into<String>, what: NameWhat) -> Self {
        Self {
            name: Some(name.into()),
            what,
        }
    }

    /// A function the VM could not name
    pub fn unknown() -> Self {
        Self::default()
    }
}

/// Call stack introspection used to attribute argument errors.
///
/// Level 0 is the running (native) function, level 1 the function that
/// called it, and so on.
pub trait CallStack {
    /// Activation record `level` frames up, or `None` past the bottom of the
    /// stack (`lua_getstack`).
    fn frame_at(&self, level: usize) -> Option<Frame>;

    /// Name of the function running in `frame` (`lua_getinfo` with `"n"`).
    fn function_name(&self, frame: &Frame) -> FunctionName;

    /// `"chunkname:currentline: "` for the function at `level`, when it is a
    /// Lua function with line information (`luaL_where`).
    fn location(&self, _level: usize) -> Option<String> {
        None
    }

    /// Name under which the function in `frame` is reachable from the loaded
    /// modules table, e.g. `"string.rep"`.
    fn global_function_name(&self, _frame: &Frame) -> Option<String> {
        None
    }
}

// ============================================================================
// Stack introspection
// ============================================================================

/// Abstract VM state for argument validation.
///
/// Read operations never raise. Operations that may run VM code
/// (`call_meta`) report failures as `CheckError::Runtime`.
pub trait LuaState: CallStack {
    // ========================================================================
    // Stack shape
    // ========================================================================

    /// Number representation of this VM
    fn number_model(&self) -> NumberModel;

    /// Index of the top slot, i.e. the number of values on the stack
    fn top(&self) -> i32;

    /// Type tag of a slot; `LuaType::None` when the index is not valid
    fn type_of(&self, idx: i32) -> LuaType;

    // ========================================================================
    // Value reading
    // ========================================================================

    /// Number held by a slot, without string coercion
    fn to_numeric(&self, idx: i32) -> Option<Numeric>;

    /// Truthiness of a slot (`nil` and `false` are false)
    fn to_boolean(&self, idx: i32) -> bool;

    /// Bytes of a string slot, without number coercion
    fn to_bytes(&self, idx: i32) -> Option<&[u8]>;

    /// Identity of a reference value (`lua_topointer`); null for others
    fn to_pointer(&self, idx: i32) -> *const c_void;

    /// Native function pointer if the slot holds a native function
    fn to_cfunction(&self, idx: i32) -> Option<CFunction>;

    // ========================================================================
    // Metatables
    // ========================================================================

    /// Type of `field` in the metatable of a slot, read raw.
    /// `LuaType::Nil` when there is no metatable or no such field.
    fn metafield_type(&self, idx: i32, field: &str) -> LuaType;

    /// `field` of the metatable of a slot when it is a string
    fn metafield_string(&self, idx: i32, field: &str) -> Option<String>;

    /// Whether the metatable of a slot is the registry entry `tname`
    fn has_metatable_of(&self, idx: i32, tname: &str) -> bool;

    // ========================================================================
    // Table access
    // ========================================================================

    /// Push `table[key]` read raw; pushes `nil` when the slot is not a table
    fn push_raw_field(&mut self, table: i32, key: &str);

    /// Push `table[n]` read raw; pushes `nil` when the slot is not a table
    fn push_raw_index(&mut self, table: i32, n: i64);

    /// Pop `n` values
    fn pop(&mut self, n: i32);

    /// Call metamethod `event` on a slot (`luaL_callmeta`). Pushes the single
    /// result and returns `true`; returns `false` and pushes nothing when
    /// there is no such metamethod.
    fn call_meta(&mut self, idx: i32, event: &str) -> CheckResult<bool>;

    // ========================================================================
    // Provided
    // ========================================================================

    /// Convert a relative index into an absolute one (`lua_absindex`)
    #[inline]
    fn abs_index(&self, idx: i32) -> i32 {
        if idx < 0 {
            self.top() + idx + 1
        } else {
            idx
        }
    }

    /// Whether a slot is absent or `nil`
    #[inline]
    fn is_none_or_nil(&self, idx: i32) -> bool {
        self.type_of(idx).is_none_or_nil()
    }

    /// Whether a slot holds a native function
    #[inline]
    fn is_cfunction(&self, idx: i32) -> bool {
        self.to_cfunction(idx).is_some()
    }
}
