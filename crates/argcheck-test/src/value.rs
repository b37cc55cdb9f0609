//! Values held on the fake stack

use std::collections::HashMap;
use std::ffi::{c_int, c_void};
use std::rc::Rc;

use argcheck_sdk::{CFunction, LuaType};

/// A value on the fake VM stack.
#[derive(Debug, Clone)]
pub enum FakeValue {
    /// `nil`
    Nil,
    /// `true` / `false`
    Boolean(bool),
    /// Integer subtype
    Integer(i64),
    /// Float subtype
    Float(f64),
    /// Byte string
    Str(Vec<u8>),
    /// Table
    Table(Rc<FakeTable>),
    /// Lua or native function
    Function(Rc<FakeFunction>),
    /// Bare pointer
    LightUserData(usize),
    /// Full userdata
    UserData(Rc<FakeUserData>),
    /// Coroutine
    Thread(Rc<FakeThread>),
}

impl FakeValue {
    /// String value from UTF-8 text
    pub fn str(s: &str) -> Self {
        FakeValue::Str(s.as_bytes().to_vec())
    }

    /// A Lua (non-native) function
    pub fn lua_function() -> Self {
        FakeValue::Function(Rc::new(FakeFunction { native: None }))
    }

    /// A native function wrapping `f`
    pub fn cfunction(f: CFunction) -> Self {
        FakeValue::Function(Rc::new(FakeFunction { native: Some(f) }))
    }

    /// A table
    pub fn table(table: FakeTable) -> Self {
        FakeValue::Table(Rc::new(table))
    }

    /// A full userdata with an optional metatable
    pub fn userdata(meta: Option<Rc<Metatable>>) -> Self {
        FakeValue::UserData(Rc::new(FakeUserData { meta }))
    }

    /// A fresh coroutine
    pub fn thread() -> Self {
        FakeValue::Thread(Rc::new(FakeThread { _status: 0 }))
    }

    /// Type tag of the value
    pub fn lua_type(&self) -> LuaType {
        match self {
            FakeValue::Nil => LuaType::Nil,
            FakeValue::Boolean(_) => LuaType::Boolean,
            FakeValue::Integer(_) | FakeValue::Float(_) => LuaType::Number,
            FakeValue::Str(_) => LuaType::String,
            FakeValue::Table(_) => LuaType::Table,
            FakeValue::Function(_) => LuaType::Function,
            FakeValue::LightUserData(_) => LuaType::LightUserData,
            FakeValue::UserData(_) => LuaType::UserData,
            FakeValue::Thread(_) => LuaType::Thread,
        }
    }

    /// Metatable of tables and full userdata
    pub fn metatable(&self) -> Option<&Rc<Metatable>> {
        match self {
            FakeValue::Table(t) => t.meta.as_ref(),
            FakeValue::UserData(u) => u.meta.as_ref(),
            _ => None,
        }
    }

    /// Identity of reference values
    pub fn pointer(&self) -> *const c_void {
        match self {
            FakeValue::Table(t) => Rc::as_ptr(t) as *const c_void,
            FakeValue::Function(f) => Rc::as_ptr(f) as *const c_void,
            FakeValue::UserData(u) => Rc::as_ptr(u) as *const c_void,
            FakeValue::Thread(t) => Rc::as_ptr(t) as *const c_void,
            FakeValue::LightUserData(p) => *p as *const c_void,
            _ => std::ptr::null(),
        }
    }
}

impl From<bool> for FakeValue {
    fn from(b: bool) -> Self {
        FakeValue::Boolean(b)
    }
}

impl From<i64> for FakeValue {
    fn from(i: i64) -> Self {
        FakeValue::Integer(i)
    }
}

impl From<i32> for FakeValue {
    fn from(i: i32) -> Self {
        FakeValue::Integer(i64::from(i))
    }
}

impl From<f64> for FakeValue {
    fn from(f: f64) -> Self {
        FakeValue::Float(f)
    }
}

impl From<&str> for FakeValue {
    fn from(s: &str) -> Self {
        FakeValue::str(s)
    }
}

/// Function object
#[derive(Debug)]
pub struct FakeFunction {
    /// Native entry point; `None` for Lua functions
    pub native: Option<CFunction>,
}

/// Full userdata block
#[derive(Debug)]
pub struct FakeUserData {
    /// Attached metatable
    pub meta: Option<Rc<Metatable>>,
}

/// Coroutine object
#[derive(Debug)]
pub struct FakeThread {
    _status: u8,
}

/// Table with a string-keyed hash part and an array part.
#[derive(Debug, Default)]
pub struct FakeTable {
    fields: HashMap<String, FakeValue>,
    items: Vec<FakeValue>,
    meta: Option<Rc<Metatable>>,
}

impl FakeTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `t[key] = value`
    pub fn field(mut self, key: &str, value: impl Into<FakeValue>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Append `value` to the array part
    pub fn item(mut self, value: impl Into<FakeValue>) -> Self {
        self.items.push(value.into());
        self
    }

    /// Attach a metatable
    pub fn with_metatable(mut self, meta: Rc<Metatable>) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Raw `t[key]`
    pub fn get(&self, key: &str) -> Option<&FakeValue> {
        self.fields.get(key)
    }

    /// Raw `t[n]`, 1-based
    pub fn get_index(&self, n: i64) -> Option<&FakeValue> {
        if n < 1 {
            return None;
        }
        usize::try_from(n - 1).ok().and_then(|i| self.items.get(i))
    }
}

/// Outcome of running a `__tostring` metamethod
#[derive(Debug, Clone)]
pub enum MetaOutcome {
    /// The metamethod returned this value
    Returns(FakeValue),
    /// The metamethod raised this error
    Raises(String),
}

/// Metatable of a table or userdata.
#[derive(Debug, Clone, Default)]
pub struct Metatable {
    fields: HashMap<String, FakeValue>,
    tostring: Option<MetaOutcome>,
}

impl Metatable {
    /// Empty metatable
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `__name`
    pub fn with_name(self, name: &str) -> Self {
        self.with_field("__name", FakeValue::str(name))
    }

    /// Set an arbitrary field
    pub fn with_field(mut self, key: &str, value: impl Into<FakeValue>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Make values with this metatable callable
    pub fn with_call(self) -> Self {
        self.with_field("__call", FakeValue::lua_function())
    }

    /// Install a `__tostring` metamethod returning `result`
    pub fn with_tostring(mut self, result: impl Into<FakeValue>) -> Self {
        self.tostring = Some(MetaOutcome::Returns(result.into()));
        self.with_field("__tostring", FakeValue::lua_function())
    }

    /// Install a `__tostring` metamethod that raises `message`
    pub fn with_failing_tostring(mut self, message: &str) -> Self {
        self.tostring = Some(MetaOutcome::Raises(message.to_string()));
        self.with_field("__tostring", FakeValue::lua_function())
    }

    /// Raw `mt[key]`
    pub fn get(&self, key: &str) -> Option<&FakeValue> {
        self.fields.get(key)
    }

    /// Behaviour of the installed `__tostring`
    pub fn tostring(&self) -> Option<&MetaOutcome> {
        self.tostring.as_ref()
    }
}

/// A native function that does nothing.
///
/// # Safety
///
/// Never dereferences `state`.
pub unsafe extern "C" fn noop_cfunction(_state: *mut c_void) -> c_int {
    0
}
