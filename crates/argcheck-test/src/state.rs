//! FakeState: an in-memory VM stack with a scripted call stack

use std::collections::HashMap;
use std::ffi::c_void;
use std::rc::Rc;

use argcheck_sdk::{
    CFunction, CallStack, CheckError, CheckResult, Frame, FunctionName, LuaState, LuaType,
    NameWhat, NumberModel, Numeric, FILE_HANDLE,
};

use crate::value::{FakeValue, MetaOutcome, Metatable};

/// One activation record of the scripted call stack.
#[derive(Debug, Clone, Default)]
pub struct FakeFrame {
    name: FunctionName,
    location: Option<String>,
    global_name: Option<String>,
}

impl FakeFrame {
    /// Function called through `name`
    pub fn named(name: &str, what: NameWhat) -> Self {
        Self {
            name: FunctionName::new(name, what),
            ..Self::default()
        }
    }

    /// Function the VM cannot name
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Current source position, e.g. `"test.lua:12: "`
    pub fn at(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }

    /// Name found in the loaded modules table
    pub fn known_as(mut self, global: &str) -> Self {
        self.global_name = Some(global.to_string());
        self
    }
}

/// Fake VM state.
///
/// Frame 0 of the call stack is the running native function, frame 1 its
/// caller. A fresh state has no frames at all.
#[derive(Debug, Default)]
pub struct FakeState {
    stack: Vec<FakeValue>,
    model: NumberModel,
    frames: Vec<FakeFrame>,
    registry: HashMap<String, Rc<Metatable>>,
}

impl FakeState {
    /// Empty stack, tagged numbers, no frames
    pub fn new() -> Self {
        Self::default()
    }

    /// Stack holding `args` at positions 1..=n
    pub fn with_args<I>(args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<FakeValue>,
    {
        let mut state = Self::new();
        for arg in args {
            state.push(arg);
        }
        state
    }

    /// Switch the number representation
    pub fn number_model_of(mut self, model: NumberModel) -> Self {
        self.model = model;
        self
    }

    /// Replace the call stack; `frames[0]` is level 0
    pub fn call_stack(mut self, frames: Vec<FakeFrame>) -> Self {
        self.frames = frames;
        self
    }

    /// A running native function `native` called from `caller`
    pub fn called_from(self, native: &str, caller: &str) -> Self {
        self.call_stack(vec![
            FakeFrame::named(native, NameWhat::Field),
            FakeFrame::named(caller, NameWhat::Local),
        ])
    }

    /// Push a value
    pub fn push(&mut self, value: impl Into<FakeValue>) {
        self.stack.push(value.into());
    }

    /// Value at a stack index
    pub fn value_at(&self, idx: i32) -> Option<&FakeValue> {
        let abs = self.abs_index(idx);
        if abs < 1 {
            return None;
        }
        usize::try_from(abs - 1).ok().and_then(|i| self.stack.get(i))
    }

    /// Store `meta` in the registry under `tname`
    pub fn register_metatable(&mut self, tname: &str, meta: Metatable) -> Rc<Metatable> {
        let meta = Rc::new(meta);
        self.registry.insert(tname.to_string(), Rc::clone(&meta));
        meta
    }

    /// A new file handle userdata
    pub fn new_file(&mut self) -> FakeValue {
        let meta = match self.registry.get(FILE_HANDLE) {
            Some(meta) => Rc::clone(meta),
            None => self.register_metatable(FILE_HANDLE, Metatable::new().with_name(FILE_HANDLE)),
        };
        FakeValue::userdata(Some(meta))
    }

    fn metafield(&self, idx: i32, field: &str) -> Option<&FakeValue> {
        self.value_at(idx)
            .and_then(FakeValue::metatable)
            .and_then(|meta| meta.get(field))
    }
}

impl CallStack for FakeState {
    fn frame_at(&self, level: usize) -> Option<Frame> {
        (level < self.frames.len()).then(|| Frame::new(level))
    }

    fn function_name(&self, frame: &Frame) -> FunctionName {
        self.frames
            .get(frame.raw())
            .map(|f| f.name.clone())
            .unwrap_or_default()
    }

    fn location(&self, level: usize) -> Option<String> {
        self.frames.get(level).and_then(|f| f.location.clone())
    }

    fn global_function_name(&self, frame: &Frame) -> Option<String> {
        self.frames
            .get(frame.raw())
            .and_then(|f| f.global_name.clone())
    }
}

impl LuaState for FakeState {
    fn number_model(&self) -> NumberModel {
        self.model
    }

    fn top(&self) -> i32 {
        self.stack.len() as i32
    }

    fn type_of(&self, idx: i32) -> LuaType {
        self.value_at(idx)
            .map(FakeValue::lua_type)
            .unwrap_or(LuaType::None)
    }

    fn to_numeric(&self, idx: i32) -> Option<Numeric> {
        let n = match self.value_at(idx)? {
            FakeValue::Integer(i) => Numeric::Integer(*i),
            FakeValue::Float(f) => Numeric::Float(*f),
            _ => return None,
        };
        Some(match self.model {
            NumberModel::Tagged => n,
            NumberModel::FloatBacked => Numeric::Float(n.as_f64()),
        })
    }

    fn to_boolean(&self, idx: i32) -> bool {
        !matches!(
            self.value_at(idx),
            None | Some(FakeValue::Nil) | Some(FakeValue::Boolean(false))
        )
    }

    fn to_bytes(&self, idx: i32) -> Option<&[u8]> {
        match self.value_at(idx)? {
            FakeValue::Str(s) => Some(s.as_slice()),
            _ => None,
        }
    }

    fn to_pointer(&self, idx: i32) -> *const c_void {
        self.value_at(idx)
            .map(FakeValue::pointer)
            .unwrap_or(std::ptr::null())
    }

    fn to_cfunction(&self, idx: i32) -> Option<CFunction> {
        match self.value_at(idx)? {
            FakeValue::Function(f) => f.native,
            _ => None,
        }
    }

    fn metafield_type(&self, idx: i32, field: &str) -> LuaType {
        self.metafield(idx, field)
            .map(FakeValue::lua_type)
            .unwrap_or(LuaType::Nil)
    }

    fn metafield_string(&self, idx: i32, field: &str) -> Option<String> {
        match self.metafield(idx, field)? {
            FakeValue::Str(s) => Some(String::from_utf8_lossy(s).into_owned()),
            _ => None,
        }
    }

    fn has_metatable_of(&self, idx: i32, tname: &str) -> bool {
        match (self.value_at(idx).and_then(FakeValue::metatable), self.registry.get(tname)) {
            (Some(meta), Some(registered)) => Rc::ptr_eq(meta, registered),
            _ => false,
        }
    }

    fn push_raw_field(&mut self, table: i32, key: &str) {
        let value = match self.value_at(table) {
            Some(FakeValue::Table(t)) => t.get(key).cloned(),
            _ => None,
        };
        self.push(value.unwrap_or(FakeValue::Nil));
    }

    fn push_raw_index(&mut self, table: i32, n: i64) {
        let value = match self.value_at(table) {
            Some(FakeValue::Table(t)) => t.get_index(n).cloned(),
            _ => None,
        };
        self.push(value.unwrap_or(FakeValue::Nil));
    }

    fn pop(&mut self, n: i32) {
        let keep = self.stack.len().saturating_sub(n.max(0) as usize);
        self.stack.truncate(keep);
    }

    fn call_meta(&mut self, idx: i32, event: &str) -> CheckResult<bool> {
        let Some(meta) = self.value_at(idx).and_then(FakeValue::metatable).cloned() else {
            return Ok(false);
        };
        if meta.get(event).is_none() {
            return Ok(false);
        }
        let outcome = match (event, meta.tostring()) {
            ("__tostring", Some(outcome)) => outcome.clone(),
            _ => MetaOutcome::Returns(FakeValue::Nil),
        };
        match outcome {
            MetaOutcome::Returns(value) => {
                self.push(value);
                Ok(true)
            }
            MetaOutcome::Raises(message) => Err(CheckError::Runtime(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FakeTable;

    #[test]
    fn test_stack_indices() {
        let state = FakeState::with_args([1i64, 2, 3]);
        assert_eq!(state.top(), 3);
        assert_eq!(state.abs_index(-1), 3);
        assert!(matches!(state.value_at(-3), Some(FakeValue::Integer(1))));
        assert_eq!(state.type_of(4), LuaType::None);
        assert_eq!(state.type_of(0), LuaType::None);
    }

    #[test]
    fn test_float_backed_reports_floats() {
        let state = FakeState::with_args([5i64]).number_model_of(NumberModel::FloatBacked);
        assert_eq!(state.to_numeric(1), Some(Numeric::Float(5.0)));
    }

    #[test]
    fn test_raw_field_push_and_pop() {
        let mut state = FakeState::new();
        state.push(FakeValue::table(FakeTable::new().field("k", "v").item(10i64)));
        state.push_raw_field(1, "k");
        assert_eq!(state.to_bytes(-1), Some(&b"v"[..]));
        state.push_raw_index(1, 1);
        assert_eq!(state.to_numeric(-1), Some(Numeric::Integer(10)));
        state.push_raw_index(1, 2);
        assert_eq!(state.type_of(-1), LuaType::Nil);
        state.pop(3);
        assert_eq!(state.top(), 1);
    }

    #[test]
    fn test_file_handle_metatable() {
        let mut state = FakeState::new();
        let file = state.new_file();
        state.push(file);
        state.push(FakeValue::userdata(None));
        assert!(state.has_metatable_of(1, FILE_HANDLE));
        assert!(!state.has_metatable_of(2, FILE_HANDLE));
        assert_eq!(state.metafield_string(1, "__name").as_deref(), Some("FILE*"));
    }

    #[test]
    fn test_call_stack_levels() {
        let state = FakeState::new().called_from("check", "caller");
        assert!(state.frame_at(1).is_some());
        assert!(state.frame_at(2).is_none());
        let frame = Frame::new(1);
        assert_eq!(state.function_name(&frame).name.as_deref(), Some("caller"));
    }
}
