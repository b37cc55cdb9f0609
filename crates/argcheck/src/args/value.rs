//! Non-numeric checks

use std::borrow::Cow;
use std::ffi::c_void;

use argcheck_sdk::{CFunction, CheckResult, LuaState, LuaType, FILE_HANDLE};

use super::Args;
use crate::errctx;
use crate::predicate;
use crate::report::Reporter;

impl<'l, S: LuaState + ?Sized, R: Reporter> Args<'l, S, R> {
    // ========================================================================
    // nil / boolean
    // ========================================================================

    /// Slot is absent or `nil`
    pub fn check_none(&self, idx: i32) -> CheckResult<()> {
        if self.state.is_none_or_nil(idx) {
            errctx::reset();
            Ok(())
        } else {
            Err(self.type_error(idx, LuaType::Nil.name()))
        }
    }

    /// Boolean argument
    pub fn check_bool(&self, idx: i32) -> CheckResult<bool> {
        self.check_type(idx, LuaType::Boolean)?;
        Ok(self.state.to_boolean(idx))
    }

    /// Optional boolean argument
    pub fn opt_bool(&self, idx: i32, def: bool) -> CheckResult<bool> {
        self.opt_with(idx, def, || self.check_bool(idx))
    }

    // ========================================================================
    // Strings
    // ========================================================================

    /// String argument as raw bytes; numbers are not accepted
    pub fn check_lstr(&self, idx: i32) -> CheckResult<&[u8]> {
        self.check_type(idx, LuaType::String)?;
        Ok(self.state.to_bytes(idx).unwrap_or_default())
    }

    /// Optional string argument as raw bytes
    pub fn opt_lstr<'a>(&'a self, idx: i32, def: &'a [u8]) -> CheckResult<&'a [u8]> {
        self.opt_with(idx, def, || self.check_lstr(idx))
    }

    /// String argument; invalid UTF-8 is replaced
    pub fn check_str(&self, idx: i32) -> CheckResult<Cow<'_, str>> {
        self.check_lstr(idx).map(String::from_utf8_lossy)
    }

    /// Optional string argument
    pub fn opt_str<'a>(&'a self, idx: i32, def: &'a str) -> CheckResult<Cow<'a, str>> {
        self.opt_with(idx, Cow::Borrowed(def), || self.check_str(idx))
    }

    // ========================================================================
    // Tables and functions
    // ========================================================================

    /// Table argument
    pub fn check_table(&self, idx: i32) -> CheckResult<()> {
        self.check_type(idx, LuaType::Table)
    }

    /// Optional table argument; yields `idx` when present, `def` otherwise
    pub fn opt_table(&self, idx: i32, def: i32) -> CheckResult<i32> {
        self.opt_with(idx, def, || self.check_table(idx).map(|_| idx))
    }

    /// Function argument
    pub fn check_func(&self, idx: i32) -> CheckResult<()> {
        self.check_type(idx, LuaType::Function)
    }

    /// Optional function argument; yields `idx` when present, `def` otherwise
    pub fn opt_func(&self, idx: i32, def: i32) -> CheckResult<i32> {
        self.opt_with(idx, def, || self.check_func(idx).map(|_| idx))
    }

    /// Native function argument
    pub fn check_cfunc(&self, idx: i32) -> CheckResult<CFunction> {
        match self.state.to_cfunction(idx) {
            Some(f) => {
                errctx::reset();
                Ok(f)
            }
            None => Err(self.arg_error(
                idx,
                format!("cfunction expected, got {}", self.state.type_of(idx).name()),
            )),
        }
    }

    /// Optional native function argument
    pub fn opt_cfunc(&self, idx: i32, def: Option<CFunction>) -> CheckResult<Option<CFunction>> {
        self.opt_with(idx, def, || self.check_cfunc(idx).map(Some))
    }

    /// Function, or a value with a `__call` metamethod
    pub fn check_callable(&self, idx: i32) -> CheckResult<()> {
        self.arg_check(predicate::is_callable(&*self.state, idx), idx, || {
            format!(
                "callable object expected, got {}",
                self.state.type_of(idx).name()
            )
        })
    }

    /// Optional callable; yields `idx` when present, `def` otherwise
    pub fn opt_callable(&self, idx: i32, def: i32) -> CheckResult<i32> {
        self.opt_with(idx, def, || self.check_callable(idx).map(|_| idx))
    }

    // ========================================================================
    // Userdata and threads
    // ========================================================================

    /// Light userdata argument
    pub fn check_pointer(&self, idx: i32) -> CheckResult<*const c_void> {
        self.check_type(idx, LuaType::LightUserData)?;
        Ok(self.state.to_pointer(idx))
    }

    /// Optional light userdata argument
    pub fn opt_pointer(&self, idx: i32, def: *const c_void) -> CheckResult<*const c_void> {
        self.opt_with(idx, def, || self.check_pointer(idx))
    }

    /// Full userdata argument of any kind
    pub fn check_userdata(&self, idx: i32) -> CheckResult<*const c_void> {
        self.check_type(idx, LuaType::UserData)?;
        Ok(self.state.to_pointer(idx))
    }

    /// Optional full userdata argument
    pub fn opt_userdata(&self, idx: i32, def: *const c_void) -> CheckResult<*const c_void> {
        self.opt_with(idx, def, || self.check_userdata(idx))
    }

    /// Full userdata whose metatable is the registry entry `tname`
    pub fn check_udata(&self, idx: i32, tname: &str) -> CheckResult<*const c_void> {
        if predicate::is_userdata_of(&*self.state, idx, tname) {
            errctx::reset();
            Ok(self.state.to_pointer(idx))
        } else {
            Err(self.type_error(idx, tname))
        }
    }

    /// Optional userdata of type `tname`
    pub fn opt_udata(&self, idx: i32, tname: &str, def: *const c_void) -> CheckResult<*const c_void> {
        self.opt_with(idx, def, || self.check_udata(idx, tname))
    }

    /// io library file handle
    pub fn check_file(&self, idx: i32) -> CheckResult<*const c_void> {
        self.check_udata(idx, FILE_HANDLE)
    }

    /// Optional io library file handle
    pub fn opt_file(&self, idx: i32, def: *const c_void) -> CheckResult<*const c_void> {
        self.opt_with(idx, def, || self.check_file(idx))
    }

    /// Coroutine argument, identified by address
    pub fn check_thread(&self, idx: i32) -> CheckResult<*const c_void> {
        self.check_type(idx, LuaType::Thread)?;
        Ok(self.state.to_pointer(idx))
    }

    /// Optional coroutine argument
    pub fn opt_thread(&self, idx: i32, def: *const c_void) -> CheckResult<*const c_void> {
        self.opt_with(idx, def, || self.check_thread(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argcheck_test::{noop_cfunction, FakeState, FakeTable, FakeValue, Metatable};
    use std::rc::Rc;

    fn extra(err: argcheck_sdk::CheckError) -> String {
        err.extra().unwrap_or_default().to_string()
    }

    #[test]
    fn test_check_none() {
        let mut state = FakeState::with_args([FakeValue::Nil, FakeValue::from(1i64)]);
        let args = Args::new(&mut state);
        assert!(args.check_none(1).is_ok());
        assert!(args.check_none(3).is_ok());
        assert_eq!(extra(args.check_none(2).unwrap_err()), "nil expected, got number");
    }

    #[test]
    fn test_bool_and_opt() {
        let mut state = FakeState::with_args([FakeValue::Boolean(true), FakeValue::Nil, FakeValue::from(0i64)]);
        let args = Args::new(&mut state);
        assert_eq!(args.check_bool(1), Ok(true));
        assert_eq!(args.opt_bool(2, true), Ok(true));
        assert_eq!(extra(args.opt_bool(3, false).unwrap_err()), "boolean expected, got number");
    }

    #[test]
    fn test_strings() {
        let mut state = FakeState::with_args([FakeValue::str("héllo"), FakeValue::from(5i64)]);
        let args = Args::new(&mut state);
        assert_eq!(args.check_lstr(1).unwrap(), "héllo".as_bytes());
        assert_eq!(args.check_str(1).unwrap(), "héllo");
        assert_eq!(args.opt_str(3, "dflt").unwrap(), "dflt");
        assert_eq!(args.opt_lstr(3, b"raw").unwrap(), b"raw");
        assert_eq!(extra(args.check_str(2).unwrap_err()), "string expected, got number");
    }

    #[test]
    fn test_type_error_uses_name_metafield() {
        let meta = Rc::new(Metatable::new().with_name("Point"));
        let mut state = FakeState::with_args([
            FakeValue::userdata(Some(meta)),
            FakeValue::LightUserData(8),
        ]);
        let args = Args::new(&mut state);
        assert_eq!(extra(args.check_table(1).unwrap_err()), "table expected, got Point");
        assert_eq!(extra(args.check_table(2).unwrap_err()), "table expected, got light userdata");
        assert!(args.check_pointer(2).is_ok());
    }

    #[test]
    fn test_functions() {
        let mut state = FakeState::with_args([
            FakeValue::lua_function(),
            FakeValue::cfunction(noop_cfunction),
            FakeValue::from(1i64),
        ]);
        let args = Args::new(&mut state);
        assert!(args.check_func(1).is_ok());
        assert_eq!(extra(args.check_cfunc(1).unwrap_err()), "cfunction expected, got function");
        assert!(args.check_cfunc(2).is_ok());
        assert!(args.opt_cfunc(4, None).unwrap().is_none());
        assert_eq!(args.opt_func(4, -1), Ok(-1));
        assert_eq!(args.opt_func(1, -1), Ok(1));
    }

    #[test]
    fn test_callable() {
        let callable = Rc::new(Metatable::new().with_call());
        let mut state = FakeState::with_args([
            FakeValue::table(FakeTable::new().with_metatable(callable)),
            FakeValue::from(2i64),
        ]);
        let args = Args::new(&mut state);
        assert!(args.check_callable(1).is_ok());
        assert_eq!(
            extra(args.check_callable(2).unwrap_err()),
            "callable object expected, got number"
        );
        assert_eq!(args.opt_callable(3, 0), Ok(0));
    }

    #[test]
    fn test_udata_and_file() {
        let mut state = FakeState::new();
        let file = state.new_file();
        state.push(file);
        let meta = state.register_metatable("my.type", Metatable::new());
        state.push(FakeValue::userdata(Some(meta)));
        state.push(FakeValue::table(FakeTable::new()));
        let args = Args::new(&mut state);
        assert!(args.check_file(1).is_ok());
        assert!(args.check_udata(2, "my.type").is_ok());
        assert_eq!(extra(args.check_file(2).unwrap_err()), "FILE* expected, got userdata");
        assert_eq!(extra(args.check_udata(3, "my.type").unwrap_err()), "my.type expected, got table");
        assert!(args.opt_file(4, std::ptr::null()).unwrap().is_null());
    }

    #[test]
    fn test_thread_and_userdata() {
        let mut state = FakeState::with_args([FakeValue::thread(), FakeValue::userdata(None)]);
        let args = Args::new(&mut state);
        assert!(!args.check_thread(1).unwrap().is_null());
        assert!(!args.check_userdata(2).unwrap().is_null());
        assert_eq!(extra(args.check_thread(2).unwrap_err()), "thread expected, got userdata");
    }
}
