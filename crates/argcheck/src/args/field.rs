//! Checks on table fields and array elements
//!
//! The value is pushed, checked at the new top and popped again, so a
//! failure reports the pushed slot's absolute position.

use argcheck_sdk::{CheckResult, LuaState};

use super::Args;
use crate::report::Reporter;

/// Where a value lives inside a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key<'k> {
    /// `t[name]`
    Name(&'k str),
    /// `t[n]`
    Index(i64),
}

impl<'k> From<&'k str> for Key<'k> {
    fn from(name: &'k str) -> Self {
        Key::Name(name)
    }
}

impl From<i64> for Key<'_> {
    fn from(n: i64) -> Self {
        Key::Index(n)
    }
}

macro_rules! field_checks {
    ($(
        $ty:ty => $check:ident / $opt:ident;
        of: $check_of:ident, $opt_of:ident;
        at: $check_at:ident, $opt_at:ident;
    )*) => {
        impl<'l, S: LuaState + ?Sized, R: Reporter> Args<'l, S, R> {
            $(
                #[doc = concat!("[`Self::", stringify!($check), "`] on `t[name]`")]
                pub fn $check_of(&mut self, table: i32, name: &str) -> CheckResult<$ty> {
                    self.with_field(table, name, |args, idx| args.$check(idx).map(Into::into))
                }

                #[doc = concat!("[`Self::", stringify!($opt), "`] on `t[name]`")]
                pub fn $opt_of(&mut self, table: i32, name: &str, def: $ty) -> CheckResult<$ty> {
                    self.with_field(table, name, |args, idx| {
                        args.opt_with(idx, def, || args.$check(idx).map(Into::into))
                    })
                }

                #[doc = concat!("[`Self::", stringify!($check), "`] on `t[n]`")]
                pub fn $check_at(&mut self, table: i32, n: i64) -> CheckResult<$ty> {
                    self.with_field(table, n, |args, idx| args.$check(idx).map(Into::into))
                }

                #[doc = concat!("[`Self::", stringify!($opt), "`] on `t[n]`")]
                pub fn $opt_at(&mut self, table: i32, n: i64, def: $ty) -> CheckResult<$ty> {
                    self.with_field(table, n, |args, idx| {
                        args.opt_with(idx, def, || args.$check(idx).map(Into::into))
                    })
                }
            )*
        }
    };
}

field_checks! {
    Vec<u8> => check_lstr / opt_lstr;
        of: check_lstr_of, opt_lstr_of;
        at: check_lstr_at, opt_lstr_at;
    String => check_str / opt_str;
        of: check_str_of, opt_str_of;
        at: check_str_at, opt_str_at;
    f64 => check_num / opt_num;
        of: check_num_of, opt_num_of;
        at: check_num_at, opt_num_at;
    i64 => check_int / opt_int;
        of: check_int_of, opt_int_of;
        at: check_int_at, opt_int_at;
    bool => check_bool / opt_bool;
        of: check_bool_of, opt_bool_of;
        at: check_bool_at, opt_bool_at;
}

impl<'l, S: LuaState + ?Sized, R: Reporter> Args<'l, S, R> {
    /// Push `table[key]`, run `check` on it and pop it again.
    ///
    /// `table` must hold a table.
    pub fn with_field<'k, T>(
        &mut self,
        table: i32,
        key: impl Into<Key<'k>>,
        check: impl FnOnce(&Self, i32) -> CheckResult<T>,
    ) -> CheckResult<T> {
        self.push_field(table, key.into());
        let top = self.state.top();
        let result = check(self, top);
        self.state.pop(1);
        result
    }

    /// Table at `t[name]`, left on the stack; yields its absolute index.
    pub fn check_table_of(&mut self, table: i32, name: &str) -> CheckResult<i32> {
        self.keep_table(table, Key::Name(name))
    }

    /// Table at `t[n]`, left on the stack; yields its absolute index.
    pub fn check_table_at(&mut self, table: i32, n: i64) -> CheckResult<i32> {
        self.keep_table(table, Key::Index(n))
    }

    fn keep_table(&mut self, table: i32, key: Key<'_>) -> CheckResult<i32> {
        self.push_field(table, key);
        let top = self.state.top();
        match self.check_table(top) {
            Ok(()) => Ok(top),
            Err(e) => {
                self.state.pop(1);
                Err(e)
            }
        }
    }

    fn push_field(&mut self, table: i32, key: Key<'_>) {
        let table = self.state.abs_index(table);
        match key {
            Key::Name(name) => self.state.push_raw_field(table, name),
            Key::Index(n) => self.state.push_raw_index(table, n),
        }
    }
}
