//! Numeric checks: numbers, integers, ranges and fixed-width integers

use argcheck_sdk::{CheckResult, LuaState};

use super::Args;
use crate::errctx;
use crate::predicate::{finite_value, int_value, num_value, pint_value, uint_value, unsigned_value};
use crate::range::{Bound, Bounds, SizedInt};
use crate::report::Reporter;

/// Malformed bounds are reported before the value is looked at.
fn valid<T>(bounds: CheckResult<Bounds<T>>) -> CheckResult<Bounds<T>> {
    bounds.map_err(|e| {
        errctx::reset();
        e
    })
}

macro_rules! bounded_checks {
    ($(
        $(#[$doc:meta])*
        $value:ident: $ty:ty, $tname:literal =>
            $check:ident, $opt:ident,
            $check_ge:ident, $check_le:ident, $check_in_range:ident,
            $opt_ge:ident, $opt_le:ident, $opt_in_range:ident;
    )*) => {
        impl<'l, S: LuaState + ?Sized, R: Reporter> Args<'l, S, R> {
            $(
                $(#[$doc])*
                pub fn $check(&self, idx: i32) -> CheckResult<$ty> {
                    self.check_within(idx, $value(&*self.state, idx), $tname, Bounds::full())
                }

                #[doc = concat!("Optional [`Self::", stringify!($check), "`]")]
                pub fn $opt(&self, idx: i32, def: $ty) -> CheckResult<$ty> {
                    self.opt_with(idx, def, || self.$check(idx))
                }

                #[doc = concat!("[`Self::", stringify!($check), "`] that is `>= n`")]
                pub fn $check_ge(&self, idx: i32, n: $ty) -> CheckResult<$ty> {
                    let bounds = valid(Bounds::at_least(n))?;
                    self.check_within(idx, $value(&*self.state, idx), $tname, bounds)
                }

                #[doc = concat!("[`Self::", stringify!($check), "`] that is `<= n`")]
                pub fn $check_le(&self, idx: i32, n: $ty) -> CheckResult<$ty> {
                    let bounds = valid(Bounds::at_most(n))?;
                    self.check_within(idx, $value(&*self.state, idx), $tname, bounds)
                }

                #[doc = concat!("[`Self::", stringify!($check), "`] within `[min, max]`")]
                pub fn $check_in_range(&self, idx: i32, min: $ty, max: $ty) -> CheckResult<$ty> {
                    let bounds = valid(Bounds::new(min, max))?;
                    self.check_within(idx, $value(&*self.state, idx), $tname, bounds)
                }

                #[doc = concat!("Optional [`Self::", stringify!($check_ge), "`]")]
                pub fn $opt_ge(&self, idx: i32, n: $ty, def: $ty) -> CheckResult<$ty> {
                    let bounds = valid(Bounds::at_least(n))?;
                    self.opt_with(idx, def, || {
                        self.check_within(idx, $value(&*self.state, idx), $tname, bounds)
                    })
                }

                #[doc = concat!("Optional [`Self::", stringify!($check_le), "`]")]
                pub fn $opt_le(&self, idx: i32, n: $ty, def: $ty) -> CheckResult<$ty> {
                    let bounds = valid(Bounds::at_most(n))?;
                    self.opt_with(idx, def, || {
                        self.check_within(idx, $value(&*self.state, idx), $tname, bounds)
                    })
                }

                #[doc = concat!("Optional [`Self::", stringify!($check_in_range), "`]")]
                pub fn $opt_in_range(&self, idx: i32, min: $ty, max: $ty, def: $ty) -> CheckResult<$ty> {
                    let bounds = valid(Bounds::new(min, max))?;
                    self.opt_with(idx, def, || {
                        self.check_within(idx, $value(&*self.state, idx), $tname, bounds)
                    })
                }
            )*
        }
    };
}

bounded_checks! {
    /// Number argument (integer or float, no string coercion)
    num_value: f64, "number" =>
        check_num, opt_num,
        check_num_ge, check_num_le, check_num_in_range,
        opt_num_ge, opt_num_le, opt_num_in_range;
    /// Number that is neither NaN nor infinite
    finite_value: f64, "finite number" =>
        check_finite, opt_finite,
        check_finite_ge, check_finite_le, check_finite_in_range,
        opt_finite_ge, opt_finite_le, opt_finite_in_range;
    /// Number `>= 0`
    unsigned_value: f64, "unsigned number" =>
        check_unsigned, opt_unsigned,
        check_unsigned_ge, check_unsigned_le, check_unsigned_in_range,
        opt_unsigned_ge, opt_unsigned_le, opt_unsigned_in_range;
    /// Integer argument under the VM's number model
    int_value: i64, "integer" =>
        check_int, opt_int,
        check_int_ge, check_int_le, check_int_in_range,
        opt_int_ge, opt_int_le, opt_int_in_range;
    /// Integer `>= 0`
    uint_value: u64, "unsigned integer" =>
        check_uint, opt_uint,
        check_uint_ge, check_uint_le, check_uint_in_range,
        opt_uint_ge, opt_uint_le, opt_uint_in_range;
    /// Integer `> 0`
    pint_value: u64, "positive integer" =>
        check_pint, opt_pint,
        check_pint_ge, check_pint_le, check_pint_in_range,
        opt_pint_ge, opt_pint_le, opt_pint_in_range;
}

macro_rules! sized_checks {
    ($($ty:ty => $check:ident, $opt:ident;)*) => {
        impl<'l, S: LuaState + ?Sized, R: Reporter> Args<'l, S, R> {
            $(
                #[doc = concat!("`", stringify!($ty), "` argument")]
                pub fn $check(&self, idx: i32) -> CheckResult<$ty> {
                    self.check_sized::<$ty>(idx)
                }

                #[doc = concat!("Optional `", stringify!($ty), "` argument")]
                pub fn $opt(&self, idx: i32, def: $ty) -> CheckResult<$ty> {
                    self.opt_sized::<$ty>(idx, def)
                }
            )*
        }
    };
}

sized_checks! {
    i8 => check_int8, opt_int8;
    i16 => check_int16, opt_int16;
    i32 => check_int32, opt_int32;
    i64 => check_int64, opt_int64;
    u8 => check_uint8, opt_uint8;
    u16 => check_uint16, opt_uint16;
    u32 => check_uint32, opt_uint32;
    u64 => check_uint64, opt_uint64;
}

impl<'l, S: LuaState + ?Sized, R: Reporter> Args<'l, S, R> {
    /// Accept a value inside `bounds`, reporting against `tname`
    fn check_within<T: Bound>(
        &self,
        idx: i32,
        value: Option<T>,
        tname: &str,
        bounds: Bounds<T>,
    ) -> CheckResult<T> {
        let model = self.state.number_model();
        self.accept(idx, value.filter(|v| bounds.contains(*v)), || {
            bounds.describe(tname, model)
        })
    }

    /// Integer argument representable as `T`
    pub fn check_sized<T: SizedInt>(&self, idx: i32) -> CheckResult<T> {
        self.check_within(idx, int_value(&*self.state, idx), T::TYPE_NAME, T::bounds())
            .map(T::narrow)
    }

    /// Optional [`Self::check_sized`]
    pub fn opt_sized<T: SizedInt>(&self, idx: i32, def: T) -> CheckResult<T> {
        self.opt_with(idx, def, || self.check_sized::<T>(idx))
    }

    /// OR of every argument from `start` to the top, each an optional
    /// `uint64_t` defaulting to 0.
    pub fn opt_flags(&self, start: i32) -> CheckResult<u64> {
        let mut flags = 0;
        for idx in start..=self.state.top() {
            flags |= self.opt_uint64(idx, 0)?;
        }
        Ok(flags)
    }
}
