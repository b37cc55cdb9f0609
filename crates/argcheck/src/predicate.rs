//! Predicates: side-effect free tests on stack slots
//!
//! Nothing here raises or touches the error context. The `*_value`
//! extractors are shared with the checks in [`crate::args`], so a check and
//! its predicate always agree on what is acceptable.
//!
//! Ranged predicates panic when handed a malformed range (`min > max` or a
//! non-finite float bound), like [`Ord::clamp`].

use argcheck_sdk::{LuaState, LuaType, FILE_HANDLE};

use crate::range::{or_panic, Bound, Bounds, SizedInt};

// ============================================================================
// Value types
// ============================================================================

/// Slot is absent or `nil`
pub fn is_none_or_nil<S: LuaState + ?Sized>(state: &S, idx: i32) -> bool {
    state.is_none_or_nil(idx)
}

/// Slot holds a string (numbers are not coerced)
pub fn is_str<S: LuaState + ?Sized>(state: &S, idx: i32) -> bool {
    state.type_of(idx) == LuaType::String
}

/// Slot holds a boolean
pub fn is_bool<S: LuaState + ?Sized>(state: &S, idx: i32) -> bool {
    state.type_of(idx) == LuaType::Boolean
}

/// Slot holds a table
pub fn is_table<S: LuaState + ?Sized>(state: &S, idx: i32) -> bool {
    state.type_of(idx) == LuaType::Table
}

/// Slot holds a Lua or native function
pub fn is_func<S: LuaState + ?Sized>(state: &S, idx: i32) -> bool {
    state.type_of(idx) == LuaType::Function
}

/// Slot holds a native function
pub fn is_cfunc<S: LuaState + ?Sized>(state: &S, idx: i32) -> bool {
    state.is_cfunction(idx)
}

/// Slot holds a coroutine
pub fn is_thread<S: LuaState + ?Sized>(state: &S, idx: i32) -> bool {
    state.type_of(idx) == LuaType::Thread
}

/// Slot holds a full userdata
pub fn is_userdata<S: LuaState + ?Sized>(state: &S, idx: i32) -> bool {
    state.type_of(idx) == LuaType::UserData
}

/// Slot holds a light userdata
pub fn is_pointer<S: LuaState + ?Sized>(state: &S, idx: i32) -> bool {
    state.type_of(idx) == LuaType::LightUserData
}

/// Slot holds an io library file handle
pub fn is_file<S: LuaState + ?Sized>(state: &S, idx: i32) -> bool {
    state.has_metatable_of(idx, FILE_HANDLE)
}

/// Slot holds a function, or a value whose metatable has a `__call` function
pub fn is_callable<S: LuaState + ?Sized>(state: &S, idx: i32) -> bool {
    is_func(state, idx) || state.metafield_type(idx, "__call") == LuaType::Function
}

/// Slot holds a full userdata whose metatable is the registry entry `tname`
pub fn is_userdata_of<S: LuaState + ?Sized>(state: &S, idx: i32, tname: &str) -> bool {
    is_userdata(state, idx) && state.has_metatable_of(idx, tname)
}

// ============================================================================
// Numeric extractors
// ============================================================================

/// Any number, as a float
pub fn num_value<S: LuaState + ?Sized>(state: &S, idx: i32) -> Option<f64> {
    if state.type_of(idx) != LuaType::Number {
        return None;
    }
    state.to_numeric(idx).map(|n| n.as_f64())
}

/// A number that is neither NaN nor infinite
pub fn finite_value<S: LuaState + ?Sized>(state: &S, idx: i32) -> Option<f64> {
    num_value(state, idx).filter(|v| v.is_finite())
}

/// A number `>= 0`, integral or not
pub fn unsigned_value<S: LuaState + ?Sized>(state: &S, idx: i32) -> Option<f64> {
    num_value(state, idx).filter(|v| *v >= 0.0)
}

/// An integer under the VM's number model
pub fn int_value<S: LuaState + ?Sized>(state: &S, idx: i32) -> Option<i64> {
    if state.type_of(idx) != LuaType::Number {
        return None;
    }
    state.to_numeric(idx)?.as_integer(state.number_model())
}

/// An integer `>= 0`
pub fn uint_value<S: LuaState + ?Sized>(state: &S, idx: i32) -> Option<u64> {
    int_value(state, idx).and_then(|v| u64::try_from(v).ok())
}

/// An integer `> 0`
pub fn pint_value<S: LuaState + ?Sized>(state: &S, idx: i32) -> Option<u64> {
    uint_value(state, idx).filter(|v| *v > 0)
}

fn within<T: Bound>(value: Option<T>, bounds: Bounds<T>) -> bool {
    value.is_some_and(|v| bounds.contains(v))
}

// ============================================================================
// Numeric predicates
// ============================================================================

macro_rules! numeric_predicates {
    ($(
        $(#[$doc:meta])*
        $value:ident: $ty:ty => $is:ident, $is_ge:ident, $is_le:ident, $is_in_range:ident;
    )*) => {
        $(
            $(#[$doc])*
            pub fn $is<S: LuaState + ?Sized>(state: &S, idx: i32) -> bool {
                $value(state, idx).is_some()
            }

            #[doc = concat!("[`", stringify!($is), "`] and `>= n`")]
            #[track_caller]
            pub fn $is_ge<S: LuaState + ?Sized>(state: &S, idx: i32, n: $ty) -> bool {
                within($value(state, idx), or_panic(Bounds::at_least(n)))
            }

            #[doc = concat!("[`", stringify!($is), "`] and `<= n`")]
            #[track_caller]
            pub fn $is_le<S: LuaState + ?Sized>(state: &S, idx: i32, n: $ty) -> bool {
                within($value(state, idx), or_panic(Bounds::at_most(n)))
            }

            #[doc = concat!("[`", stringify!($is), "`] and within `[min, max]`")]
            #[track_caller]
            pub fn $is_in_range<S: LuaState + ?Sized>(state: &S, idx: i32, min: $ty, max: $ty) -> bool {
                within($value(state, idx), or_panic(Bounds::new(min, max)))
            }
        )*
    };
}

numeric_predicates! {
    /// Slot holds a number
    num_value: f64 => is_num, is_num_ge, is_num_le, is_num_in_range;
    /// Slot holds a finite number
    finite_value: f64 => is_finite, is_finite_ge, is_finite_le, is_finite_in_range;
    /// Slot holds a non-negative number
    unsigned_value: f64 => is_unsigned, is_unsigned_ge, is_unsigned_le, is_unsigned_in_range;
    /// Slot holds an integer
    int_value: i64 => is_int, is_int_ge, is_int_le, is_int_in_range;
    /// Slot holds a non-negative integer
    uint_value: u64 => is_uint, is_uint_ge, is_uint_le, is_uint_in_range;
    /// Slot holds a positive integer
    pint_value: u64 => is_pint, is_pint_ge, is_pint_le, is_pint_in_range;
}

// ============================================================================
// Fixed-width integers
// ============================================================================

/// Slot holds an integer representable as `T`
pub fn is_sized<T: SizedInt, S: LuaState + ?Sized>(state: &S, idx: i32) -> bool {
    within(int_value(state, idx), T::bounds())
}

/// Slot holds a positive integer representable as the unsigned `T`
pub fn is_psized<T: SizedInt, S: LuaState + ?Sized>(state: &S, idx: i32) -> bool {
    int_value(state, idx).is_some_and(|v| v > 0 && T::bounds().contains(v))
}

macro_rules! sized_predicates {
    ($($name:ident => $via:ident::<$ty:ty>;)*) => {
        $(
            #[doc = concat!("Slot holds a `", stringify!($ty), "` value")]
            pub fn $name<S: LuaState + ?Sized>(state: &S, idx: i32) -> bool {
                $via::<$ty, S>(state, idx)
            }
        )*
    };
}

sized_predicates! {
    is_int8 => is_sized::<i8>;
    is_int16 => is_sized::<i16>;
    is_int32 => is_sized::<i32>;
    is_int64 => is_sized::<i64>;
    is_uint8 => is_sized::<u8>;
    is_uint16 => is_sized::<u16>;
    is_uint32 => is_sized::<u32>;
    is_uint64 => is_sized::<u64>;
    is_pint8 => is_psized::<u8>;
    is_pint16 => is_psized::<u16>;
    is_pint32 => is_psized::<u32>;
    is_pint64 => is_psized::<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use argcheck_sdk::NumberModel;
    use argcheck_test::{noop_cfunction, FakeState, FakeTable, FakeValue, Metatable};
    use std::rc::Rc;

    #[test]
    fn test_type_predicates() {
        let state = FakeState::with_args([
            FakeValue::str("s"),
            FakeValue::Boolean(false),
            FakeValue::table(FakeTable::new()),
            FakeValue::lua_function(),
            FakeValue::cfunction(noop_cfunction),
            FakeValue::thread(),
            FakeValue::userdata(None),
            FakeValue::LightUserData(0x10),
        ]);
        assert!(is_str(&state, 1));
        assert!(is_bool(&state, 2));
        assert!(is_table(&state, 3));
        assert!(is_func(&state, 4) && !is_cfunc(&state, 4));
        assert!(is_func(&state, 5) && is_cfunc(&state, 5));
        assert!(is_thread(&state, 6));
        assert!(is_userdata(&state, 7) && !is_pointer(&state, 7));
        assert!(is_pointer(&state, 8));
        assert!(is_none_or_nil(&state, 9));
    }

    #[test]
    fn test_callable() {
        let callable = Rc::new(Metatable::new().with_call());
        let state = FakeState::with_args([
            FakeValue::lua_function(),
            FakeValue::table(FakeTable::new().with_metatable(callable)),
            FakeValue::table(FakeTable::new()),
        ]);
        assert!(is_callable(&state, 1));
        assert!(is_callable(&state, 2));
        assert!(!is_callable(&state, 3));
    }

    #[test]
    fn test_file_and_userdata_of() {
        let mut state = FakeState::new();
        let file = state.new_file();
        state.push(file);
        let meta = state.register_metatable("my.type", Metatable::new());
        state.push(FakeValue::userdata(Some(meta)));
        assert!(is_file(&state, 1));
        assert!(!is_file(&state, 2));
        assert!(is_userdata_of(&state, 2, "my.type"));
        assert!(!is_userdata_of(&state, 1, "my.type"));
    }

    #[test]
    fn test_number_family() {
        let state = FakeState::with_args([
            FakeValue::Float(1.5),
            FakeValue::Float(f64::NAN),
            FakeValue::Float(-0.5),
            FakeValue::Integer(0),
            FakeValue::str("1"),
        ]);
        assert!(is_num(&state, 1) && is_finite(&state, 1) && is_unsigned(&state, 1));
        assert!(is_num(&state, 2) && !is_finite(&state, 2) && !is_unsigned(&state, 2));
        assert!(!is_unsigned(&state, 3));
        assert!(is_uint(&state, 4) && !is_pint(&state, 4));
        assert!(!is_num(&state, 5) && !is_int(&state, 5));
    }

    #[test]
    fn test_integer_models() {
        let tagged = FakeState::with_args([FakeValue::Float(1.0), FakeValue::Float(1.1)]);
        assert!(!is_int(&tagged, 1));

        let float_backed = FakeState::with_args([FakeValue::Float(1.0), FakeValue::Float(1.1)])
            .number_model_of(NumberModel::FloatBacked);
        assert!(is_int(&float_backed, 1));
        assert!(!is_int(&float_backed, 2));
    }

    #[test]
    fn test_ranged() {
        let state = FakeState::with_args([5i64]);
        assert!(is_int_in_range(&state, 1, 5, 5));
        assert!(!is_int_in_range(&state, 1, 10, 20));
        assert!(is_int_ge(&state, 1, 5) && !is_int_ge(&state, 1, 6));
        assert!(is_uint_le(&state, 1, 5) && !is_uint_le(&state, 1, 4));
        assert!(is_num_in_range(&state, 1, 4.5, 5.5));
    }

    #[test]
    fn test_sized() {
        let state = FakeState::with_args([255i64, 256, -1, 0]);
        assert!(is_uint8(&state, 1));
        assert!(!is_uint8(&state, 2) && is_uint16(&state, 2));
        assert!(!is_uint64(&state, 3) && is_int8(&state, 3));
        assert!(is_uint8(&state, 4) && !is_pint8(&state, 4));
        assert!(is_pint8(&state, 1) && !is_pint8(&state, 2));
    }

    #[test]
    #[should_panic(expected = "invalid range")]
    fn test_malformed_range_panics_before_value() {
        let state = FakeState::with_args([FakeValue::Nil]);
        is_int_in_range(&state, 1, 20, 10);
    }

    #[test]
    #[should_panic(expected = "not a finite number")]
    fn test_non_finite_bound_panics() {
        let state = FakeState::with_args([1.0f64]);
        is_num_le(&state, 1, f64::NAN);
    }
}
