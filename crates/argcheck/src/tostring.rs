//! Stringification for messages and the `tostring` module

use argcheck_sdk::{CheckError, CheckResult, LuaState, LuaType};

use crate::numfmt;

/// Text for the value at `idx`, honoring `__tostring`.
///
/// The metamethod must produce a string or a number. Without one, numbers
/// and strings convert as-is, an absent slot gives `""`, and reference types
/// render as `"<typename>: <address>"`. The stack is left unchanged.
pub fn to_display<S: LuaState + ?Sized>(state: &mut S, idx: i32) -> CheckResult<Vec<u8>> {
    let idx = state.abs_index(idx);

    if state.call_meta(idx, "__tostring")? {
        let top = state.top();
        let text = match state.type_of(top) {
            LuaType::String | LuaType::Number => plain(state, top),
            _ => None,
        };
        state.pop(1);
        return text.ok_or(CheckError::ToStringNotString);
    }

    let text = match state.type_of(idx) {
        LuaType::Number | LuaType::String => plain(state, idx).unwrap_or_default(),
        LuaType::None => Vec::new(),
        LuaType::Nil => b"nil".to_vec(),
        LuaType::Boolean => {
            let b = if state.to_boolean(idx) { "true" } else { "false" };
            b.as_bytes().to_vec()
        }
        t => format!("{}: {:p}", t.name(), state.to_pointer(idx)).into_bytes(),
    };
    Ok(text)
}

/// [`to_display`] with invalid UTF-8 replaced
pub fn to_display_string<S: LuaState + ?Sized>(state: &mut S, idx: i32) -> CheckResult<String> {
    to_display(state, idx).map(|bytes| match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

fn plain<S: LuaState + ?Sized>(state: &S, idx: i32) -> Option<Vec<u8>> {
    if let Some(bytes) = state.to_bytes(idx) {
        return Some(bytes.to_vec());
    }
    state
        .to_numeric(idx)
        .map(|n| numfmt::format_numeric(n, state.number_model()).into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use argcheck_sdk::NumberModel;
    use argcheck_test::{FakeState, FakeTable, FakeValue, Metatable};
    use std::rc::Rc;

    fn show(state: &mut FakeState, idx: i32) -> String {
        to_display_string(state, idx).unwrap()
    }

    #[test]
    fn test_primitives() {
        let mut state = FakeState::with_args([
            FakeValue::Nil,
            FakeValue::Boolean(false),
            FakeValue::from(42i64),
            FakeValue::Float(1.0),
            FakeValue::Float(0.1),
            FakeValue::str("text"),
        ]);
        assert_eq!(show(&mut state, 1), "nil");
        assert_eq!(show(&mut state, 2), "false");
        assert_eq!(show(&mut state, 3), "42");
        assert_eq!(show(&mut state, 4), "1.0");
        assert_eq!(show(&mut state, 5), "0.1");
        assert_eq!(show(&mut state, 6), "text");
        assert_eq!(show(&mut state, 7), "");
        assert_eq!(state.top(), 6);
    }

    #[test]
    fn test_float_backed_numbers() {
        let mut state = FakeState::with_args([FakeValue::Float(3.0)]).number_model_of(NumberModel::FloatBacked);
        assert_eq!(show(&mut state, 1), "3");
    }

    #[test]
    fn test_reference_types() {
        let mut state = FakeState::with_args([FakeValue::table(FakeTable::new()), FakeValue::thread()]);
        let table = show(&mut state, 1);
        assert!(table.starts_with("table: 0x"), "{table}");
        assert!(show(&mut state, -1).starts_with("thread: 0x"));
    }

    #[test]
    fn test_tostring_metamethod() {
        let named = Rc::new(Metatable::new().with_tostring(FakeValue::str("<point>")));
        let numeric = Rc::new(Metatable::new().with_tostring(FakeValue::from(7i64)));
        let mut state = FakeState::with_args([
            FakeValue::userdata(Some(named)),
            FakeValue::table(FakeTable::new().with_metatable(numeric)),
        ]);
        assert_eq!(show(&mut state, 1), "<point>");
        assert_eq!(show(&mut state, 2), "7");
        assert_eq!(state.top(), 2);
    }

    #[test]
    fn test_tostring_must_return_string() {
        let meta = Rc::new(Metatable::new().with_tostring(FakeValue::Boolean(true)));
        let mut state = FakeState::with_args([FakeValue::userdata(Some(meta))]);
        assert_eq!(to_display(&mut state, 1), Err(CheckError::ToStringNotString));
        assert_eq!(
            CheckError::ToStringNotString.to_string(),
            "\"__tostring\" metamethod must return a string"
        );
        assert_eq!(state.top(), 1);
    }

    #[test]
    fn test_tostring_error_propagates() {
        let meta = Rc::new(Metatable::new().with_failing_tostring("boom"));
        let mut state = FakeState::with_args([FakeValue::userdata(Some(meta))]);
        assert_eq!(to_display(&mut state, 1), Err(CheckError::Runtime("boom".to_string())));
    }
}
