//! Integration tests for bad argument messages as a Lua caller sees them

use argcheck::{errctx, ArgErrorContext, Args, CheckError, StockReporter};
use argcheck_sdk::NameWhat;
use argcheck_test::{FakeFrame, FakeState, FakeValue};

fn in_handler(args: impl IntoIterator<Item = FakeValue>) -> FakeState {
    FakeState::with_args(args).call_stack(vec![
        FakeFrame::named("resize", NameWhat::Field),
        FakeFrame::named("handler", NameWhat::Local).at("app.lua:7: "),
        FakeFrame::named("main", NameWhat::Global).at("main.lua:3: "),
    ])
}

fn message(result: Result<impl std::fmt::Debug, CheckError>) -> String {
    result.unwrap_err().to_string()
}

#[test]
fn test_uint8_scenarios() {
    let mut state = in_handler([
        FakeValue::from(255i64),
        FakeValue::from(256i64),
        FakeValue::str("x"),
    ]);
    let args = Args::new(&mut state);

    assert_eq!(args.check_uint8(1), Ok(255));
    assert_eq!(
        message(args.check_uint8(2)),
        "app.lua:7: bad argument #2 to 'handler' (uint8_t expected, got an out of range value)"
    );
    assert_eq!(
        message(args.check_uint8(3)),
        "app.lua:7: bad argument #3 to 'handler' (uint8_t expected, got string)"
    );
}

#[test]
fn test_opt_default_never_checked() {
    let mut state = in_handler([FakeValue::Nil]);
    let args = Args::new(&mut state);
    assert_eq!(args.opt_int(1, 7), Ok(7));
    assert_eq!(args.opt_uint8(1, 255), Ok(255));
    assert_eq!(args.opt_pint(2, 0), Ok(0));
}

#[test]
fn test_range_and_finite_scenarios() {
    let mut state = in_handler([FakeValue::from(5i64), FakeValue::Float(f64::NAN)]);
    let args = Args::new(&mut state);
    assert_eq!(
        args.check_int_in_range(1, 10, 20).unwrap_err().extra(),
        Some("integer from 10 to 20 expected, got an out of range value")
    );
    assert_eq!(
        args.check_finite(2).unwrap_err().extra(),
        Some("finite number expected, got an out of range value")
    );
}

#[test]
fn test_failures_are_idempotent() {
    let mut state = in_handler([FakeValue::Float(1.5)]);
    let args = Args::new(&mut state);
    let first = message(args.check_int(1));
    let second = message(args.check_int(1));
    assert_eq!(first, second);
    assert_eq!(args.check_num(1), Ok(1.5));
    assert_eq!(args.check_num(1), Ok(1.5));
}

#[test]
fn test_name_override_is_consumed() {
    let mut state = in_handler([FakeValue::str("wide"), FakeValue::str("tall")]);
    let args = Args::new(&mut state);

    errctx::set_name("foo");
    assert_eq!(
        message(args.check_uint16(2)),
        "app.lua:7: bad argument 'foo' to 'handler' (uint16_t expected, got string)"
    );
    assert_eq!(
        message(args.check_uint16(2)),
        "app.lua:7: bad argument #2 to 'handler' (uint16_t expected, got string)"
    );
}

#[test]
fn test_successful_check_clears_override() {
    let mut state = in_handler([FakeValue::from(1i64), FakeValue::Boolean(true)]);
    let args = Args::new(&mut state);
    errctx::set_index(9);
    assert!(args.check_int(1).is_ok());
    assert!(errctx::current().is_default());
    assert_eq!(args.check_str(2).unwrap_err().extra(), Some("string expected, got boolean"));
    assert!(message(args.check_str(2)).contains("bad argument #2 "));
}

#[test]
fn test_stack_level_blames_outer_function() {
    let mut state = in_handler([FakeValue::Nil]);
    let args = Args::new(&mut state);

    let _guard = errctx::set(ArgErrorContext::indexed(3).at_level(2));
    assert_eq!(
        message(args.check_table(1)),
        "app.lua:7: bad argument #3 to 'main' (table expected, got nil)"
    );

    errctx::set_stack_level(7);
    assert_eq!(
        message(args.check_table(1)),
        "app.lua:7: bad argument #1 (table expected, got nil)"
    );
}

#[test]
fn test_stock_reporter_for_methods() {
    let mut state = FakeState::with_args([FakeValue::Nil, FakeValue::str("n")])
        .call_stack(vec![FakeFrame::named("write", NameWhat::Method)]);
    let args = Args::with_reporter(&mut state, StockReporter::default());
    errctx::set_name("ignored");
    assert_eq!(
        message(args.check_userdata(1)),
        "calling 'write' on bad self (userdata expected, got nil)"
    );
    assert_eq!(
        message(args.check_int(2)),
        "bad argument #1 to 'write' (integer expected, got string)"
    );
}

#[test]
fn test_negative_index_reports_absolute_position() {
    let mut state = in_handler([FakeValue::from(1i64), FakeValue::str("s")]);
    let args = Args::new(&mut state);
    assert_eq!(args.check_bool(-1).unwrap_err().position(), Some(2));
}

#[test]
fn test_long_messages_are_clipped() {
    let long = "t".repeat(400);
    let mut state = in_handler([FakeValue::Nil]);
    let args = Args::new(&mut state);
    let err = args.check_udata(1, &long).unwrap_err();
    assert_eq!(err.extra().map(str::len), Some(argcheck::DEFAULT_MAX_EXTRA_LEN));
}

#[test]
fn test_flags_combine_variadic_arguments() {
    let mut state = in_handler([
        FakeValue::str("ignored"),
        FakeValue::from(1i64),
        FakeValue::Nil,
        FakeValue::from(6i64),
    ]);
    let args = Args::new(&mut state);
    assert_eq!(args.opt_flags(2), Ok(7));
    assert_eq!(
        message(args.opt_flags(1)),
        "app.lua:7: bad argument #1 to 'handler' (uint64_t expected, got string)"
    );
}
