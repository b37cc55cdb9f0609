//! Lua-callable entry points
//!
//! These back the `check`, `checkopt`, `is` and `tostring` modules. Each takes
//! the value under test at slot 1; trailing arguments prime the error context
//! so a Lua caller can name the argument and choose the blamed frame:
//!
//! ```lua
//! check.uint8(v, 'width', 2)      -- bad argument 'width' to '<caller of caller>'
//! check.int(v, 1, 10, 3)          -- integer from 1 to 10, reported as #3
//! checkopt.str(v, 'dflt', 'name') -- default checked first, as #2
//! ```

use argcheck_sdk::{CheckResult, LuaState, LuaType};

use crate::args::Args;
use crate::errctx::{self, ArgErrorContext, ContextGuard};
use crate::kind::{is_kind, Kind};
use crate::predicate;
use crate::range::{Bound, Bounds};
use crate::report::Reporter;
use crate::tostring;

/// What an entry point leaves as its single return value
#[derive(Debug, Clone, PartialEq)]
pub enum Returned {
    /// `nil`
    Nil,
    /// The argument at this slot, unchanged
    Arg(i32),
    /// A boolean
    Boolean(bool),
    /// An integer
    Integer(i64),
    /// A string
    Bytes(Vec<u8>),
}

/// Install the error context described by the slots `name_idx` (a name, a
/// positive index, or nil) and `level_idx` (stack level, default 1).
///
/// The override slots are validated themselves, before anything is primed.
pub fn prime<S, R>(args: &Args<'_, S, R>, name_idx: i32, level_idx: i32) -> CheckResult<ContextGuard>
where
    S: LuaState + ?Sized,
    R: Reporter,
{
    let mut ctx = ArgErrorContext::new();
    match args.state().type_of(name_idx) {
        LuaType::None | LuaType::Nil => {}
        LuaType::String => ctx.name = Some(args.check_str(name_idx)?.into_owned()),
        _ => ctx.index = u32::try_from(args.check_pint(name_idx)?).unwrap_or(u32::MAX),
    }
    let level = args.opt_uint(level_idx, 1)?;
    ctx.stack_level = usize::try_from(level).unwrap_or(usize::MAX);
    Ok(errctx::set(ctx))
}

/// Which limits were passed at slots 2 and 3
fn limits<T: Bound>(
    min_absent: bool,
    max_absent: bool,
    read: impl Fn(i32) -> CheckResult<T>,
) -> CheckResult<Bounds<T>> {
    match (min_absent, max_absent) {
        (true, true) => Ok(Bounds::full()),
        (true, false) => Bounds::at_most(read(3)?),
        (false, true) => Bounds::at_least(read(2)?),
        (false, false) => {
            let min = read(2)?;
            Bounds::new(min, read(3)?)
        }
    }
}

macro_rules! check_bounded {
    ($args:ident, $check:ident, $ge:ident, $le:ident, $in_range:ident) => {{
        let (min_absent, max_absent) = ($args.is_none_or_nil(2), $args.is_none_or_nil(3));
        let bounds = limits(min_absent, max_absent, |i| $args.$check(i))?;
        let _guard = prime($args, 4, 5)?;
        match (min_absent, max_absent) {
            (true, true) => $args.$check(1).map(drop),
            (true, false) => $args.$le(1, bounds.max()).map(drop),
            (false, true) => $args.$ge(1, bounds.min()).map(drop),
            (false, false) => $args.$in_range(1, bounds.min(), bounds.max()).map(drop),
        }
    }};
}

/// `check.<kind>(v [, name_or_index [, level]])`, or for `num`, `int` and
/// `finite`: `check.<kind>(v [, min [, max [, name_or_index [, level]]]])`.
/// Returns `v`.
pub fn check<S, R>(args: &Args<'_, S, R>, kind: Kind) -> CheckResult<Returned>
where
    S: LuaState + ?Sized,
    R: Reporter,
{
    match kind {
        Kind::None => return check_none(args),
        Kind::Num => check_bounded!(args, check_num, check_num_ge, check_num_le, check_num_in_range)?,
        Kind::Int => check_bounded!(args, check_int, check_int_ge, check_int_le, check_int_in_range)?,
        Kind::Finite => check_bounded!(
            args,
            check_finite,
            check_finite_ge,
            check_finite_le,
            check_finite_in_range
        )?,
        _ => {
            let _guard = prime(args, 2, 3)?;
            args.check_kind(1, kind)?;
        }
    }
    Ok(Returned::Arg(1))
}

/// `check.none(v [, name_or_index [, level]])`
pub fn check_none<S, R>(args: &Args<'_, S, R>) -> CheckResult<Returned>
where
    S: LuaState + ?Sized,
    R: Reporter,
{
    if !args.is_none_or_nil(1) {
        let _guard = prime(args, 2, 3)?;
        args.check_none(1)?;
    }
    Ok(Returned::Nil)
}

/// `check.flags(...)`: OR of every argument as `uint64_t`
pub fn flags<S, R>(args: &Args<'_, S, R>) -> CheckResult<Returned>
where
    S: LuaState + ?Sized,
    R: Reporter,
{
    // Integers are 64-bit signed on the Lua side; the bit pattern is kept.
    args.opt_flags(1).map(|f| Returned::Integer(f as i64))
}

/// `checkopt.<kind>(v [, default [, name [, level]]])`
///
/// No arguments or a lone nil give nil; a lone value is checked. Otherwise a
/// non-nil default is checked first and reported as `#2`, then `v` unless it
/// is nil, in which case the default is returned.
pub fn check_opt<S, R>(args: &Args<'_, S, R>, kind: Kind) -> CheckResult<Returned>
where
    S: LuaState + ?Sized,
    R: Reporter,
{
    let top = args.top();
    if top == 0 || (top == 1 && args.is_none_or_nil(1)) {
        return Ok(Returned::Nil);
    }
    if top == 1 {
        args.check_kind(1, kind)?;
        return Ok(Returned::Arg(1));
    }

    if !args.is_none_or_nil(2) {
        args.check_kind(2, kind)?;
    }

    let mut ctx = ArgErrorContext::new();
    if !args.is_none_or_nil(3) {
        ctx.name = Some(args.check_str(3)?.into_owned());
    }
    ctx.stack_level = usize::try_from(args.opt_uint(4, 1)?).unwrap_or(usize::MAX);
    let _guard = errctx::set(ctx);

    if args.is_none_or_nil(1) {
        return Ok(Returned::Arg(2));
    }
    args.check_kind(1, kind)?;
    Ok(Returned::Arg(1))
}

macro_rules! is_bounded {
    ($args:ident, $read:ident, $is:ident, $ge:ident, $le:ident, $in_range:ident) => {{
        let (min_absent, max_absent) = ($args.is_none_or_nil(2), $args.is_none_or_nil(3));
        let bounds = limits(min_absent, max_absent, |i| $args.$read(i))?;
        let state = $args.state();
        match (min_absent, max_absent) {
            (true, true) => predicate::$is(state, 1),
            (true, false) => predicate::$le(state, 1, bounds.max()),
            (false, true) => predicate::$ge(state, 1, bounds.min()),
            (false, false) => predicate::$in_range(state, 1, bounds.min(), bounds.max()),
        }
    }};
}

/// `is.<kind>(v)`, or for the unsized numeric kinds `is.<kind>(v [, min [, max]])`
///
/// Limits are validated like a check, so a bad `min` raises rather than
/// answering `false`.
pub fn is<S, R>(args: &Args<'_, S, R>, kind: Kind) -> CheckResult<Returned>
where
    S: LuaState + ?Sized,
    R: Reporter,
{
    let yes = match kind {
        Kind::Num => is_bounded!(args, check_num, is_num, is_num_ge, is_num_le, is_num_in_range),
        Kind::Unsigned => is_bounded!(
            args,
            check_unsigned,
            is_unsigned,
            is_unsigned_ge,
            is_unsigned_le,
            is_unsigned_in_range
        ),
        Kind::Finite => is_bounded!(
            args,
            check_finite,
            is_finite,
            is_finite_ge,
            is_finite_le,
            is_finite_in_range
        ),
        Kind::Int => is_bounded!(args, check_int, is_int, is_int_ge, is_int_le, is_int_in_range),
        Kind::Uint => is_bounded!(args, check_uint, is_uint, is_uint_ge, is_uint_le, is_uint_in_range),
        Kind::Pint => is_bounded!(args, check_pint, is_pint, is_pint_ge, is_pint_le, is_pint_in_range),
        _ => is_kind(args.state(), 1, kind),
    };
    Ok(Returned::Boolean(yes))
}

/// `tostring(v)`
pub fn tostring<S, R>(args: &mut Args<'_, S, R>) -> CheckResult<Returned>
where
    S: LuaState + ?Sized,
    R: Reporter,
{
    tostring::to_display(args.state_mut(), 1).map(Returned::Bytes)
}
