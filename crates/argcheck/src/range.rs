//! Numeric bounds
//!
//! Every ranged check is expressed as a [`Bounds`] over one of three scalar
//! types: `i64` for integers, `u64` for unsigned and positive integers, and
//! `f64` for numbers. The fixed-width integer types are constant bounds over
//! the generic integer predicate (see [`SizedInt`]).

use argcheck_sdk::{CheckError, CheckResult, NumberModel};

use crate::numfmt;

// ============================================================================
// Bound scalars
// ============================================================================

/// Scalar type usable as a bound.
pub trait Bound: Copy + PartialOrd {
    /// Smallest representable bound
    const LOWEST: Self;
    /// Largest representable bound
    const HIGHEST: Self;

    /// Whether the value may be used as a bound at all
    fn is_valid_bound(self) -> bool;

    /// Text used inside messages
    fn render(self, model: NumberModel) -> String;
}

impl Bound for i64 {
    const LOWEST: Self = i64::MIN;
    const HIGHEST: Self = i64::MAX;

    fn is_valid_bound(self) -> bool {
        true
    }

    fn render(self, _model: NumberModel) -> String {
        numfmt::format_integer(self)
    }
}

impl Bound for u64 {
    const LOWEST: Self = 0;
    const HIGHEST: Self = u64::MAX;

    fn is_valid_bound(self) -> bool {
        true
    }

    fn render(self, _model: NumberModel) -> String {
        self.to_string()
    }
}

impl Bound for f64 {
    const LOWEST: Self = f64::NEG_INFINITY;
    const HIGHEST: Self = f64::INFINITY;

    fn is_valid_bound(self) -> bool {
        self.is_finite()
    }

    fn render(self, model: NumberModel) -> String {
        numfmt::format_float(self, model)
    }
}

// ============================================================================
// Bounds
// ============================================================================

/// Which limits a [`Bounds`] was built from; decides the message wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// Implied by the type name (`uint8_t`, or no limit at all)
    Named,
    AtLeast,
    AtMost,
    Between,
}

/// Closed interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<T> {
    min: T,
    max: T,
    shape: Shape,
}

/// Bounds for integer checks
pub type IntRange = Bounds<i64>;
/// Bounds for unsigned and positive integer checks
pub type UintRange = Bounds<u64>;
/// Bounds for number checks
pub type FloatRange = Bounds<f64>;

impl<T: Bound> Bounds<T> {
    /// No constraint beyond the type
    pub const fn full() -> Self {
        Self {
            min: T::LOWEST,
            max: T::HIGHEST,
            shape: Shape::Named,
        }
    }

    /// `[min, max]`; fails when a bound is invalid or `min > max`
    pub fn new(min: T, max: T) -> CheckResult<Self> {
        validate(min)?;
        validate(max)?;
        if min > max {
            return Err(CheckError::MalformedRange {
                message: format!(
                    "invalid range: min {} is greater than max {}",
                    min.render(NumberModel::FloatBacked),
                    max.render(NumberModel::FloatBacked)
                ),
            });
        }
        Ok(Self {
            min,
            max,
            shape: Shape::Between,
        })
    }

    /// `[n, +inf)`
    pub fn at_least(n: T) -> CheckResult<Self> {
        validate(n)?;
        Ok(Self {
            min: n,
            max: T::HIGHEST,
            shape: Shape::AtLeast,
        })
    }

    /// `(-inf, n]`
    pub fn at_most(n: T) -> CheckResult<Self> {
        validate(n)?;
        Ok(Self {
            min: T::LOWEST,
            max: n,
            shape: Shape::AtMost,
        })
    }

    /// Lower limit
    pub fn min(&self) -> T {
        self.min
    }

    /// Upper limit
    pub fn max(&self) -> T {
        self.max
    }

    /// Whether `v` lies inside the interval. NaN never does.
    #[inline]
    pub fn contains(&self, v: T) -> bool {
        v >= self.min && v <= self.max
    }

    /// What a value must be, e.g. `"integer from 10 to 20"`
    pub fn describe(&self, tname: &str, model: NumberModel) -> String {
        match self.shape {
            Shape::Named => tname.to_string(),
            Shape::AtLeast => format!(
                "{tname} greater than or equal to {}",
                self.min.render(model)
            ),
            Shape::AtMost => format!("{tname} less than or equal to {}", self.max.render(model)),
            Shape::Between => format!(
                "{tname} from {} to {}",
                self.min.render(model),
                self.max.render(model)
            ),
        }
    }
}

fn validate<T: Bound>(n: T) -> CheckResult<()> {
    if n.is_valid_bound() {
        Ok(())
    } else {
        Err(CheckError::MalformedRange {
            message: format!(
                "invalid bound: {} is not a finite number",
                n.render(NumberModel::FloatBacked)
            ),
        })
    }
}

/// Unwrap bounds inside a predicate; a malformed range is a bug in the caller.
#[track_caller]
pub(crate) fn or_panic<T>(bounds: CheckResult<Bounds<T>>) -> Bounds<T> {
    match bounds {
        Ok(bounds) => bounds,
        Err(e) => panic!("{e}"),
    }
}

// ============================================================================
// Fixed-width integers
// ============================================================================

/// A fixed-width integer type checked as a range of the VM integer.
pub trait SizedInt: Copy {
    /// Name used in messages, e.g. `"uint8_t"`
    const TYPE_NAME: &'static str;
    /// Smallest accepted VM integer
    const MIN: i64;
    /// Largest accepted VM integer
    const MAX: i64;

    /// Convert a VM integer already known to be in `MIN..=MAX`
    fn narrow(v: i64) -> Self;

    /// Bounds whose message is just the type name
    fn bounds() -> IntRange {
        Bounds {
            min: Self::MIN,
            max: Self::MAX,
            shape: Shape::Named,
        }
    }
}

macro_rules! sized_int {
    ($($ty:ty => $name:literal, $min:expr, $max:expr;)*) => {
        $(
            impl SizedInt for $ty {
                const TYPE_NAME: &'static str = $name;
                const MIN: i64 = $min;
                const MAX: i64 = $max;

                #[inline]
                fn narrow(v: i64) -> Self {
                    v as $ty
                }
            }
        )*
    };
}

sized_int! {
    i8 => "int8_t", i8::MIN as i64, i8::MAX as i64;
    i16 => "int16_t", i16::MIN as i64, i16::MAX as i64;
    i32 => "int32_t", i32::MIN as i64, i32::MAX as i64;
    i64 => "int64_t", i64::MIN, i64::MAX;
    u8 => "uint8_t", 0, u8::MAX as i64;
    u16 => "uint16_t", 0, u16::MAX as i64;
    u32 => "uint32_t", 0, u32::MAX as i64;
    // VM integers are signed 64-bit
    u64 => "uint64_t", 0, i64::MAX;
}
