//! Reporters: turn a failed check into the VM's bad argument error
//!
//! # Message shapes
//!
//! ```text
//! ContextReporter   bad argument <name> to '<function>' (<extra>)
//!                   bad argument <name> (<extra>)              no such frame
//! StockReporter     bad argument #<n> to '<function>' (<extra>)
//!                   calling '<function>' on bad self (<extra>)
//!                   bad argument #<n> (<extra>)                no frame at all
//! ```
//!
//! Both prefix the caller's `"chunk:line: "` when the VM knows it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use argcheck_sdk::{CallStack, CheckError, NameWhat};

use crate::errctx;

/// Extra message limit of the fixed-size buffer the VM formats into
pub const DEFAULT_MAX_EXTRA_LEN: usize = 254;

/// Strategy that builds bad argument errors.
pub trait Reporter {
    /// Error for the argument at absolute `position`, with `extra` as the
    /// parenthesised explanation. Consumes the error context.
    fn bad_argument<C: CallStack + ?Sized>(
        &self,
        frames: &C,
        position: i32,
        extra: String,
    ) -> CheckError;
}

/// Honors the error context: name and index overrides, blamed stack level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextReporter {
    max_extra_len: usize,
}

impl ContextReporter {
    /// Reporter clipping extra messages to `max_extra_len` bytes
    pub fn new(max_extra_len: usize) -> Self {
        Self { max_extra_len }
    }
}

impl Default for ContextReporter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_EXTRA_LEN)
    }
}

impl Reporter for ContextReporter {
    fn bad_argument<C: CallStack + ?Sized>(
        &self,
        frames: &C,
        position: i32,
        extra: String,
    ) -> CheckError {
        let ctx = errctx::take();
        let name = ctx.display_name(position);
        let extra = clip(extra, self.max_extra_len);

        let message = match frames.frame_at(ctx.stack_level) {
            None => format!("bad argument {name} ({extra})"),
            Some(frame) => {
                let function = frames.function_name(&frame).name;
                format!(
                    "bad argument {name} to '{}' ({extra})",
                    function.as_deref().unwrap_or("?")
                )
            }
        };
        raise(frames, position, extra, message)
    }
}

/// The VM's own argument error, as used when the library runs standalone.
///
/// Ignores the error context (but still resets it) and blames the running
/// function. For method calls the receiver is not counted, so argument 1
/// becomes `self`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockReporter {
    max_extra_len: usize,
}

impl StockReporter {
    /// Reporter clipping extra messages to `max_extra_len` bytes
    pub fn new(max_extra_len: usize) -> Self {
        Self { max_extra_len }
    }
}

impl Default for StockReporter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_EXTRA_LEN)
    }
}

impl Reporter for StockReporter {
    fn bad_argument<C: CallStack + ?Sized>(
        &self,
        frames: &C,
        position: i32,
        extra: String,
    ) -> CheckError {
        errctx::reset();
        let extra = clip(extra, self.max_extra_len);

        let Some(frame) = frames.frame_at(0) else {
            let message = format!("bad argument #{position} ({extra})");
            return raise(frames, position, extra, message);
        };

        let info = frames.function_name(&frame);
        let mut arg = position;
        if info.what == NameWhat::Method {
            arg -= 1;
            if arg == 0 {
                let message = format!(
                    "calling '{}' on bad self ({extra})",
                    info.name.as_deref().unwrap_or("?")
                );
                return raise(frames, position, extra, message);
            }
        }

        let function = info
            .name
            .or_else(|| frames.global_function_name(&frame))
            .unwrap_or_else(|| "?".to_string());
        let message = format!("bad argument #{arg} to '{function}' ({extra})");
        raise(frames, position, extra, message)
    }
}

fn raise<C: CallStack + ?Sized>(
    frames: &C,
    position: i32,
    extra: String,
    message: String,
) -> CheckError {
    let message = match frames.location(1) {
        Some(location) => format!("{location}{message}"),
        None => message,
    };
    debug!(position, %message, "bad argument");
    CheckError::BadArgument {
        position,
        extra,
        message,
    }
}

/// Cut `extra` to at most `max` bytes on a character boundary
fn clip(mut extra: String, max: usize) -> String {
    if extra.len() > max {
        let mut end = max;
        while !extra.is_char_boundary(end) {
            end -= 1;
        }
        extra.truncate(end);
    }
    extra
}

// ============================================================================
// Configuration
// ============================================================================

/// Which reporter to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStyle {
    /// [`ContextReporter`]
    #[default]
    Contextual,
    /// [`StockReporter`]
    Stock,
}

/// Reporter selection, chosen when a library is constructed.
///
/// ```json
/// { "style": "stock", "max_extra_len": 254 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReporterConfig {
    /// Reporting strategy
    pub style: ReportStyle,
    /// Byte limit for the parenthesised explanation
    pub max_extra_len: usize,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            style: ReportStyle::Contextual,
            max_extra_len: DEFAULT_MAX_EXTRA_LEN,
        }
    }
}

impl ReporterConfig {
    /// Build the configured reporter
    pub fn build(&self) -> AnyReporter {
        match self.style {
            ReportStyle::Contextual => {
                AnyReporter::Contextual(ContextReporter::new(self.max_extra_len))
            }
            ReportStyle::Stock => AnyReporter::Stock(StockReporter::new(self.max_extra_len)),
        }
    }
}

/// Either reporter, picked at runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyReporter {
    /// Error context aware
    Contextual(ContextReporter),
    /// The VM's stock message
    Stock(StockReporter),
}

impl Default for AnyReporter {
    fn default() -> Self {
        AnyReporter::Contextual(ContextReporter::default())
    }
}

impl Reporter for AnyReporter {
    fn bad_argument<C: CallStack + ?Sized>(
        &self,
        frames: &C,
        position: i32,
        extra: String,
    ) -> CheckError {
        match self {
            AnyReporter::Contextual(r) => r.bad_argument(frames, position, extra),
            AnyReporter::Stock(r) => r.bad_argument(frames, position, extra),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errctx::ArgErrorContext;
    use argcheck_test::{FakeFrame, FakeState};

    fn message(err: CheckError) -> String {
        err.to_string()
    }

    #[test]
    fn test_context_reporter_default() {
        let state = FakeState::new().called_from("check", "handler");
        let err = ContextReporter::default().bad_argument(&state, 2, "x".to_string());
        assert_eq!(message(err), "bad argument #2 to 'handler' (x)");
    }

    #[test]
    fn test_context_reporter_without_frame() {
        let state = FakeState::new();
        let err = ContextReporter::default().bad_argument(&state, 1, "x".to_string());
        assert_eq!(message(err), "bad argument #1 (x)");
    }

    #[test]
    fn test_context_reporter_unnamed_function() {
        let state = FakeState::new().call_stack(vec![FakeFrame::anonymous(), FakeFrame::anonymous()]);
        let err = ContextReporter::default().bad_argument(&state, 1, "x".to_string());
        assert_eq!(message(err), "bad argument #1 to '?' (x)");
    }

    #[test]
    fn test_context_reporter_overrides() {
        let state = FakeState::new().call_stack(vec![
            FakeFrame::named("check", NameWhat::Field),
            FakeFrame::named("inner", NameWhat::Local),
            FakeFrame::named("outer", NameWhat::Global),
        ]);
        let _guard = errctx::set(ArgErrorContext::named("opts").at_level(2));
        let err = ContextReporter::default().bad_argument(&state, 1, "x".to_string());
        assert_eq!(message(err), "bad argument 'opts' to 'outer' (x)");
        assert!(errctx::current().is_default());

        let _guard = errctx::set(ArgErrorContext::indexed(9).at_level(5));
        let err = ContextReporter::default().bad_argument(&state, 1, "x".to_string());
        assert_eq!(message(err), "bad argument #9 (x)");
    }

    #[test]
    fn test_location_prefix() {
        let state = FakeState::new().call_stack(vec![
            FakeFrame::named("check", NameWhat::Field),
            FakeFrame::named("handler", NameWhat::Local).at("test.lua:12: "),
        ]);
        let err = ContextReporter::default().bad_argument(&state, 1, "x".to_string());
        assert_eq!(message(err), "test.lua:12: bad argument #1 to 'handler' (x)");
    }

    #[test]
    fn test_stock_reporter() {
        let state = FakeState::new().call_stack(vec![FakeFrame::named("rep", NameWhat::Field)]);
        let _guard = errctx::set(ArgErrorContext::named("ignored"));
        let err = StockReporter::default().bad_argument(&state, 2, "x".to_string());
        assert_eq!(message(err), "bad argument #2 to 'rep' (x)");
        assert!(errctx::current().is_default());
    }

    #[test]
    fn test_stock_reporter_method_self() {
        let state = FakeState::new().call_stack(vec![FakeFrame::named("write", NameWhat::Method)]);
        let err = StockReporter::default().bad_argument(&state, 1, "x".to_string());
        assert_eq!(message(err), "calling 'write' on bad self (x)");
        let err = StockReporter::default().bad_argument(&state, 3, "x".to_string());
        assert_eq!(message(err), "bad argument #2 to 'write' (x)");
    }

    #[test]
    fn test_stock_reporter_global_name_fallback() {
        let state = FakeState::new().call_stack(vec![FakeFrame::anonymous().known_as("string.rep")]);
        let err = StockReporter::default().bad_argument(&state, 1, "x".to_string());
        assert_eq!(message(err), "bad argument #1 to 'string.rep' (x)");

        let state = FakeState::new().call_stack(vec![FakeFrame::anonymous()]);
        let err = StockReporter::default().bad_argument(&state, 1, "x".to_string());
        assert_eq!(message(err), "bad argument #1 to '?' (x)");
    }

    #[test]
    fn test_extra_is_clipped() {
        let state = FakeState::new();
        let err = ContextReporter::new(4).bad_argument(&state, 1, "abcdef".to_string());
        assert_eq!(err.extra(), Some("abcd"));
        let err = ContextReporter::new(2).bad_argument(&state, 1, "aé".to_string());
        assert_eq!(err.extra(), Some("a"));
    }

    #[test]
    fn test_config_round_trip() {
        let config: ReporterConfig = serde_json::from_str(r#"{ "style": "stock" }"#).unwrap();
        assert_eq!(config.style, ReportStyle::Stock);
        assert_eq!(config.max_extra_len, DEFAULT_MAX_EXTRA_LEN);
        assert!(matches!(config.build(), AnyReporter::Stock(_)));

        let config: ReporterConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ReporterConfig::default());
        assert_eq!(
            serde_json::to_string(&config).unwrap(),
            r#"{"style":"contextual","max_extra_len":254}"#
        );
    }
}
