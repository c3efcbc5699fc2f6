//! Raw error signals as delivered by the host runtime.
//!
//! # Design
//! - Known error kinds keep stable bit values so numeric codes from foreign
//!   producers round-trip without loss.
//! - Unknown values are preserved in `ErrorCode::Other` rather than rejected.
//! - `Other` can still carry a known bit (built directly or deserialised);
//!   [`ErrorCode::canonical`] folds it back onto the named code.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::context::CapturedBacktrace;

/// Kind of runtime error carried by a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Fatal runtime error.
    Error,
    /// Non-fatal runtime warning.
    Warning,
    /// Parse failure.
    Parse,
    /// Runtime notice.
    Notice,
    /// Fatal error raised during runtime start-up.
    CoreError,
    /// Warning raised during runtime start-up.
    CoreWarning,
    /// Fatal compile-time error.
    CompileError,
    /// Compile-time warning.
    CompileWarning,
    /// Error raised explicitly by user code.
    UserError,
    /// Warning raised explicitly by user code.
    UserWarning,
    /// Notice raised explicitly by user code.
    UserNotice,
    /// Strictness suggestion.
    Strict,
    /// Error the runtime could recover from.
    RecoverableError,
    /// Use of a deprecated facility.
    Deprecated,
    /// Deprecation raised explicitly by user code.
    UserDeprecated,
    /// Code not recognised by this crate.
    Other(i32),
}

impl ErrorCode {
    /// Every named code, in ascending raw-value order.
    pub const KNOWN: [Self; 15] = [
        Self::Error,
        Self::Warning,
        Self::Parse,
        Self::Notice,
        Self::CoreError,
        Self::CoreWarning,
        Self::CompileError,
        Self::CompileWarning,
        Self::UserError,
        Self::UserWarning,
        Self::UserNotice,
        Self::Strict,
        Self::RecoverableError,
        Self::Deprecated,
        Self::UserDeprecated,
    ];

    /// Raw numeric value of the code.
    #[must_use]
    pub const fn as_raw(self) -> i32 {
        match self {
            Self::Error => 1,
            Self::Warning => 2,
            Self::Parse => 4,
            Self::Notice => 8,
            Self::CoreError => 16,
            Self::CoreWarning => 32,
            Self::CompileError => 64,
            Self::CompileWarning => 128,
            Self::UserError => 256,
            Self::UserWarning => 512,
            Self::UserNotice => 1024,
            Self::Strict => 2048,
            Self::RecoverableError => 4096,
            Self::Deprecated => 8192,
            Self::UserDeprecated => 16384,
            Self::Other(raw) => raw,
        }
    }

    /// Map a raw numeric value back to a code.
    #[must_use]
    pub const fn from_raw(raw: i32) -> Self {
        match raw {
            1 => Self::Error,
            2 => Self::Warning,
            4 => Self::Parse,
            8 => Self::Notice,
            16 => Self::CoreError,
            32 => Self::CoreWarning,
            64 => Self::CompileError,
            128 => Self::CompileWarning,
            256 => Self::UserError,
            512 => Self::UserWarning,
            1024 => Self::UserNotice,
            2048 => Self::Strict,
            4096 => Self::RecoverableError,
            8192 => Self::Deprecated,
            16384 => Self::UserDeprecated,
            other => Self::Other(other),
        }
    }

    /// The named code for this raw value, so `Other(2)` reads as `Warning`.
    #[must_use]
    pub const fn canonical(self) -> Self {
        Self::from_raw(self.as_raw())
    }

    /// Machine-friendly name of the code.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Parse => "parse",
            Self::Notice => "notice",
            Self::CoreError => "core_error",
            Self::CoreWarning => "core_warning",
            Self::CompileError => "compile_error",
            Self::CompileWarning => "compile_warning",
            Self::UserError => "user_error",
            Self::UserWarning => "user_warning",
            Self::UserNotice => "user_notice",
            Self::Strict => "strict",
            Self::RecoverableError => "recoverable_error",
            Self::Deprecated => "deprecated",
            Self::UserDeprecated => "user_deprecated",
            Self::Other(_) => "other",
        }
    }
}

impl Display for ErrorCode {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Other(raw) => write!(formatter, "other({raw})"),
            known => formatter.write_str(known.name()),
        }
    }
}

/// One non-fatal error occurrence delivered to the interceptor chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSignal {
    /// Kind of error raised.
    pub code: ErrorCode,
    /// Raw message supplied by the producer.
    pub message: String,
    /// Source file the error was raised from.
    pub file: String,
    /// Source line the error was raised from.
    pub line: u32,
}

impl ErrorSignal {
    /// Construct a signal from its raw parts.
    #[must_use]
    pub fn new(
        code: ErrorCode,
        message: impl Into<String>,
        file: impl Into<String>,
        line: u32,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            file: file.into(),
            line,
        }
    }
}

/// Fatal error retained by the host until shutdown.
#[derive(Debug, Clone)]
pub struct LastError {
    /// Kind of error that terminated the process.
    pub code: ErrorCode,
    /// Raw message supplied by the producer.
    pub message: String,
    /// Source file of the failure.
    pub file: String,
    /// Source line of the failure.
    pub line: u32,
    /// Stack snapshot taken when the failure happened.
    pub backtrace: CapturedBacktrace,
}

impl LastError {
    /// Construct a last-error record without a stack snapshot.
    #[must_use]
    pub fn new(
        code: ErrorCode,
        message: impl Into<String>,
        file: impl Into<String>,
        line: u32,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            file: file.into(),
            line,
            backtrace: CapturedBacktrace::unavailable(),
        }
    }

    /// Attach the stack snapshot captured at the failure site.
    #[must_use]
    pub fn with_backtrace(mut self, backtrace: CapturedBacktrace) -> Self {
        self.backtrace = backtrace;
        self
    }
}
