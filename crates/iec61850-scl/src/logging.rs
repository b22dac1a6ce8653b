// crates/iec61850-scl/src/logging.rs

use alloc::format;
use alloc::string::String;

/// Trait for structs that provide metadata for logging
pub trait LogMetadata {
    fn meta(&self) -> String;
}

/// Where in an IED model a pass currently is.
#[derive(Debug, Clone, Copy)]
pub struct ModelContext<'a> {
    pub ied: &'a str,
    pub access_point: &'a str,
    pub ld: Option<&'a str>,
}

impl<'a> ModelContext<'a> {
    pub fn new(ied: &'a str, access_point: &'a str) -> Self {
        Self {
            ied,
            access_point,
            ld: None,
        }
    }

    pub fn with_ld(self, ld: &'a str) -> Self {
        Self {
            ld: Some(ld),
            ..self
        }
    }
}

impl LogMetadata for ModelContext<'_> {
    fn meta(&self) -> String {
        match self.ld {
            Some(ld) => format!("ied={} ap={} ld={}", self.ied, self.access_point, ld),
            None => format!("ied={} ap={}", self.ied, self.access_point),
        }
    }
}

// =============================================
// Logging Macros (crate-internal)
// =============================================

macro_rules! scl_info {
    ($ctx:expr, $fmt:literal $(, $($arg:tt)+)?) => {{
        let meta = $crate::logging::LogMetadata::meta(&$ctx);
        ::log::info!(concat!("[{}] ", $fmt), meta $(, $($arg)+)?);
    }};
}

macro_rules! scl_warn {
    ($ctx:expr, $fmt:literal $(, $($arg:tt)+)?) => {{
        let meta = $crate::logging::LogMetadata::meta(&$ctx);
        ::log::warn!(concat!("[{}] ", $fmt), meta $(, $($arg)+)?);
    }};
}

macro_rules! scl_debug {
    ($ctx:expr, $fmt:literal $(, $($arg:tt)+)?) => {{
        if ::log::log_enabled!(::log::Level::Debug) {
            let meta = $crate::logging::LogMetadata::meta(&$ctx);
            ::log::debug!(concat!("[{}] ", $fmt), meta $(, $($arg)+)?);
        }
    }};
}

macro_rules! scl_trace {
    ($ctx:expr, $fmt:literal $(, $($arg:tt)+)?) => {{
        if ::log::log_enabled!(::log::Level::Trace) {
            let meta = $crate::logging::LogMetadata::meta(&$ctx);
            ::log::trace!(concat!("[{}] ", $fmt), meta $(, $($arg)+)?);
        }
    }};
}
