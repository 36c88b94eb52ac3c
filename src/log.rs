//! Feature-gated logging macros.
//!
//! With the `tracing` feature enabled these forward to the `tracing` crate;
//! without it they expand to nothing, so no formatting code is generated.
//! Arguments must be plain `tracing` field syntax.

#[cfg(feature = "tracing")]
macro_rules! tree_trace {
    ($($argument:tt)+) => {
        ::tracing::trace!($($argument)+)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! tree_trace {
    ($($argument:tt)+) => {};
}

#[cfg(feature = "tracing")]
macro_rules! tree_debug {
    ($($argument:tt)+) => {
        ::tracing::debug!($($argument)+)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! tree_debug {
    ($($argument:tt)+) => {};
}

pub(crate) use tree_debug;
pub(crate) use tree_trace;
