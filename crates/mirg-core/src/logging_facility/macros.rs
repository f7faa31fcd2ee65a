//! Canonical logging macros
//!
//! Every operation boundary logs exactly one start event and exactly one
//! end or end_error event, tagged with the calling module as `component`.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use mirg_core::log_op_start;
/// log_op_start!("up");
/// log_op_start!("up", registered = 3);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use mirg_core::log_op_end;
/// log_op_end!("up", duration_ms = 42);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// Takes a reference to an `MgError`.
///
/// # Example
///
/// ```
/// # use mirg_core::{log_op_error, MgError, MgErrorKind};
/// let err = MgError::new(MgErrorKind::Commit);
/// log_op_error!("up", &err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let mg_err: &$crate::errors::MgError = $err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?mg_err.kind(),
            err.code = mg_err.code(),
            "{}",
            mg_err
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let mg_err: &$crate::errors::MgError = $err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?mg_err.kind(),
            err.code = mg_err.code(),
            $($field)*,
            "{}",
            mg_err
        );
    }};
}
