//! # Logging Macros
//!
//! Convenience macros for structured logging with consistent field names.

/// Log a completed HTTP request with method, path, status and duration.
#[macro_export]
macro_rules! log_api_request {
    ($request_id:expr, $method:expr, $path:expr, $status:expr, $duration_ms:expr) => {
        tracing::info!(
            target: "api",
            request_id = %$request_id,
            method = %$method,
            path = %$path,
            status = %$status,
            duration_ms = %$duration_ms,
            "API request"
        )
    };
}

/// Log an authentication event.
#[macro_export]
macro_rules! log_auth_event {
    ($event:expr, $user_id:expr, $success:expr) => {
        tracing::info!(
            target: "auth",
            event = %$event,
            user_id = %$user_id,
            success = $success,
            "Authentication event"
        )
    };
}

/// Log an access-control decision that sent the viewer elsewhere.
#[macro_export]
macro_rules! log_access_redirect {
    ($viewer:expr, $destination:expr, $redirect_to:expr) => {
        tracing::info!(
            target: "access",
            viewer = %$viewer,
            destination = %$destination,
            redirect_to = %$redirect_to,
            "Access redirected"
        )
    };
}

/// Measure and log the duration of a block of code.
///
/// # Example
///
/// ```rust
/// use logging::measure_duration;
///
/// let total = measure_duration!("dashboard", "aggregate", { 40 + 2 });
/// assert_eq!(total, 42);
/// ```
#[macro_export]
macro_rules! measure_duration {
    ($target:expr, $context:expr, $block:block) => {{
        let start = std::time::Instant::now();
        let result = $block;
        tracing::debug!(
            target: $target,
            context = %$context,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Operation completed"
        );
        result
    }};
}
