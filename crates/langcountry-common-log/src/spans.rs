//! Spans and timers for locale operations.

use std::future::Future;
use tracing::{debug_span, info_span, Instrument, Span};

/// Span around resolving one hint.
pub fn resolve_span(hint: Option<&str>) -> Span {
    debug_span!("resolve", hint = ?hint, code = tracing::field::Empty)
}

/// Span around loading one locale bundle.
pub fn catalog_span(code: &str) -> Span {
    debug_span!("catalog", code = %code)
}

/// Span around one HTTP request.
pub fn request_span(method: &str, path: &str) -> Span {
    info_span!(
        "request",
        method = %method,
        path = %path,
        locale = tracing::field::Empty,
        error = tracing::field::Empty,
    )
}

/// Instrument a future with a span.
pub fn instrument_future<F: Future>(future: F, span: Span) -> impl Future<Output = F::Output> {
    future.instrument(span)
}

/// Record the bound locale on the current span.
pub fn record_locale(code: &str) {
    Span::current().record("locale", tracing::field::display(code));
}

/// Record an error on the current span.
pub fn record_error(error: &dyn std::error::Error) {
    Span::current().record("error", tracing::field::display(error));
}

/// Logs the elapsed time of an operation when finished.
pub struct Timer {
    start: std::time::Instant,
    operation: &'static str,
}

impl Timer {
    /// Start a new timer.
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: std::time::Instant::now(),
            operation,
        }
    }

    /// Elapsed time so far.
    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }

    /// Complete the timer and record duration.
    pub fn finish(self) -> std::time::Duration {
        let duration = self.start.elapsed();
        tracing::debug!(
            operation = %self.operation,
            duration_us = %duration.as_micros(),
            "operation completed"
        );
        duration
    }
}

/// Time a block of code, logging its duration at debug level.
#[macro_export]
macro_rules! timed {
    ($name:expr, $body:expr) => {{
        let _timer = $crate::spans::Timer::start($name);
        let result = $body;
        _timer.finish();
        result
    }};
}

pub use tracing::instrument;

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::EnvFilter;

    fn with_subscriber<F>(f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let subscriber = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(EnvFilter::new("trace"))
            .finish();

        tracing::subscriber::with_default(subscriber, f);
    }

    #[test]
    fn test_nested_spans() {
        with_subscriber(|| {
            let request = request_span("GET", "/locale");
            let _request = request.enter();
            record_locale("nl");

            let resolve = resolve_span(Some("nl-BE"));
            let _resolve = resolve.enter();
            resolve.record("code", "nl");

            let catalog = catalog_span("nl");
            let _catalog = catalog.enter();
            tracing::debug!("loading bundle");
        });
    }

    #[test]
    fn test_error_recording() {
        with_subscriber(|| {
            let span = request_span("GET", "/change_language_code/xx");
            let _guard = span.enter();
            let error = std::io::Error::new(std::io::ErrorKind::NotFound, "no dataset");
            record_error(&error);
        });
    }

    #[tokio::test]
    async fn test_span_propagates_across_await() {
        let request = request_span("GET", "/");
        let value = instrument_future(
            async {
                let inner = instrument_future(async { 7 }, catalog_span("en"));
                inner.await * 6
            },
            request,
        )
        .await;
        assert_eq!(value, 42);
    }

    #[test]
    fn test_timer_and_macro() {
        let timer = Timer::start("sleep");
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(timer.finish() >= std::time::Duration::from_millis(5));

        with_subscriber(|| {
            let result = timed!("macro_test", { "nl" });
            assert_eq!(result, "nl");
        });
    }
}
