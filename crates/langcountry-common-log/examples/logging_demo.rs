//! Shows the logging setup around a locale resolution.

use langcountry_common_log::spans::{catalog_span, request_span, resolve_span};
use langcountry_common_log::{debug, info, init, timed, warn, LogConfig, LogLevel};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = LogConfig::from_env().with_level(LogLevel::Debug);
    println!("Logging config: {:?}", config);
    init(config)?;

    let request = request_span("GET", "/");
    let _request = request.enter();

    let resolved = timed!("resolve", {
        let span = resolve_span(Some("es-ES;q=0.9"));
        let _guard = span.enter();
        debug!("matching primary subtag");
        "es_CO"
    });
    info!(code = resolved, "locale bound");

    let span = catalog_span(resolved);
    let _guard = span.enter();
    warn!("override directory not configured, using bundled dataset");

    Ok(())
}
