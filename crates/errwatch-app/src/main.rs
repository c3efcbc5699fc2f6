#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Demo entrypoint that wires errwatch into a process: subscriber, registry,
//! error logger, panic hook, and shutdown guard.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};
use errwatch_core::{ErrorCode, ErrorLoggerConfig, ErrorSignal};
use errwatch_hooks::{
    ErrorLogger, ErrorLoggerOptions, HookRegistry, SignalLayer, install_process_hooks,
};
use errwatch_telemetry::{
    LoggingConfig, TracingSink, init_logging_with_layer, log_format_from_config,
};
use serde_json::{Value, json};
use tracing::{info, warn};

const OPTIONS_ENV: &str = "ERRWATCH_OPTIONS";
const DEFAULT_SERVICE: &str = "errwatch-demo";

fn main() -> Result<()> {
    let raw_options = load_options()?;
    let config =
        ErrorLoggerConfig::from_value(&raw_options).context("invalid errwatch options")?;

    let registry = Arc::new(HookRegistry::new());

    let mut logging = LoggingConfig::default();
    if let Some(format) = log_format_from_config(Some(&raw_options)) {
        logging.format = format;
    }
    init_logging_with_layer(
        &logging,
        SignalLayer::new(Arc::clone(&registry), config.capture_level),
    )
    .context("failed to initialise logging")?;

    let forwarded = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&forwarded);
    let options = ErrorLoggerOptions::from_config(Arc::new(TracingSink::new()), &config).handler(
        Arc::new(move |_: ErrorCode, _: &str, _: &str, _: u32| {
            counter.fetch_add(1, Ordering::Relaxed);
        }),
    );
    let logger =
        ErrorLogger::install(&registry, options).context("failed to install error logger")?;

    let _shutdown = install_process_hooks(Arc::clone(&registry), config.backtrace);

    warn!("cache directory missing; falling back to a temporary directory");
    let report = registry.raise(&ErrorSignal::new(
        ErrorCode::Deprecated,
        "legacy endpoint called",
        file!(),
        line!(),
    ));

    info!(
        target: "errwatch::app",
        service = logger.service(),
        interceptors = report.invoked,
        handler_calls = forwarded.load(Ordering::Relaxed),
        "demo signals delivered"
    );
    Ok(())
}

fn load_options() -> Result<Value> {
    match std::env::var(OPTIONS_ENV) {
        Ok(raw) => serde_json::from_str(&raw)
            .with_context(|| format!("{OPTIONS_ENV} must contain a JSON object")),
        Err(_) => Ok(json!({ "service": DEFAULT_SERVICE })),
    }
}
