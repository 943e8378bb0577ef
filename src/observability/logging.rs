use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Console logging: `fxflow` at debug, everything else at warn.
///
/// `RUST_LOG` overrides the default directives. Calling this twice is a
/// no-op.
pub fn init_default_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::builder()
            .with_default_directive(tracing::Level::WARN.into())
            .parse_lossy("fxflow=debug")
    });

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE);

    let _ = Registry::default().with(filter).with(fmt_layer).try_init();
}
