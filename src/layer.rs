use tracing::Subscriber;
use tracing::field::{Field, Visit};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

use crate::Spinner;

/// A `tracing` [`Layer`] that mirrors event messages into a [`Spinner`]'s text.
///
/// Each event's `message` field replaces the spinner text. With
/// [`SpinnerLayer::with_span_prefix`] the name of the current span becomes
/// the prefix text. The spinner's own diagnostics are ignored.
///
/// Events must not be emitted while holding [`Spinner::lock`] or from a
/// [`crate::Hook`]: the layer takes the same lock.
///
/// ```rust,ignore
/// let spinner = Spinner::new(Options::default())?;
/// tracing_subscriber::registry()
///     .with(spinner_layer(spinner.clone()).with_span_prefix(true))
///     .init();
///
/// spinner.start();
/// info_span!("fetch").in_scope(|| info!("resolving crates.io"));
/// ```
#[derive(Debug, Clone)]
pub struct SpinnerLayer {
    spinner: Spinner,
    span_prefix: bool,
}

impl SpinnerLayer {
    pub fn new(spinner: Spinner) -> Self {
        Self {
            spinner,
            span_prefix: false,
        }
    }

    /// Show the current span's name as the spinner's prefix text.
    pub fn with_span_prefix(mut self, yes: bool) -> Self {
        self.span_prefix = yes;
        self
    }
}

/// Creates a [`SpinnerLayer`] driving `spinner`.
pub fn spinner_layer(spinner: Spinner) -> SpinnerLayer {
    SpinnerLayer::new(spinner)
}

impl<S> Layer<S> for SpinnerLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, ctx: Context<'_, S>) {
        if event.metadata().target() == crate::TARGET {
            return;
        }

        let mut message = String::new();
        event.record(&mut MessageVisitor(&mut message));
        if message.is_empty() {
            return;
        }

        let prefix = self.span_prefix.then(|| {
            ctx.lookup_current()
                .map(|span| span.name().to_string())
                .unwrap_or_default()
        });

        let mut state = self.spinner.lock();
        state.set_text(message);
        if let Some(prefix) = prefix {
            state.set_prefix_text(prefix);
        }
    }
}

struct MessageVisitor<'a>(&'a mut String);

impl Visit for MessageVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            value.clone_into(self.0);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.0 = format!("{value:?}");
        }
    }
}
