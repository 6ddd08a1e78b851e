//! Click analytics
//!
//! Events are fire-and-forget: nothing is returned and a missing reporter changes nothing else.

use std::fmt;
use std::sync::Arc;

/// A deal card was clicked
pub const CLICK_DEAL_CARD: &str = "click_deal_card";

/// The user followed a deal to its promotion page
pub const CLICK_GO_TO_DEAL: &str = "click_go_to_deal";

/// An airline filter chip was selected
pub const CLICK_FILTER_CHIP: &str = "click_filter_chip";

/// Actions accepted from the presentation layer
pub const KNOWN_ACTIONS: [&str; 3] = [CLICK_DEAL_CARD, CLICK_GO_TO_DEAL, CLICK_FILTER_CHIP];

/// Category every event is reported under
pub const EVENT_CATEGORY: &str = "interaction";

/// Is the action one of the [`KNOWN_ACTIONS`](KNOWN_ACTIONS)?
pub fn is_known_action(action: &str) -> bool {
    KNOWN_ACTIONS.contains(&action)
}

/// A single analytics event
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event<'a> {
    pub action: &'a str,
    pub label: &'a str,
    pub user_agent: Option<&'a str>,
}

/// Destination of analytics events
pub trait Reporter: Send + Sync + 'static {
    /// Report a single event, must not fail
    fn report(&self, event: &Event<'_>);
}

/// Reporter dropping every event
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn report(&self, _event: &Event<'_>) {}
}

/// Reporter writing events to the log
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: &Event<'_>) {
        tracing::info!(
            target: "analytics",
            action = event.action,
            category = EVENT_CATEGORY,
            label = event.label,
            user_agent = event.user_agent,
            "event"
        );
    }
}

/// Handle to the configured reporter
///
/// Cheap to clone, shared by all requests
#[derive(Clone)]
pub struct Analytics {
    reporter: Arc<dyn Reporter>,
}

impl Analytics {
    /// Create analytics with a reporter
    pub fn new<R>(reporter: R) -> Self
    where
        R: Reporter,
    {
        Self {
            reporter: Arc::new(reporter),
        }
    }

    /// Create analytics dropping every event
    pub fn noop() -> Self {
        Self::new(NoopReporter)
    }

    /// Create analytics from the `ANALYTICS` environment variable
    ///
    /// `log` reports to the log, anything else is a no-op
    pub fn from_env() -> Self {
        match std::env::var("ANALYTICS").as_deref() {
            Ok("log") => {
                tracing::debug!("Reporting analytics events to the log");

                Self::new(TracingReporter)
            }
            _ => Self::noop(),
        }
    }

    /// Track a user interaction
    pub fn track(&self, action: &str, label: &str, user_agent: Option<&str>) {
        self.reporter.report(&Event {
            action,
            label,
            user_agent,
        });
    }
}

impl Default for Analytics {
    fn default() -> Self {
        Self::noop()
    }
}

impl fmt::Debug for Analytics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Analytics").finish_non_exhaustive()
    }
}
