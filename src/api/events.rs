//! Events API endpoints
//!
//! Interactions reported by the presentation layer

use axum::Extension;
use axum_extra::TypedHeader;
use axum_extra::headers::UserAgent;
use serde::Deserialize;

use crate::analytics::Analytics;
use crate::analytics::is_known_action;

use super::Error;
use super::Form;
use super::Success;

/// Event form
#[derive(Debug, Deserialize)]
pub struct EventForm {
    /// One of the known actions, like `click_deal_card`
    action: String,

    /// What was interacted with, like the deal name
    label: Option<String>,
}

/// Report a single interaction based on the [`EventForm`](EventForm) form
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{ "action": "click_filter_chip", "label": "제주항공" }' \
///     http://localhost:6000/api/events
/// ```
///
/// Response: `204 No Content`
pub async fn create(
    user_agent: Option<TypedHeader<UserAgent>>,
    Extension(analytics): Extension<Analytics>,
    Form(form): Form<EventForm>,
) -> Result<Success<()>, Error> {
    let action = form.action.trim();

    if action.is_empty() {
        return Err(Error::bad_request("Action is required"));
    }

    if !is_known_action(action) {
        return Err(Error::bad_request("Unknown action").with_description(action));
    }

    let user_agent = user_agent.map(|TypedHeader(user_agent)| user_agent.to_string());

    analytics.track(
        action,
        form.label.as_deref().unwrap_or_default(),
        user_agent.as_deref(),
    );

    Ok(Success::no_content())
}
