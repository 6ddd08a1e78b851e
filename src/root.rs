//! The way out!
//!
//! Sends the user to the promotion page of a deal

use axum::Extension;
use axum::http::HeaderMap;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::http::header::LOCATION;
use axum_extra::TypedHeader;
use axum_extra::headers::UserAgent;

use crate::analytics::Analytics;
use crate::analytics::CLICK_GO_TO_DEAL;
use crate::api::Error;
use crate::api::PathParameters;
use crate::api::fetch_deal;
use crate::links::normalize_url;
use crate::links::redirect_target;
use crate::storage::Storage;

/// Go to a deal
///
/// Looks the deal up in a freshly loaded feed and redirects to its normalized source URL. A deal
/// without a usable URL is treated as not found.
pub async fn go<S: Storage>(
    user_agent: Option<TypedHeader<UserAgent>>,
    Extension(storage): Extension<S>,
    Extension(analytics): Extension<Analytics>,
    PathParameters(deal_id): PathParameters<i64>,
) -> Result<(StatusCode, HeaderMap), Error> {
    let deal = fetch_deal(&storage, deal_id).await?;

    let url = normalize_url(deal.source_url.as_deref());

    let Some(target) = redirect_target(&url) else {
        tracing::debug!("Deal {deal_id} has no usable URL: {url}");

        return Err(Error::not_found("Deal has no URL"));
    };

    let location = HeaderValue::from_str(target.as_str())
        .map_err(|err| Error::not_found("Deal has no URL").with_description(err))?;

    let user_agent = user_agent.map(|TypedHeader(user_agent)| user_agent.to_string());
    analytics.track(CLICK_GO_TO_DEAL, &deal.deal_name, user_agent.as_deref());

    tracing::debug!("Deal {deal_id} redirecting to: {target}");

    let mut headers = HeaderMap::new();
    headers.insert(LOCATION, location);

    Ok((StatusCode::TEMPORARY_REDIRECT, headers))
}
