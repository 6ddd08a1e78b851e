//! Filters API endpoints

use crate::filters::airline_filters;

use super::Success;

/// List the airline filter chips
///
/// Request:
/// ```sh
/// curl -v http://localhost:6000/api/filters
/// ```
///
/// Response:
/// ```json
/// { "data": [ "전체", "대한항공", "제주항공" ] }
/// ```
pub async fn list() -> Success<Vec<String>> {
    Success::ok(airline_filters())
}
