use axum::http::StatusCode;

use crate::tests::helper;

#[tokio::test]
async fn test_filters() {
    let (mut app, _) = helper::setup_test_app(Vec::new());

    let (status_code, filters) = helper::list_filters(&mut app).await;
    assert_eq!(StatusCode::OK, status_code);

    let filters = filters.unwrap();
    assert_eq!(Some("전체"), filters.first().map(String::as_str));
}
