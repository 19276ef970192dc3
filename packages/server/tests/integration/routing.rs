use crate::common::TestApp;

#[tokio::test]
async fn health_check_answers_ok() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token("/health").await;

    assert_eq!(res.status, 200);
    assert_eq!(res.text, "ok");
}

#[tokio::test]
async fn unknown_path_returns_json_not_found() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token("/no/such/page").await;

    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn openapi_document_lists_site_routes() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token("/api-docs/openapi.json").await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["info"]["title"], "DatoDirecto API");
    assert!(res.body["paths"]["/api/v1/site/hero-slides"].is_object());
}
