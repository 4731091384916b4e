use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use catalog_mock::{app, app_with};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

#[tokio::test]
async fn all_returns_every_country() {
    let resp = app().oneshot(get("/all")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let countries = body_json(resp).await;
    assert_eq!(countries.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn name_matches_fragment_case_insensitively() {
    let resp = app().oneshot(get("/name/NIGER")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let countries = body_json(resp).await;
    let names: Vec<&str> = countries
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"]["common"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Niger", "Nigeria"]);
}

#[tokio::test]
async fn name_matches_official_name() {
    let resp = app().oneshot(get("/name/federal")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let countries = body_json(resp).await;
    assert_eq!(countries[0]["cca2"], "NG");
}

#[tokio::test]
async fn unknown_name_returns_404() {
    let resp = app().oneshot(get("/name/atlantis")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["status"], 404);
}

#[tokio::test]
async fn unavailable_returns_503() {
    let resp = app().oneshot(get("/unavailable")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn custom_fixture_replaces_sample() {
    let app = app_with(vec![json!({"name": {"common": "Testland", "official": "Republic of Testland"}})]);

    let resp = app.clone().oneshot(get("/all")).await.unwrap();
    let countries = body_json(resp).await;
    assert_eq!(countries.as_array().unwrap().len(), 1);

    let resp = app.oneshot(get("/name/peru")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
