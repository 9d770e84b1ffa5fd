use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, MockConfig, Reply, API_KEY_HEADER};
use serde_json::Value;
use tower::ServiceExt;

const TOKEN: &str = "12345x";

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn search_request(uri: &str, key: Option<&str>) -> Request<String> {
    let mut builder = Request::builder().uri(uri);
    if let Some(key) = key {
        builder = builder.header(API_KEY_HEADER, key);
    }
    builder.body(String::new()).unwrap()
}

// --- auth ---

#[tokio::test]
async fn missing_key_returns_401() {
    let (app, recorder) = app(MockConfig::new(TOKEN));
    let resp = app
        .oneshot(search_request("/ios/searches.json?term=x", None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert!(body["error"].is_string());
    assert_eq!(recorder.read().await[0].api_key, None);
}

#[tokio::test]
async fn wrong_key_returns_401() {
    let (app, _) = app(MockConfig::new(TOKEN));
    let resp = app
        .oneshot(search_request("/ios/searches.json?term=x", Some("nope")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- search ---

#[tokio::test]
async fn search_serves_fixture() {
    let (app, _) = app(MockConfig::new(TOKEN));
    let resp = app
        .oneshot(search_request(
            "/ios/searches.json?term=micro-learning&num=100",
            Some(TOKEN),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let body = body_json(resp).await;
    assert_eq!(body["content"][0]["title"], "Micro-Learning");
    assert_eq!(body["metadata"]["request"]["params"]["term"], "micro-learning");
}

#[tokio::test]
async fn search_echoes_options() {
    let (app, _) = app(MockConfig::new(TOKEN));
    let resp = app
        .oneshot(search_request(
            "/ios/searches.json?term=yoga&country=gb&language=en&device=ipad",
            Some(TOKEN),
        ))
        .await
        .unwrap();

    let params = body_json(resp).await["metadata"]["request"]["params"].clone();
    assert_eq!(params["country"], "gb");
    assert_eq!(params["language"], "en");
    assert_eq!(params["device"], "ipad");
    assert_eq!(params["num"], 100);
}

#[tokio::test]
async fn search_records_request() {
    let (app, recorder) = app(MockConfig::new(TOKEN));
    app.oneshot(search_request("/ios/searches.json?term=a%20b&num=3", Some(TOKEN)))
        .await
        .unwrap();

    let recorded = recorder.read().await;
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].path, "/ios/searches.json");
    assert_eq!(recorded[0].query["term"], "a b");
    assert_eq!(recorded[0].query["num"], "3");
    assert_eq!(recorded[0].api_key.as_deref(), Some(TOKEN));
}

#[tokio::test]
async fn unknown_path_returns_404() {
    let (app, recorder) = app(MockConfig::new(TOKEN));
    let resp = app
        .oneshot(search_request("/android/searches.json?term=x", Some(TOKEN)))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(recorder.read().await.is_empty());
}

// --- canned failures ---

#[tokio::test]
async fn status_reply_uses_configured_code() {
    let (app, _) = app(MockConfig::new(TOKEN).with_reply(Reply::Status(503)));
    let resp = app
        .oneshot(search_request("/ios/searches.json?term=x", Some(TOKEN)))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn malformed_reply_is_not_json() {
    let (app, _) = app(MockConfig::new(TOKEN).with_reply(Reply::Malformed));
    let resp = app
        .oneshot(search_request("/ios/searches.json?term=x", Some(TOKEN)))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let bytes = body_bytes(resp).await;
    assert!(!bytes.is_empty());
    assert!(serde_json::from_slice::<Value>(&bytes).is_err());
}

// --- repeated calls on one service ---

#[tokio::test]
async fn recorder_accumulates_across_calls() {
    use tower::Service;

    let (app, recorder) = app(MockConfig::new(TOKEN));
    let mut app = app.into_service();

    for term in ["one", "two"] {
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(search_request(&format!("/ios/searches.json?term={term}"), Some(TOKEN)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let terms: Vec<String> = recorder
        .read()
        .await
        .iter()
        .map(|r| r.query["term"].clone())
        .collect();
    assert_eq!(terms, ["one", "two"]);
}
