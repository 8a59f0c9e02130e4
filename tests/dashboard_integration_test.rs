use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use data_connections::{router, AppState, DashboardConfig};
use httpmock::prelude::*;
use std::sync::Arc;
use tower::ServiceExt;

const BOUNDARY: &str = "data-connections-test-boundary";

fn app_with(config: DashboardConfig) -> Router {
    router(Arc::new(AppState::new(config).unwrap()))
}

fn app(fixed_url: String) -> Router {
    app_with(DashboardConfig {
        fixed_csv_url: fixed_url,
        timeout_seconds: 5,
        ..Default::default()
    })
}

fn mock_fixed(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/fixed.csv");
        then.status(200)
            .header("Content-Type", "text/csv")
            .body("city,population\nLima,9750000\nQuito,2800000\nBogota,7900000\n");
    });
}

fn page_query(pairs: &[(&str, &str)]) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (k, v) in pairs {
        serializer.append_pair(k, v);
    }
    format!("/?{}", serializer.finish())
}

fn multipart_body(filename: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: text/csv\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_upload(app: Router, body: Vec<u8>) -> Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_fixed_source_preview_on_first_visit() {
    let server = MockServer::start();
    mock_fixed(&server);

    let response = get(app(server.url("/fixed.csv")), "/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("Rows: <strong>3</strong>  •  Columns: <strong>2</strong>"));
    assert!(html.contains("Quito"));
    // configured section lists the rows before the shape line
    assert!(html.find("Bogota").unwrap() < html.find("Rows: <strong>3</strong>").unwrap());
    // nothing chosen yet for the user source
    assert!(!html.contains("alert success"));
    assert!(!html.contains("alert error"));
    assert!(!html.contains("<h3>Preview</h3>"));
}

#[tokio::test]
async fn test_user_url_loads_and_limits_preview() {
    let server = MockServer::start();
    mock_fixed(&server);

    let mut csv = String::from("id,value\n");
    for i in 0..1500 {
        csv.push_str(&format!("{},{}\n", i, i * 2));
    }
    let user_mock = server.mock(|when, then| {
        when.method(GET).path("/user.csv");
        then.status(200).body(csv);
    });

    let uri = page_query(&[("source", "url"), ("url", &format!("  {}  ", server.url("/user.csv")))]);
    let html = body_text(get(app(server.url("/fixed.csv")), &uri).await).await;

    user_mock.assert();
    assert!(html.contains("Loaded data from the provided CSV URL."));
    assert!(html.contains("<h3>Preview</h3>"));
    assert!(html.contains("Rows: <strong>1,500</strong>  •  Columns: <strong>2</strong>"));
    assert!(html.contains("Showing the first 20 rows."));
    assert!(html.contains("<th class=\"index\">19</th>"));
    assert!(!html.contains("<th class=\"index\">20</th>"));
}

#[tokio::test]
async fn test_user_url_failure_shows_error_only() {
    let server = MockServer::start();
    mock_fixed(&server);
    server.mock(|when, then| {
        when.method(GET).path("/private.csv");
        then.status(403);
    });

    let uri = page_query(&[("url", &server.url("/private.csv"))]);
    let html = body_text(get(app(server.url("/fixed.csv")), &uri).await).await;

    assert!(html.contains("Unable to read CSV from the provided URL. (HTTP Error 403: Forbidden)"));
    assert!(!html.contains("<h3>Preview</h3>"));
}

#[tokio::test]
async fn test_switching_to_upload_discards_url_result() {
    let server = MockServer::start();
    mock_fixed(&server);
    let user_mock = server.mock(|when, then| {
        when.method(GET).path("/user.csv");
        then.status(200).body("a\n1\n");
    });

    let uri = page_query(&[("source", "upload"), ("url", &server.url("/user.csv"))]);
    let html = body_text(get(app(server.url("/fixed.csv")), &uri).await).await;

    user_mock.assert_hits(0);
    assert!(html.contains("type=\"file\""));
    assert!(!html.contains("Loaded data from the provided CSV URL."));
    assert!(!html.contains("<h3>Preview</h3>"));
}

#[tokio::test]
async fn test_upload_success() {
    let server = MockServer::start();
    mock_fixed(&server);

    let body = multipart_body("scores.csv", b"name,score,passed\nAna,9,true\nBen,6,false\n");
    let response = post_upload(app(server.url("/fixed.csv")), body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("Loaded data from the uploaded file."));
    assert!(html.contains("Rows: <strong>2</strong>  •  Columns: <strong>3</strong>"));
    assert!(html.contains("<td class=\"num\">9</td>"));
}

#[tokio::test]
async fn test_upload_without_file_is_idle() {
    let server = MockServer::start();
    mock_fixed(&server);

    let response = post_upload(app(server.url("/fixed.csv")), multipart_body("", b"")).await;
    let html = body_text(response).await;

    assert!(html.contains("type=\"file\""));
    assert!(!html.contains("alert success"));
    assert!(!html.contains("alert error"));
    assert!(!html.contains("<h3>Preview</h3>"));
}

#[tokio::test]
async fn test_upload_malformed_csv_shows_error() {
    let server = MockServer::start();
    mock_fixed(&server);

    let body = multipart_body("broken.csv", b"a,b\n1,2\n3,\"never closed\n");
    let html = body_text(post_upload(app(server.url("/fixed.csv")), body).await).await;

    assert!(html.contains("Unable to read the uploaded CSV. (EOF inside string starting at line 3)"));
    assert!(!html.contains("Loaded data from the uploaded file."));
}

#[tokio::test]
async fn test_upload_header_only_has_zero_rows() {
    let server = MockServer::start();
    mock_fixed(&server);

    let body = multipart_body("empty.csv", b"a,b,c\n");
    let html = body_text(post_upload(app(server.url("/fixed.csv")), body).await).await;

    assert!(html.contains("Loaded data from the uploaded file."));
    assert!(html.contains("Rows: <strong>0</strong>  •  Columns: <strong>3</strong>"));
}

#[tokio::test]
async fn test_upload_wrong_extension_is_rejected() {
    let server = MockServer::start();
    mock_fixed(&server);

    let body = multipart_body("report.txt", b"a,b\n1,2\n");
    let html = body_text(post_upload(app(server.url("/fixed.csv")), body).await).await;

    assert!(html.contains("Unable to read the uploaded CSV."));
    assert!(html.contains("Unsupported file extension: txt"));
}

#[tokio::test]
async fn test_upload_over_size_limit_is_rejected() {
    let server = MockServer::start();
    mock_fixed(&server);

    let app = app_with(DashboardConfig {
        fixed_csv_url: server.url("/fixed.csv"),
        timeout_seconds: 5,
        max_upload_mb: 1,
        ..Default::default()
    });

    let mut content = b"payload\n".to_vec();
    content.extend(std::iter::repeat(b'x').take(2 * 1024 * 1024));
    let html = body_text(post_upload(app, multipart_body("big.csv", &content)).await).await;

    assert!(html.contains("Unable to read the uploaded CSV."));
    assert!(!html.contains("Loaded data from the uploaded file."));
}

#[tokio::test]
async fn test_unreachable_fixed_source_still_renders_page() {
    let response = get(app("http://127.0.0.1:1/fixed.csv".to_string()), "/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("Unable to read CSV from the configured URL."));
    assert!(html.contains("4.Other data sources"));
}
