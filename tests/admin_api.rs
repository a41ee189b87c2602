mod support;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header::CONTENT_TYPE};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use time::OffsetDateTime;
use tower::ServiceExt;
use uuid::Uuid;

use folio::infra::http::{REQUEST_ID_HEADER, build_admin_router};

use support::{Call, Fixture, PUBLIC_URL, link_draft};

fn admin_router(fixture: &Fixture) -> Router {
    build_admin_router(fixture.states().1)
}

async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = router.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn page(router: &Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).expect("request");
    let response = router.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

fn ids_of(items: &Value) -> Vec<String> {
    items
        .as_array()
        .expect("array")
        .iter()
        .map(|item| item["id"].as_str().expect("id").to_string())
        .collect()
}

fn strings(ids: &[Uuid]) -> Vec<String> {
    ids.iter().map(ToString::to_string).collect()
}

#[tokio::test]
async fn create_appends_link_with_next_rank() {
    let fixture = Fixture::new();
    fixture.links.seed(vec![link_draft("GitHub")]).await;
    let router = admin_router(&fixture);

    let (status, body) = send(
        &router,
        Method::POST,
        "/api/links",
        Some(json!({ "title": "Blog", "url": "https://blog.example.com", "icon": "RSS" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "Blog");
    assert_eq!(body["icon"], "rss");
    assert_eq!(body["order_index"], 2);
    assert_eq!(body["active"], true);

    let (status, listed) = send(&router, Method::GET, "/api/links", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn invalid_create_is_a_validation_error() {
    let fixture = Fixture::new();
    let router = admin_router(&fixture);

    let (status, body) = send(
        &router,
        Method::POST,
        "/api/links",
        Some(json!({ "title": " ", "url": "https://example.com" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
    assert!(fixture.links.calls().await.is_empty());
}

#[tokio::test]
async fn move_returns_new_order() {
    let fixture = Fixture::new();
    let ids = fixture
        .links
        .seed(vec![link_draft("A"), link_draft("B"), link_draft("C")])
        .await;
    let router = admin_router(&fixture);

    let (status, body) = send(
        &router,
        Method::POST,
        "/api/links/move",
        Some(json!({ "dragged_id": ids[2], "target_id": ids[0] })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["changed"], true);
    assert_eq!(ids_of(&body["items"]), strings(&[ids[2], ids[0], ids[1]]));
    assert_eq!(
        fixture.links.calls().await,
        vec![Call::Reorder(vec![ids[2], ids[0], ids[1]])]
    );
}

#[tokio::test]
async fn move_onto_itself_reports_unchanged() {
    let fixture = Fixture::new();
    let ids = fixture
        .links
        .seed(vec![link_draft("A"), link_draft("B")])
        .await;
    let router = admin_router(&fixture);

    let (status, body) = send(
        &router,
        Method::POST,
        "/api/links/move",
        Some(json!({ "dragged_id": ids[1], "target_id": ids[1] })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["changed"], false);
    assert_eq!(ids_of(&body["items"]), strings(&ids));
    assert!(fixture.links.calls().await.is_empty());
}

#[tokio::test]
async fn failed_move_reports_restored_order() {
    let fixture = Fixture::new();
    let ids = fixture
        .links
        .seed(vec![link_draft("A"), link_draft("B"), link_draft("C")])
        .await;
    fixture.links.fail_reorders(true);
    let router = admin_router(&fixture);

    let (status, body) = send(
        &router,
        Method::POST,
        "/api/links/move",
        Some(json!({ "dragged_id": ids[0], "target_id": ids[2] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "reorder_failed");
    let hint = body["error"]["hint"].as_str().expect("hint");
    assert!(hint.contains(&strings(&ids).join(",")));
    assert_eq!(fixture.links.stored_ids().await, ids);
}

#[tokio::test]
async fn explicit_order_replaces_ranks() {
    let fixture = Fixture::new();
    let ids = fixture
        .links
        .seed(vec![link_draft("A"), link_draft("B"), link_draft("C")])
        .await;
    let router = admin_router(&fixture);
    let wanted = vec![ids[1], ids[2], ids[0]];

    let (status, body) = send(
        &router,
        Method::PUT,
        "/api/links/order",
        Some(json!({ "ids": wanted })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids_of(&body), strings(&wanted));
    assert_eq!(fixture.links.stored_ids().await, wanted);

    let (status, body) = send(
        &router,
        Method::PUT,
        "/api/links/order",
        Some(json!({ "ids": [ids[0]] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_order");
}

#[tokio::test]
async fn patch_updates_fields_and_rejects_empty_body() {
    let fixture = Fixture::new();
    let ids = fixture
        .links
        .seed(vec![link_draft("A"), link_draft("B")])
        .await;
    let router = admin_router(&fixture);

    let (status, body) = send(
        &router,
        Method::PATCH,
        &format!("/api/links/{}", ids[1]),
        Some(json!({ "active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["active"], false);
    assert_eq!(body["order_index"], 2);

    let (status, body) = send(
        &router,
        Method::PATCH,
        &format!("/api/links/{}", ids[1]),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "empty_patch");

    let (status, body) = send(
        &router,
        Method::PATCH,
        &format!("/api/links/{}", Uuid::new_v4()),
        Some(json!({ "title": "Nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn delete_requires_confirmation() {
    let fixture = Fixture::new();
    let ids = fixture
        .links
        .seed(vec![link_draft("A"), link_draft("B")])
        .await;
    let router = admin_router(&fixture);

    let (status, body) = send(
        &router,
        Method::DELETE,
        &format!("/api/links/{}", ids[0]),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "declined");
    assert!(fixture.links.calls().await.is_empty());

    let (status, _) = send(
        &router,
        Method::DELETE,
        &format!("/api/links/{}?confirm=true", ids[0]),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(fixture.links.stored_ids().await, vec![ids[1]]);
}

#[tokio::test]
async fn profile_round_trips_through_api() {
    let fixture = Fixture::new();
    let router = admin_router(&fixture);

    let (status, body) = send(&router, Method::GET, "/api/profile", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["display_name"], "Ada Example");

    let (status, body) = send(
        &router,
        Method::PUT,
        "/api/profile",
        Some(json!({
            "display_name": "  Grace  ",
            "headline": "Compiler engineer",
            "skills": [{ "category": "Languages", "items": ["Rust", "COBOL"] }],
            "timezone": "Europe/Berlin"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["display_name"], "Grace");
    assert_eq!(body["timezone"], "Europe/Berlin");

    let (status, body) = send(
        &router,
        Method::PUT,
        "/api/profile",
        Some(json!({ "display_name": "Grace", "timezone": "Mars/Olympus" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn click_summary_counts_recent_clicks() {
    let fixture = Fixture::new();
    let ids = fixture
        .links
        .seed(vec![link_draft("A"), link_draft("B")])
        .await;
    let now = OffsetDateTime::now_utc();
    fixture.clicks.push(ids[0], now, "v1").await;
    fixture.clicks.push(ids[0], now, "v2").await;
    fixture.clicks.push(ids[1], now, "v1").await;
    let router = admin_router(&fixture);

    let (status, body) = send(&router, Method::GET, "/api/analytics/clicks?days=7", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["window_days"], 7);
    assert_eq!(body["total_clicks"], 3);
    assert_eq!(body["unique_visitors"], 2);
    assert_eq!(body["top_link"]["link_id"], ids[0].to_string());
    assert_eq!(body["daily"].as_array().map(Vec::len), Some(7));
}

#[tokio::test]
async fn manager_pages_render() {
    let fixture = Fixture::new();
    fixture.links.seed(vec![link_draft("GitHub")]).await;
    let router = admin_router(&fixture);

    for uri in ["/", "/links", "/projects", "/experiences", "/hackathons"] {
        let request = Request::builder().uri(uri).body(Body::empty()).expect("request");
        let response = router.clone().oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }
}

#[tokio::test]
async fn manager_page_offers_edit_and_public_links() {
    let fixture = Fixture::new();
    fixture.links.seed(vec![link_draft("GitHub")]).await;
    let router = admin_router(&fixture);

    let (status, body) = page(&router, "/links").await;

    assert_eq!(status, StatusCode::OK);
    for action in ["edit", "delete", "up", "down"] {
        assert!(body.contains(&format!("data-action=\"{action}\"")), "{action}");
    }
    assert!(body.contains(r#"<dialog id="editor">"#));
    assert!(body.contains(r#"<dialog id="creator">"#));
    assert!(body.contains(&format!(
        r#"<a href="{PUBLIC_URL}/links" target="_blank" rel="noopener">"#
    )));
    assert!(!body.contains("location.reload"));
}

#[tokio::test]
async fn created_record_renders_as_last_row() {
    let fixture = Fixture::new();
    fixture
        .links
        .seed(vec![link_draft("GitHub"), link_draft("Mastodon")])
        .await;
    let router = admin_router(&fixture);

    let (status, record) = send(
        &router,
        Method::POST,
        "/api/links",
        Some(json!({ "title": "Blog", "url": "https://blog.example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = record["id"].as_str().expect("id");

    let (status, row) = page(&router, &format!("/links/rows/{id}")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(row.trim_start().starts_with("<li"));
    assert!(row.contains(&format!(r#"data-id="{id}""#)));
    assert!(row.contains(r#"<span class="muted position">3</span>"#));
    assert!(row.contains("Blog"));
    assert!(row.contains("https://blog.example.com"));
}

#[tokio::test]
async fn edited_row_reflects_patch() {
    let fixture = Fixture::new();
    let ids = fixture
        .links
        .seed(vec![link_draft("GitHub"), link_draft("Mastodon")])
        .await;
    let router = admin_router(&fixture);

    let (_, record) = send(&router, Method::GET, &format!("/api/links/{}", ids[0]), None).await;
    let mut payload = record.clone();
    let fields = payload.as_object_mut().expect("object");
    for server_field in ["id", "order_index", "created_at", "updated_at"] {
        fields.remove(server_field);
    }
    fields.insert("title".to_string(), json!("Codeberg"));
    fields.insert("active".to_string(), json!(false));

    let (status, _) = send(
        &router,
        Method::PATCH,
        &format!("/api/links/{}", ids[0]),
        Some(payload),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, row) = page(&router, &format!("/links/rows/{}", ids[0])).await;
    assert_eq!(status, StatusCode::OK);
    assert!(row.contains("Codeberg"));
    assert!(row.contains(r#"class="inactive""#));
    assert!(row.contains(r#"<span class="muted position">1</span>"#));

    let (status, _) = page(&router, &format!("/links/rows/{}", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_endpoint_reports_storage() {
    let fixture = Fixture::new();
    let router = admin_router(&fixture);

    let request = Request::builder()
        .uri("/_health/db")
        .body(Body::empty())
        .expect("request");
    let response = router.oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
