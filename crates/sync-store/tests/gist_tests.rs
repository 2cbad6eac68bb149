//! Gist client tests against a mock HTTP server.

use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use serde_json::json;
use sync_store::{DocumentStore, Error, GistClient, GistConfig};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> GistClient {
    GistClient::new(GistConfig::new("secret-token").with_base_url(server.uri())).unwrap()
}

#[tokio::test]
async fn test_read_document_maps_owner_and_files() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gists/abc"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "abc",
            "public": true,
            "description": "my settings",
            "owner": { "login": "alice" },
            "files": {
                "settings.json": { "filename": "settings.json", "content": "{}", "size": 2, "truncated": false },
                "cloudSettings": { "filename": "cloudSettings", "content": "{\"lastUpload\":\"2024-01-01T00:00:00Z\"}" }
            }
        })))
        .mount(&server)
        .await;

    let doc = client_for(&server).read_document("abc").await.unwrap();

    assert_eq!(doc.id, "abc");
    assert_eq!(doc.owner.as_deref(), Some("alice"));
    assert!(doc.public);
    assert_eq!(doc.content("settings.json"), Some("{}"));
    assert_eq!(doc.files.len(), 2);
}

#[tokio::test]
async fn test_read_document_without_owner() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gists/anon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "anon",
            "owner": null,
            "files": {}
        })))
        .mount(&server)
        .await;

    let doc = client_for(&server).read_document("anon").await.unwrap();
    assert_eq!(doc.owner, None);
    assert!(!doc.public);
}

#[tokio::test]
async fn test_read_document_fetches_truncated_content() {
    let server = MockServer::start().await;
    let raw_url = format!("{}/raw/big.json", server.uri());
    Mock::given(method("GET"))
        .and(path("/gists/big"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "big",
            "files": {
                "big.json": { "content": "{\"cut", "truncated": true, "raw_url": raw_url }
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/raw/big.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"complete\": true}"))
        .mount(&server)
        .await;

    let doc = client_for(&server).read_document("big").await.unwrap();
    assert_eq!(doc.content("big.json"), Some("{\"complete\": true}"));
    assert!(!doc.files["big.json"].truncated);
}

#[tokio::test]
async fn test_read_missing_document_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gists/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server).read_document("missing").await.unwrap_err();
    assert!(matches!(err, Error::NotFound { ref id } if id == "missing"));
}

#[tokio::test]
async fn test_rejected_token_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client_for(&server).authenticated_user().await.unwrap_err();
    assert!(matches!(err, Error::Unauthorized));
}

#[tokio::test]
async fn test_authenticated_user_returns_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "login": "bob" })))
        .mount(&server)
        .await;

    assert_eq!(client_for(&server).authenticated_user().await.unwrap(), "bob");
}

#[tokio::test]
async fn test_create_document_posts_placeholder() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/gists"))
        .and(body_json(json!({
            "description": "Settings",
            "public": false,
            "files": { "cloudSettings": { "content": "// Empty" } }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "new-id" })))
        .expect(1)
        .mount(&server)
        .await;

    let id = client_for(&server).create_document(false, "Settings").await.unwrap();
    assert_eq!(id, "new-id");
}

#[tokio::test]
async fn test_write_document_patches_all_files() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/gists/abc"))
        .and(body_json(json!({
            "files": {
                "settings.json": { "content": "{}" },
                "snippets|go.json": { "content": "{ }" }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "abc" })))
        .expect(1)
        .mount(&server)
        .await;

    let mut files = BTreeMap::new();
    files.insert("settings.json".to_string(), "{}".to_string());
    files.insert("snippets|go.json".to_string(), "{ }".to_string());

    client_for(&server).write_document("abc", &files).await.unwrap();
}

#[tokio::test]
async fn test_write_failure_surfaces_status() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/gists/abc"))
        .respond_with(ResponseTemplate::new(422).set_body_string("Validation Failed"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .write_document("abc", &BTreeMap::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Api { status: 422, .. }));
}
