//! End-to-end HTTP test: start the router in-process over the in-memory store
//! and drive every contacts endpoint with reqwest.

use contact_management::transport::http::{self, AppState, DeleteResponse, ErrorMapper};
use contact_management::{ContactService, EmptyListPolicy, InMemoryContactStore};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;

async fn spawn_app(
    empty_list: EmptyListPolicy,
    delete_response: DeleteResponse,
) -> Result<String, Box<dyn std::error::Error>> {
    let store = Arc::new(InMemoryContactStore::new());
    let app_state = AppState {
        contacts: Arc::new(ContactService::new(store, empty_list)),
        errors: ErrorMapper::new(false),
        delete_response,
    };
    let router = http::create_router(app_state);

    // Bind to an ephemeral port so tests can run in parallel.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    Ok(format!("http://127.0.0.1:{}", port))
}

async fn default_app() -> Result<String, Box<dyn std::error::Error>> {
    spawn_app(EmptyListPolicy::NotFound, DeleteResponse::Snapshot).await
}

async fn create(
    client: &reqwest::Client,
    base_url: &str,
    body: Value,
) -> Result<(StatusCode, Value), Box<dyn std::error::Error>> {
    let resp = client
        .post(format!("{}/contacts", base_url))
        .json(&body)
        .send()
        .await?;
    let status = resp.status();
    Ok((status, resp.json::<Value>().await?))
}

fn assert_error_envelope(body: &Value, status: u16, path: &str) {
    assert_eq!(body["statusCode"], status);
    assert_eq!(body["path"], path);
    assert!(body["timestamp"].is_string());
    assert!(body["error"].is_string());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_create_returns_created_contact() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = default_app().await?;
    let client = reqwest::Client::new();

    let (status, body) = create(
        &client,
        &base_url,
        json!({"name": "Ana", "email": "ana@example.com"}),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["statusCode"], 201);
    assert_eq!(body["message"], "Contact created successfully");
    assert_eq!(body["data"]["email"], "ana@example.com");
    assert_eq!(body["data"]["name"], "Ana");
    assert!(body["data"]["phone"].is_null());
    assert!(body["data"]["id"].as_i64().unwrap() > 0);
    assert!(body["data"]["createdAt"].is_string());

    let (status, body) = create(
        &client,
        &base_url,
        json!({"name": "Bob", "email": "bob@example.com", "phone": "+1 (555) 123-4567"}),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["phone"], "+1 (555) 123-4567");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_duplicate_email_is_conflict() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = default_app().await?;
    let client = reqwest::Client::new();

    let (status, _) = create(
        &client,
        &base_url,
        json!({"name": "Ana", "email": "ana@example.com"}),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = create(
        &client,
        &base_url,
        json!({"name": "Someone Else", "email": "ana@example.com", "phone": "555-123-4567"}),
    )
    .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_error_envelope(&body, 409, "/contacts");
    assert_eq!(body["message"], "Contact with this email already exists");
    assert_eq!(body["error"], "Email must be unique");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_create_reports_every_violation() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = default_app().await?;
    let client = reqwest::Client::new();

    let (status, body) = create(
        &client,
        &base_url,
        json!({"email": "not-an-email", "phone": "call me", "nickname": "Ana"}),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&body, 400, "/contacts");
    let messages: Vec<&str> = body["message"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(
        messages,
        vec![
            "Name must be a string",
            "Name is required",
            "Email is invalid",
            "Phone number is invalid",
            "property nickname should not exist",
        ]
    );
    assert_eq!(body["details"][0]["field"], "name");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_malformed_json_is_bad_request() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = default_app().await?;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/contacts", base_url))
        .header("content-type", "application/json")
        .body("{\"name\": ")
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = resp.json::<Value>().await?;
    assert_error_envelope(&body, 400, "/contacts");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid JSON body"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_find_one() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = default_app().await?;
    let client = reqwest::Client::new();

    let (_, created) = create(
        &client,
        &base_url,
        json!({"name": "Ana", "email": "ana@example.com"}),
    )
    .await?;
    let id = created["data"]["id"].as_i64().unwrap();

    let resp = client
        .get(format!("{}/contacts/{}", base_url, id))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.json::<Value>().await?;
    assert_eq!(body["message"], "Contact retrieved successfully");
    assert_eq!(body["data"], created["data"]);

    let resp = client
        .get(format!("{}/contacts/9999", base_url))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = resp.json::<Value>().await?;
    assert_error_envelope(&body, 404, "/contacts/9999");
    assert_eq!(body["message"], "Contact with ID 9999 not found");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_invalid_ids_are_bad_requests() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = default_app().await?;
    let client = reqwest::Client::new();

    for (path, message) in [
        ("/contacts/0", "ID must be a positive number"),
        ("/contacts/-4", "ID must be a positive number"),
        ("/contacts/abc", "Validation failed (numeric string is expected)"),
    ] {
        let resp = client.get(format!("{}{}", base_url, path)).send().await?;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "GET {}", path);
        let body = resp.json::<Value>().await?;
        assert_error_envelope(&body, 400, path);
        assert_eq!(body["message"], message);

        let resp = client.delete(format!("{}{}", base_url, path)).send().await?;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "DELETE {}", path);
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_update() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = default_app().await?;
    let client = reqwest::Client::new();

    let (_, ana) = create(
        &client,
        &base_url,
        json!({"name": "Ana", "email": "ana@example.com", "phone": "555-123-4567"}),
    )
    .await?;
    let (_, bob) = create(
        &client,
        &base_url,
        json!({"name": "Bob", "email": "bob@example.com"}),
    )
    .await?;
    let ana_id = ana["data"]["id"].as_i64().unwrap();
    let bob_id = bob["data"]["id"].as_i64().unwrap();

    // Empty name is rejected with the update wording.
    let resp = client
        .put(format!("{}/contacts/{}", base_url, ana_id))
        .json(&json!({"name": "", "email": "x@y.com"}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = resp.json::<Value>().await?;
    assert_eq!(body["message"], json!(["Name cannot be empty"]));

    // Taking another contact's email is a conflict.
    let resp = client
        .put(format!("{}/contacts/{}", base_url, ana_id))
        .json(&json!({"name": "Ana", "email": "bob@example.com"}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body = resp.json::<Value>().await?;
    assert_eq!(body["message"], "Email already in use");
    assert_eq!(body["error"], "Email must be unique");

    // Absent phone keeps the stored one.
    let resp = client
        .put(format!("{}/contacts/{}", base_url, ana_id))
        .json(&json!({"name": "Ana Maria", "email": "ana.maria@example.com"}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.json::<Value>().await?;
    assert_eq!(body["message"], "Contact updated successfully");
    assert_eq!(body["data"]["id"], ana_id);
    assert_eq!(body["data"]["name"], "Ana Maria");
    assert_eq!(body["data"]["email"], "ana.maria@example.com");
    assert_eq!(body["data"]["phone"], "555-123-4567");
    assert_eq!(body["data"]["createdAt"], ana["data"]["createdAt"]);

    // Empty phone clears it.
    let resp = client
        .put(format!("{}/contacts/{}", base_url, ana_id))
        .json(&json!({"name": "Ana Maria", "email": "ana.maria@example.com", "phone": ""}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.json::<Value>().await?;
    assert!(body["data"]["phone"].is_null());

    // Keeping your own email is not a conflict.
    let resp = client
        .put(format!("{}/contacts/{}", base_url, bob_id))
        .json(&json!({"name": "Robert", "email": "bob@example.com"}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .put(format!("{}/contacts/424242", base_url))
        .json(&json!({"name": "Nobody", "email": "nobody@example.com"}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_list_and_search() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = default_app().await?;
    let client = reqwest::Client::new();

    // Empty store: not-found policy.
    let resp = client.get(format!("{}/contacts", base_url)).send().await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = resp.json::<Value>().await?;
    assert_eq!(body["message"], "No contacts found");

    for (name, email, phone) in [
        ("Ana", "ana@example.com", Some("555-123-4567")),
        ("Bob", "bob@work.org", None),
        ("Carla", "carla@example.com", Some("+44 20 7946 0958")),
    ] {
        let (status, _) = create(
            &client,
            &base_url,
            json!({"name": name, "email": email, "phone": phone}),
        )
        .await?;
        assert_eq!(status, StatusCode::CREATED);
    }

    let resp = client.get(format!("{}/contacts", base_url)).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.json::<Value>().await?;
    assert_eq!(body["message"], "Contacts retrieved successfully");
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|c| c["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Carla", "Bob", "Ana"]);

    let resp = client
        .get(format!("{}/contacts", base_url))
        .query(&[("search", "example.com")])
        .send()
        .await?;
    let body = resp.json::<Value>().await?;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let resp = client
        .get(format!("{}/contacts", base_url))
        .query(&[("search", "7946")])
        .send()
        .await?;
    let body = resp.json::<Value>().await?;
    assert_eq!(body["data"][0]["name"], "Carla");

    let resp = client
        .get(format!("{}/contacts", base_url))
        .query(&[("search", "zzz")])
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = resp.json::<Value>().await?;
    assert_error_envelope(&body, 404, "/contacts?search=zzz");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_empty_list_policy_can_return_ok() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = spawn_app(EmptyListPolicy::EmptyOk, DeleteResponse::Snapshot).await?;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{}/contacts", base_url)).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.json::<Value>().await?;
    assert_eq!(body["data"], json!([]));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_delete_returns_snapshot() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = default_app().await?;
    let client = reqwest::Client::new();

    let (_, created) = create(
        &client,
        &base_url,
        json!({"name": "Ana", "email": "ana@example.com"}),
    )
    .await?;
    let id = created["data"]["id"].as_i64().unwrap();

    let resp = client
        .delete(format!("{}/contacts/{}", base_url, id))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.json::<Value>().await?;
    assert_eq!(body["message"], "Contact deleted successfully");
    assert_eq!(body["data"], created["data"]);

    let resp = client
        .get(format!("{}/contacts/{}", base_url, id))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = client
        .delete(format!("{}/contacts/{}", base_url, id))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_delete_no_content_mode() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = spawn_app(EmptyListPolicy::NotFound, DeleteResponse::NoContent).await?;
    let client = reqwest::Client::new();

    let (_, created) = create(
        &client,
        &base_url,
        json!({"name": "Ana", "email": "ana@example.com"}),
    )
    .await?;
    let id = created["data"]["id"].as_i64().unwrap();

    let resp = client
        .delete(format!("{}/contacts/{}", base_url, id))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(resp.bytes().await?.is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_health_and_unknown_routes() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = default_app().await?;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{}/health", base_url)).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.json::<Value>().await?;
    assert_eq!(body["data"]["status"], "ok");

    let resp = client.get(format!("{}/nope", base_url)).send().await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = resp.json::<Value>().await?;
    assert_error_envelope(&body, 404, "/nope");
    assert_eq!(body["message"], "Cannot GET /nope");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unrouted_methods_use_the_envelope() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = default_app().await?;
    let client = reqwest::Client::new();

    let resp = client
        .put(format!("{}/contacts", base_url))
        .json(&json!({"name": "Ana", "email": "ana@example.com"}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = resp.json::<Value>().await?;
    assert_error_envelope(&body, 404, "/contacts");
    assert_eq!(body["message"], "Cannot PUT /contacts");
    assert_eq!(body["error"], "Not Found");

    let resp = client
        .post(format!("{}/contacts/1", base_url))
        .json(&json!({"name": "Ana", "email": "ana@example.com"}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = resp.json::<Value>().await?;
    assert_eq!(body["message"], "Cannot POST /contacts/1");

    let resp = client.delete(format!("{}/health", base_url)).send().await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = resp.json::<Value>().await?;
    assert_eq!(body["message"], "Cannot DELETE /health");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_error_path_keeps_query_string() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = spawn_app(EmptyListPolicy::NotFound, DeleteResponse::Snapshot).await?;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/contacts/0?verbose=1", base_url))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = resp.json::<Value>().await?;
    assert_error_envelope(&body, 400, "/contacts/0?verbose=1");

    let resp = client.get(format!("{}/nope?x=1", base_url)).send().await?;
    let body = resp.json::<Value>().await?;
    assert_eq!(body["path"], "/nope?x=1");
    assert_eq!(body["message"], "Cannot GET /nope?x=1");
    Ok(())
}
