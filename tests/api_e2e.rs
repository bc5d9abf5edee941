use base64::{Engine as _, engine::general_purpose};
use once_cell::sync::Lazy;
use serde_json::{Value, json};
use std::time::{SystemTime, UNIX_EPOCH};

// Shared test context. The whole suite runs against a live server and
// database; each test skips itself unless E2E_BASE_URL is set, e.g.
// E2E_BASE_URL=http://127.0.0.1:3000 cargo test --test api_e2e
struct TestContext {
    client: reqwest::Client,
    base_url: String,
}

static BASE_URL: Lazy<Option<String>> = Lazy::new(|| std::env::var("E2E_BASE_URL").ok());

impl TestContext {
    fn new() -> Option<Self> {
        BASE_URL.clone().map(|base_url| Self {
            client: reqwest::Client::new(),
            base_url,
        })
    }

    fn get_timestamp() -> u128 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    }

    /// Registers a throwaway account and returns `(email, token)`.
    async fn register_account(&self) -> (String, String) {
        let email = format!("e2e_{}@example.com", Self::get_timestamp());

        let response = self
            .client
            .post(format!("{}/api/auth/register", self.base_url))
            .json(&json!({"email": email, "password": "SecurePass123"}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 201, "Registration failed");
        let body: Value = response.json().await.unwrap();
        let token = body["token"].as_str().unwrap().to_string();
        assert!(!token.is_empty());

        (email, token)
    }
}

#[tokio::test]
async fn test_register_login_whoami_flow() {
    let Some(context) = TestContext::new() else {
        eprintln!("E2E_BASE_URL not set, skipping");
        return;
    };

    let (email, register_token) = context.register_account().await;

    // Duplicate registration is rejected and creates nothing.
    let duplicate = context
        .client
        .post(format!("{}/api/auth/register", context.base_url))
        .json(&json!({"email": email, "password": "SecurePass123"}))
        .send()
        .await
        .unwrap();
    assert_eq!(duplicate.status().as_u16(), 400);

    // Login succeeds with the same credentials and issues a fresh token.
    let login = context
        .client
        .post(format!("{}/api/auth/login", context.base_url))
        .json(&json!({"email": email, "password": "SecurePass123"}))
        .send()
        .await
        .unwrap();
    assert_eq!(login.status().as_u16(), 200, "Login failed");
    let login_body: Value = login.json().await.unwrap();
    assert_eq!(login_body["user"]["email"], email.as_str());
    let login_token = login_body["token"].as_str().unwrap().to_string();
    assert_ne!(login_token, register_token);

    // The wrong password never logs in, even for a real account.
    let wrong = context
        .client
        .post(format!("{}/api/auth/login", context.base_url))
        .json(&json!({"email": email, "password": "WrongPass123"}))
        .send()
        .await
        .unwrap();
    assert_eq!(wrong.status().as_u16(), 401);

    // Both issued tokens resolve: concurrent sessions are allowed.
    for token in [&register_token, &login_token] {
        let whoami = context
            .client
            .get(format!("{}/api/auth/me", context.base_url))
            .header("X-Auth-Token", token)
            .send()
            .await
            .unwrap();
        assert_eq!(whoami.status().as_u16(), 200);
        let whoami_body: Value = whoami.json().await.unwrap();
        assert_eq!(whoami_body["authenticated"], true);
        assert_eq!(whoami_body["user"]["email"], email.as_str());
    }
}

#[tokio::test]
async fn test_file_upload_roundtrip() {
    let Some(context) = TestContext::new() else {
        eprintln!("E2E_BASE_URL not set, skipping");
        return;
    };

    let (_, token) = context.register_account().await;

    let payload = b"hello StreamHub e2e";
    let encoded = general_purpose::STANDARD.encode(payload);

    let upload = context
        .client
        .post(format!("{}/api/files", context.base_url))
        .header("X-Auth-Token", &token)
        .json(&json!({
            "filename": "greeting.txt",
            "content": encoded,
            "mime_type": "text/plain"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(upload.status().as_u16(), 201, "Upload failed");
    let uploaded: Value = upload.json().await.unwrap();
    let file_id = uploaded["id"].as_i64().unwrap();
    assert_eq!(uploaded["file_size"].as_i64().unwrap(), payload.len() as i64);
    assert_eq!(uploaded["original_filename"], "greeting.txt");

    // Fetching by id returns a payload that decodes back to the original.
    let fetched = context
        .client
        .get(format!("{}/api/files/{}", context.base_url, file_id))
        .header("X-Auth-Token", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(fetched.status().as_u16(), 200);
    let fetched_body: Value = fetched.json().await.unwrap();
    let file_url = fetched_body["file_url"].as_str().unwrap();
    let embedded = file_url.split_once(";base64,").unwrap().1;
    assert_eq!(general_purpose::STANDARD.decode(embedded).unwrap(), payload);

    // The file shows up in the listing.
    let listing = context
        .client
        .get(format!("{}/api/files", context.base_url))
        .header("X-Auth-Token", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(listing.status().as_u16(), 200);
    let files: Value = listing.json().await.unwrap();
    assert!(files
        .as_array()
        .unwrap()
        .iter()
        .any(|f| f["id"].as_i64() == Some(file_id)));

    // Invalid base64 is rejected before anything is stored.
    let bad = context
        .client
        .post(format!("{}/api/files", context.base_url))
        .header("X-Auth-Token", &token)
        .json(&json!({"filename": "bad.bin", "content": "not base64!!!"}))
        .send()
        .await
        .unwrap();
    assert_eq!(bad.status().as_u16(), 400);

    // A missing id is a 404.
    let missing = context
        .client
        .get(format!("{}/api/files/999999999", context.base_url))
        .header("X-Auth-Token", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 404);
}

#[tokio::test]
async fn test_profile_read_and_partial_update() {
    let Some(context) = TestContext::new() else {
        eprintln!("E2E_BASE_URL not set, skipping");
        return;
    };

    let (email, token) = context.register_account().await;

    // The profile gate reads X-Session-Token, not X-Auth-Token.
    let unauthorized = context
        .client
        .get(format!("{}/api/profile", context.base_url))
        .header("X-Auth-Token", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(unauthorized.status().as_u16(), 401);

    let profile = context
        .client
        .get(format!("{}/api/profile", context.base_url))
        .header("X-Session-Token", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(profile.status().as_u16(), 200);
    let profile_body: Value = profile.json().await.unwrap();
    assert_eq!(profile_body["email"], email.as_str());
    assert_eq!(profile_body["theme"], "system");

    // Partial update touches only the supplied fields.
    let update = context
        .client
        .put(format!("{}/api/profile", context.base_url))
        .header("X-Session-Token", &token)
        .json(&json!({"displayName": "E2E Tester", "theme": "dark"}))
        .send()
        .await
        .unwrap();
    assert_eq!(update.status().as_u16(), 200);

    let updated: Value = context
        .client
        .get(format!("{}/api/profile", context.base_url))
        .header("X-Session-Token", &token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated["displayName"], "E2E Tester");
    assert_eq!(updated["theme"], "dark");
    assert_eq!(updated["email"], email.as_str());
}

#[tokio::test]
async fn test_contact_submission() {
    let Some(context) = TestContext::new() else {
        eprintln!("E2E_BASE_URL not set, skipping");
        return;
    };

    // A complete submission succeeds even with no SMTP relay reachable.
    let submit = context
        .client
        .post(format!("{}/api/contact", context.base_url))
        .json(&json!({
            "name": "E2E",
            "email": "e2e@example.com",
            "message": "Checking in"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(submit.status().as_u16(), 200);
    let body: Value = submit.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert!(body["id"].as_i64().unwrap() > 0);

    // An empty message is rejected after trimming.
    let empty = context
        .client
        .post(format!("{}/api/contact", context.base_url))
        .json(&json!({
            "name": "E2E",
            "email": "e2e@example.com",
            "message": "   "
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(empty.status().as_u16(), 400);
}

#[tokio::test]
async fn test_user_data_token_namespace_is_separate() {
    let Some(context) = TestContext::new() else {
        eprintln!("E2E_BASE_URL not set, skipping");
        return;
    };

    let (_, token) = context.register_account().await;

    // Auth tokens live in the sessions table; the user-data gate resolves
    // against user_sessions only, so a fresh auth token must be rejected.
    let response = context
        .client
        .get(format!("{}/api/user-data", context.base_url))
        .header("X-Auth-Token", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    // And with no token at all the gate rejects before touching anything.
    let missing = context
        .client
        .get(format!("{}/api/user-data", context.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 401);
}
