
use serde_json::json;
use test_helpers::*;
use warp::http::StatusCode;

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _ctx) = create_test_app().await;

    let response = warp::test::request()
        .method("GET")
        .path("/health")
        .reply(&app)
        .await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.body(), "OK");
}

#[tokio::test]
async fn test_register_then_login() {
    let (app, _ctx) = create_test_app().await;

    let response = warp::test::request()
        .method("POST")
        .path("/api/users")
        .json(&json!({
            "user_name": "alice",
            "email": "alice@example.com",
            "password": "11AAaa!!"
        }))
        .reply(&app)
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(&response);
    assert_eq!(body["user_name"], "alice");
    assert_eq!(body["email"], "alice@example.com");
    assert!(body.get("password").is_none());
    let location = format!("/api/users/{}", body["id"]);
    assert_eq!(response.headers()["location"], location.as_str());

    let response = warp::test::request()
        .method("POST")
        .path("/api/auth/login")
        .json(&json!({ "user_name": "alice", "password": "11AAaa!!" }))
        .reply(&app)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let token = json_body(&response)["authToken"]
        .as_str()
        .unwrap()
        .to_string();

    // The new user's settings were created alongside the account
    let user_id = body["id"].as_i64().unwrap();
    let response = warp::test::request()
        .method("GET")
        .path(&format!("/api/users/{}/settings", user_id))
        .header("authorization", format!("Bearer {}", token))
        .reply(&app)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(&response)["dark_mode"], false);
}

#[tokio::test]
async fn test_registration_errors() {
    let (app, ctx) = create_test_app().await;
    ctx.seed_user("alice").await;

    let cases = vec![
        (
            json!({ "email": "bob@example.com", "password": "11AAaa!!" }),
            "Missing 'user_name' in request body",
        ),
        (
            json!({ "user_name": "bob", "email": "bob@example.com" }),
            "Missing 'password' in request body",
        ),
        (
            json!({ "user_name": "bob", "email": "bob@example.com", "password": "1Aa!" }),
            "Password must be longer than 8 characters",
        ),
        (
            json!({ "user_name": "bob", "email": "bob@example.com", "password": "11AAaabb" }),
            "Password must contain 1 upper case, lower case, number and special character",
        ),
        (
            json!({ "user_name": "bob", "email": "not-an-email", "password": "11AAaa!!" }),
            "Email is invalid",
        ),
        (
            json!({ "user_name": "alice", "email": "alice2@example.com", "password": "11AAaa!!" }),
            "Username already taken",
        ),
        (
            json!({ "user_name": "bob", "email": "alice@test.com", "password": "11AAaa!!" }),
            "A user is already registered with this email address",
        ),
    ];

    for (body, message) in cases {
        let response = warp::test::request()
            .method("POST")
            .path("/api/users")
            .json(&body)
            .reply(&app)
            .await;
        assert_error(&response, StatusCode::BAD_REQUEST, message);
    }
}

#[tokio::test]
async fn test_login_rejections() {
    let (app, ctx) = create_test_app().await;
    ctx.seed_user("alice").await;

    let response = warp::test::request()
        .method("POST")
        .path("/api/auth/login")
        .json(&json!({ "password": "11AAaa!!" }))
        .reply(&app)
        .await;
    assert_error(
        &response,
        StatusCode::BAD_REQUEST,
        "Missing 'user_name' in request body",
    );

    let response = warp::test::request()
        .method("POST")
        .path("/api/auth/login")
        .json(&json!({ "user_name": "nobody", "password": "11AAaa!!" }))
        .reply(&app)
        .await;
    assert_error(
        &response,
        StatusCode::BAD_REQUEST,
        "Incorrect username or password",
    );
}

#[tokio::test]
async fn test_refresh_issues_token_for_caller() {
    let (app, ctx) = create_test_app().await;
    let alice = ctx.seed_user("alice").await;

    let response = warp::test::request()
        .method("POST")
        .path("/api/auth/refresh")
        .header("authorization", ctx.bearer(&alice))
        .reply(&app)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let token = json_body(&response)["authToken"]
        .as_str()
        .unwrap()
        .to_string();
    let claims = ctx.auth_service.verify_token(&token).unwrap();
    assert_eq!(claims.sub, "alice");
    assert_eq!(claims.user_id, alice.id);
}

#[tokio::test]
async fn test_anonymous_reads_succeed() {
    let (app, ctx) = create_test_app().await;
    let alice = ctx.seed_user("alice").await;
    let word = ctx.seed_word("Boolean").await;
    ctx.seed_definition(&alice, &word, "A true or false value.")
        .await;

    for path in ["/api/words", "/api/definitions"] {
        let response = warp::test::request()
            .method("GET")
            .path(path)
            .reply(&app)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(&response).as_array().unwrap().len(), 1);
    }
}

#[tokio::test]
async fn test_protected_endpoints_require_token() {
    let (app, ctx) = create_test_app().await;
    let alice = ctx.seed_user("alice").await;
    let word = ctx.seed_word("Boolean").await;
    let definition = ctx
        .seed_definition(&alice, &word, "A true or false value.")
        .await;

    let requests = vec![
        ("POST", "/api/auth/refresh".to_string()),
        ("POST", "/api/words".to_string()),
        ("PATCH", format!("/api/words/{}", word.id)),
        ("DELETE", format!("/api/words/{}", word.id)),
        ("POST", "/api/definitions".to_string()),
        ("PATCH", format!("/api/definitions/{}", definition.id)),
        ("DELETE", format!("/api/definitions/{}", definition.id)),
        ("GET", format!("/api/users/{}/words", alice.id)),
        ("POST", format!("/api/users/{}/definitions", alice.id)),
        ("GET", format!("/api/users/{}/settings", alice.id)),
        ("PATCH", format!("/api/users/{}/settings", alice.id)),
    ];

    for (method, path) in requests {
        let response = warp::test::request()
            .method(method)
            .path(&path)
            .json(&json!({}))
            .reply(&app)
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{} {}", method, path);
        assert_eq!(
            json_body(&response),
            json!({ "error": "Missing bearer token" }),
            "{} {}",
            method,
            path
        );
    }

    let response = warp::test::request()
        .method("POST")
        .path("/api/words")
        .header("authorization", "Bearer not-a-token")
        .json(&json!({ "text": "Integer" }))
        .reply(&app)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        json_body(&response),
        json!({ "error": "Unauthorized request" })
    );
}

#[tokio::test]
async fn test_word_lifecycle() {
    let (app, ctx) = create_test_app().await;
    let alice = ctx.seed_user("alice").await;
    let auth = ctx.bearer(&alice);

    let response = warp::test::request()
        .method("POST")
        .path("/api/words")
        .header("authorization", &auth)
        .json(&json!({ "text": "Boolean" }))
        .reply(&app)
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let word_id = json_body(&response)["id"].as_i64().unwrap();
    assert_eq!(
        response.headers()["location"],
        format!("/api/words/{}", word_id).as_str()
    );

    let response = warp::test::request()
        .method("POST")
        .path("/api/words")
        .header("authorization", &auth)
        .json(&json!({ "text": "Boolean" }))
        .reply(&app)
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "Word already exists");

    let response = warp::test::request()
        .method("POST")
        .path("/api/words")
        .header("authorization", &auth)
        .json(&json!({}))
        .reply(&app)
        .await;
    assert_error(
        &response,
        StatusCode::BAD_REQUEST,
        "Missing 'text' in request body",
    );

    let response = warp::test::request()
        .method("PATCH")
        .path(&format!("/api/words/{}", word_id))
        .header("authorization", &auth)
        .json(&json!({}))
        .reply(&app)
        .await;
    assert_error(
        &response,
        StatusCode::BAD_REQUEST,
        "Request body must contain 'text'",
    );

    let response = warp::test::request()
        .method("PATCH")
        .path(&format!("/api/words/{}", word_id))
        .header("authorization", &auth)
        .json(&json!({ "text": "Bool" }))
        .reply(&app)
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = warp::test::request()
        .method("GET")
        .path(&format!("/api/words/{}", word_id))
        .reply(&app)
        .await;
    assert_eq!(json_body(&response)["text"], "Bool");

    let response = warp::test::request()
        .method("DELETE")
        .path(&format!("/api/words/{}", word_id))
        .header("authorization", &auth)
        .reply(&app)
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = warp::test::request()
        .method("GET")
        .path(&format!("/api/words/{}", word_id))
        .reply(&app)
        .await;
    assert_error(&response, StatusCode::NOT_FOUND, "Word does not exist");

    let response = warp::test::request()
        .method("DELETE")
        .path(&format!("/api/words/{}", word_id))
        .header("authorization", &auth)
        .reply(&app)
        .await;
    assert_error(&response, StatusCode::NOT_FOUND, "Word does not exist");
}

#[tokio::test]
async fn test_word_in_use_rejects_update_and_delete() {
    let (app, ctx) = create_test_app().await;
    let alice = ctx.seed_user("alice").await;
    let word = ctx.seed_word("Boolean").await;
    ctx.seed_definition(&alice, &word, "A true or false value.")
        .await;
    let auth = ctx.bearer(&alice);

    let response = warp::test::request()
        .method("PATCH")
        .path(&format!("/api/words/{}", word.id))
        .header("authorization", &auth)
        .json(&json!({ "text": "Bool" }))
        .reply(&app)
        .await;
    assert_error(
        &response,
        StatusCode::BAD_REQUEST,
        "Cannot update a word with existing definitions",
    );

    let response = warp::test::request()
        .method("DELETE")
        .path(&format!("/api/words/{}", word.id))
        .header("authorization", &auth)
        .reply(&app)
        .await;
    assert_error(
        &response,
        StatusCode::BAD_REQUEST,
        "Cannot delete a word with existing definitions",
    );
}

#[tokio::test]
async fn test_definition_authoring() {
    let (app, ctx) = create_test_app().await;
    let alice = ctx.seed_user("alice").await;
    let bob = ctx.seed_user("bob").await;
    let word = ctx.seed_word("Boolean").await;

    let response = warp::test::request()
        .method("POST")
        .path("/api/definitions")
        .header("authorization", ctx.bearer(&alice))
        .json(&json!({ "word_id": word.id, "text": "A true or false value." }))
        .reply(&app)
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(&response);
    assert_eq!(created["author_id"], alice.id);
    assert_eq!(created["like_count"], 0);
    let definition_id = created["id"].as_i64().unwrap();
    let path = format!("/api/definitions/{}", definition_id);
    assert_eq!(response.headers()["location"], path.as_str());

    let response = warp::test::request()
        .method("POST")
        .path("/api/definitions")
        .header("authorization", ctx.bearer(&alice))
        .json(&json!({ "word_id": 999, "text": "Nothing" }))
        .reply(&app)
        .await;
    assert_error(&response, StatusCode::NOT_FOUND, "Word does not exist");

    // Only the author may change it
    let response = warp::test::request()
        .method("PATCH")
        .path(&path)
        .header("authorization", ctx.bearer(&bob))
        .json(&json!({ "text": "Hijacked" }))
        .reply(&app)
        .await;
    assert_error(
        &response,
        StatusCode::FORBIDDEN,
        "Only the author may modify this definition",
    );

    let response = warp::test::request()
        .method("DELETE")
        .path(&path)
        .header("authorization", ctx.bearer(&bob))
        .reply(&app)
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = warp::test::request()
        .method("PATCH")
        .path(&path)
        .header("authorization", ctx.bearer(&alice))
        .json(&json!({ "like_count": 100 }))
        .reply(&app)
        .await;
    assert_error(
        &response,
        StatusCode::BAD_REQUEST,
        "Request body must contain 'text'",
    );

    let response = warp::test::request()
        .method("PATCH")
        .path(&path)
        .header("authorization", ctx.bearer(&alice))
        .json(&json!({ "text": "Either true or false." }))
        .reply(&app)
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = warp::test::request()
        .method("GET")
        .path(&path)
        .reply(&app)
        .await;
    let body = json_body(&response);
    assert_eq!(body["text"], "Either true or false.");
    assert_eq!(body["like_count"], 0);

    let response = warp::test::request()
        .method("DELETE")
        .path(&path)
        .header("authorization", ctx.bearer(&alice))
        .reply(&app)
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = warp::test::request()
        .method("GET")
        .path(&path)
        .reply(&app)
        .await;
    assert_error(&response, StatusCode::NOT_FOUND, "Definition doesn't exist");
}

#[tokio::test]
async fn test_definition_listing_filters() {
    let (app, ctx) = create_test_app().await;
    let alice = ctx.seed_user("alice").await;
    let bob = ctx.seed_user("bob").await;
    let boolean = ctx.seed_word("Boolean").await;
    let integer = ctx.seed_word("Integer").await;
    ctx.seed_definition(&alice, &boolean, "A true or false value.")
        .await;
    ctx.seed_definition(&bob, &boolean, "Named after George Boole.")
        .await;
    ctx.seed_definition(&alice, &integer, "A whole number.")
        .await;

    let response = warp::test::request()
        .method("GET")
        .path(&format!("/api/definitions?word_id={}", boolean.id))
        .reply(&app)
        .await;
    assert_eq!(json_body(&response).as_array().unwrap().len(), 2);

    let response = warp::test::request()
        .method("GET")
        .path(&format!("/api/definitions?author_id={}", alice.id))
        .reply(&app)
        .await;
    let authored = json_body(&response);
    let authored = authored.as_array().unwrap();
    assert_eq!(authored.len(), 2);
    // Newest first, joined with the word text
    assert_eq!(authored[0]["word_text"], "Integer");
    assert_eq!(authored[1]["word_text"], "Boolean");

    let response = warp::test::request()
        .method("GET")
        .path("/api/definitions?word_id=abc")
        .reply(&app)
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "Invalid query string");
}

#[tokio::test]
async fn test_markup_is_sanitized_on_read() {
    let (app, ctx) = create_test_app().await;
    let alice = ctx.seed_user("alice").await;
    let word = ctx.seed_word(r#"Naughty <script>alert("xss");</script>"#).await;
    let definition = ctx
        .seed_definition(
            &alice,
            &word,
            r#"Bad image <img src="https://url.to.file.which/does-not.exist" onerror="alert(document.cookie);">. But not <strong>all</strong> bad."#,
        )
        .await;

    let response = warp::test::request()
        .method("GET")
        .path(&format!("/api/words/{}", word.id))
        .reply(&app)
        .await;
    assert_eq!(
        json_body(&response)["text"],
        r#"Naughty &lt;script&gt;alert("xss");&lt;/script&gt;"#
    );

    let response = warp::test::request()
        .method("GET")
        .path(&format!("/api/definitions/{}", definition.id))
        .reply(&app)
        .await;
    assert_eq!(
        json_body(&response)["text"],
        r#"Bad image <img src="https://url.to.file.which/does-not.exist">. But not <strong>all</strong> bad."#
    );
}

#[tokio::test]
async fn test_settings_patch() {
    let (app, ctx) = create_test_app().await;
    let alice = ctx.seed_user("alice").await;
    let bob = ctx.seed_user("bob").await;
    let path = format!("/api/users/{}/settings", alice.id);

    let response = warp::test::request()
        .method("PATCH")
        .path(&path)
        .header("authorization", ctx.bearer(&alice))
        .json(&json!({ "dark_mode": true }))
        .reply(&app)
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = warp::test::request()
        .method("GET")
        .path(&path)
        .header("authorization", ctx.bearer(&alice))
        .reply(&app)
        .await;
    let body = json_body(&response);
    assert_eq!(body["dark_mode"], true);
    assert_eq!(body["user_id"], alice.id);

    // `false` is a value, not an absent field
    let response = warp::test::request()
        .method("PATCH")
        .path(&path)
        .header("authorization", ctx.bearer(&alice))
        .json(&json!({ "dark_mode": false }))
        .reply(&app)
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = warp::test::request()
        .method("PATCH")
        .path(&path)
        .header("authorization", ctx.bearer(&alice))
        .json(&json!({ "dark_mode": null }))
        .reply(&app)
        .await;
    assert_error(
        &response,
        StatusCode::BAD_REQUEST,
        "Request body must contain 'dark_mode'",
    );

    let response = warp::test::request()
        .method("GET")
        .path(&path)
        .header("authorization", ctx.bearer(&bob))
        .reply(&app)
        .await;
    assert_error(
        &response,
        StatusCode::FORBIDDEN,
        "You may only access your own collection",
    );
}

#[tokio::test]
async fn test_malformed_body_and_unknown_routes() {
    let (app, ctx) = create_test_app().await;
    let alice = ctx.seed_user("alice").await;

    let response = warp::test::request()
        .method("POST")
        .path("/api/words")
        .header("authorization", ctx.bearer(&alice))
        .header("content-type", "application/json")
        .body("{\"text\":")
        .reply(&app)
        .await;
    assert_error(
        &response,
        StatusCode::BAD_REQUEST,
        "Request body must be valid JSON",
    );

    let response = warp::test::request()
        .method("GET")
        .path("/api/nothing-here")
        .reply(&app)
        .await;
    assert_error(&response, StatusCode::NOT_FOUND, "Not found");
}
