mod common;

use axum::http::StatusCode;
use common::{
    assert_err_envelope, assert_ok_envelope, build_test_context, login_and_get_token,
    request_json, request_no_body, request_raw, SERVICE_KEY,
};
use serde_json::{json, Value};

#[tokio::test]
async fn health_should_return_ok_envelope() {
    let ctx = build_test_context().await.expect("test context should build");
    let (status, body, trace) = request_no_body(&ctx.app, "GET", "/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_ok_envelope(&body);
    assert!(body["data"]["version"].is_string());
    assert_eq!(body["data"]["storage_status"], "ok");
    assert_eq!(trace.as_deref(), body["trace_id"].as_str());
}

#[tokio::test]
async fn auth_login_success_and_failure_cases() {
    let ctx = build_test_context().await.expect("test context should build");

    let (status, body, _) = request_json(
        &ctx.app,
        "POST",
        "/v1/auth/login",
        None,
        Some(json!({"username": "admin", "password": "changeme"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_ok_envelope(&body);
    assert!(body["data"]["token"].is_string());
    assert_eq!(body["data"]["expires_in"], 3600);

    let (status, body, _) = request_json(
        &ctx.app,
        "POST",
        "/v1/auth/login",
        None,
        Some(json!({"username": "admin", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_err_envelope(&body, 1002);

    let (status, body, _) = request_json(
        &ctx.app,
        "POST",
        "/v1/auth/login",
        None,
        Some(json!({"username": "", "password": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_err_envelope(&body, 1001);
}

#[tokio::test]
async fn protected_routes_require_credentials() {
    let ctx = build_test_context().await.expect("test context should build");

    for uri in ["/v1/services", "/v1/contact-submissions", "/v1/dashboard", "/v1/media"] {
        let (status, body, _) = request_no_body(&ctx.app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_err_envelope(&body, 1002);

        let (status, _, _) = request_no_body(&ctx.app, "GET", uri, Some("not-a-token")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
    }

    let (status, _, _) = request_json(&ctx.app, "POST", "/v1/import/services", None, Some(json!([])))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn session_reports_admin_and_service_callers() {
    let ctx = build_test_context().await.expect("test context should build");
    let token = login_and_get_token(&ctx.app).await;

    let (status, body, _) =
        request_no_body(&ctx.app, "GET", "/v1/auth/session", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "admin");
    assert_eq!(body["data"]["kind"], "admin");

    let (status, body, _) =
        request_no_body(&ctx.app, "GET", "/v1/auth/session", Some(SERVICE_KEY)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["kind"], "service");
}

struct Panel {
    path: &'static str,
    create: Value,
    field: &'static str,
    update: Value,
}

impl Panel {
    /// What a list fetch should show for `create`: every submitted field,
    /// after the normalization the store applies.
    fn expected(&self) -> Value {
        let mut expected = self.create.clone();
        if let Some(reqs) = expected.get_mut("requirements") {
            let normalized: Vec<Value> = reqs
                .as_array()
                .expect("requirements array")
                .iter()
                .filter_map(|r| r.as_str())
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(|r| json!(r))
                .collect();
            *reqs = Value::Array(normalized);
        }
        expected
    }
}

fn panels() -> Vec<Panel> {
    vec![
        Panel {
            path: "/v1/services",
            create: json!({
                "title": "Lead Generation",
                "description": "Pipelines that fill themselves",
                "icon": "Workflow",
                "sort_order": 2,
                "is_active": true
            }),
            field: "title",
            update: json!({"title": "Lead Gen"}),
        },
        Panel {
            path: "/v1/case-studies",
            create: json!({
                "client": "Acme",
                "metric": "3x",
                "label": "pipeline",
                "description": "Tripled demos",
                "icon": "TrendingUp",
                "sort_order": 1,
                "is_active": true
            }),
            field: "client",
            update: json!({"client": "Acme Corp"}),
        },
        Panel {
            path: "/v1/testimonials",
            create: json!({"quote": "They delivered.", "author": "Pat", "role": "CEO", "is_active": false}),
            field: "quote",
            update: json!({"quote": "They really delivered."}),
        },
        Panel {
            path: "/v1/process-steps",
            create: json!({
                "week": "Week 1",
                "title": "Discovery",
                "description": "Audit",
                "icon": "Rocket",
                "sort_order": 3,
                "is_active": true
            }),
            field: "title",
            update: json!({"title": "Deep discovery"}),
        },
        Panel {
            path: "/v1/tech-stack",
            create: json!({"name": "OpenAI", "category": "AI", "sort_order": 4, "is_active": true}),
            field: "name",
            update: json!({"name": "Anthropic"}),
        },
        Panel {
            path: "/v1/blog-posts",
            create: json!({
                "slug": "why-agents-win",
                "title": "Why Agents Win",
                "excerpt": "Short",
                "content": "Long form body",
                "image_url": "https://cdn.example.com/agents.png",
                "category": "AI",
                "read_time": "7 min read",
                "is_published": false
            }),
            field: "title",
            update: json!({"title": "Why Agents Still Win"}),
        },
        Panel {
            path: "/v1/careers",
            create: json!({
                "title": "Engineer",
                "department": "Eng",
                "location": "Remote",
                "type": "Contract",
                "description": "Build",
                "requirements": ["Rust", " ", " Tokio "],
                "is_active": true,
                "sort_order": 1
            }),
            field: "title",
            update: json!({"title": "Senior Engineer"}),
        },
        Panel {
            path: "/v1/team-members",
            create: json!({
                "name": "Alex",
                "role": "Founder",
                "bio": "Ships things",
                "email": "alex@example.com",
                "photo_url": "https://cdn.example.com/alex.jpg",
                "linkedin_url": "https://linkedin.com/in/alex",
                "twitter_url": "https://x.com/alex",
                "github_url": "https://github.com/alex",
                "is_active": true,
                "sort_order": 2
            }),
            field: "name",
            update: json!({"name": "Alex K."}),
        },
    ]
}

#[tokio::test]
async fn admin_panels_support_full_crud() {
    let ctx = build_test_context().await.expect("test context should build");
    let token = login_and_get_token(&ctx.app).await;

    for panel in panels() {
        let (status, body, _) = request_json(
            &ctx.app,
            "POST",
            panel.path,
            Some(&token),
            Some(panel.create.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "create {}: {body}", panel.path);
        let id = body["data"]["id"].as_str().expect("id").to_string();
        assert_eq!(body["data"][panel.field], panel.create[panel.field]);

        let (status, body, _) = request_no_body(&ctx.app, "GET", panel.path, Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total"], 1, "{}", panel.path);
        assert_eq!(body["data"]["limit"], 100);
        let listed = &body["data"]["items"][0];
        assert_eq!(listed["id"], id.as_str());
        let expected = panel.expected();
        for (key, value) in expected.as_object().expect("create payload is an object") {
            assert_eq!(&listed[key], value, "{} field {key}", panel.path);
        }

        let item_uri = format!("{}/{}", panel.path, id);
        let (status, body, _) =
            request_json(&ctx.app, "PUT", &item_uri, Some(&token), Some(panel.update.clone()))
                .await;
        assert_eq!(status, StatusCode::OK, "update {}", panel.path);
        assert_eq!(body["data"][panel.field], panel.update[panel.field]);

        let (status, body, _) = request_no_body(&ctx.app, "GET", &item_uri, Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][panel.field], panel.update[panel.field]);

        let (status, _, _) = request_no_body(&ctx.app, "DELETE", &item_uri, Some(&token)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body, _) = request_no_body(&ctx.app, "GET", &item_uri, Some(&token)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_err_envelope(&body, 1004);

        let (_, body, _) = request_no_body(&ctx.app, "GET", panel.path, Some(&token)).await;
        assert_eq!(body["data"]["total"], 0, "{}", panel.path);
    }
}

#[tokio::test]
async fn create_rejects_blank_required_field_and_bad_json() {
    let ctx = build_test_context().await.expect("test context should build");
    let token = login_and_get_token(&ctx.app).await;

    let (status, body, _) = request_json(
        &ctx.app,
        "POST",
        "/v1/services",
        Some(&token),
        Some(json!({"title": "  ", "description": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_err_envelope(&body, 1001);

    let (status, body, _) = request_json(
        &ctx.app,
        "POST",
        "/v1/services",
        Some(&token),
        Some(json!({"description": "missing title"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_err_envelope(&body, 1001);
}

#[tokio::test]
async fn careers_trim_requirements() {
    let ctx = build_test_context().await.expect("test context should build");
    let token = login_and_get_token(&ctx.app).await;

    let (_, body, _) = request_json(
        &ctx.app,
        "POST",
        "/v1/careers",
        Some(&token),
        Some(json!({"title": "Engineer", "department": "Eng", "location": "Remote", "description": "Build", "requirements": ["Rust", " ", " Tokio "]})),
    )
    .await;
    assert_eq!(body["data"]["requirements"], json!(["Rust", "Tokio"]));
    assert_eq!(body["data"]["type"], "Full-time");
}

#[tokio::test]
async fn unpublished_blog_posts_stay_private() {
    let ctx = build_test_context().await.expect("test context should build");
    let token = login_and_get_token(&ctx.app).await;

    let (_, draft, _) = request_json(
        &ctx.app,
        "POST",
        "/v1/blog-posts",
        Some(&token),
        Some(json!({"title": "Draft Post"})),
    )
    .await;
    assert_eq!(draft["data"]["slug"], "draft-post");
    assert!(draft["data"]["published_at"].is_null());

    let (_, live, _) = request_json(
        &ctx.app,
        "POST",
        "/v1/blog-posts",
        Some(&token),
        Some(json!({"title": "Live Post", "is_published": true})),
    )
    .await;
    assert!(live["data"]["published_at"].is_string());

    let (status, body, _) = request_no_body(&ctx.app, "GET", "/v1/public/blog", None).await;
    assert_eq!(status, StatusCode::OK);
    let slugs: Vec<&str> = body["data"]
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|p| p["slug"].as_str())
        .collect();
    assert_eq!(slugs, vec!["live-post"]);

    let (status, _, _) =
        request_no_body(&ctx.app, "GET", "/v1/public/blog/draft-post", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body, _) =
        request_no_body(&ctx.app, "GET", "/v1/public/blog/live-post", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Live Post");

    // Publishing the draft stamps it and makes it public.
    let draft_uri = format!("/v1/blog-posts/{}", draft["data"]["id"].as_str().expect("id"));
    let (_, body, _) = request_json(
        &ctx.app,
        "PUT",
        &draft_uri,
        Some(&token),
        Some(json!({"is_published": true})),
    )
    .await;
    assert!(body["data"]["published_at"].is_string());
    let (status, _, _) =
        request_no_body(&ctx.app, "GET", "/v1/public/blog/draft-post", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body, _) = request_json(
        &ctx.app,
        "PUT",
        &draft_uri,
        Some(&token),
        Some(json!({"is_published": false})),
    )
    .await;
    assert!(body["data"]["published_at"].is_null());
}

#[tokio::test]
async fn duplicate_blog_slug_is_a_conflict() {
    let ctx = build_test_context().await.expect("test context should build");
    let token = login_and_get_token(&ctx.app).await;

    let post = json!({"title": "Same", "slug": "same"});
    let (status, _, _) =
        request_json(&ctx.app, "POST", "/v1/blog-posts", Some(&token), Some(post.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body, _) =
        request_json(&ctx.app, "POST", "/v1/blog-posts", Some(&token), Some(post)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_err_envelope(&body, 1005);
}

#[tokio::test]
async fn public_lists_hide_inactive_rows_and_group_tech_stack() {
    let ctx = build_test_context().await.expect("test context should build");
    let token = login_and_get_token(&ctx.app).await;

    for (title, sort_order, is_active) in [("Second", 2, true), ("First", 1, true), ("Hidden", 0, false)] {
        request_json(
            &ctx.app,
            "POST",
            "/v1/services",
            Some(&token),
            Some(json!({"title": title, "description": "d", "sort_order": sort_order, "is_active": is_active})),
        )
        .await;
    }
    for (name, category, sort_order) in [("GPT", "AI", 0), ("Postgres", "Data", 1), ("Claude", "AI", 2)] {
        request_json(
            &ctx.app,
            "POST",
            "/v1/tech-stack",
            Some(&token),
            Some(json!({"name": name, "category": category, "sort_order": sort_order})),
        )
        .await;
    }

    let (_, body, _) = request_no_body(&ctx.app, "GET", "/v1/public/services", None).await;
    let titles: Vec<&str> = body["data"]
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|s| s["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["First", "Second"]);

    let (_, body, _) = request_no_body(&ctx.app, "GET", "/v1/public/tech-stack", None).await;
    assert_eq!(body["data"][0]["category"], "AI");
    assert_eq!(body["data"][0]["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["data"][1]["category"], "Data");

    let (status, body, _) = request_no_body(&ctx.app, "GET", "/v1/public/home", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["services"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["data"]["tech_stack"].as_array().map(Vec::len), Some(2));
    assert_eq!(
        body["data"]["hero"]["ctaText"],
        "Book a Strategy Call"
    );
}

#[tokio::test]
async fn settings_round_trip_with_defaults() {
    let ctx = build_test_context().await.expect("test context should build");
    let token = login_and_get_token(&ctx.app).await;

    let (status, body, _) = request_no_body(&ctx.app, "GET", "/v1/settings", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["contact"]["location"], "San Francisco, CA");

    let (status, body, _) = request_json(
        &ctx.app,
        "PUT",
        "/v1/settings/social",
        Some(&token),
        Some(json!({"github": "https://github.com/catalyst"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["key"], "social");

    let (status, body, _) = request_json(
        &ctx.app,
        "PUT",
        "/v1/settings/footer",
        Some(&token),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_err_envelope(&body, 1001);

    let (_, body, _) = request_no_body(&ctx.app, "GET", "/v1/public/settings", None).await;
    assert_eq!(body["data"]["social"]["github"], "https://github.com/catalyst");
    assert_eq!(body["data"]["social"]["twitter"], "");
    assert_eq!(body["data"]["hero"]["title"], "AI-Powered Growth for Modern Businesses");

    let mut all = body["data"].clone();
    all["hero"]["title"] = json!("New headline");
    let (status, _, _) =
        request_json(&ctx.app, "PUT", "/v1/settings", Some(&token), Some(all)).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body, _) = request_no_body(&ctx.app, "GET", "/v1/settings", Some(&token)).await;
    assert_eq!(body["data"]["hero"]["title"], "New headline");
    assert_eq!(body["data"]["social"]["github"], "https://github.com/catalyst");
}

#[tokio::test]
async fn import_endpoint_accepts_service_key_and_keeps_ids() {
    let ctx = build_test_context().await.expect("test context should build");

    let rows = json!([
        {"id": "legacy-1", "title": "Imported", "description": "from old site", "created_at": "2024-01-02T03:04:05Z"},
        {"title": "Second", "description": "no id"}
    ]);
    let (status, body, _) =
        request_json(&ctx.app, "POST", "/v1/import/services", Some(SERVICE_KEY), Some(rows)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["inserted"], 2);
    assert_eq!(body["data"]["table"], "services");

    let token = login_and_get_token(&ctx.app).await;
    let (status, body, _) =
        request_no_body(&ctx.app, "GET", "/v1/services/legacy-1", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["created_at"], "2024-01-02T03:04:05Z");

    let (status, body, _) = request_json(
        &ctx.app,
        "POST",
        "/v1/import/users",
        Some(SERVICE_KEY),
        Some(json!([])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_err_envelope(&body, 1104);

    let (status, body, _) = request_json(
        &ctx.app,
        "POST",
        "/v1/import/services",
        Some(SERVICE_KEY),
        Some(json!([{"title": "ok", "description": "d"}, {"title": 5}])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["err_msg"].as_str().unwrap_or_default().contains("row 1"));

    let (status, body, _) = request_json(
        &ctx.app,
        "POST",
        "/v1/import/services",
        Some(SERVICE_KEY),
        Some(json!([{"id": "legacy-1", "title": "dup", "description": "d"}])),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_err_envelope(&body, 1005);
}

#[tokio::test]
async fn media_upload_list_serve_and_delete() {
    let ctx = build_test_context().await.expect("test context should build");
    let token = login_and_get_token(&ctx.app).await;

    let boundary = "catalyst-boundary";
    let multipart = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"Logo.PNG\"\r\nContent-Type: image/png\r\n\r\nPNGDATA\r\n--{boundary}--\r\n"
    );
    let (status, body, _) = request_raw(
        &ctx.app,
        "POST",
        "/v1/media",
        Some(&token),
        &format!("multipart/form-data; boundary={boundary}"),
        multipart,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let name = body["data"][0]["name"].as_str().expect("name").to_string();
    assert!(name.ends_with(".png"));
    assert_eq!(body["data"][0]["size"], 7);
    assert_eq!(
        body["data"][0]["url"],
        format!("http://localhost:8080/media/{name}")
    );

    let (_, body, _) = request_no_body(&ctx.app, "GET", "/v1/media", Some(&token)).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    let (status, body, _) =
        request_no_body(&ctx.app, "GET", &format!("/media/{name}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("PNGDATA".to_string()));

    let (status, _, _) =
        request_no_body(&ctx.app, "DELETE", &format!("/v1/media/{name}"), Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _, _) =
        request_no_body(&ctx.app, "GET", &format!("/media/{name}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let ctx = build_test_context().await.expect("test context should build");
    let (status, body, _) = request_no_body(&ctx.app, "GET", "/v1/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/v1/public/home"].is_object());
    assert!(body["paths"]["/v1/import/{table}"].is_object());
    assert!(body["components"]["securitySchemes"]["bearer_auth"].is_object());
}
