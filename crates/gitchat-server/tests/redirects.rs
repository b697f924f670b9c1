// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Integration tests driving the full HTTP surface against mock
//! collaborators.

use gitchat_server::mock_dependencies::{MockChatCreator, MockDirectory, MockRepository, MockServerDependencies};
use gitchat_server::{Server, ServerConfig};
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

const MASTER_SHA: &str = "7fd1a60b01f91b314f59955a4e4d4e80d8edf11d";
const RELEASE_SHA: &str = "553c2077f0edc3d5dc5d17262f6aa498e69d6f8e";

struct TestServer {
    base_url: String,
    directory: Arc<MockDirectory>,
    chat_creator: Arc<MockChatCreator>,
    handle: JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn spawn_server() -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind to ephemeral port");
    let addr = listener.local_addr().expect("port");
    drop(listener);

    let config = ServerConfig {
        bind_addr: addr,
        system_chat_key: Some("system-key".to_string()),
        enable_cors: true,
        ..Default::default()
    };

    let deps = MockServerDependencies::new(config.clone()).expect("mock deps");
    deps.directory.add_repository(
        "octocat",
        "Hello-World",
        MockRepository::new(
            "master",
            &[("master", MASTER_SHA), ("release/1.0", RELEASE_SHA)],
        ),
    );

    let directory = deps.directory.clone();
    let chat_creator = deps.chat_creator.clone();
    let server = Server::with_state(config, deps.into_state()).expect("server");
    let base_url = format!("http://{}", addr);

    let handle = tokio::spawn(async move {
        server.run().await.expect("server run");
    });

    wait_for_health(&base_url).await;

    TestServer {
        base_url,
        directory,
        chat_creator,
        handle,
    }
}

async fn wait_for_health(base_url: &str) {
    let client = reqwest::Client::new();
    let healthz = format!("{}/api/v1/healthz", base_url);
    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    loop {
        if let Ok(response) = client.get(&healthz).send().await {
            if response.status().is_success() {
                return;
            }
        }
        if tokio::time::Instant::now() > deadline {
            panic!("server did not become healthy at {}", healthz);
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

fn no_redirect_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("client")
}

fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get("location")
        .expect("location header")
        .to_str()
        .expect("utf-8 location")
        .to_string()
}

#[tokio::test]
async fn repository_root_redirects_to_the_default_branch_tree() {
    let server = spawn_server().await;
    let client = no_redirect_client();

    let response = client
        .get(format!("{}/octocat/Hello-World", server.base_url))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 307);
    assert_eq!(
        location(&response),
        format!("/octocat/Hello-World/tree/master?commit={}", MASTER_SHA)
    );
}

#[tokio::test]
async fn tree_redirects_to_a_chat_and_reuses_it_while_cached() {
    let server = spawn_server().await;
    let client = no_redirect_client();
    let tree_url = format!("{}/octocat/Hello-World/tree/master", server.base_url);

    let first = client.get(&tree_url).send().await.expect("request");
    assert_eq!(first.status(), 307);
    let chat_url = location(&first);
    assert!(chat_url.starts_with("https://chat.example.com/c/"));

    let second = client.get(&tree_url).send().await.expect("request");
    assert_eq!(location(&second), chat_url);

    assert_eq!(server.directory.commit_calls(), 1);
    assert_eq!(server.chat_creator.call_count(), 1);
}

#[tokio::test]
async fn explicit_commit_skips_directory_resolution() {
    let server = spawn_server().await;
    let client = no_redirect_client();

    let response = client
        .get(format!(
            "{}/octocat/Hello-World/tree/master?commit={}",
            server.base_url, MASTER_SHA
        ))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 307);
    assert_eq!(server.directory.commit_calls(), 0);
    assert_eq!(server.chat_creator.call_count(), 1);
}

#[tokio::test]
async fn slash_branches_resolve_through_the_wildcard_route() {
    let server = spawn_server().await;
    let client = no_redirect_client();

    let response = client
        .get(format!(
            "{}/octocat/Hello-World/tree/release/1.0",
            server.base_url
        ))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 307);
    assert!(location(&response).starts_with("https://chat.example.com/c/"));
}

#[tokio::test]
async fn unknown_branch_lands_on_branch_selection() {
    let server = spawn_server().await;
    let client = no_redirect_client();

    let response = client
        .get(format!(
            "{}/octocat/Hello-World/tree/no-such-branch",
            server.base_url
        ))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 307);
    assert_eq!(location(&response), "/octocat/Hello-World/branches");
    assert_eq!(server.chat_creator.call_count(), 0);

    let selection: serde_json::Value = client
        .get(format!("{}/octocat/Hello-World/branches", server.base_url))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("json");

    assert_eq!(selection["repository"], "octocat/Hello-World");
    assert_eq!(selection["defaultBranch"], "master");
    assert_eq!(
        selection["branches"],
        serde_json::json!(["master", "release/1.0"])
    );
}

#[tokio::test]
async fn missing_repository_renders_a_problem_body() {
    let server = spawn_server().await;
    let client = no_redirect_client();

    let response = client
        .get(format!("{}/ghost/missing/tree/main", server.base_url))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 404);
    let problem: serde_json::Value = response.json().await.expect("json");
    assert_eq!(problem["title"], "Repository Not Found");
}

#[tokio::test]
async fn validation_endpoint_reports_url_shape() {
    let server = spawn_server().await;
    let client = no_redirect_client();

    let valid: serde_json::Value = client
        .get(format!(
            "{}/api/v1/validate?url=https%3A%2F%2Fgithub.com%2Fvercel%2Fnext.js.git%2F",
            server.base_url
        ))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("json");
    assert_eq!(valid, serde_json::json!({ "isValid": true }));

    let invalid: serde_json::Value = client
        .get(format!(
            "{}/api/v1/validate?url=https%3A%2F%2Fexample.com%2Fnope",
            server.base_url
        ))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("json");
    assert_eq!(invalid, serde_json::json!({ "isValid": false }));
}

#[tokio::test]
async fn token_endpoints_round_trip_for_the_owning_user() {
    let server = spawn_server().await;
    let client = no_redirect_client();
    let tokens_url = format!("{}/api/v1/tokens", server.base_url);

    // Anonymous callers are rejected.
    let anonymous = client.get(&tokens_url).send().await.expect("request");
    assert_eq!(anonymous.status(), 401);

    // Without a JWT secret the server honors the dev identity header.
    let status: serde_json::Value = client
        .get(&tokens_url)
        .header("x-user-id", "mona")
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("json");
    assert_eq!(status, serde_json::json!({ "configured": false }));

    let put = client
        .put(&tokens_url)
        .header("x-user-id", "mona")
        .json(&serde_json::json!({ "token": "v1:personal-key" }))
        .send()
        .await
        .expect("request");
    assert_eq!(put.status(), 204);

    let status: serde_json::Value = client
        .get(&tokens_url)
        .header("x-user-id", "mona")
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("json");
    assert_eq!(status, serde_json::json!({ "configured": true }));

    // Another user sees their own (empty) row.
    let other: serde_json::Value = client
        .get(&tokens_url)
        .header("x-user-id", "hubot")
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("json");
    assert_eq!(other, serde_json::json!({ "configured": false }));

    let delete = client
        .delete(&tokens_url)
        .header("x-user-id", "mona")
        .send()
        .await
        .expect("request");
    assert_eq!(delete.status(), 204);
}

#[tokio::test]
async fn private_chat_without_a_token_prompts_for_one() {
    let server = spawn_server().await;
    let client = no_redirect_client();

    let response = client
        .get(format!(
            "{}/octocat/Hello-World/tree/master?private=true",
            server.base_url
        ))
        .header("x-user-id", "mona")
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 428);
    let problem: serde_json::Value = response.json().await.expect("json");
    assert_eq!(
        problem["type"],
        "https://gitchat.dev/errors/no-token-configured"
    );
    assert_eq!(server.chat_creator.call_count(), 0);
}

#[tokio::test]
async fn stored_token_routes_private_chats_under_the_user_key() {
    let server = spawn_server().await;
    let client = no_redirect_client();
    let tokens_url = format!("{}/api/v1/tokens", server.base_url);

    client
        .put(&tokens_url)
        .header("x-user-id", "mona")
        .json(&serde_json::json!({ "token": "mona-key" }))
        .send()
        .await
        .expect("request");

    let response = client
        .get(format!(
            "{}/octocat/Hello-World/tree/master?private=true",
            server.base_url
        ))
        .header("x-user-id", "mona")
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 307);
    assert_eq!(server.directory.commit_calls(), 0);
    let requests = server.chat_creator.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].credential, "mona-key");
}

#[tokio::test]
async fn upstream_rate_limit_surfaces_as_429() {
    let server = spawn_server().await;
    let client = no_redirect_client();
    server.chat_creator.set_rate_limited(true);

    let response = client
        .get(format!("{}/octocat/Hello-World/tree/master", server.base_url))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 429);
    let problem: serde_json::Value = response.json().await.expect("json");
    assert_eq!(problem["title"], "Rate Limited");
}

#[tokio::test]
async fn malformed_owner_segment_is_rejected_before_any_lookup() {
    let server = spawn_server().await;
    let client = no_redirect_client();

    let response = client
        .get(format!("{}/bad%20owner/repo/tree/main", server.base_url))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 400);
    assert_eq!(server.directory.commit_calls(), 0);
}
