// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! HTTP client for the chat-creation API.

use crate::error::{ChatClientError, ChatClientResult};
use crate::ChatCreator;
use async_trait::async_trait;
use gitchat_domain::{ChatSession, PrivacyLevel};
use reqwest::{Client as HttpClient, StatusCode};
use serde::Serialize;
use url::Url;

/// A chat-creation request.
///
/// `credential` is the API key the chat is created under; it travels in the
/// `Authorization` header, never in the request body.
#[derive(Debug, Clone)]
pub struct CreateChatRequest {
    pub repository_url: String,
    pub branch: String,
    pub credential: String,
    pub privacy_level: PrivacyLevel,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateChatBody<'a> {
    repository_url: &'a str,
    branch: &'a str,
    privacy_level: PrivacyLevel,
}

/// Client for the remote chat-creation service.
#[derive(Debug, Clone)]
pub struct ChatServiceClient {
    http: HttpClient,
    base_url: Url,
}

impl ChatServiceClient {
    pub fn new(base_url: Url) -> Self {
        let http = HttpClient::builder()
            .user_agent(concat!("gitchat/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to create HTTP client");

        Self { http, base_url }
    }

    pub fn from_url(base_url: &str) -> ChatClientResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| ChatClientError::UnexpectedResponse(format!("invalid base URL: {}", err)))?;
        Ok(Self::new(base_url))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl ChatCreator for ChatServiceClient {
    async fn create_chat(&self, request: &CreateChatRequest) -> ChatClientResult<ChatSession> {
        let url = self
            .base_url
            .join("v1/chats")
            .map_err(|err| ChatClientError::UnexpectedResponse(format!("invalid path: {}", err)))?;

        let body = CreateChatBody {
            repository_url: &request.repository_url,
            branch: &request.branch,
            privacy_level: request.privacy_level,
        };

        tracing::debug!(
            repository_url = %request.repository_url,
            branch = %request.branch,
            "creating chat session"
        );

        let response = self
            .http
            .post(url)
            .bearer_auth(&request.credential)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            return serde_json::from_str(&text)
                .map_err(|err| ChatClientError::UnexpectedResponse(err.to_string()));
        }

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ChatClientError::Unauthorized),
            StatusCode::TOO_MANY_REQUESTS => Err(ChatClientError::RateLimited),
            _ => Err(ChatClientError::Upstream {
                status: status.as_u16(),
                message: text,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation_normalizes_base_url() {
        let client = ChatServiceClient::from_url("https://chat.example.com").unwrap();
        assert_eq!(client.base_url().as_str(), "https://chat.example.com/");
    }

    #[test]
    fn request_body_excludes_the_credential() {
        let body = CreateChatBody {
            repository_url: "https://github.com/octocat/Hello-World",
            branch: "master",
            privacy_level: PrivacyLevel::Private,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "repositoryUrl": "https://github.com/octocat/Hello-World",
                "branch": "master",
                "privacyLevel": "private"
            })
        );
    }

    #[test]
    fn session_response_parses_with_and_without_demo_url() {
        let with_demo: ChatSession = serde_json::from_str(
            r#"{"id":"c1","url":"https://chat.example.com/c/c1","demoUrl":"https://demo.example.com/c1"}"#,
        )
        .unwrap();
        assert!(with_demo.demo_url.is_some());

        let without: ChatSession =
            serde_json::from_str(r#"{"id":"c2","url":"https://chat.example.com/c/c2"}"#).unwrap();
        assert!(without.demo_url.is_none());
    }
}
