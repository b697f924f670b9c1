// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! GitChat server binary

use clap::Parser;
use gitchat_server::{Server, ServerConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "gitchat-server", about = "GitChat REST API server", version)]
struct Args {
    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1:3040")]
    bind: SocketAddr,

    /// Base URL of the chat-creation service
    #[arg(long, env = "GITCHAT_CHAT_SERVICE_URL", default_value = "https://chat.example.com")]
    chat_service_url: String,

    /// System-wide chat API key used for public chats
    #[arg(long, env = "GITCHAT_SYSTEM_KEY")]
    system_chat_key: Option<String>,

    /// GitHub API token (enables the GraphQL Directory transport)
    #[arg(long, env = "GITHUB_TOKEN")]
    github_token: Option<String>,

    /// JWT secret for identifying users
    #[arg(long, env = "GITCHAT_JWT_SECRET")]
    jwt_secret: Option<String>,

    /// Master key (base64, 32 bytes) sealing stored user tokens
    #[arg(long, env = "GITCHAT_MASTER_KEY")]
    master_key: Option<String>,

    /// Root directory for encrypted token files
    #[arg(long, env = "GITCHAT_CREDENTIALS_DIR")]
    credentials_dir: Option<PathBuf>,

    /// Enable permissive CORS headers for development
    #[arg(long)]
    enable_cors: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = ServerConfig {
        bind_addr: args.bind,
        chat_service_url: args.chat_service_url,
        system_chat_key: args.system_chat_key,
        github_token: args.github_token,
        jwt_secret: args.jwt_secret,
        master_key: args.master_key,
        credentials_dir: args.credentials_dir,
        enable_cors: args.enable_cors,
        ..ServerConfig::default()
    };

    let server = Server::new(config).await?;
    server.run().await?;
    Ok(())
}
