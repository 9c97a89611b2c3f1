//! phonoctl - command-line client for the phonod REST API

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use reqwest::{Client, Method};
use serde_json::{json, Value};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "phonoctl")]
#[command(about = "Control client for the phonod player service")]
#[command(version)]
struct Cli {
    /// Base URL of the phonod server
    #[arg(long, default_value = "http://127.0.0.1:5740", env = "PHONO_ADDR")]
    addr: String,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Start or resume playback
    Play,
    /// Pause playback
    Pause,
    /// Skip to the next track
    Next,
    /// Skip to the previous track
    Prev,
    /// Show player state and current track
    State,
    /// Add a track to the playlist
    Add {
        name: String,
        duration_ms: u64,
    },
    /// List all tracks
    List,
    /// Fetch one track
    Get {
        id: Uuid,
    },
    /// Replace a track's fields
    Update {
        id: Uuid,
        name: String,
        duration_ms: u64,
    },
    /// Remove a track
    Delete {
        id: Uuid,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (method, path, body): (Method, String, Option<Value>) = match &cli.command {
        Cmd::Play => (Method::POST, "/api/v1/playback/play".into(), None),
        Cmd::Pause => (Method::POST, "/api/v1/playback/pause".into(), None),
        Cmd::Next => (Method::POST, "/api/v1/playback/next".into(), None),
        Cmd::Prev => (Method::POST, "/api/v1/playback/previous".into(), None),
        Cmd::State => (Method::GET, "/api/v1/playback/state".into(), None),
        Cmd::Add { name, duration_ms } => (
            Method::POST,
            "/api/v1/tracks".into(),
            Some(json!({ "name": name, "duration_ms": duration_ms })),
        ),
        Cmd::List => (Method::GET, "/api/v1/tracks".into(), None),
        Cmd::Get { id } => (Method::GET, format!("/api/v1/tracks/{}", id), None),
        Cmd::Update {
            id,
            name,
            duration_ms,
        } => (
            Method::PUT,
            format!("/api/v1/tracks/{}", id),
            Some(json!({ "name": name, "duration_ms": duration_ms })),
        ),
        Cmd::Delete { id } => (Method::DELETE, format!("/api/v1/tracks/{}", id), None),
    };

    let mut request = Client::new().request(method, format!("{}{}", cli.addr, path));
    if let Some(body) = body {
        request = request.json(&body);
    }

    let response = request.send().await.context("Request failed")?;
    let status = response.status();
    let text = response.text().await.context("Failed to read response")?;

    if !status.is_success() {
        bail!("{}: {}", status, text.trim());
    }

    if text.is_empty() {
        println!("ok");
    } else {
        let value: Value = serde_json::from_str(&text).context("Malformed response body")?;
        println!("{}", serde_json::to_string_pretty(&value)?);
    }
    Ok(())
}
