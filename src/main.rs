// Copyright 2026 The Mockingbird Project
// SPDX-License-Identifier: Apache-2.0

// mockingbird: stream tweet-authorship analysis and generation from the
// backend to the terminal.
//
// Usage:
//   mockingbird analyze "Tweet text to attribute"
//   mockingbird generate --author Obama --topic healthcare
//   mockingbird topics --author Musk

use std::io::Write;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use mockingbird::analysis::AnalysisOutcome;
use mockingbird::client::BackendClient;
use mockingbird::config::{self, Config, FileSource};
use mockingbird::generation::GenerationOutcome;
use mockingbird::stream::{
    AnalysisClassifier, GenerationClassifier, Record, RecordSink, StreamSession,
};

#[derive(Parser)]
#[command(
    name = "mockingbird",
    about = "Streaming client for the tweet-authorship analysis backend"
)]
struct Cli {
    /// Path to the mockingbird.yaml config file
    #[arg(long, default_value = "mockingbird.yaml", env = "MOCKINGBIRD_CONFIG")]
    config: String,

    /// Backend base URL (overrides config)
    #[arg(long, env = "MOCKINGBIRD_BACKEND")]
    backend: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze which author most likely wrote a tweet
    Analyze {
        /// Tweet text to analyze
        tweet: String,
    },
    /// Generate a new tweet in an author's style
    Generate {
        #[arg(long)]
        author: String,
        #[arg(long)]
        topic: String,
    },
    /// List topics on record for an author
    Topics {
        #[arg(long)]
        author: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = if std::path::Path::new(&cli.config).exists() {
        match config::load_config(&FileSource::new(&cli.config)) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!("failed to load config: {e}");
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };
    if let Some(url) = cli.backend {
        config.backend.base_url = url;
    }

    let client = match BackendClient::new(&config) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("failed to build client: {e}");
            std::process::exit(1);
        }
    };

    // Ctrl-C cancels the in-flight session cooperatively; the session
    // reports cancellation rather than pretending the backend returned
    // nothing.
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });
    }

    let failed = match cli.command {
        Command::Analyze { tweet } => run_analysis(&client, &tweet, cancel).await,
        Command::Generate { author, topic } => {
            run_generation(&client, &author, &topic, cancel).await
        }
        Command::Topics { author } => run_topics(&client, &author).await,
    };

    if failed {
        std::process::exit(1);
    }
}

// ---------------------------------------------------------------------------
// Live terminal sink
// ---------------------------------------------------------------------------

/// Prints cumulative progress text as a live feed: each update writes
/// only the newly appended suffix, so the text grows in place like the
/// backend produced it.
struct LiveSink<S> {
    inner: S,
    printed: String,
}

impl<S> LiveSink<S> {
    fn new(inner: S) -> Self {
        Self {
            inner,
            printed: String::new(),
        }
    }

    fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: RecordSink> RecordSink for LiveSink<S> {
    fn on_progress(&mut self, text: &str) {
        if let Some(suffix) = text.strip_prefix(self.printed.as_str()) {
            print!("{suffix}");
        } else {
            // The backend replaced the text wholesale; start a new line.
            print!("\n{text}");
        }
        let _ = std::io::stdout().flush();
        self.printed = text.to_string();
        self.inner.on_progress(text);
    }

    fn on_final(&mut self, record: Record) {
        self.inner.on_final(record);
    }

    fn on_malformed(&mut self, raw: &str, reason: &str) {
        self.inner.on_malformed(raw, reason);
    }

    fn on_error(&mut self, message: &str) {
        self.inner.on_error(message);
    }

    fn on_closed(&mut self) {
        self.inner.on_closed();
    }

    fn on_cancelled(&mut self) {
        self.inner.on_cancelled();
    }
}

// ---------------------------------------------------------------------------
// Subcommands
// ---------------------------------------------------------------------------

async fn run_analysis(client: &BackendClient, tweet: &str, cancel: CancellationToken) -> bool {
    let stream = match client.analyze(tweet).await {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("analysis request failed: {e}");
            return true;
        }
    };

    let mut sink = LiveSink::new(AnalysisOutcome::new());
    StreamSession::new(Arc::new(AnalysisClassifier))
        .run(stream, &mut sink, cancel)
        .await;
    println!();

    let outcome = sink.into_inner();
    if outcome.malformed_lines > 0 {
        tracing::warn!(count = outcome.malformed_lines, "skipped malformed records");
    }
    if outcome.cancelled {
        tracing::info!("analysis cancelled");
        return false;
    }
    if let Some(e) = outcome.error {
        tracing::error!("analysis failed: {e}");
        return true;
    }
    match outcome.verdict {
        Some(v) => {
            println!(
                "predicted author: {} (confidence {:.1}%)",
                v.predicted_author, v.confidence
            );
            println!("topic: {} (confidence {:.1}%)", v.topic, v.topic_confidence);
            false
        }
        None => {
            tracing::warn!("stream closed without a result");
            true
        }
    }
}

async fn run_generation(
    client: &BackendClient,
    author: &str,
    topic: &str,
    cancel: CancellationToken,
) -> bool {
    let stream = match client.generate(author, topic).await {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("generation request failed: {e}");
            return true;
        }
    };

    let mut sink = LiveSink::new(GenerationOutcome::new());
    StreamSession::new(Arc::new(GenerationClassifier))
        .run(stream, &mut sink, cancel)
        .await;
    println!();

    let outcome = sink.into_inner();
    if outcome.malformed_lines > 0 {
        tracing::warn!(count = outcome.malformed_lines, "skipped malformed records");
    }
    if outcome.cancelled {
        tracing::info!("generation cancelled");
        return false;
    }
    if let Some(e) = outcome.error {
        tracing::error!("generation failed: {e}");
        return true;
    }
    match outcome.tweet {
        Some(tweet) => {
            println!("generated tweet ({author} on {topic}):");
            println!("{tweet}");
            false
        }
        None => {
            tracing::warn!("stream closed without a result");
            true
        }
    }
}

async fn run_topics(client: &BackendClient, author: &str) -> bool {
    match client.topics(author).await {
        Ok(topics) if topics.is_empty() => {
            tracing::warn!(author, "no topics on record");
            false
        }
        Ok(topics) => {
            for topic in topics {
                println!("{topic}");
            }
            false
        }
        Err(e) => {
            tracing::error!("topics request failed: {e}");
            true
        }
    }
}
