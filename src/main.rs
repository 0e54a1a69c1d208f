//! ragchat - terminal chat client for the legal RAG backend
//!
//! Keeps an optimistic, eventually consistent transcript of one session and
//! renders it line by line.

mod backend;
mod citations;
mod config;
mod repl;
mod runtime;
mod state_machine;
mod transcript;

use backend::{HttpBackend, LoggingBackend, RetrieveRequest};
use config::ChatConfig;
use repl::{render_chunk, render_record, Command, HELP};
use runtime::{ProductionController, SessionController};
use state_machine::{SubmitState, TransitionError};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they stay out of the conversation on stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ragchat=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = ChatConfig::from_env();
    let backend = LoggingBackend::new(HttpBackend::new(&config.backend_url, config.timeout)?);
    let controller: ProductionController =
        SessionController::new(config.session_context(), config.greeting.clone(), backend);

    tracing::info!(
        session_id = %controller.session_id(),
        backend = %config.backend_url,
        timeout_secs = config.timeout.as_secs(),
        "Session started"
    );

    let mut transcript_rx = controller.subscribe_transcript();
    let mut printed = 0;
    for record in transcript_rx.borrow_and_update().iter() {
        println!("{}", render_record(record));
        printed += 1;
    }

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match Command::parse(&line) {
            Command::Message(text) => {
                match controller.submit(&text).await {
                    Ok(SubmitState::Failed { kind }) => {
                        tracing::debug!(?kind, "Submission failed");
                    }
                    Ok(_) | Err(TransitionError::EmptyInput) => {}
                    Err(e) => println!("! {e}"),
                }

                // Skip the echo of what the user just typed
                let transcript = transcript_rx.borrow_and_update().clone();
                for record in transcript.records().iter().skip(printed + 1) {
                    println!("{}", render_record(record));
                }
                printed = transcript.len();
            }
            Command::Retrieve(query) => {
                match controller.retrieve(&query, RetrieveRequest::DEFAULT_K).await {
                    Ok(chunks) if chunks.is_empty() => println!("no matching chunks"),
                    Ok(chunks) => {
                        for (i, chunk) in chunks.iter().enumerate() {
                            println!("{}", render_chunk(i + 1, chunk));
                        }
                    }
                    Err(e) => println!("! retrieval failed: {}", e.user_message()),
                }
            }
            Command::Health => match controller.health().await {
                Ok(()) => println!("backend ok"),
                Err(e) => println!("! backend unavailable: {e}"),
            },
            Command::Transcript => {
                for record in &controller.transcript() {
                    println!("{}", render_record(record));
                }
            }
            Command::Debug => {
                let transcript = controller.transcript();
                let debug = transcript
                    .iter()
                    .rev()
                    .find_map(|record| record.debug_info.as_ref());
                match debug {
                    Some(info) => println!("{}", serde_json::to_string_pretty(info)?),
                    None => println!("no debug info"),
                }
            }
            Command::Help => println!("{HELP}"),
            Command::Unknown(name) => println!("! unknown command /{name}, try /help"),
            Command::Quit => break,
        }
    }

    tracing::info!(session_id = %controller.session_id(), "Session ended");
    Ok(())
}
