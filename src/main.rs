//! Terminal front end: submit one reflection request and follow it.
//!
//! Usage: `reflection-client <theme> [audience...]`

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use reflection_client::{
    Audience, AudienceSelection, Config, GenerationRequest, HttpTaskClient, PollerView, Reflection,
    TaskPoller,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    let mut args = std::env::args().skip(1);
    let theme = args
        .next()
        .context("usage: reflection-client <theme> [audience...]")?;
    let mut selection = AudienceSelection::default();
    for raw in args {
        let audience: Audience = raw.parse()?;
        selection.select(audience);
    }

    let client = HttpTaskClient::from_config(&config);
    if let Err(e) = client.health().await {
        tracing::warn!("Backend health check failed at {}: {}", client.base_url(), e);
    }

    let poller = TaskPoller::from_config(Arc::new(client), &config);
    let mut updates = poller.subscribe();
    poller.start(GenerationRequest::new(theme, selection))?;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut last_message = None;

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = updates.borrow_and_update().clone();
                if let Some(message) = view.progress_message() {
                    if last_message != Some(message) {
                        println!("{}", message);
                        last_message = Some(message);
                    }
                }
                if view.is_settled() {
                    return render_settled(&view);
                }
            }
            _ = &mut ctrl_c => {
                poller.cancel();
                eprintln!("Cancelled.");
                break;
            }
        }
    }

    Ok(())
}

fn render_settled(view: &PollerView) -> anyhow::Result<()> {
    match view.result() {
        Some(reflection) => {
            print_reflection(reflection);
            Ok(())
        }
        None => anyhow::bail!(view.error_message().unwrap_or_default()),
    }
}

fn print_reflection(reflection: &Reflection) {
    println!();
    println!("{}", reflection.title);
    println!("{}", "=".repeat(reflection.title.chars().count().max(8)));
    for (heading, body) in [
        ("Introduction", &reflection.introduction),
        ("The question", &reflection.problem_statement),
    ] {
        println!("\n## {}\n{}", heading, body);
    }
    println!(
        "\n## From the sutras\n> {}\n  - {}",
        reflection.sutra_quote.text, reflection.sutra_quote.source
    );
    for (heading, body) in [
        ("A modern example", &reflection.modern_example),
        ("Conclusion", &reflection.conclusion),
    ] {
        println!("\n## {}\n{}", heading, body);
    }
}
