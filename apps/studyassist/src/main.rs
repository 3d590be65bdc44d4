use std::io::Read;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

mod cli;
mod terminal;

use studyassist_client::{StudyController, WreqTransport};
use studyassist_core::bootstrap::bootstrap;
use studyassist_router::study_router;

use crate::cli::{AskArgs, Cli, Command, ServeArgs};
use crate::terminal::TerminalCapabilities;

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    let outcome = match cli.command {
        Command::Serve(args) => serve(args).await,
        Command::Ask(args) => ask(args).await,
    };
    if let Err(err) = outcome {
        eprintln!("studyassist failed: {err:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("studyassist=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let boot = bootstrap(args.config)?;
    let bind = boot.state.config().bind_addr();
    let app = axum::Router::new().merge(study_router(boot.gateway.clone()));

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("bind {bind}"))?;
    info!(addr = %bind, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve")?;
    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

async fn ask(args: AskArgs) -> anyhow::Result<()> {
    let text = match &args.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("read lesson text from stdin")?;
            buf
        }
    };

    let transport = Arc::new(WreqTransport::new(&args.server)?);
    let out_dir = std::env::current_dir().context("resolve current directory")?;
    let capabilities = Arc::new(TerminalCapabilities::new(out_dir));
    let mut controller = StudyController::new(transport, capabilities);

    controller.set_text(text);
    controller.select_mode(args.mode);
    controller.select_language(args.lang);
    info!(
        words = controller.word_count(),
        label = %controller.output_label(),
        "submitting"
    );
    controller.submit().await;
    if !controller.error().is_empty() {
        anyhow::bail!("{}", controller.error());
    }

    println!("{}", controller.result());
    if args.download {
        controller.download_result()?;
    }
    if args.speak {
        controller.toggle_speech()?;
        controller.speech_finished();
    }
    Ok(())
}
