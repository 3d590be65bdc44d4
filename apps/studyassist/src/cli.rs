use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use studyassist_core::CliArgs;
use studyassist_protocol::study::{LanguageStyle, Mode};

#[derive(Parser)]
#[command(name = "studyassist", version, about = "Turn lesson text into study material")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run the HTTP server.
    Serve(ServeArgs),
    /// Send lesson text to a running server and print the result.
    Ask(AskArgs),
}

#[derive(Args)]
pub(crate) struct ServeArgs {
    #[command(flatten)]
    pub(crate) config: CliArgs,
}

#[derive(Args)]
pub(crate) struct AskArgs {
    /// Base URL of the study server.
    #[arg(long, env = "STUDYASSIST_SERVER", default_value = "http://127.0.0.1:8787")]
    pub(crate) server: String,
    #[arg(long, default_value = "Breakdown", value_parser = parse_mode)]
    pub(crate) mode: Mode,
    #[arg(long, default_value = "Semi-Telugu", value_parser = parse_language)]
    pub(crate) lang: LanguageStyle,
    /// Read the lesson from this file instead of stdin.
    #[arg(long)]
    pub(crate) file: Option<PathBuf>,
    /// Also write the result to study-notes.txt in the current directory.
    #[arg(long)]
    pub(crate) download: bool,
    #[arg(long)]
    pub(crate) speak: bool,
}

fn parse_mode(raw: &str) -> Result<Mode, String> {
    Mode::ALL
        .into_iter()
        .find(|mode| mode.label().eq_ignore_ascii_case(raw.trim()))
        .ok_or_else(|| format!("expected one of: {}", labels(Mode::ALL.map(Mode::label))))
}

fn parse_language(raw: &str) -> Result<LanguageStyle, String> {
    LanguageStyle::ALL
        .into_iter()
        .find(|style| style.label().eq_ignore_ascii_case(raw.trim()))
        .ok_or_else(|| {
            format!(
                "expected one of: {}",
                labels(LanguageStyle::ALL.map(LanguageStyle::label))
            )
        })
}

fn labels<const N: usize>(items: [&str; N]) -> String {
    items.join(", ")
}
