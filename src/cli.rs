use clap::Parser;
use serde::Serialize;

#[derive(Debug, Parser, Serialize)]
#[command(about = "Speedrun leaderboards for a Slack workspace")]
pub struct Cli {
    /// Path of the JSON document holding every recorded run
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<String>,
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_level: Option<String>,
}
