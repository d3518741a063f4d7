use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Interactive terminal coding assistant", long_about = None)]
pub struct Args {
    /// AI backend to use [possible values: openai, openrouter, deepseek, ollama, anthropic]
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Model to use (backend-specific)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Abort model requests after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Append prompts and responses to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Do not record prompts and responses
    #[arg(long)]
    pub no_log: bool,

    /// Disable the /edit command
    #[arg(long)]
    pub no_edit: bool,

    /// Increase diagnostic output (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
