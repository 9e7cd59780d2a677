pub mod client;
pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::database::models::NotePatch;
use client::NotesClient;

#[derive(Parser)]
#[command(name = "notes")]
#[command(about = "Notes CLI - Command-line client for the Notes API")]
#[command(version)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "NOTES_SERVER_URL",
        default_value = "http://localhost:5000",
        help = "Base URL of the Notes API"
    )]
    pub server: String,

    #[arg(long, global = true, env = "NOTES_TOKEN", hide_env_values = true, help = "Bearer token")]
    pub token: Option<String>,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "List your notes, newest first")]
    List {
        #[arg(long, help = "Case-insensitive filter on title or content")]
        search: Option<String>,
    },

    #[command(about = "Create a note")]
    Add {
        #[arg(help = "Note title")]
        title: String,
        #[arg(long, help = "Note content")]
        content: Option<String>,
    },

    #[command(about = "Change a note's title, content or completion flag")]
    Update {
        #[arg(help = "Note ID")]
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long, help = "true or false")]
        completed: Option<bool>,
    },

    #[command(about = "Mark a note as completed")]
    Done {
        #[arg(help = "Note ID")]
        id: String,
    },

    #[command(about = "Delete a note")]
    Delete {
        #[arg(help = "Note ID")]
        id: String,
    },

    #[command(about = "Check server health")]
    Health,

    #[command(about = "Sign a development token with the local shared-secret credentials")]
    DevToken {
        #[arg(help = "User ID to put in the token subject")]
        user_id: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long, default_value_t = 24)]
        ttl_hours: i64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    let Cli { server, token, command, .. } = cli;
    let connect = || NotesClient::new(&server, token.clone());

    match command {
        Commands::List { search } => commands::notes::list(&connect()?, search, output_format).await,
        Commands::Add { title, content } => {
            commands::notes::add(&connect()?, title, content, output_format).await
        }
        Commands::Update { id, title, content, completed } => {
            let patch = NotePatch { title, content, completed };
            commands::notes::update(&connect()?, id, patch, output_format).await
        }
        Commands::Done { id } => commands::notes::done(&connect()?, id, output_format).await,
        Commands::Delete { id } => commands::notes::delete(&connect()?, id, output_format).await,
        Commands::Health => commands::health::health(&connect()?, output_format).await,
        Commands::DevToken { user_id, email, ttl_hours } => {
            commands::token::dev_token(user_id, email, ttl_hours, output_format).await
        }
    }
}
