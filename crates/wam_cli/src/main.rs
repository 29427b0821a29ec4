//! WAM CLI - Command-line interface for the web application mapper.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod presenter;

#[derive(Parser)]
#[command(name = "wam")]
#[command(about = "Maps captured web traffic into projects and pages", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new WAM repository
    Init,
    /// Show repository summary
    Status,
    /// Project management
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Page inspection and annotation
    Page {
        #[command(subcommand)]
        command: PageCommands,
    },
    /// Request inspection and custom requests
    Request {
        #[command(subcommand)]
        command: RequestCommands,
    },
    /// Replay a JSON-lines capture feed into the active project
    Ingest {
        /// Capture file, one lifecycle event per line
        file: PathBuf,
        /// Worker threads (defaults to [capture] workers in config)
        #[arg(short, long)]
        workers: Option<usize>,
    },
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// Create a project and make it active
    Create {
        /// Unique project name
        name: String,
        /// URL prefixes in scope (repeatable)
        #[arg(short, long)]
        scope: Vec<String>,
    },
    /// List projects
    List,
    /// Show a project (the active one if omitted)
    Show {
        /// Project name
        name: Option<String>,
    },
    /// Update a project's scope or notes
    Update {
        /// Project name
        name: String,
        /// Replacement scope (repeatable)
        #[arg(short, long)]
        scope: Vec<String>,
        /// Replacement notes
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Make a project the capture target
    Activate {
        /// Project name
        name: String,
    },
}

#[derive(Subcommand)]
enum PageCommands {
    /// List pages of a project (the active one if omitted)
    List {
        /// Project name
        #[arg(short, long)]
        project: Option<String>,
    },
    /// Show a page and its requests
    Show {
        /// Page id (URL)
        id: String,
    },
    /// Update a page's nickname or notes
    Update {
        /// Page id (URL)
        id: String,
        /// New nickname
        #[arg(long)]
        nickname: Option<String>,
        /// New notes
        #[arg(short, long)]
        notes: Option<String>,
    },
}

#[derive(Subcommand)]
enum RequestCommands {
    /// Show a finalized request
    Show {
        /// Request id (UUID)
        id: String,
        /// Print the stored JSON record
        #[arg(long)]
        json: bool,
    },
    /// Record a modified copy of a request as a custom request
    Custom {
        /// Id of the captured request to copy
        id: String,
        /// Replacement method
        #[arg(short, long)]
        method: Option<String>,
        /// Replacement destination URL
        #[arg(short, long)]
        destination: Option<String>,
        /// Replacement headers, as "Name: value" (repeatable)
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,
    },
}

fn main() -> Result<()> {
    // RUST_LOG wins; otherwise the repository's [logging] filter.
    let fallback = commands::logging_filter();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => commands::init::run(),
        Commands::Status => commands::status::run(),
        Commands::Project { command } => match command {
            ProjectCommands::Create { name, scope } => commands::project::create(&name, scope),
            ProjectCommands::List => commands::project::list(),
            ProjectCommands::Show { name } => commands::project::show(name.as_deref()),
            ProjectCommands::Update { name, scope, notes } => {
                commands::project::update(&name, scope, notes)
            }
            ProjectCommands::Activate { name } => commands::project::activate(&name),
        },
        Commands::Page { command } => match command {
            PageCommands::List { project } => commands::page::list(project.as_deref()),
            PageCommands::Show { id } => commands::page::show(&id),
            PageCommands::Update {
                id,
                nickname,
                notes,
            } => commands::page::update(&id, nickname, notes),
        },
        Commands::Request { command } => match command {
            RequestCommands::Show { id, json } => commands::request::show(&id, json),
            RequestCommands::Custom {
                id,
                method,
                destination,
                headers,
            } => commands::request::custom(&id, method, destination, &headers),
        },
        Commands::Ingest { file, workers } => commands::ingest::run(&file, workers),
    }
}
