mod api;
mod backend;
mod commands;
mod config;
mod navigation;
mod session;
mod state;
mod views;

#[cfg(test)]
mod testing;

use std::process::ExitCode;

use backend::{HttpBackend, KnowledgeBackend, Latency, MockBackend};
use config::{BackendMode, Config};
use state::AppState;

mod cli {
    use std::path::PathBuf;

    use clap::{Parser, Subcommand};

    use crate::config::{BackendMode, StoreKind};
    use crate::views::SourceFilter;

    #[derive(Parser, Debug)]
    #[command(name = "stomaton", about = "STOMATON knowledge platform admin console")]
    pub struct Args {
        /// API base URL (overrides STOMATON_API_BASE_URL)
        #[arg(long, global = true)]
        pub api_url: Option<String>,

        /// Data source for the console views
        #[arg(long, value_enum, global = true)]
        pub backend: Option<BackendMode>,

        /// Where the session token is kept between runs
        #[arg(long, value_enum, global = true)]
        pub store: Option<StoreKind>,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Subcommand, Debug)]
    pub enum Command {
        /// Sign in and remember the session
        Login {
            #[arg(long)]
            email: String,
            #[arg(long)]
            password: String,
        },
        /// Forget the session
        Logout,
        /// Show who is signed in
        Status,
        /// Generate content for a stone
        Generate {
            stone_name: String,
            /// Also generate a tweet thread and Instagram caption
            #[arg(long)]
            social: bool,
            /// Also generate FAQs
            #[arg(long)]
            faq: bool,
        },
        /// Manage knowledge-base documents
        Docs {
            #[command(subcommand)]
            action: DocsAction,
        },
        /// Review knowledge gaps
        Gaps {
            /// all, failed_search, whatsapp or telegram
            #[arg(long, default_value = "all")]
            source: SourceFilter,
        },
    }

    #[derive(Subcommand, Debug)]
    pub enum DocsAction {
        List,
        Upload {
            #[arg(required = true)]
            files: Vec<PathBuf>,
        },
        Delete {
            document_id: String,
        },
    }
}

async fn dispatch<B: KnowledgeBackend>(
    state: &AppState,
    backend: &B,
    command: cli::Command,
) -> Result<String, String> {
    use cli::{Command, DocsAction};

    match command {
        Command::Login { email, password } => {
            commands::login(state, backend, &email, &password).await
        }
        Command::Logout => commands::logout(state).await,
        Command::Status => Ok(commands::status(state).await),
        Command::Generate {
            stone_name,
            social,
            faq,
        } => commands::generate(state, backend, &stone_name, social, faq).await,
        Command::Docs { action } => match action {
            DocsAction::List => commands::list_documents(state, backend).await,
            DocsAction::Upload { files } => {
                commands::upload_documents(state, backend, &files).await
            }
            DocsAction::Delete { document_id } => {
                commands::delete_document(state, backend, &document_id).await
            }
        },
        Command::Gaps { source } => commands::knowledge_gaps(state, backend, source).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    env_logger::init();

    let args = <cli::Args as clap::Parser>::parse();

    let config = match Config::from_env() {
        Ok(config) => config.with_overrides(args.api_url, args.backend, args.store),
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(2);
        }
    };
    log::debug!("Resolved config: {:?}", config);

    let state = AppState::new(config);
    let session_state = commands::restore_session(&state).await;
    log::info!("Session at startup: {}", session_state.label());

    let result = match state.config.backend {
        BackendMode::Mock => {
            let latency = Latency::simulated().scaled(state.config.mock_latency);
            dispatch(&state, &MockBackend::new(latency), args.command).await
        }
        BackendMode::Http => {
            let backend = HttpBackend::new(state.api.clone());
            dispatch(&state, &backend, args.command).await
        }
    };

    log::debug!("Finished on route {}", state.navigator.current().path());
    if state.navigator.session_was_expired() {
        log::warn!("Session token was rejected by the server during this run");
    }

    match result {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(output) => {
            eprint!("{}", output);
            if !output.ends_with('\n') {
                eprintln!();
            }
            ExitCode::FAILURE
        }
    }
}
