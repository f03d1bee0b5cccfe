mod config;
mod create_cmd;
mod health_cmd;
mod tui;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lessonbot_core::client::DEFAULT_BASE_URL;
use lessonbot_core::{GradeLevel, HttpLessonPlanClient, LessonPlanApi};

use config::LessonbotConfig;
use create_cmd::OutputFormat;

#[derive(Parser)]
#[command(name = "lessonbot", about = "Create lesson plans with an AI lesson-planning service")]
struct Cli {
    /// Backend base URL (overrides LESSONBOT_BACKEND_URL env var and config file)
    #[arg(long, global = true)]
    backend_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a lessonbot config file
    Init {
        /// Base URL of the lesson-plan service
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        url: String,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Create a lesson plan for a topic and print it
    Create {
        /// Lesson topic (e.g. "Photosynthesis")
        topic: String,
        /// Grade level (e.g. "5th Grade", "Kindergarten"); omit for any grade
        #[arg(long)]
        grade: Option<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
        /// Write the plan to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Check that the backend is reachable
    Health,
    /// List the accepted grade levels
    Grades,
    /// Launch the interactive lesson plan form
    Form,
}

/// Install the global subscriber. The interactive form owns the terminal,
/// so it stays silent unless `RUST_LOG` asks otherwise.
fn init_tracing(command: &Commands) {
    let default_directive = match command {
        Commands::Form => "off",
        _ => "info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn build_client(cli_backend_url: Option<&str>) -> anyhow::Result<HttpLessonPlanClient> {
    let resolved = LessonbotConfig::resolve(cli_backend_url)?;
    Ok(HttpLessonPlanClient::new(resolved.client_config)?)
}

/// Execute the `lessonbot init` command.
fn cmd_init(url: &str, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();
    let cfg = config::init_config(&path, url, force)?;

    println!("Config written to {}", path.display());
    println!("  backend.url = {}", cfg.backend.url);
    println!();
    println!("Next: run `lessonbot health` to check the backend is reachable.");
    Ok(())
}

fn cmd_grades() {
    println!("Any grade level (omit --grade)");
    for grade in GradeLevel::ALL {
        println!("{grade}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.command);

    match cli.command {
        Commands::Init { url, force } => {
            cmd_init(&url, force)?;
        }
        Commands::Create {
            topic,
            grade,
            format,
            output,
        } => {
            let client = build_client(cli.backend_url.as_deref())?;
            create_cmd::run_create(&client, &topic, grade.as_deref(), format, output.as_deref())
                .await?;
        }
        Commands::Health => {
            let client = build_client(cli.backend_url.as_deref())?;
            let base_url = client.config().base_url.clone();
            health_cmd::run_health(&client, &base_url).await?;
        }
        Commands::Grades => cmd_grades(),
        Commands::Form => {
            let client: Arc<dyn LessonPlanApi> =
                Arc::new(build_client(cli.backend_url.as_deref())?);
            tui::run_form(client).await?;
        }
    }

    Ok(())
}
