//! mscope-capture - MicroScope AI capture client and shell
//!
//! Subcommands mirror the app's views: `snap` is the live view, `library`,
//! `show` and `delete` are the specimen library, the rest are settings.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use mscope_capture::config::resolve_server_url;
use mscope_capture::{
    render, snap, CaptureController, ClientError, FrameSource, PatternSource, ScopeClient,
    SnapOptions, StillImageSource,
};
use mscope_common::config::{config_file_path, load_toml_config};
use mscope_common::context::{AnalysisContext, DEFAULT_MAGNIFICATION, DEFAULT_STUDENT_LEVEL};
use mscope_common::library::filter_specimens;
use tracing::debug;

/// Command-line arguments for mscope-capture
#[derive(Parser, Debug)]
#[command(name = "mscope-capture")]
#[command(about = "Capture microscope images and manage the specimen library")]
#[command(version)]
struct Cli {
    /// mscope-server base URL
    #[arg(long, global = true, env = "MSCOPE_SERVER_URL")]
    server: Option<String>,

    /// Path to config file
    #[arg(long, global = true, env = "MSCOPE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Capture a frame and analyze it
    Snap(SnapArgs),
    /// List saved specimens
    Library {
        /// Filter by name or magnification (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show one specimen with its analysis
    Show { id: i64 },
    /// Delete a specimen
    Delete { id: i64 },
    /// Store the Gemini API key on the server
    SetKey { api_key: String },
    /// Remove the stored API key
    ClearKey,
    /// Check whether an API key works
    TestKey { api_key: String },
    /// Show credential status
    Settings,
    /// List magnification, microscope type and student level presets
    Options,
}

#[derive(Args, Debug)]
struct SnapArgs {
    /// Image file kept current by the microscope camera adapter
    #[arg(long, conflicts_with = "pattern", required_unless_present = "pattern")]
    image: Option<PathBuf>,

    /// Use the built-in synthetic slide instead of a camera
    #[arg(long)]
    pattern: bool,

    #[arg(short, long, default_value = DEFAULT_MAGNIFICATION)]
    magnification: String,

    #[arg(short = 't', long, default_value = "brightfield")]
    microscope_type: String,

    #[arg(short = 'l', long, default_value = DEFAULT_STUDENT_LEVEL)]
    student_level: String,

    /// API key for this request only
    #[arg(long)]
    api_key: Option<String>,

    /// Save the analyzed specimen to the library
    #[arg(long)]
    save: bool,

    /// Also generate a lab report
    #[arg(long)]
    report: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(config_file_path);
    let toml_config = load_toml_config(&config_path);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let server_url = resolve_server_url(cli.server.as_deref(), &toml_config);
    debug!("Server: {}", server_url);

    match run(cli.command, &server_url).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, server_url: &str) -> Result<()> {
    let client = ScopeClient::new(server_url)?;

    match command {
        Command::Snap(args) => run_snap(args, &client).await?,
        Command::Library { search } => {
            let specimens = client.list_specimens().await?;
            let shown = filter_specimens(&specimens, search.as_deref().unwrap_or(""));
            print!("{}", render::specimen_table(&shown));
            println!();
        }
        Command::Show { id } => match client.get_specimen(id).await {
            Ok(specimen) => print!("{}", render::specimen_detail(&specimen)),
            Err(ClientError::NotFound) => anyhow::bail!("Specimen {} not found", id),
            Err(e) => return Err(e.into()),
        },
        Command::Delete { id } => {
            client.delete_specimen(id).await?;
            println!("Deleted specimen {}", id);
        }
        Command::SetKey { api_key } => {
            let result = client.set_api_key(&api_key).await?;
            println!("{}", result.message);
        }
        Command::ClearKey => {
            let result = client.clear_api_key().await?;
            println!("{}", result.message);
        }
        Command::TestKey { api_key } => {
            if client.test_connection(&api_key).await? {
                println!("Connected: the API key works");
            } else {
                anyhow::bail!("Connection failed: check the API key");
            }
        }
        Command::Settings => {
            let status = client.settings().await?;
            println!("Model:          {}", status.model);
            println!("Stored key:     {}", if status.stored_key { "yes" } else { "no" });
            println!("GEMINI_API_KEY: {}", if status.process_default_key { "yes" } else { "no" });
        }
        Command::Options => {
            let options = client.options().await?;
            print!("{}", render::options(&options));
        }
    }

    Ok(())
}

async fn run_snap(args: SnapArgs, client: &ScopeClient) -> Result<()> {
    let options = SnapOptions {
        context: AnalysisContext {
            magnification: args.magnification,
            microscope_type: args.microscope_type,
            student_level: args.student_level,
        },
        api_key: args.api_key,
        save: args.save,
        report: args.report,
    };

    match args.image {
        Some(path) => snap_with(StillImageSource::new(path), client, &options).await,
        None => snap_with(PatternSource::new(), client, &options).await,
    }
}

async fn snap_with<S: FrameSource>(source: S, client: &ScopeClient, options: &SnapOptions) -> Result<()> {
    let mut controller = CaptureController::new(source);
    let outcome = snap(&mut controller, client, options).await?;
    controller.stop();

    println!("🔬 {}", outcome.analysis.specimen_name);
    println!();
    print!("{}", render::analysis(&outcome.analysis.text));

    if let Some(id) = outcome.saved_id {
        println!("Saved to library as #{}", id);
    }
    if let Some(report) = outcome.report {
        println!();
        println!("===== Lab Report =====");
        println!("{}", report);
    }

    Ok(())
}
