//! Sheetgate CLI - log in, upload an xlsx file, get delimited text
//!
//! # Main Commands
//!
//! ```bash
//! sheetgate serve                                   # Start HTTP server (port 3000)
//! sheetgate upload book.xlsx -u admin -p password   # Login + full upload pipeline
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! sheetgate convert book.xlsx          # Just parse first sheet to text
//! sheetgate convert book.xlsx --raw    # Legacy unescaped join
//! ```

use clap::{Parser, Subcommand};
use sheetgate::{
    parse_first_sheet, sheet_names, to_delimited_text, AppConfig, Delimiting, UploadFile,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sheetgate")]
#[command(about = "Authenticated xlsx upload that converts the first sheet to CSV", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert the first sheet of an xlsx file to delimited text (no login)
    Convert {
        /// Input .xlsx file
        input: PathBuf,

        /// Plain comma join without quoting
        #[arg(long)]
        raw: bool,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Log in, then run the full upload pipeline on a file
    Upload {
        /// Input .xlsx file
        input: PathBuf,

        #[arg(short, long, env = "SHEETGATE_USERNAME")]
        username: String,

        #[arg(short, long, env = "SHEETGATE_PASSWORD", hide_env_values = true)]
        password: String,

        /// Plain comma join without quoting
        #[arg(long)]
        raw: bool,

        /// POST the text to this endpoint instead of simulating
        #[arg(long)]
        ingest_url: Option<String>,

        /// Write the submitted text here (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Start HTTP server
    Serve {
        /// Port to listen on (default: SHEETGATE_PORT or 3000)
        #[arg(short = 'P', long)]
        port: Option<u16>,

        /// Serve the built frontend from this directory
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert { input, raw, output } => cmd_convert(&input, raw, output.as_deref()),

        Commands::Upload {
            input,
            username,
            password,
            raw,
            ingest_url,
            output,
        } => {
            cmd_upload(
                &input,
                &username,
                &password,
                raw,
                ingest_url,
                output.as_deref(),
            )
            .await
        }

        Commands::Serve { port, static_dir } => cmd_serve(port, static_dir).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn policy(raw: bool, configured: Delimiting) -> Delimiting {
    if raw {
        Delimiting::Raw
    } else {
        configured
    }
}

fn cmd_convert(
    input: &Path,
    raw: bool,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Converting: {}", input.display());

    let config = AppConfig::from_env()?;
    let delimiting = policy(raw, config.delimiting);

    let bytes = fs::read(input)?;
    let text = convert_bytes(&bytes, delimiting)?;
    write_output(&text, output)?;

    Ok(())
}

/// Parse the first sheet of an in-memory workbook and render it.
fn convert_bytes(bytes: &[u8], delimiting: Delimiting) -> Result<String, Box<dyn std::error::Error>> {
    let sheets = sheet_names(bytes)?;
    if let Some(first) = sheets.first() {
        eprintln!("   Sheet: {} (1 of {})", first, sheets.len());
    }

    let data = parse_first_sheet(bytes)?;
    eprintln!("   Rows: {}", data.row_count());
    eprintln!("   Quoting: {}", delimiting);

    Ok(to_delimited_text(&data, delimiting)?)
}

async fn cmd_upload(
    input: &Path,
    username: &str,
    password: &str,
    raw: bool,
    ingest_url: Option<String>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::from_env()?;
    config.delimiting = policy(raw, config.delimiting);
    if ingest_url.is_some() {
        config.ingest.endpoint = ingest_url;
    }

    let mut session = config.build_session()?;
    session.login(username, password).await?;

    let heading = session.heading();
    eprintln!("📤 {} - {}", heading.title, heading.subtitle);

    let uploader = session.uploader()?;
    uploader.select(Some(UploadFile::from_path(input)))?;
    let outcome = uploader.submit().await?;

    eprintln!("\n✅ File successfully processed and uploaded to the database!");
    eprintln!("   Rows: {}", outcome.row_count);
    eprintln!("   Receipt: {}", outcome.acknowledgement.receipt);
    if let Some(detail) = &outcome.acknowledgement.detail {
        eprintln!("   Endpoint said: {}", detail);
    }

    write_output(&outcome.text, output)?;
    Ok(())
}

async fn cmd_serve(
    port: Option<u16>,
    static_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::from_env()?;
    if let Some(port) = port {
        config.port = port;
    }
    if static_dir.is_some() {
        config.static_dir = static_dir;
    }
    sheetgate::server::start_server(config).await?;
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
