//! Filedrop CLI - run the upload API or talk to one
//!
//! ```bash
//! filedrop serve                         # Start HTTP server (port 8000)
//! filedrop list                          # List uploaded files
//! filedrop upload a.txt b.png            # Upload files one after another
//! filedrop download a.txt -o copy.txt    # Fetch a stored file
//! ```
//!
//! Client commands read the API base from `--api-base` or `FILEDROP_API_BASE`.

use clap::{Parser, Subcommand};
use filedrop::{logging, ApiClient, FileMeta, Settings};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_API_BASE: &str = "http://localhost:8000/api/v1";

#[derive(Parser)]
#[command(name = "filedrop")]
#[command(about = "Upload files to a Filedrop API and list what is stored", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server
    Serve {
        #[command(flatten)]
        settings: Settings,
    },

    /// List uploaded files, newest first
    List {
        /// API base URL
        #[arg(long, env = "FILEDROP_API_BASE", default_value = DEFAULT_API_BASE)]
        api_base: String,
    },

    /// Upload files one after another; Ctrl+C cancels the current one
    Upload {
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// API base URL
        #[arg(long, env = "FILEDROP_API_BASE", default_value = DEFAULT_API_BASE)]
        api_base: String,
    },

    /// Download a stored file
    Download {
        /// Stored file name
        name: String,

        /// Output file (default: the stored name in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// API base URL
        #[arg(long, env = "FILEDROP_API_BASE", default_value = DEFAULT_API_BASE)]
        api_base: String,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { settings } => cmd_serve(settings).await,
        Commands::List { api_base } => cmd_list(&api_base).await,
        Commands::Upload { files, api_base } => cmd_upload(&api_base, &files).await,
        Commands::Download {
            name,
            output,
            api_base,
        } => cmd_download(&api_base, &name, output.as_deref()).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn cmd_serve(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    logging::init(settings.log_format);
    filedrop::server::start_server(settings).await
}

async fn cmd_list(api_base: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = ApiClient::new(api_base)?;
    let listed = client.list_files().await?;

    if listed.files.is_empty() {
        eprintln!("📋 No files yet.");
        return Ok(());
    }

    eprintln!("📋 {} file(s) at {}\n", listed.files.len(), client.api_base());
    println!(
        "{:<40} {:>12}  {:<28} {}",
        "NAME", "SIZE", "TYPE", "UPLOADED"
    );
    for file in &listed.files {
        print_file_row(file);
    }

    Ok(())
}

fn print_file_row(file: &FileMeta) {
    println!(
        "{:<40} {:>12}  {:<28} {}",
        file.name,
        file.size_kb(),
        file.content_type,
        file.uploaded_at_local()
    );
}

async fn cmd_upload(api_base: &str, files: &[PathBuf]) -> Result<(), Box<dyn std::error::Error>> {
    let client = ApiClient::new(api_base)?;
    let (mut uploaded, mut failed, mut cancelled) = (0usize, 0usize, 0usize);

    for path in files {
        let label = path.display().to_string();
        eprintln!("📤 {}", label);

        let upload = client.upload_file(path, |p| {
            eprint!("\r   {:>3}%  {} / {} bytes", p.percent(), p.sent, p.total);
        });

        tokio::select! {
            result = upload => {
                eprintln!();
                match result {
                    Ok(response) => {
                        uploaded += 1;
                        eprintln!("   ✅ Stored as {} ({})", response.file.name, response.file.size_kb());
                    }
                    Err(e) => {
                        failed += 1;
                        eprintln!("   ❌ Upload failed: {}: {}", label, e);
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                cancelled += 1;
                eprintln!();
                eprintln!("   🚫 Cancelled: {}", label);
            }
        }
    }

    eprintln!(
        "\n📊 {} uploaded, {} failed, {} cancelled",
        uploaded, failed, cancelled
    );

    if failed > 0 {
        return Err(format!("{} upload(s) failed", failed).into());
    }
    Ok(())
}

async fn cmd_download(
    api_base: &str,
    name: &str,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = ApiClient::new(api_base)?;
    eprintln!("📥 {}", client.download_url(name)?);

    let bytes = client.download(name).await?;
    let target = output.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(name));
    fs::write(&target, &bytes)?;

    eprintln!("💾 {} bytes written to: {}", bytes.len(), target.display());
    Ok(())
}
