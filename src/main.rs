mod config;
mod document;
mod error;
mod export;
mod render;
mod session;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::{config_dir, expand_path, init_config, load_config_or_default};
use crate::document::InvoiceDocument;
use crate::error::{Result, StudioError};

#[derive(Parser)]
#[command(name = "invoice-studio")]
#[command(version, about = "Terminal invoice editor with live preview and PDF export", long_about = None)]
struct Cli {
    /// Path to config directory (default: ~/.invoice-studio or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a template file
    Init,

    /// Edit an invoice interactively
    Edit,

    /// Export the config-seeded invoice as a PDF without editing
    Export {
        /// Custom output file path (default: output_dir/invoice-<number>.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Open generated PDF with system default viewer
        #[arg(long)]
        open: bool,
    },

    /// Send the config-seeded invoice to the system printer
    Print,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let cfg_dir = match cli.config_dir {
        Some(dir) => dir,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => {
            init_config(&cfg_dir)?;
            println!("Initialized invoice config at {}", cfg_dir.display());
            Ok(())
        }
        Commands::Edit => {
            let config = load_config_or_default(&cfg_dir)?;
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            session::run(&config, stdin.lock(), &mut stdout)
        }
        Commands::Export { output, open } => cmd_export(&cfg_dir, output, open),
        Commands::Print => {
            let config = load_config_or_default(&cfg_dir)?;
            let doc = InvoiceDocument::from_config(&config);
            export::print_view(&doc)?;
            println!("Sent invoice {} to printer", doc.invoice_number);
            Ok(())
        }
    }
}

fn cmd_export(cfg_dir: &Path, output: Option<PathBuf>, open: bool) -> Result<()> {
    let config = load_config_or_default(cfg_dir)?;
    let doc = InvoiceDocument::from_config(&config);

    let pdf_path = match output {
        Some(path) => path,
        None => {
            let output_dir = expand_path(&config.pdf.output_dir);
            std::fs::create_dir_all(&output_dir)?;
            output_dir.join(export::pdf_filename(&doc.invoice_number))
        }
    };

    export::export_pdf(&doc, &pdf_path)?;
    println!("Saved {}", pdf_path.display());

    if open {
        open_path(&pdf_path)?;
    }
    Ok(())
}

fn open_path(pdf_path: &Path) -> Result<()> {
    // Open with system default viewer
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(pdf_path)
            .spawn()
            .map_err(StudioError::Io)?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(pdf_path)
            .spawn()
            .map_err(StudioError::Io)?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", pdf_path.to_str().unwrap_or("")])
            .spawn()
            .map_err(StudioError::Io)?;
    }
    Ok(())
}
