//! # Ticketera CLI
//!
//! Local print daemon for ESC/POS receipt printers.
//!
//! ## Usage
//!
//! ```bash
//! # Run the HTTP daemon (what the point-of-sale web app talks to)
//! ticketera serve
//!
//! # Same, on Linux with a USB printer exposed under a friendly name
//! ticketera serve --device POS-80=/dev/usb/lp0
//!
//! # List printers the daemon can see
//! ticketera printers
//!
//! # Run one /imprimir body from a file, without HTTP
//! ticketera print ticket.json
//!
//! # Same, but record the bytes instead of printing
//! ticketera print ticket.json --dry-run --output ticket.bin
//!
//! # See how an image will come out on 58mm paper
//! ticketera preview https://example.com/logo.png --paper 58mm --png logo-58.png
//! ```

use clap::{Args, Parser, Subcommand};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::{error, info};

use ticketera::{
    TicketeraError,
    fetch::{HttpFetcher, ImageFetcher},
    job::{self, JobContext, Pacing},
    json_api::PrintRequest,
    logging,
    printer::PrinterConfig,
    render,
    server::{self, AppState, ServerConfig},
    transport::{self, RecordingSpooler, Spooler},
};

/// Ticketera - local ESC/POS print daemon
#[derive(Parser, Debug)]
#[command(name = "ticketera")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory for impresion.log (defaults to the per-user data directory)
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Log to stderr only
    #[arg(long, global = true)]
    no_log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP print daemon
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8000")]
        listen: String,

        /// Run at most one job per printer at a time
        #[arg(long)]
        serialize_printers: bool,

        #[command(flatten)]
        printing: PrintingArgs,
    },

    /// List available printers
    Printers {
        #[command(flatten)]
        devices: DeviceArgs,
    },

    /// Run one print request from a JSON file
    Print {
        /// File in the /imprimir body format
        file: PathBuf,

        /// With --dry-run, write the recorded bytes here
        #[arg(long, value_name = "FILE", requires = "dry_run")]
        output: Option<PathBuf>,

        #[command(flatten)]
        printing: PrintingArgs,
    },

    /// Render an image the way a print job would, to PNG
    Preview {
        /// Image URL or local file
        source: String,

        /// Paper width ("58mm" or "80mm")
        #[arg(long, default_value = "80mm")]
        paper: String,

        /// Desired content width in dots
        #[arg(long)]
        width: Option<u32>,

        /// Output PNG file
        #[arg(long, value_name = "FILE")]
        png: PathBuf,

        /// Download timeout in seconds
        #[arg(long, default_value_t = 20)]
        fetch_timeout_secs: u64,
    },
}

#[derive(Args, Debug)]
struct DeviceArgs {
    /// Map a printer name to a device file (NAME=PATH), repeatable. Unix only.
    #[arg(long = "device", value_name = "NAME=PATH", value_parser = transport::parse_device_mapping)]
    devices: Vec<(String, PathBuf)>,
}

#[derive(Args, Debug)]
struct PrintingArgs {
    #[command(flatten)]
    devices: DeviceArgs,

    /// Image download timeout in seconds
    #[arg(long, default_value_t = 20)]
    fetch_timeout_secs: u64,

    /// Rows per raster strip
    #[arg(long, default_value_t = job::transmit::STRIP_HEIGHT, value_parser = clap::value_parser!(u32).range(1..=2047))]
    strip_height: u32,

    /// Pause after each raster strip, in milliseconds
    #[arg(long, default_value_t = 150)]
    strip_delay_ms: u64,

    /// Pause after an image's trailing feed, in milliseconds
    #[arg(long, default_value_t = 100)]
    trailing_delay_ms: u64,

    /// Record jobs in memory instead of printing
    #[arg(long)]
    dry_run: bool,
}

impl DeviceArgs {
    fn map(&self) -> BTreeMap<String, PathBuf> {
        self.devices.iter().cloned().collect()
    }
}

impl PrintingArgs {
    fn pacing(&self) -> Pacing {
        Pacing {
            strip_height: self.strip_height,
            strip_delay: Duration::from_millis(self.strip_delay_ms),
            trailing_delay: Duration::from_millis(self.trailing_delay_ms),
        }
    }

    fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_dir = if cli.no_log_file {
        None
    } else {
        cli.log_dir.clone().or_else(logging::default_log_dir)
    };
    let _guard = logging::init(log_dir.as_deref());

    if let Err(e) = run(cli.command).await {
        error!(error = %e, "command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> Result<(), TicketeraError> {
    match command {
        Commands::Serve {
            listen,
            serialize_printers,
            printing,
        } => {
            let config = ServerConfig {
                listen_addr: listen,
                serialize_printers,
            };
            let context = job_context(&printing, None)?;
            let state = Arc::new(AppState::new(context, &config));
            server::serve(&config, state).await
        }

        Commands::Printers { devices } => {
            let spooler = transport::system_spooler(devices.map());
            let names = tokio::task::spawn_blocking(move || spooler.printers())
                .await
                .map_err(|e| TicketeraError::Transport(format!("Task error: {}", e)))??;

            for name in names {
                println!("{}", name);
            }
            Ok(())
        }

        Commands::Print {
            file,
            output,
            printing,
        } => {
            let body = fs::read_to_string(&file)?;
            let request: PrintRequest = serde_json::from_str(&body).map_err(|e| {
                TicketeraError::Validation(format!("{}: invalid request: {}", file.display(), e))
            })?;
            let job = request.into_job()?;

            let recorder = printing.dry_run.then(RecordingSpooler::default);
            let context = job_context(&printing, recorder.clone())?;

            let report = tokio::task::spawn_blocking(move || job::run(&job, &context))
                .await
                .map_err(|e| TicketeraError::Transport(format!("Task error: {}", e)))??;

            for failure in &report.failures {
                eprintln!("operation {} ({}) failed: {}", failure.index, failure.operation, failure.error);
            }

            if let Some(recorder) = recorder {
                let bytes = recorder.written_bytes();
                info!(bytes = bytes.len(), writes = report.writes, "dry run finished");
                if let Some(path) = output {
                    fs::write(&path, &bytes)?;
                    println!("Wrote {} bytes to {}", bytes.len(), path.display());
                }
            }
            println!("{}", server::PRINT_OK);
            Ok(())
        }

        Commands::Preview {
            source,
            paper,
            width,
            png,
            fetch_timeout_secs,
        } => {
            let config = PrinterConfig::for_paper(Some(&paper));
            let fetcher = HttpFetcher::new(Handle::current(), Duration::from_secs(fetch_timeout_secs))?;

            let png_bytes = tokio::task::spawn_blocking(move || {
                let bytes = if source.starts_with("http://") || source.starts_with("https://") {
                    fetcher.fetch(&source)
                } else {
                    fs::read(&source).map_err(|e| {
                        ticketera::error::OperationError::Fetch(format!("{}: {}", source, e))
                    })
                }
                .map_err(|e| TicketeraError::Image(e.to_string()))?;

                let rendered = render::image::render(&bytes, width, &config)
                    .map_err(|e| TicketeraError::Image(e.to_string()))?;
                info!(
                    paper = config.name,
                    content_width = rendered.geometry.content_width,
                    content_height = rendered.geometry.content_height,
                    left_margin = rendered.geometry.left_margin,
                    "image rendered"
                );
                render::bitmap_to_png(&rendered.bitmap)
            })
            .await
            .map_err(|e| TicketeraError::Transport(format!("Task error: {}", e)))??;

            fs::write(&png, png_bytes)?;
            println!("Saved preview to {}", png.display());
            Ok(())
        }
    }
}

/// Build the job context: the system spooler (or `recorder` for dry runs)
/// and an HTTP fetcher on the current runtime.
fn job_context(
    printing: &PrintingArgs,
    recorder: Option<RecordingSpooler>,
) -> Result<JobContext, TicketeraError> {
    let spooler: Arc<dyn Spooler> = match recorder {
        Some(recorder) => Arc::new(recorder),
        None if printing.dry_run => Arc::new(RecordingSpooler::default()),
        None => Arc::from(transport::system_spooler(printing.devices.map())),
    };
    let fetcher = HttpFetcher::new(Handle::current(), printing.fetch_timeout())?;

    Ok(JobContext {
        spooler,
        fetcher: Arc::new(fetcher),
        pacing: printing.pacing(),
    })
}
