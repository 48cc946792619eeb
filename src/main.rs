use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use mermaid_ink::{render_dir, OutputFormat, RenderOptions, RetryPolicy, Theme, DEFAULT_SERVER};

#[derive(Parser, Debug)]
#[command(name = "mermaid-ink")]
#[command(version)]
#[command(about = "Render every .mmd file in a directory through mermaid.ink", long_about = None)]
struct Args {
    /// Directory holding the .mmd diagram sources
    dir: PathBuf,

    /// Mermaid theme embedded in each request
    #[arg(long, value_enum, default_value_t = Theme::Default)]
    theme: Theme,

    /// Image type to request and write
    #[arg(long, value_enum, default_value_t = OutputFormat::Svg)]
    format: OutputFormat,

    /// Base URL of the rendering service
    #[arg(long, default_value = DEFAULT_SERVER)]
    server: String,

    /// Retries after a failed request
    #[arg(long, default_value_t = 3)]
    retries: u32,

    /// Seconds to wait between attempts
    #[arg(long, default_value_t = 1)]
    retry_delay: u64,

    /// Per-attempt timeout in seconds (default: no timeout)
    #[arg(long)]
    timeout: Option<u64>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            server: self.server.clone(),
            theme: self.theme,
            format: self.format,
            retry: RetryPolicy {
                retries: self.retries,
                delay: Duration::from_secs(self.retry_delay),
            },
            timeout: self.timeout.map(Duration::from_secs),
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match render_dir(&args.dir, &args.render_options()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
