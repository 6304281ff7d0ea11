use clap::{Parser, Subcommand};
use swipeshot::{Config, GnomeScreenshot};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "swipeshot")]
#[command(about = "Three-finger swipe screenshot daemon for Linux touchscreens")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch a touch device for swipes (default)
    Run {
        /// Touch device path (e.g. /dev/input/event2)
        #[arg(long)]
        device: Option<String>,
        /// Number of fingers the swipe must use
        #[arg(long)]
        fingers: Option<usize>,
        /// Minimum summed vertical travel in screen units
        #[arg(long)]
        threshold: Option<f64>,
        /// Screen width used to transform touch coordinates
        #[arg(long)]
        width: Option<u32>,
        /// Screen height used to transform touch coordinates
        #[arg(long)]
        height: Option<u32>,
    },
    /// Take one screenshot immediately
    Screenshot,
    /// List multi-touch input devices
    Devices,
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("swipeshot={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Some(Commands::Run {
            device,
            fingers,
            threshold,
            width,
            height,
        }) => run_daemon(device, fingers, threshold, width, height),
        Some(Commands::Screenshot) => run_screenshot(),
        Some(Commands::Devices) => run_list_devices(),
        None => run_daemon(None, None, None, None, None),
    }
}

fn run_daemon(
    device: Option<String>,
    fingers: Option<usize>,
    threshold: Option<f64>,
    width: Option<u32>,
    height: Option<u32>,
) -> anyhow::Result<()> {
    let mut config = Config::load();

    // CLI flags win over the config file.
    if device.is_some() {
        config.device = device;
    }
    if let Some(fingers) = fingers {
        config.fingers = fingers;
    }
    if let Some(threshold) = threshold {
        config.distance_threshold = threshold;
    }
    if let Some(width) = width {
        config.screen_width = width;
    }
    if let Some(height) = height {
        config.screen_height = height;
    }

    swipeshot::daemon::run(&config)?;
    Ok(())
}

fn run_screenshot() -> anyhow::Result<()> {
    let shooter = GnomeScreenshot::connect()?;
    let saved = shooter.capture()?;
    println!("Screenshot saved as: {}", saved);
    Ok(())
}

fn run_list_devices() -> anyhow::Result<()> {
    let devices = swipeshot::list_touch_devices();
    if devices.is_empty() {
        println!("No multi-touch devices found.");
        return Ok(());
    }

    for (path, device) in devices {
        println!("{}  {}", path.display(), device.name().unwrap_or("?"));
    }
    Ok(())
}
