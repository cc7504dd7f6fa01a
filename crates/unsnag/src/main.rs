//! Unsnag entry point.
//!
//! Unsnag frees the mouse cursor when it snags on the seam between monitors
//! of different sizes or vertical offsets.  It runs as a background process
//! with a low-level mouse hook; no window, no tray icon.
//!
//! # Usage
//!
//! ```text
//! unsnag [OPTIONS] [COMMAND]
//!
//! Commands:
//!   run       Install the mouse hook and unsnag until stopped (default)
//!   screens   Print the current monitor arrangement
//!   simulate  Run the jump decision over synthetic samples
//!   config    Print the effective (or a default) configuration
//!
//! Options:
//!   -c, --config <PATH>  Config file [default: platform config dir]
//!   -v, --verbose        Log at debug level unless RUST_LOG is set
//! ```
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load config, initialise tracing
//!  └─ run
//!       ├─ SingleInstanceGuard   (named mutex)
//!       ├─ enable_dpi_awareness  (physical pixels everywhere)
//!       ├─ termination signals   (Ctrl-C, Ctrl-Break, close, logoff, shutdown)
//!       ├─ console reader        (wrap toggle, quit)
//!       └─ daemon::run           (arrangement watcher + mouse hook)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use unsnag::application::control::ControlHandle;
use unsnag::application::unsnag_cursor::UnsnagService;
use unsnag::infrastructure::input_feed::mock::MockCursor;
use unsnag::infrastructure::storage::config::{
    config_file_path, load_config, load_config_from, AppConfig, ConfigError,
};
use unsnag_core::{Point, Rect, ScreenRegistry};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Frees the mouse cursor when it snags on a monitor edge.
#[derive(Debug, Parser)]
#[command(name = "unsnag", version, about)]
struct Cli {
    /// Config file to read instead of the platform default.
    #[arg(short, long, global = true, env = "UNSNAG_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level.  `RUST_LOG` takes precedence when set.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Install the mouse hook and unsnag until stopped.
    ///
    /// While running, type `w` and Enter to toggle wrap-around, or `q` to quit.
    Run(RunArgs),
    /// Print the current monitor arrangement.
    Screens,
    /// Run the jump decision over synthetic samples and print each outcome.
    Simulate(SimulateArgs),
    /// Print the effective configuration.
    Config {
        /// Print a default configuration file instead.
        #[arg(long)]
        generate: bool,
    },
}

#[derive(Debug, Default, Args)]
struct RunArgs {
    /// Enable wrap-around at the outer left and right desktop edges.
    #[arg(long)]
    wrap: bool,
}

#[derive(Debug, Args)]
struct SimulateArgs {
    /// A monitor as `LEFT,TOP,RIGHT,BOTTOM`.  Repeat for each monitor.
    #[arg(long = "screen", value_parser = parse_rect, allow_hyphen_values = true, required = true)]
    screens: Vec<Rect>,

    /// Enable wrap-around.
    #[arg(long)]
    wrap: bool,

    /// A pointer sample as `RAW_X,RAW_Y,CURSOR_X,CURSOR_Y`.  Repeat in order.
    #[arg(long = "sample", value_parser = parse_sample, allow_hyphen_values = true, required = true)]
    samples: Vec<Sample>,
}

/// One synthetic `(raw, cursor)` pointer sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Sample {
    raw: Point,
    cursor: Point,
}

fn parse_ints<const N: usize>(s: &str) -> Result<[i32; N], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != N {
        return Err(format!("expected {N} comma-separated integers, got {}", parts.len()));
    }
    let mut out = [0i32; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part
            .parse()
            .map_err(|e| format!("invalid integer '{part}': {e}"))?;
    }
    Ok(out)
}

fn parse_rect(s: &str) -> Result<Rect, String> {
    let [left, top, right, bottom] = parse_ints::<4>(s)?;
    Ok(Rect::from_ltrb(left, top, right, bottom))
}

fn parse_sample(s: &str) -> Result<Sample, String> {
    let [rx, ry, cx, cy] = parse_ints::<4>(s)?;
    Ok(Sample {
        raw: Point::new(rx, ry),
        cursor: Point::new(cx, cy),
    })
}

// ── Configuration and logging ─────────────────────────────────────────────────

fn load_app_config(path: Option<&PathBuf>) -> Result<AppConfig, ConfigError> {
    match path {
        Some(path) => load_config_from(path),
        None => match load_config() {
            Err(ConfigError::NoPlatformConfigDir) => Ok(AppConfig::default()),
            other => other,
        },
    }
}

/// `RUST_LOG` wins, then `--verbose`, then the config file's `log_level`.
fn init_tracing(verbose: bool, config: &AppConfig) {
    let fallback = if verbose { "debug" } else { config.log_level.as_str() };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .init();
}

// ── Commands ──────────────────────────────────────────────────────────────────

#[cfg(target_os = "windows")]
async fn run(args: RunArgs, config: &AppConfig) -> anyhow::Result<()> {
    use std::time::Duration;

    use tracing::info;
    use unsnag::infrastructure::console::spawn_stdin_console;
    use unsnag::infrastructure::input_feed::NativePointerHook;
    use unsnag::infrastructure::process::{
        enable_dpi_awareness, SingleInstanceGuard, INSTANCE_MUTEX_NAME,
    };
    use unsnag::infrastructure::screen_info::NativeScreenEnumerator;
    use unsnag::infrastructure::termination::{shutdown_on, wait_for_termination};

    let Some(_instance) =
        SingleInstanceGuard::acquire(INSTANCE_MUTEX_NAME).context("single-instance check")?
    else {
        eprintln!("unsnag is already running.");
        return Ok(());
    };

    enable_dpi_awareness();

    let control = ControlHandle::new(args.wrap || config.engine.wrap_enabled);

    // ── Termination signals and console commands ─────────────────────────────
    tokio::spawn(shutdown_on(wait_for_termination(), control.clone()));
    spawn_stdin_console(control.clone()).context("starting console reader")?;

    info!("unsnag starting.  Type `w` + Enter to toggle wrap, `q` or Ctrl-C to exit.");
    unsnag::daemon::run(
        NativePointerHook::new(),
        Arc::new(NativeScreenEnumerator::new()),
        control,
        Duration::from_millis(config.watch.poll_interval_ms),
    )
    .await
    .context("unsnag daemon")
}

#[cfg(not(target_os = "windows"))]
async fn run(_args: RunArgs, _config: &AppConfig) -> anyhow::Result<()> {
    Err(unsupported_platform().into())
}

#[cfg(target_os = "windows")]
fn screens() -> anyhow::Result<()> {
    use unsnag::infrastructure::process::enable_dpi_awareness;
    use unsnag::infrastructure::screen_info::{NativeScreenEnumerator, PlatformScreenEnumerator};
    use unsnag_core::{ScreenSet, ScreenSpec};

    enable_dpi_awareness();
    let monitors = NativeScreenEnumerator::new()
        .enumerate_monitors()
        .context("enumerating monitors")?;
    let specs: Vec<ScreenSpec> = monitors.into_iter().map(Into::into).collect();
    let set = ScreenSet::build(&specs, 1).context("building screen arrangement")?;

    for screen in set.screens() {
        let marker = if screen.is_primary { " (primary)" } else { "" };
        println!("{} {}{}", screen.id, screen.bounds, marker);
    }
    if let Some(desktop) = set.bounding_box() {
        println!("desktop {desktop}");
    }
    Ok(())
}

#[cfg(not(target_os = "windows"))]
fn screens() -> anyhow::Result<()> {
    Err(unsupported_platform().into())
}

#[cfg(not(target_os = "windows"))]
fn unsupported_platform() -> unsnag::infrastructure::input_feed::CaptureError {
    unsnag::infrastructure::input_feed::CaptureError::UnsupportedPlatform(
        std::env::consts::OS.to_string(),
    )
}

/// Runs `samples` through a fresh service over `screens` and returns one
/// printable line per sample.
fn simulate(args: &SimulateArgs) -> anyhow::Result<Vec<String>> {
    let registry = Arc::new(ScreenRegistry::new());
    registry
        .init(args.screens.iter().copied())
        .context("invalid --screen arrangement")?;

    let mut service = UnsnagService::new(registry, ControlHandle::new(args.wrap));
    let cursor = MockCursor::default();

    let lines = args
        .samples
        .iter()
        .map(|sample| {
            cursor.place(sample.cursor);
            let outcome = if service.handle_move(sample.raw, &cursor) {
                format!("jump #{} -> {}", service.jump_count(), cursor.position())
            } else {
                "pass".to_string()
            };
            format!("raw {} cursor {}: {}", sample.raw, sample.cursor, outcome)
        })
        .collect();
    Ok(lines)
}

fn show_config(config: &AppConfig, path: Option<&PathBuf>, generate: bool) -> anyhow::Result<()> {
    if generate {
        print!("{}", AppConfig::default().to_toml()?);
        return Ok(());
    }
    match path.cloned().map(Ok).unwrap_or_else(config_file_path) {
        Ok(path) => println!("# {}", path.display()),
        Err(_) => println!("# no config file location on this platform"),
    }
    print!("{}", config.to_toml()?);
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_app_config(cli.config.as_ref()).context("loading configuration")?;
    init_tracing(cli.verbose, &config);

    match cli.command.unwrap_or(Command::Run(RunArgs::default())) {
        Command::Run(args) => run(args, &config).await,
        Command::Screens => screens(),
        Command::Simulate(args) => {
            for line in simulate(&args)? {
                println!("{line}");
            }
            Ok(())
        }
        Command::Config { generate } => show_config(&config, cli.config.as_ref(), generate),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_parses_as_default_run() {
        let cli = Cli::try_parse_from(["unsnag"]).expect("parse");
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_run_accepts_wrap_flag() {
        let cli = Cli::try_parse_from(["unsnag", "run", "--wrap"]).expect("parse");
        assert!(matches!(cli.command, Some(Command::Run(RunArgs { wrap: true }))));
    }

    #[test]
    fn test_parse_rect_accepts_negative_coordinates() {
        assert_eq!(
            parse_rect("-1280, 0, 0, 1024"),
            Ok(Rect::from_ltrb(-1280, 0, 0, 1024))
        );
    }

    #[test]
    fn test_parse_rect_rejects_wrong_arity() {
        assert!(parse_rect("0,0,1920").is_err());
    }

    #[test]
    fn test_parse_sample_rejects_non_integer() {
        assert!(parse_sample("1,2,x,4").is_err());
    }

    #[test]
    fn test_simulate_args_parse_hyphenated_values() {
        // Arrange / Act
        let cli = Cli::try_parse_from([
            "unsnag",
            "simulate",
            "--screen",
            "0,0,1920,1080",
            "--wrap",
            "--sample",
            "-5,500,0,500",
        ])
        .expect("parse");

        // Assert
        let Some(Command::Simulate(args)) = cli.command else {
            panic!("expected simulate");
        };
        assert!(args.wrap);
        assert_eq!(args.samples[0].raw, Point::new(-5, 500));
    }

    #[test]
    fn test_simulate_reports_jump_and_pass() {
        // Arrange
        let args = SimulateArgs {
            screens: vec![
                Rect::from_ltrb(0, 0, 1920, 1080),
                Rect::from_ltrb(1920, 0, 3840, 1080),
            ],
            wrap: false,
            samples: vec![
                Sample {
                    raw: Point::new(1925, 500),
                    cursor: Point::new(1919, 500),
                },
                Sample {
                    raw: Point::new(1930, 500),
                    cursor: Point::new(1925, 500),
                },
            ],
        };

        // Act
        let lines = simulate(&args).expect("simulate");

        // Assert
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("jump #1 -> (1920, 500)"), "{}", lines[0]);
        assert!(lines[1].ends_with("pass"), "{}", lines[1]);
    }

    #[test]
    fn test_simulate_rejects_degenerate_screen() {
        let args = SimulateArgs {
            screens: vec![Rect::from_ltrb(0, 0, 0, 1080)],
            wrap: false,
            samples: Vec::new(),
        };

        assert!(simulate(&args).is_err());
    }
}
