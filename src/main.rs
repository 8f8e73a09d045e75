use cfgtree::api::HttpApi;
use cfgtree::app::App;
use cfgtree::config::{API_KEY_ENV, AppConfig, BASE_URL_ENV, Overrides};
use cfgtree::logging;
use cfgtree::terminal::{Terminal, TerminalEvent};
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{LeaveAlternateScreen, disable_raw_mode};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Browse and edit part configurations in the terminal.
#[derive(Parser)]
#[command(name = "cfgtree", version, about)]
struct Args {
    /// YAML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// API base URL
    #[arg(long, env = BASE_URL_ENV)]
    base_url: Option<String>,

    /// API key; submitted automatically on start
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    api_key: Option<String>,

    /// Write logs to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Log filter, e.g. `info` or `cfgtree=debug`
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "N")]
    timeout_secs: Option<u64>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            timeout_secs: self.timeout_secs,
            log_file: self.log_file.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let config = match AppConfig::load(args.config.as_deref()) {
        Ok(config) => config.apply(args.overrides()),
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = logging::init(&config) {
        eprintln!("Error: {err}");
        return ExitCode::FAILURE;
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "terminal failure");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &AppConfig) -> io::Result<()> {
    info!(base_url = %config.base_url, "starting");
    let api = Arc::new(HttpApi::new(config.base_url.clone(), config.timeout()));
    let mut app = App::new(api);
    if let Some(key) = &config.api_key {
        app.submit_api_key(key);
    }

    let mut terminal = Terminal::new()?;
    install_panic_hook();
    terminal.enter()?;
    let result = event_loop(&mut terminal, &mut app);
    terminal.exit()?;
    result
}

/// Leaves raw mode before the default hook prints the panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

fn event_loop(terminal: &mut Terminal, app: &mut App) -> io::Result<()> {
    let mut render_requested = true;

    loop {
        match terminal.poll_event(POLL_INTERVAL)? {
            TerminalEvent::Key(key_event) => {
                app.handle_key(key_event);
                render_requested = true;
            }
            TerminalEvent::Resize { .. } => render_requested = true,
            TerminalEvent::Tick => {}
        }

        if app.tick() {
            render_requested = true;
        }

        if app.should_exit() {
            info!("exiting");
            break;
        }

        if render_requested {
            app.render(terminal)?;
            render_requested = false;
        }
    }

    Ok(())
}
