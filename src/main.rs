use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use clap::Parser;
use color_eyre::Result;
use ratatui::DefaultTerminal;
use ratatui::crossterm::event::{
    self, DisableBracketedPaste, DisableFocusChange, EnableBracketedPaste, EnableFocusChange,
};
use ratatui::crossterm::execute;

use quickopen::app::App;
use quickopen::config::{self, Config, CoreConfig};
use quickopen::quick_open::QueryDispatcher;
use quickopen::rpc::core_process::CoreProcess;
use quickopen::rpc::local::LocalIndex;
use quickopen::rpc::{FuzzyBackend, RpcError, spawn_worker};

/// Upper bound on how long the loop sleeps waiting for terminal input, so
/// worker responses are picked up promptly
const IDLE_POLL: Duration = Duration::from_millis(16);

const LOG_FILE: &str = "quickopen.log";

#[derive(Parser, Debug)]
#[command(name = "quickopen")]
#[command(about = "Fuzzy quick-open path picker")]
#[command(version)]
struct Args {
    /// Directory to search (defaults to the configured root or the current directory)
    root: Option<PathBuf>,

    /// Config file to use instead of ~/.config/quickopen/config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Fuzzy core executable to launch instead of the built-in index
    #[arg(long, value_name = "CMD")]
    core: Option<String>,

    /// Idle time before a typed query is sent
    #[arg(long, value_name = "MS")]
    debounce_ms: Option<u64>,
}

impl Args {
    /// CLI flags take precedence over the config file
    fn apply(&self, config: &mut Config) {
        if let Some(root) = &self.root {
            config.quick_open.root = Some(root.clone());
        }
        if let Some(core) = &self.core {
            config.core.command = Some(core.clone());
        }
        if let Some(ms) = self.debounce_ms {
            config.quick_open.debounce_ms = ms;
        }
    }
}

fn main() -> Result<()> {
    // Install color-eyre panic hook for better error messages
    color_eyre::install()?;

    let args = Args::parse();
    init_logging();

    let loaded = match &args.config {
        Some(path) => config::load_config_from_path(path),
        None => config::load_config(),
    };
    let mut config = loaded.config;
    args.apply(&mut config);

    let root = match config.quick_open.root.clone() {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    let root = root.canonicalize().unwrap_or(root);

    let (request_tx, request_rx) = tokio::sync::mpsc::unbounded_channel();
    let (response_tx, response_rx) = mpsc::channel();
    let worker = spawn_worker(
        backend_factory(config.core.clone(), root.clone()),
        Duration::from_millis(config.quick_open.request_timeout_ms),
        request_rx,
        response_tx,
    )?;

    let dispatcher =
        QueryDispatcher::with_channels(config.quick_open.debounce_ms, request_tx, response_rx);
    let app = App::new(dispatcher, root, config.quick_open.max_visible_rows)
        .with_status(loaded.warning);

    // Initialize terminal (handles raw mode, alternate screen, etc.)
    let terminal = ratatui::init();
    if let Err(e) = execute!(io::stdout(), EnableFocusChange, EnableBracketedPaste) {
        log::warn!("Focus and paste events unavailable: {}", e);
    }

    let result = run(terminal, app);

    if let Err(e) = execute!(io::stdout(), DisableBracketedPaste, DisableFocusChange) {
        log::warn!("Failed to disable focus and paste events: {}", e);
    }
    ratatui::restore();
    worker.shutdown();

    // Print the picked path after the alternate screen is gone
    if let Some(path) = result?.picked() {
        println!("{}", path.display());
    }

    Ok(())
}

fn run(mut terminal: DefaultTerminal, mut app: App) -> Result<App> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        let timeout = app.next_wakeup().map_or(IDLE_POLL, |deadline| {
            deadline.saturating_duration_since(Instant::now()).min(IDLE_POLL)
        });
        if event::poll(timeout)? {
            app.handle_event(event::read()?);
        }

        app.update();

        if app.should_quit() {
            break;
        }
    }

    Ok(app)
}

/// Chooses the external core when one is configured, the local index otherwise
fn backend_factory(
    core: CoreConfig,
    root: PathBuf,
) -> impl FnOnce() -> Result<Arc<dyn FuzzyBackend>, RpcError> + Send + 'static {
    move || {
        if core.command.is_none() {
            return Ok(Arc::new(LocalIndex::build(&root)) as Arc<dyn FuzzyBackend>);
        }

        let process =
            CoreProcess::spawn(&core, &root).map_err(|e| RpcError::NotConfigured(e.to_string()))?;
        Ok(Arc::new(process) as Arc<dyn FuzzyBackend>)
    }
}

/// Log to a file under the cache dir, and only when RUST_LOG is set, so the
/// terminal UI stays clean
fn init_logging() {
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    let Some(dir) = dirs::cache_dir() else {
        return;
    };

    let path = dir.join(LOG_FILE);
    match File::create(&path) {
        Ok(file) => env_logger::Builder::from_default_env()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init(),
        Err(e) => eprintln!("quickopen: cannot write {}: {}", path.display(), e),
    }
}
