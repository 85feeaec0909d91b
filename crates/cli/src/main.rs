use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use wcschat::chat::{self, ChatController, RenderSurface};

#[derive(Parser)]
#[command(name = "wcschat")]
#[command(about = "wcschat CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Create the configuration directory and a default config file.
    Init {
        /// Config file path (default: WCSCHAT_CONFIG_PATH or ~/.wcschat/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Chat with the conversation service in the terminal. `/clear` resets the conversation, `/quit` exits.
    Chat {
        /// Config file path (default: WCSCHAT_CONFIG_PATH or ~/.wcschat/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Client id for the conversation (overrides session.clientId).
        #[arg(long, value_name = "ID")]
        session: Option<String>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("wcschat {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Init { config }) => {
            if let Err(e) = run_init(config) {
                log::error!("init failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Chat { config, session }) => {
            if let Err(e) = run_chat(config, session) {
                log::error!("chat failed: {:#}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

fn run_init(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = config_path.unwrap_or_else(wcschat::config::default_config_path);
    let dir = wcschat::init::init_config_dir(&path)?;
    println!("initialized configuration at {}", dir.display());
    Ok(())
}

/// Prints only what was appended since the last render; a shorter or diverging
/// text means the transcript was cleared.
struct TerminalSurface<O: Write> {
    out: O,
    shown: String,
}

impl<O: Write> TerminalSurface<O> {
    fn new(out: O) -> Self {
        Self {
            out,
            shown: String::new(),
        }
    }

    fn write_update(&mut self, text: &str) -> io::Result<()> {
        match text.strip_prefix(self.shown.as_str()) {
            Some(added) => write!(self.out, "{}", added)?,
            None => write!(self.out, "--- cleared ---\n{}", text)?,
        }
        self.out.flush()
    }
}

impl<O: Write> RenderSurface for TerminalSurface<O> {
    fn set_text(&mut self, text: &str) {
        if let Err(e) = self.write_update(text) {
            log::debug!("writing transcript to terminal: {}", e);
        }
        self.shown = text.to_string();
    }

    // the chat loop prints the prompt once input unlocks
    fn set_enabled(&mut self, _enabled: bool) {}
}

/// Apply worker results until the controller unlocks input.
fn wait_for_input<O: Write>(controller: &mut ChatController<TerminalSurface<O>>) {
    while !controller.input_enabled() {
        controller.pump_blocking(Duration::from_millis(250));
    }
}

fn run_chat(config_path: Option<PathBuf>, session: Option<String>) -> anyhow::Result<()> {
    let (mut config, path) = wcschat::config::load_config(config_path)?;
    log::info!("config: {}", path.display());
    if session.is_some() {
        config.session.client_id = session;
    }

    let surface = TerminalSurface::new(io::stdout());
    let mut controller = chat::start_controller(&config, surface, Arc::new(|| {}))?;
    controller.on_window_ready();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        wait_for_input(&mut controller);
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let input = line.trim_end_matches(['\r', '\n']);
        if input.eq_ignore_ascii_case("/exit") || input.eq_ignore_ascii_case("/quit") {
            break;
        }
        if input.eq_ignore_ascii_case("/clear") {
            controller.on_clear();
            continue;
        }
        controller.on_user_submit(input);
    }

    Ok(())
}
