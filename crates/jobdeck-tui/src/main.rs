use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use ratatui::Terminal;
use ratatui::crossterm::event;
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::CrosstermBackend;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

mod action;
mod app;
mod backend;
mod browser;
mod config_file;
mod input;
mod theme;
mod tui_event;
mod view;

use app::{App, Screen};
use jobdeck_core::profile::{Profile, load_profiles};
use tui_event::BackendCommand;

/// Triage profiles of job-posting links from the terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Profile name (under the profiles directory) or a path to a jobs file
    profile: Option<String>,

    /// Directory holding profile subdirectories
    #[arg(long, default_value = "profiles")]
    profiles_dir: PathBuf,

    /// Maximum concurrent validation probes
    #[arg(long)]
    concurrency: Option<usize>,

    /// Load the profile, print a summary, and exit without the TUI
    #[arg(long)]
    dry_run: bool,

    /// Color theme: hacker (default) or modern
    #[arg(long)]
    theme: Option<String>,
}

/// Install file logging under the platform cache dir so the alternate
/// screen stays clean. The returned guard must live for the whole run.
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let dir = dirs::cache_dir()?.join("jobdeck").join("logs");
    std::fs::create_dir_all(&dir).ok()?;
    let appender = tracing_appender::rolling::daily(dir, "jobdeck.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}

/// Resolve the profile list and the initially-selected index from the CLI
/// argument. A bare name must exist under the profiles directory; a path
/// must point at a readable jobs file.
fn resolve_profiles(args: &Args) -> anyhow::Result<(Vec<Profile>, usize)> {
    let mut profiles = load_profiles(&args.profiles_dir);
    let mut selected = 0;

    if let Some(arg) = &args.profile {
        if let Some(pos) = profiles.iter().position(|p| p.name == *arg) {
            selected = pos;
        } else {
            let path = PathBuf::from(arg);
            if path.is_file() {
                let profile = Profile::from_file(&path)?;
                if let Some(pos) = profiles
                    .iter()
                    .position(|p| p.jobs_file == profile.jobs_file)
                {
                    selected = pos;
                } else {
                    profiles.push(profile);
                    selected = profiles.len() - 1;
                }
            } else {
                let dir = if path.is_dir() {
                    path
                } else {
                    args.profiles_dir.join(arg)
                };
                match Profile::from_directory(&dir)? {
                    Some(profile) => {
                        profiles.push(profile);
                        selected = profiles.len() - 1;
                    }
                    None => anyhow::bail!("profile not found: {arg}"),
                }
            }
        }
    }

    Ok((profiles, selected))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    let _log_guard = init_logging();

    // Resolve settings: config file first, CLI flags on top.
    let mut settings = config_file::Settings::default();
    config_file::apply_to_settings(&config_file::load_config(), &mut settings);
    if let Some(concurrency) = args.concurrency {
        settings.concurrency = concurrency.max(1);
    }
    if let Some(theme) = &args.theme {
        settings.theme_name = theme.clone();
    }
    settings.dry_run = args.dry_run;

    let (profiles, profile_idx) = resolve_profiles(&args)?;
    if profiles.is_empty() {
        anyhow::bail!(
            "No profiles found in {}. Create {}/<name>/jobs.txt to get started.",
            args.profiles_dir.display(),
            args.profiles_dir.display()
        );
    }

    if settings.dry_run {
        let profile = &profiles[profile_idx];
        println!(
            "{}: {} entries, {} probe-able links ({} skipped at normalize)",
            profile.name,
            profile.entries.len(),
            profile.probe_targets(),
            profile.entries.len() - profile.probe_targets(),
        );
        println!("Dry run complete.");
        return Ok(());
    }

    let theme = theme::Theme::from_name(&settings.theme_name);

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Install panic hook that restores the terminal before printing panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let backend_terminal = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_terminal)?;

    // Drain any stray input events (e.g. Enter keypress from launching)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    let mut app = App::new(profiles, settings, theme);
    app.profile_idx = profile_idx;

    // Backend command/event channels
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<BackendCommand>();
    app.backend_cmd_tx = Some(cmd_tx);

    // Backend listener: one cancellation token per validation run.
    tokio::spawn(async move {
        let mut run_cancel = CancellationToken::new();

        while let Some(cmd) = cmd_rx.recv().await {
            match cmd {
                BackendCommand::Validate {
                    profile,
                    config,
                    tracker,
                } => {
                    run_cancel = CancellationToken::new();
                    let tx = event_tx.clone();
                    let cancel = run_cancel.clone();
                    tokio::spawn(backend::run_validation(
                        profile, config, tracker, tx, cancel,
                    ));
                }
                BackendCommand::CancelValidation => run_cancel.cancel(),
                BackendCommand::Fetch {
                    specs_path,
                    jobs_file,
                } => {
                    let tx = event_tx.clone();
                    tokio::spawn(backend::run_fetch(specs_path, jobs_file, tx));
                }
                BackendCommand::OpenTabs { urls, delay } => {
                    let tx = event_tx.clone();
                    tokio::spawn(backend::run_open(urls, delay, tx));
                }
            }
        }
    });

    // Main event loop
    let tick_rate = Duration::from_millis(100);

    loop {
        terminal.draw(|f| app.view(f))?;

        tokio::select! {
            // Backend events (non-blocking drain)
            maybe_event = event_rx.recv() => {
                if let Some(backend_event) = maybe_event {
                    app.handle_backend_event(backend_event);
                    while let Ok(evt) = event_rx.try_recv() {
                        app.handle_backend_event(evt);
                    }
                }
            }
            // Terminal input events, bounded by the tick interval
            _ = async {
                if event::poll(tick_rate).unwrap_or(false)
                    && let Ok(evt) = event::read()
                {
                    app.update(input::map_event(&evt));
                }
            } => {}
        }

        app.update(action::Action::Tick);

        if app.screen == Screen::Quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}
