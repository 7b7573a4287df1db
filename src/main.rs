use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tasklist::{
    config::Config,
    logging,
    notify::AlertQueue,
    storage::FileStore,
    task_list::TaskList,
    transition::TransitionController,
    ui,
};
use tracing::{error, info};

fn main() -> Result<()> {
    let config = Config::parse();
    let log_sink = logging::init(&config.log_level, &config.log_file())?;

    let store = FileStore::new(config.data_dir());
    info!(dir = %store.dir().display(), log = ?log_sink, "starting");
    let mut list = TaskList::new(
        store,
        AlertQueue::new(),
        TransitionController::new(config.fade_duration()),
    );

    // Terminal setup
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = ui::run_app(&mut terminal, &mut list);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        error!(error = %err, "event loop failed");
    }
    info!(tasks = list.len(), "exiting");
    result.context("terminal event loop failed")
}
