use bubbledash::cli::{initial_sort, Args};
use bubbledash::{
    App, AppConfig, AppEvent, BoundField, CacheManager, ConfigManager, Dashboard, Dataset, Theme,
    APP_NAME,
};
use clap::Parser;
use color_eyre::Result;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use ratatui::DefaultTerminal;
use std::sync::mpsc::channel;
use std::time::Duration;

fn render(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    terminal.draw(|frame| frame.render_widget(app, frame.area()))?;
    Ok(())
}

/// Initial bound texts from the command line, in input order.
fn initial_bounds(args: &Args) -> Vec<(BoundField, &str)> {
    [
        (BoundField::MinRevenue, args.min_revenue.as_deref()),
        (BoundField::MaxRevenue, args.max_revenue.as_deref()),
    ]
    .into_iter()
    .filter_map(|(field, raw)| raw.map(|raw| (field, raw)))
    .collect()
}

/// `--json`: run the startup bounds through the dashboard and print what
/// the chart and table would show.
fn print_json(args: &Args) -> Result<()> {
    let mut dashboard = Dashboard::new(Dataset::sample());
    for (field, raw) in initial_bounds(args) {
        dashboard.dispatch(&bubbledash::Action::BoundChanged {
            field,
            raw: raw.to_string(),
        })?;
    }
    let snapshot = dashboard.snapshot(initial_sort(args));
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

fn run(mut terminal: DefaultTerminal, args: &Args, config: AppConfig) -> Result<()> {
    let (tx, rx) = channel::<AppEvent>();
    let poll_interval = Duration::from_millis(config.performance.event_poll_interval_ms);
    let mut app = App::new_with_config(Dataset::sample(), Theme::default(), config);
    if args.debug {
        app.enable_debug();
    }
    app.set_sort(initial_sort(args));
    for (field, raw) in initial_bounds(args) {
        tx.send(app.set_bound_text(field, raw))?;
    }
    render(&mut terminal, &mut app)?;

    loop {
        if crossterm::event::poll(poll_interval)? {
            match crossterm::event::read()? {
                crossterm::event::Event::Key(key) => tx.send(AppEvent::Key(key))?,
                crossterm::event::Event::Mouse(mouse) => tx.send(AppEvent::Mouse(mouse))?,
                crossterm::event::Event::Resize(cols, rows) => {
                    tx.send(AppEvent::Resize(cols, rows))?
                }
                _ => {}
            }
        }

        let updated = match rx.recv_timeout(Duration::from_millis(0)) {
            Ok(event) => {
                match event {
                    AppEvent::Exit => break,
                    AppEvent::Crash(msg) => {
                        return Err(color_eyre::eyre::eyre!(msg));
                    }
                    event => {
                        if let Some(event) = app.event(&event) {
                            tx.send(event)?;
                        }
                    }
                }
                true
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => false,
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        };

        if updated {
            render(&mut terminal, &mut app)?;
        }
    }
    Ok(())
}

fn handle_early_exit_flags(args: &Args) -> Result<Option<()>> {
    if args.clear_cache {
        match CacheManager::new(APP_NAME) {
            Ok(cache) => {
                if let Err(e) = cache.clear_all() {
                    eprintln!("Error clearing cache: {}", e);
                    std::process::exit(1);
                }
                println!("Cache cleared successfully");
                return Ok(Some(()));
            }
            Err(_e) => {
                println!("No cache to clear");
                return Ok(Some(()));
            }
        }
    }

    if args.generate_config {
        match ConfigManager::new(APP_NAME).and_then(|config| config.write_default_config(args.force)) {
            Ok(path) => {
                println!("Configuration written to {}", path.display());
                return Ok(Some(()));
            }
            Err(e) => {
                eprintln!("Error generating config: {}", e);
                std::process::exit(1);
            }
        }
    }

    if args.json {
        print_json(args)?;
        return Ok(Some(()));
    }

    Ok(None)
}

fn main() -> Result<()> {
    let args = Args::parse();
    color_eyre::install()?;

    if let Some(()) = handle_early_exit_flags(&args)? {
        return Ok(());
    }

    let config = AppConfig::load(APP_NAME)?;
    let cache = CacheManager::new(APP_NAME)?;
    let _log_guard = bubbledash::logging::init(&cache, &config.logging, args.debug)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting");

    let terminal = ratatui::init();
    crossterm::execute!(std::io::stdout(), EnableMouseCapture)?;
    let result = run(terminal, &args, config);
    if let Err(e) = crossterm::execute!(std::io::stdout(), DisableMouseCapture) {
        tracing::warn!(error = %e, "could not disable mouse capture");
    }
    ratatui::restore();
    tracing::info!("exiting");
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
