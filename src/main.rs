mod app;
mod catalog;
mod config;
mod omdb;
mod scroll;
mod search;
mod tasks;
mod ui;
mod view;

use app::{App, InputMode, Notice, Screen};
use clap::{Parser, Subcommand};
use config::Settings;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use omdb::{MovieRecord, MovieSource, OmdbClient};
use search::{SearchOutcome, normalize_term, search_movies};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;
use tasks::AppEvent;
use view::{GenreFilter, GenreMatch, ViewState};

/// TUI browser for OMDb movie metadata
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// OMDb API key (overrides the config file and OMDB_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// How the genre filter compares genres
    #[arg(long, value_enum, global = true)]
    genre_match: Option<GenreMatch>,

    /// Write logs to this file instead of the default location
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the TUI browser (default)
    Run,
    /// Search once and print the hydrated results
    Search {
        /// Title to search for
        term: String,
        /// Only print movies of this genre
        #[arg(short, long)]
        genre: Option<String>,
    },
    /// Load the startup catalog and print it
    Catalog {
        /// Only print movies of this genre
        #[arg(short, long)]
        genre: Option<String>,
    },
    /// Print where the configuration file is read from
    ConfigPath {
        /// Also print the effective settings as TOML
        #[arg(long)]
        print: bool,
    },
}

/// What request tasks need from the UI loop.
struct Context {
    source: Arc<dyn MovieSource>,
    catalog_ids: Vec<String>,
    tx: Sender<AppEvent>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Run);

    let tui = matches!(command, Commands::Run);
    init_logging(tui, cli.log_file.as_deref())?;

    let config_path = match cli.config {
        Some(path) => path,
        None => Settings::default_path()?,
    };
    let mut settings = Settings::load_from(&config_path)?;
    settings.apply_env(|k| std::env::var(k).ok());
    if let Some(key) = cli.api_key {
        settings.api_key = key;
    }
    if let Some(mode) = cli.genre_match {
        settings.genre_match = mode;
    }
    settings.validate()?;
    tracing::info!(
        config = %config_path.display(),
        base_url = %settings.api_base_url,
        genre_match = ?settings.genre_match,
        catalog = settings.catalog_ids.len(),
        "settings loaded"
    );

    let client = OmdbClient::new(
        &settings.api_base_url,
        &settings.api_key,
        settings.request_timeout(),
    )?;
    let source: Arc<dyn MovieSource> = Arc::new(client);

    match command {
        Commands::ConfigPath { print } => {
            println!("{}", config_path.display());
            if print {
                println!();
                print!("{}", settings.to_toml()?);
            }
        }
        Commands::Search { term, genre } => {
            let Some(term) = normalize_term(&term) else {
                eprintln!("Error: search term is empty");
                std::process::exit(2);
            };
            match search_movies(source.as_ref(), term).await {
                Ok(SearchOutcome::NoResults) => println!("{}", Notice::NoResults.message()),
                Ok(SearchOutcome::Found(records)) => {
                    print_movies(&records, genre, settings.genre_match)
                }
                Err(e) => {
                    tracing::error!(error = %e, term, "search failed");
                    eprintln!("{} {}", Notice::SearchFailure.message(), e.user_message());
                    std::process::exit(1);
                }
            }
        }
        Commands::Catalog { genre } => {
            match catalog::load_catalog(source.as_ref(), &settings.catalog_ids).await {
                Ok(records) => print_movies(&records, genre, settings.genre_match),
                Err(e) => {
                    tracing::error!(error = %e, "catalog load failed");
                    eprintln!("{} {}", Notice::LoadFailure.message(), e.user_message());
                    std::process::exit(1);
                }
            }
        }
        Commands::Run => {
            let (tx, rx) = mpsc::channel();
            let ctx = Context {
                source,
                catalog_ids: settings.catalog_ids.clone(),
                tx,
            };

            let mut app = App::new(settings.genre_match, settings.scroll_top_threshold_px);
            let ticket = app.begin_catalog_load();
            tasks::spawn_catalog_load(
                Arc::clone(&ctx.source),
                ctx.catalog_ids.clone(),
                ticket,
                ctx.tx.clone(),
            );

            // Init terminal
            let mut terminal = ratatui::init();
            let size = terminal.size()?;
            app.update_list_height(size.height.saturating_sub(ui::LIST_OVERHEAD) as usize);

            // Main loop
            let result = run_app(&mut terminal, &mut app, &ctx, &rx).await;

            // Restore terminal
            ratatui::restore();

            if let Err(e) = result {
                tracing::error!(error = %e, "UI loop failed");
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Logs go to a file while the TUI owns the terminal, to stderr otherwise.
fn init_logging(
    tui: bool,
    log_file: Option<&std::path::Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if !tui && log_file.is_none() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return Ok(());
    }

    let path = match log_file {
        Some(path) => path.to_path_buf(),
        None => {
            let project_dirs =
                directories::ProjectDirs::from("com", "movie-explorer", "movie-explorer")
                    .ok_or("Could not determine home directory")?;
            let data_dir = project_dirs.data_dir();
            std::fs::create_dir_all(data_dir)?;
            data_dir.join("movie-explorer.log")
        }
    };
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn print_movies(records: &[MovieRecord], genre: Option<String>, mode: GenreMatch) {
    let filter = genre.map(GenreFilter::new).unwrap_or_default();
    let view = ViewState::derive(records, &[], &filter, mode);
    println!("Genres: {}", view.genres.join(", "));
    println!();
    for movie in &view.filtered {
        println!(
            "{:<10}  {:<45}  {:>4}  {:<4}  {}",
            movie.imdb_id,
            movie.display_title(),
            movie.year.as_deref().unwrap_or(""),
            movie.imdb_rating.as_deref().unwrap_or("-"),
            movie.genre.as_deref().unwrap_or(""),
        );
    }
    println!();
    println!("{} of {} movies", view.filtered.len(), view.effective.len());
}

async fn run_app(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    ctx: &Context,
    rx: &Receiver<AppEvent>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut frame_count: usize = 0;
    let mut drawn_revision = None;

    loop {
        // The spinner needs frames while loading, everything else only on change
        if drawn_revision != Some(app.revision()) || app.loading() {
            terminal.draw(|frame| ui::render(app, frame, frame_count))?;
            drawn_revision = Some(app.revision());
        }

        if app.should_quit {
            return Ok(());
        }

        let timeout = if app.is_scrolling() || app.loading() {
            Duration::from_millis(50)
        } else {
            Duration::from_millis(250)
        };
        if crossterm::event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key(app, key, ctx);
                }
                Event::Resize(_, height) => {
                    app.update_list_height(height.saturating_sub(ui::LIST_OVERHEAD) as usize);
                }
                _ => {}
            }
            drawn_revision = None;
        }

        while let Ok(event) = rx.try_recv() {
            app.handle_event(event);
        }
        app.tick();
        frame_count = frame_count.wrapping_add(1);
    }
}

fn handle_key(app: &mut App, key: KeyEvent, ctx: &Context) {
    // Help toggle (global)
    if key.code == KeyCode::Char('?') && app.input_mode == InputMode::Normal {
        app.show_help = !app.show_help;
        return;
    }

    // If help is showing, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.input_mode == InputMode::Editing {
        handle_search_input(app, key, ctx);
        return;
    }
    if app.show_genre_picker {
        handle_genre_picker_key(app, key);
        return;
    }
    match app.screen {
        Screen::List => handle_list_key(app, key),
        Screen::Detail => handle_detail_key(app, key),
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent, ctx: &Context) {
    match key.code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
            submit_search(app, ctx);
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            app.search_term.pop();
        }
        KeyCode::Char(c) => {
            app.search_term.push(c);
        }
        _ => {}
    }
}

fn submit_search(app: &mut App, ctx: &Context) {
    if let Some((ticket, term)) = app.begin_search() {
        tasks::spawn_search(Arc::clone(&ctx.source), term, ticket, ctx.tx.clone());
    }
}

fn handle_genre_picker_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('g') | KeyCode::Char('q') => {
            app.show_genre_picker = false;
        }
        KeyCode::Down | KeyCode::Char('j') => app.genre_picker_move(1),
        KeyCode::Up | KeyCode::Char('k') => app.genre_picker_move(-1),
        KeyCode::Enter => app.genre_picker_confirm(),
        _ => {}
    }
}

fn handle_list_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Editing;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.list_next();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.list_prev();
        }
        KeyCode::PageDown => {
            app.list_page_down();
        }
        KeyCode::PageUp => {
            app.list_page_up();
        }
        KeyCode::Enter => {
            app.open_detail();
        }
        KeyCode::Char('g') => {
            app.open_genre_picker();
        }
        KeyCode::Char(']') => {
            app.cycle_genre(1);
        }
        KeyCode::Char('[') => {
            app.cycle_genre(-1);
        }
        KeyCode::Char('t') => {
            app.scroll_to_top();
        }
        KeyCode::Char('G') => {
            app.list_last();
        }
        KeyCode::Char('h') | KeyCode::Home => {
            app.go_home();
        }
        _ => {}
    }
}

fn handle_detail_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            app.close_detail();
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.scroll_down();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.scroll_up();
        }
        KeyCode::Char('h') | KeyCode::Home => {
            app.go_home();
        }
        _ => {}
    }
}
