use anyhow::Context;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use log::{info, warn};
use personality_quiz::{
    api::{ApiClient, PredictionApi, DEFAULT_HISTORY_LIMIT},
    api_worker::spawn_api_worker,
    app::App,
    config::{Config, API_URL_ENV},
    logger,
    models::ApiResponse,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Debug, Parser)]
#[command(name = "personality-quiz", about = "Terminal personality type quiz")]
struct Cli {
    /// Base URL of the prediction service
    #[arg(long, env = API_URL_ENV)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print recent predictions as JSON lines and exit
    History {
        #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logger::init();

    let config = Config::resolve(cli.api_url.as_deref())?;
    info!("Using prediction service at {}", config.api_url());
    let api: Arc<dyn PredictionApi> = Arc::new(ApiClient::new(&config));

    match cli.command {
        Some(Command::History { limit }) => print_history(api.as_ref(), limit).await,
        None => run_tui(api).await,
    }
}

async fn print_history(api: &dyn PredictionApi, limit: usize) -> anyhow::Result<()> {
    let records = api
        .get_history(limit)
        .await
        .context("failed to fetch prediction history")?;
    for record in records {
        println!("{}", serde_json::to_string(&record)?);
    }
    Ok(())
}

async fn run_tui(api: Arc<dyn PredictionApi>) -> anyhow::Result<()> {
    let (req_tx, req_rx) = mpsc::unbounded_channel();
    let (resp_tx, resp_rx) = mpsc::unbounded_channel();
    let worker = spawn_api_worker(api, req_rx, resp_tx);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(req_tx);
    let outcome = event_loop(&mut terminal, &mut app, resp_rx).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    worker.abort();

    outcome
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    mut resp_rx: mpsc::UnboundedReceiver<ApiResponse>,
) -> anyhow::Result<()> {
    let mut events = EventStream::new();

    loop {
        terminal.draw(|f| app.draw(f))?;

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if !app.handle_key(key) {
                        info!("User quit");
                        return Ok(());
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(()),
            },
            response = resp_rx.recv() => match response {
                Some(response) => app.process_api_response(response),
                None => {
                    warn!("API worker stopped");
                    return Ok(());
                }
            },
        }
    }
}
