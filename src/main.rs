// cartwhisper - speak your groceries, the list keeps up
//
// This is the main entry point. Parses CLI args and dispatches to handlers.

use cartwhisper_lib::{
    config::{self, Settings},
    core::item::{DEFAULT_BRAND, DEFAULT_SIZE},
    core::search::search,
    core::{ListController, ShoppingItem},
    gemini::{GeminiClient, GeminiExtractor, GeminiRecommender},
    session::{Session, SessionEvent, TurnReport, UtteranceSource},
    Database, Result,
};
use std::env;
use std::io::{self, Write};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    // Grab whatever the user typed
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return Ok(());
    }

    let command = &args[1];

    match command.as_str() {
        "repl" => handle_repl().await,
        "say" => handle_say(&args[2..]).await,
        "list" => handle_list().await,
        "search" => handle_search(&args[2..]).await,
        "history" => handle_history(&args[2..]).await,
        "recommend" => handle_recommend().await,
        "status" => handle_status().await,
        "clear" => handle_clear().await,
        "version" | "-v" | "--version" => {
            println!("cartwhisper v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "-h" | "--help" => {
            print_usage();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            Ok(())
        }
    }
}

// Diagnostics go to stderr so they never mix into the rendered list
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

// Reads one utterance per line. EOF ends the session.
struct StdinSource {
    lines: io::Lines<io::StdinLock<'static>>,
}

impl StdinSource {
    fn new() -> Self {
        Self {
            lines: io::stdin().lines(),
        }
    }
}

impl UtteranceSource for StdinSource {
    fn produce_utterance(&mut self) -> Option<String> {
        self.lines.next().and_then(|line| line.ok())
    }
}

async fn handle_repl() -> Result<()> {
    let settings = config::load_settings();
    let Some(mut session) = build_session(&settings).await? else {
        return Ok(());
    };

    session.start().await?;

    println!(
        "cartwhisper v{} - type what you'd say out loud, one command per line",
        env!("CARGO_PKG_VERSION")
    );
    println!("Try: \"add two bottles of milk\", \"search bread\", \"remove rice\". Ctrl-D quits.");
    render_items(session.controller().items());

    let mut source = StdinSource::new();
    loop {
        print!("\n> ");
        io::stdout().flush()?;

        let Some(utterance) = source.produce_utterance() else {
            break;
        };
        if utterance.trim().is_empty() {
            continue;
        }

        let report = session.handle_utterance(&utterance).await;
        render_turn(&report, session.controller());

        // Suggestions from earlier turns land here, between commands
        for event in session.poll_events() {
            render_event(&event);
        }
    }

    // Don't drop a refresh that's still in flight
    for event in session.settle().await {
        render_event(&event);
    }

    println!("\nBye! Your list is saved.");
    Ok(())
}

async fn handle_say(args: &[String]) -> Result<()> {
    if args.is_empty() {
        eprintln!("Error: Nothing to say. Try: cartwhisper say \"add two bottles of milk\"");
        return Ok(());
    }

    let utterance = args.join(" ");
    let settings = config::load_settings();
    let Some(mut session) = build_session(&settings).await? else {
        return Ok(());
    };

    session.start().await?;

    let report = session.handle_utterance(&utterance).await;
    render_turn(&report, session.controller());

    for event in session.settle().await {
        render_event(&event);
    }

    Ok(())
}

async fn handle_list() -> Result<()> {
    let settings = config::load_settings();
    let db = get_database(&settings).await?;

    let items = db.load_items().await?;
    render_items(&items);

    Ok(())
}

async fn handle_search(args: &[String]) -> Result<()> {
    if args.is_empty() {
        eprintln!("Error: No search term provided");
        return Ok(());
    }

    let term = args.join(" ");
    let settings = config::load_settings();
    let db = get_database(&settings).await?;

    let items = db.load_items().await?;
    let matches = search(&items, &term);

    if matches.is_empty() {
        println!("No matching items found.");
    } else {
        println!("\nFound {} item(s) matching \"{}\":", matches.len(), term);
        render_items(&matches);
    }

    Ok(())
}

async fn handle_history(args: &[String]) -> Result<()> {
    let limit = args
        .first()
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(10);

    let settings = config::load_settings();
    let db = get_database(&settings).await?;

    let entries = db.recent_history(limit).await?;

    if entries.is_empty() {
        println!("No history yet.");
    } else {
        println!("\nRecent changes:");
        println!("{}", "=".repeat(60));
        for (i, entry) in entries.iter().enumerate() {
            println!(
                "{:3}. {} {} x{} ({})",
                i + 1,
                entry.action,
                entry.name,
                entry.quantity,
                entry.recorded_at
            );
        }
        println!("{}", "=".repeat(60));
    }

    Ok(())
}

async fn handle_recommend() -> Result<()> {
    let settings = config::load_settings();
    let Some(mut session) = build_session(&settings).await? else {
        return Ok(());
    };

    println!("\n💡 Thinking about what you might need...");

    // start() already kicks off a refresh; just wait for it
    session.start().await?;
    for event in session.settle().await {
        render_event(&event);
    }

    if session.recommendations().is_empty() {
        println!("No suggestions yet. Add a few items first!");
    }

    Ok(())
}

async fn handle_status() -> Result<()> {
    let settings = config::load_settings();
    let db = get_database(&settings).await?;
    let stats = db.stats().await?;

    println!("\ncartwhisper Status");
    println!("{}", "=".repeat(60));

    println!("\nDatabase:");
    println!("  Path:            {}", db.path().display());
    println!("  Items on list:   {}", stats.live_items);
    println!("  History entries: {}", stats.history_entries);

    println!("\nGemini:");
    let key_status = if settings.gemini_api_key.is_some() {
        "✓ Configured"
    } else {
        "✗ Missing (set GEMINI_API_KEY)"
    };
    println!("  API key: {}", key_status);
    println!("  Model:   {}", settings.gemini_model);

    println!("{}", "=".repeat(60));

    Ok(())
}

async fn handle_clear() -> Result<()> {
    let settings = config::load_settings();
    let db = get_database(&settings).await?;

    db.clear_list().await?;
    println!("✅ List cleared. History kept.");

    Ok(())
}

// Wire up a full Gemini-backed session, or print a hint and hand back None
// when no API key is configured.
async fn build_session(settings: &Settings) -> Result<Option<Session>> {
    let Some(api_key) = settings.gemini_api_key.clone() else {
        eprintln!("No Gemini API key configured.");
        eprintln!(
            "Set GEMINI_API_KEY or put api_key = \"...\" in {}",
            config::config_file_path().display()
        );
        return Ok(None);
    };

    let client = GeminiClient::new(
        &api_key,
        &settings.gemini_model,
        &settings.gemini_base_url,
        settings.request_timeout(),
    )?;
    let extractor = Arc::new(GeminiExtractor::new(client.clone()));
    let recommender = Arc::new(GeminiRecommender::new(client));

    let db = Arc::new(get_database(settings).await?);

    Ok(Some(Session::new(
        db,
        extractor,
        recommender,
        settings.history_window,
    )))
}

async fn get_database(settings: &Settings) -> Result<Database> {
    Database::new(settings.resolved_db_path()).await
}

fn render_turn(report: &TurnReport, controller: &ListController) {
    let notification = &report.outcome.notification;
    println!("{} {}", notification.kind.emoji(), notification.message);

    for notice in &report.notices {
        println!("⚠️ {}", notice);
    }

    render_items(controller.visible_items());
}

fn render_items(items: &[ShoppingItem]) {
    if items.is_empty() {
        println!("Your list is empty.");
        return;
    }

    println!("\nShopping list:");
    println!("{}", "=".repeat(60));
    for (i, item) in items.iter().enumerate() {
        let mut extras = Vec::new();
        if item.brand != DEFAULT_BRAND {
            extras.push(format!("brand: {}", item.brand));
        }
        if item.size != DEFAULT_SIZE {
            extras.push(format!("size: {}", item.size));
        }
        let extras = if extras.is_empty() {
            String::new()
        } else {
            format!(" [{}]", extras.join(", "))
        };

        println!(
            "{:3}. {} x{} ({}) ${:.2}{}",
            i + 1,
            item.name,
            item.quantity,
            item.category,
            item.line_total,
            extras
        );
    }
    println!("{}", "=".repeat(60));

    let total: f64 = items.iter().map(|item| item.line_total).sum();
    println!("Total: ${:.2}", total);
}

fn render_event(event: &SessionEvent) {
    match event {
        SessionEvent::Recommendations(suggestions) => {
            if suggestions.is_empty() {
                return;
            }
            println!("\n💡 You might also want:");
            for (i, suggestion) in suggestions.iter().enumerate() {
                println!("{:3}. {}", i + 1, suggestion);
            }
        }
        SessionEvent::Warning(message) => {
            eprintln!("⚠️ {}", message);
        }
    }
}

fn print_usage() {
    println!(
        r#"cartwhisper v{} - Speak your groceries

USAGE:
    cartwhisper <COMMAND> [OPTIONS]

COMMANDS:
    repl                   Interactive session, one spoken command per line
    say <utterance>        Run a single spoken command
    list                   Show the saved shopping list
    search <term>          Search the saved list (no Gemini needed)
    history [limit]        Show recent changes (default: 10)
    recommend              Ask Gemini what you might need
    status                 Show database and config status
    clear                  Empty the list (history is kept)
    version                Show version
    help                   Show this help

EXAMPLES:
    cartwhisper say "add two bottles of milk"
    cartwhisper say "mujhe do kilo chawal chahiye"
    cartwhisper search bread
    cartwhisper repl

CONFIG:
    Set GEMINI_API_KEY, or put api_key = "..." in ~/.cartwhisper/cartwhisper.toml.
"#,
        env!("CARGO_PKG_VERSION")
    );
}
