use async_trait::async_trait;
use hello_api::{
    redact_url, ApiConfig, ApiPlugin, Content, DisplayFormatter, FetchOptions, HandlerCallback,
    InMemoryHistory, Memory,
};
use std::error::Error;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::{debug, info};

const ROOM_ID: &str = "console";

/// Prints replies and records them in the room history, as the host would.
struct ConsoleCallback {
    history: Arc<InMemoryHistory>,
    display: DisplayFormatter,
}

#[async_trait]
impl HandlerCallback for ConsoleCallback {
    async fn send(&self, content: Content) -> hello_api::Result<()> {
        // "fetching..." notices precede the actual reply
        if content.text.ends_with("...") {
            println!("{}", self.display.format_interim(&content.text));
        } else {
            println!("{}", content.text);
        }
        self.history.record(Memory::new(ROOM_ID, content));
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting HelloBot API console");

    let config = ApiConfig::from_env()?;
    let history = Arc::new(InMemoryHistory::new());
    let plugin = ApiPlugin::new(config, history.clone())?;
    let display = DisplayFormatter::new();
    let callback = ConsoleCallback {
        history: history.clone(),
        display,
    };

    println!("=== HelloBot API console ===");
    println!("Ask about the weather, Bitcoin prices, or the latest news. For example:");
    for action in plugin.actions() {
        for exchange in action.examples() {
            if let Some(user) = exchange.first() {
                println!("  \"{}\"", user.content.text);
            }
        }
    }
    println!("Commands:");
    println!("  apis    - Show the APIs this bot can reach");
    println!("  context - Show what the agent knows about recent fetches");
    println!("  cache   - Show cache usage");
    println!("  raw <url> - Fetch a JSON endpoint and print the payload");
    println!("  exit    - Exit the program");

    let mut input = String::new();
    loop {
        input.clear();
        print!("> ");
        io::stdout().flush()?;
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }

        let line = input.trim();
        match line {
            "" => continue,
            "exit" => {
                debug!("Received exit command");
                break;
            }
            "apis" => {
                let service = plugin.service();
                let config = service.config();
                let key_state = |key: &Option<String>, missing: &str| match key {
                    Some(_) => "configured".to_string(),
                    None => missing.to_string(),
                };
                let rows = vec![
                    vec![
                        "weather".to_string(),
                        config.weather_base_url.clone(),
                        key_state(&config.weather_api_key, "not set"),
                    ],
                    vec![
                        "crypto".to_string(),
                        config.crypto_base_url.clone(),
                        "not required".to_string(),
                    ],
                    vec![
                        "news".to_string(),
                        config.news_base_url.clone(),
                        key_state(&config.news_api_key, "placeholder data"),
                    ],
                ];
                println!("{}", display.format_header("Available APIs"));
                println!("{}", display.format_table(&["API", "Endpoint", "Key"], &rows));
            }
            "context" => {
                let query = Memory::user_text(ROOM_ID, "");
                for provider in plugin.providers() {
                    let result = provider.get(&query).await;
                    println!("{}", display.format_header(provider.name()));
                    println!("{}", result.text);
                    println!("{}", serde_json::to_string_pretty(&result.values)?);
                }
            }
            "cache" => {
                let swept = plugin.service().sweep_cache();
                println!(
                    "Cached responses: {} ({} expired entries removed)",
                    plugin.service().cached_entries(),
                    swept
                );
            }
            raw if raw.starts_with("raw ") => {
                let url = raw["raw ".len()..].trim();
                match plugin.service().fetch_api(url, &FetchOptions::new()).await {
                    Ok(data) => println!("{}", display.format_json_data(&data, &redact_url(url))),
                    Err(e) => println!("❌ {}", e),
                }
            }
            text => {
                let message = Memory::user_text(ROOM_ID, text);
                history.record(message.clone());

                let mut handled = false;
                for action in plugin.actions() {
                    if action.validate(&message).await {
                        debug!("Action {} accepted message", action.name());
                        action.handle(&message, &callback).await;
                        handled = true;
                        break;
                    }
                }
                if !handled {
                    println!("(no action matched) Try asking about weather, Bitcoin prices, or latest news.");
                }
            }
        }
    }

    plugin.stop();
    info!("Shutting down");
    Ok(())
}
