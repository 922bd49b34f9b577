use colored::Colorize;
use prettytable::{format, Cell, Row, Table};
use serde_json::Value;

pub const WEATHER_UNAVAILABLE: &str = "Weather data is not available.";
pub const CRYPTO_UNAVAILABLE: &str = "Cryptocurrency data is not available.";
pub const NEWS_UNAVAILABLE: &str = "No news articles available.";

const MAX_NEWS_ARTICLES: usize = 3;

/// Turns API payloads into chat-ready text.
///
/// The `format_*_data` methods never fail: a payload missing the fields they
/// need yields a fixed "not available" line instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayFormatter;

impl DisplayFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Expects an OpenWeatherMap `/weather` response (metric units).
    pub fn format_weather_data(&self, data: &Value) -> String {
        let Some(main) = data.get("main").filter(|m| m.is_object()) else {
            return WEATHER_UNAVAILABLE.to_string();
        };
        let Some(temp) = main.get("temp").and_then(Value::as_f64) else {
            return WEATHER_UNAVAILABLE.to_string();
        };
        let feels_like = main.get("feels_like").and_then(Value::as_f64).unwrap_or(temp);
        let humidity = main
            .get("humidity")
            .and_then(Value::as_f64)
            .map(format_plain_number)
            .unwrap_or_else(|| "?".to_string());
        let description = data
            .get("weather")
            .and_then(|w| w.get(0))
            .and_then(|w| w.get("description"))
            .and_then(Value::as_str)
            .filter(|d| !d.is_empty())
            .unwrap_or("unknown");
        let location = data
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("unknown location");

        format!(
            "🌤️ **Weather in {}**\n🌡️ Temperature: {}°C (feels like {}°C)\n💧 Humidity: {}%\n☁️ Conditions: {}",
            location,
            round_half_up(temp),
            round_half_up(feels_like),
            humidity,
            capitalize_first(description)
        )
    }

    /// Expects a CoinGecko `/coins/markets` array; only the first coin is shown.
    pub fn format_crypto_data(&self, data: &Value) -> String {
        let Some(coin) = data.as_array().and_then(|coins| coins.first()) else {
            return CRYPTO_UNAVAILABLE.to_string();
        };
        let (Some(price), Some(change)) = (
            coin.get("current_price").and_then(Value::as_f64),
            coin.get("price_change_percentage_24h").and_then(Value::as_f64),
        ) else {
            return CRYPTO_UNAVAILABLE.to_string();
        };

        let name = coin.get("name").and_then(Value::as_str).unwrap_or("Unknown");
        let symbol = coin
            .get("symbol")
            .and_then(Value::as_str)
            .unwrap_or("?")
            .to_uppercase();
        let change = format!("{:.2}", change);
        let trend = if change.parse::<f64>().map(|c| c >= 0.0).unwrap_or(true) {
            "📈"
        } else {
            "📉"
        };
        let mut text = format!(
            "₿ **{} ({})**\n💰 Price: ${:.2}\n{} 24h Change: {}%",
            name, symbol, price, trend, change
        );
        if let Some(market_cap) = coin.get("market_cap").and_then(Value::as_f64) {
            text.push_str(&format!("\n📊 Market Cap: ${}", group_thousands(market_cap)));
        }
        text
    }

    /// Expects `{ "articles": [...] }`; lists the first three.
    pub fn format_news_data(&self, data: &Value) -> String {
        let Some(articles) = data.get("articles").and_then(Value::as_array) else {
            return NEWS_UNAVAILABLE.to_string();
        };

        let items: Vec<String> = articles
            .iter()
            .take(MAX_NEWS_ARTICLES)
            .enumerate()
            .map(|(index, article)| {
                let title = article
                    .get("title")
                    .and_then(Value::as_str)
                    .unwrap_or("Untitled");
                let description = article
                    .get("description")
                    .and_then(Value::as_str)
                    .filter(|d| !d.is_empty())
                    .unwrap_or("No description available");
                let source = article
                    .get("source")
                    .and_then(|s| s.get("name"))
                    .and_then(Value::as_str)
                    .unwrap_or("Unknown");
                format!(
                    "**{}. {}**\n{}\n🔗 Source: {}\n",
                    index + 1,
                    title,
                    description,
                    source
                )
            })
            .collect();

        format!("📰 **Latest News**\n\n{}", items.join("\n"))
    }

    pub fn format_json_data(&self, data: &Value, title: &str) -> String {
        match serde_json::to_string_pretty(data) {
            Ok(pretty) => format!("📋 **{}**\n```json\n{}\n```", title, pretty),
            Err(e) => format!("❌ Could not format data: {}", e),
        }
    }

    pub fn format_header(&self, text: &str) -> String {
        format!("\n=== {} ===", text.bright_white().bold())
    }

    /// Interim "working on it" lines, dimmed so the final reply stands out.
    pub fn format_interim(&self, text: &str) -> String {
        text.dimmed().to_string()
    }

    pub fn format_table(&self, headers: &[&str], rows: &[Vec<String>]) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);

        table.add_row(Row::new(
            headers.iter().map(|h| Cell::new(h).style_spec("b")).collect(),
        ));

        for row in rows {
            table.add_row(Row::new(row.iter().map(|cell| Cell::new(cell)).collect()));
        }

        table.to_string()
    }
}

// Halves round toward positive infinity, so -0.5 becomes 0 rather than -1.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

fn format_plain_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `1234567.5` -> `1,234,567.5`; at most three fractional digits.
fn group_thousands(value: f64) -> String {
    let rendered = format!("{:.3}", value.abs());
    let (int_part, frac_part) = rendered.split_once('.').unwrap_or((rendered.as_str(), ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let frac = frac_part.trim_end_matches('0');
    let sign = if value < 0.0 && (grouped != "0" || !frac.is_empty()) {
        "-"
    } else {
        ""
    };
    if frac.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac)
    }
}
