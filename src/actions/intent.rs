//! Keyword heuristics deciding which API a message is asking about.
//!
//! Plain substring tests on the lower-cased text, checked in the order
//! weather, crypto, news. No tokenization and no negation handling: "I don't
//! care about the weather, what is it" still matches weather.

use lazy_static::lazy_static;
use regex::Regex;

const WEATHER_TRIGGERS: &[&str] = &["what", "how", "get", "check", "temperature", "forecast"];
const CRYPTO_SUBJECTS: &[&str] = &["bitcoin", "crypto", "btc"];
const CRYPTO_TRIGGERS: &[&str] = &["price", "value", "cost", "worth"];
const NEWS_TRIGGERS: &[&str] = &["latest", "recent", "today", "current"];

pub const DEFAULT_CITY: &str = "London";

lazy_static! {
    static ref CITY_PATTERN: Regex =
        Regex::new(r"weather (?:in |for |at )?([a-zA-Z\s]+)").expect("city pattern is valid");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Weather,
    Crypto,
    News,
    None,
}

impl Intent {
    /// Strict match used to decide whether the action handles a message at all:
    /// a subject keyword plus one of its trigger words.
    pub fn detect(text: &str) -> Self {
        let text = text.to_lowercase();

        if text.contains("weather") && contains_any(&text, WEATHER_TRIGGERS) {
            Intent::Weather
        } else if contains_any(&text, CRYPTO_SUBJECTS) && contains_any(&text, CRYPTO_TRIGGERS) {
            Intent::Crypto
        } else if text.contains("news") && contains_any(&text, NEWS_TRIGGERS) {
            Intent::News
        } else {
            Intent::None
        }
    }

    /// Looser narrowing used once the handler runs: the subject keyword alone decides.
    pub fn route(text: &str) -> Self {
        let text = text.to_lowercase();

        if text.contains("weather") {
            Intent::Weather
        } else if contains_any(&text, CRYPTO_SUBJECTS) {
            Intent::Crypto
        } else if text.contains("news") {
            Intent::News
        } else {
            Intent::None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Weather => "weather",
            Intent::Crypto => "crypto",
            Intent::News => "news",
            Intent::None => "none",
        }
    }
}

/// Pulls the location following "weather [in|for|at]", or `London` when absent.
pub fn extract_city(text: &str) -> String {
    let text = text.to_lowercase();
    CITY_PATTERN
        .captures(&text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|city| !city.is_empty())
        .unwrap_or_else(|| DEFAULT_CITY.to_string())
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}
