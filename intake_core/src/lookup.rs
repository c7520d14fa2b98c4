//! External lookup collaborators: weather and food data.
//!
//! The core consumes two narrow contracts: a current-temperature lookup
//! used at profile setup and at each daily reset, and a food search used to
//! resolve a calories-per-100g figure. The HTTP clients here implement
//! those contracts against OpenWeatherMap and Open Food Facts with bounded
//! request timeouts; response parsing and ranking are separated from the
//! transport so they can be tested without a server.

use crate::{Error, Result};
use serde::Deserialize;
use std::time::Duration;

/// Current-temperature provider keyed by city name
pub trait TemperatureLookup: Send + Sync {
    /// Current temperature for the city, in °C
    fn current_temperature(&self, city: &str) -> Result<f64>;
}

/// Food database search
pub trait FoodLookup: Send + Sync {
    /// Matching products, best match first
    fn search_food(&self, query: &str) -> Result<Vec<FoodHit>>;
}

/// One food search result
#[derive(Clone, Debug, PartialEq)]
pub struct FoodHit {
    pub name: String,
    pub kcal_per_100g: f64,
}

/// Fixed-value temperature source for offline use and tests
#[derive(Clone, Copy, Debug)]
pub struct FixedTemperature(pub f64);

impl TemperatureLookup for FixedTemperature {
    fn current_temperature(&self, _city: &str) -> Result<f64> {
        Ok(self.0)
    }
}

// ============================================================================
// OpenWeatherMap client
// ============================================================================

pub struct OpenWeatherClient {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Lookup(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }
}

impl TemperatureLookup for OpenWeatherClient {
    fn current_temperature(&self, city: &str) -> Result<f64> {
        let url = format!("{}/data/2.5/weather", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .map_err(|e| Error::Lookup(format!("weather request failed: {e}")))?;

        match response.status().as_u16() {
            200 => {}
            404 => return Err(Error::Lookup(format!("city '{city}' not found"))),
            401 => return Err(Error::Lookup("invalid weather API key".into())),
            status => {
                return Err(Error::Lookup(format!(
                    "weather service answered HTTP {status}"
                )))
            }
        }

        let body = response
            .text()
            .map_err(|e| Error::Lookup(format!("weather response unreadable: {e}")))?;
        parse_weather_response(&body)
    }
}

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    main: WeatherMain,
}

#[derive(Debug, Deserialize)]
struct WeatherMain {
    temp: f64,
}

/// Extract the metric temperature from an OpenWeatherMap current-weather body
pub fn parse_weather_response(body: &str) -> Result<f64> {
    let parsed: WeatherResponse = serde_json::from_str(body)
        .map_err(|e| Error::Lookup(format!("unexpected weather response shape: {e}")))?;
    Ok(parsed.main.temp)
}

// ============================================================================
// Open Food Facts client
// ============================================================================

pub struct OpenFoodFactsClient {
    http: reqwest::blocking::Client,
    base_url: String,
    page_size: u32,
}

impl OpenFoodFactsClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration, page_size: u32) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Lookup(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            page_size,
        })
    }
}

impl FoodLookup for OpenFoodFactsClient {
    fn search_food(&self, query: &str) -> Result<Vec<FoodHit>> {
        let url = format!("{}/cgi/search.pl", self.base_url);
        let page_size = self.page_size.to_string();
        let response = self
            .http
            .get(&url)
            .query(&[
                ("action", "process"),
                ("search_terms", query),
                ("json", "true"),
                ("fields", "product_name,nutriments"),
                ("page_size", page_size.as_str()),
            ])
            .send()
            .map_err(|e| Error::Lookup(format!("food search request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::Lookup(format!(
                "food service answered HTTP {}",
                response.status().as_u16()
            )));
        }

        let body = response
            .text()
            .map_err(|e| Error::Lookup(format!("food response unreadable: {e}")))?;
        parse_food_response(&body, query)
    }
}

#[derive(Debug, Deserialize)]
struct FoodSearchResponse {
    #[serde(default)]
    products: Vec<FoodProduct>,
}

#[derive(Debug, Deserialize)]
struct FoodProduct {
    #[serde(default)]
    product_name: Option<String>,
    #[serde(default)]
    nutriments: Option<Nutriments>,
}

#[derive(Debug, Deserialize)]
struct Nutriments {
    #[serde(rename = "energy-kcal_100g")]
    energy_kcal_100g: Option<f64>,
}

/// Maximum hits surfaced to the caller per search
const MAX_HITS: usize = 5;

/// Parse a search body, drop products without calorie data, rank the rest
/// by similarity to the query. An empty outcome is a lookup failure: the
/// service answered but had no usable match.
pub fn parse_food_response(body: &str, query: &str) -> Result<Vec<FoodHit>> {
    let parsed: FoodSearchResponse = serde_json::from_str(body)
        .map_err(|e| Error::Lookup(format!("unexpected food response shape: {e}")))?;

    let hits: Vec<FoodHit> = parsed
        .products
        .into_iter()
        .filter_map(|p| {
            let kcal = p.nutriments.as_ref()?.energy_kcal_100g?;
            let name = p.product_name.filter(|n| !n.trim().is_empty())?;
            Some(FoodHit {
                name,
                kcal_per_100g: kcal,
            })
        })
        .collect();

    if hits.is_empty() {
        return Err(Error::Lookup(format!(
            "no products with calorie data matched '{query}'"
        )));
    }

    Ok(rank_hits(hits, query))
}

/// Order hits best-match-first and cap the list
pub fn rank_hits(mut hits: Vec<FoodHit>, query: &str) -> Vec<FoodHit> {
    hits.sort_by(|a, b| {
        similarity(query, &b.name)
            .partial_cmp(&similarity(query, &a.name))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    hits.truncate(MAX_HITS);
    hits
}

/// Sørensen-Dice coefficient over lowercase character bigrams
fn similarity(a: &str, b: &str) -> f64 {
    let bigrams = |s: &str| -> Vec<(char, char)> {
        let chars: Vec<char> = s.to_lowercase().chars().collect();
        chars.windows(2).map(|w| (w[0], w[1])).collect()
    };

    let a_grams = bigrams(a);
    let b_grams = bigrams(b);
    if a_grams.is_empty() && b_grams.is_empty() {
        return 1.0;
    }
    if a_grams.is_empty() || b_grams.is_empty() {
        return 0.0;
    }

    let mut b_pool = b_grams.clone();
    let mut overlap = 0usize;
    for gram in &a_grams {
        if let Some(pos) = b_pool.iter().position(|g| g == gram) {
            b_pool.swap_remove(pos);
            overlap += 1;
        }
    }

    (2.0 * overlap as f64) / (a_grams.len() + b_grams.len()) as f64
}
