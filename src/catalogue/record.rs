use chrono::NaiveDate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::profile::{CatalogueProfile, SearchField};

/// One catalogue entry as it appears in the JSON document. Every field is
/// optional and values of the wrong type are read as missing.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub slug: Option<String>,
    #[serde(default, alias = "title", deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub symbol: Option<String>,
    #[serde(
        default,
        alias = "excerpt",
        alias = "summary",
        deserialize_with = "lenient::string"
    )]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub coin: Option<String>,
    #[serde(default, alias = "coinKey", deserialize_with = "lenient::string")]
    pub coin_key: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub timeframe: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub market: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub categories: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub logo: Option<String>,
    #[serde(default, alias = "thumb", deserialize_with = "lenient::string")]
    pub image: Option<String>,
    #[serde(
        default,
        alias = "url",
        alias = "link",
        deserialize_with = "lenient::string"
    )]
    pub page: Option<String>,
    #[serde(default, alias = "marketCap", deserialize_with = "lenient::number")]
    pub market_cap: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub priority: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub updated: Option<String>,
    #[serde(default, deserialize_with = "lenient::tokenomics")]
    pub tokenomics: Option<Tokenomics>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Tokenomics {
    pub circulating: Option<f64>,
    pub total: Option<f64>,
}

impl Tokenomics {
    pub fn percent(&self) -> Option<u32> {
        match (self.circulating, self.total) {
            (Some(c), Some(t)) if c != 0.0 && t != 0.0 => {
                Some(((c / t) * 100.0).round().clamp(0.0, 100.0) as u32)
            }
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CatalogueRecord {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub symbol: Option<String>,
    pub description: String,
    pub author: Option<String>,
    pub coin: Option<String>,
    pub timeframe: Option<String>,
    pub market: Option<String>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub status: Option<String>,
    pub media: String,
    pub thumbnail: Option<String>,
    pub link: String,
    pub market_cap: Option<f64>,
    pub priority: Option<f64>,
    pub tokenomics: Tokenomics,
    pub date: Option<String>,
    #[serde(skip)]
    pub published: Option<NaiveDate>,
    pub updated: Option<String>,
    pub position: usize,
    #[serde(skip)]
    searchable_text: String,
}

impl CatalogueRecord {
    pub fn searchable_text(&self) -> &str {
        &self.searchable_text
    }

    pub fn primary_category(&self) -> Option<&str> {
        self.categories.first().map(String::as_str)
    }
}

pub fn slugify(name: &str) -> String {
    name.to_lowercase().split_whitespace().join("-")
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(d) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(d);
    }
    chrono::DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.date_naive())
}

pub fn normalize(raw: RawRecord, position: usize, profile: &CatalogueProfile) -> CatalogueRecord {
    let name = raw.name.unwrap_or_default();
    let slug = raw.slug.unwrap_or_else(|| slugify(&name));
    let id = raw.id.unwrap_or_else(|| slug.clone());

    let categories = match (raw.categories, raw.category) {
        (Some(list), _) => list,
        (None, Some(single)) => vec![single],
        (None, None) => Vec::new(),
    };
    let tags = raw.tags.unwrap_or_default();

    let media = raw
        .logo
        .or_else(|| {
            raw.coin_key
                .as_ref()
                .map(|key| format!("/assets/coins/{key}.svg"))
        })
        .unwrap_or_else(|| profile.placeholder_media.clone());
    let link = raw
        .page
        .unwrap_or_else(|| profile.expand_link(&id, &slug));
    let published = raw.date.as_deref().and_then(parse_date);

    let mut record = CatalogueRecord {
        id,
        slug,
        name,
        symbol: raw.symbol,
        description: raw.description.unwrap_or_default(),
        author: raw.author,
        coin: raw.coin,
        timeframe: raw.timeframe,
        market: raw.market,
        categories,
        tags,
        status: raw.status,
        media,
        thumbnail: raw.image,
        link,
        market_cap: raw.market_cap,
        priority: raw.priority,
        tokenomics: raw.tokenomics.unwrap_or_default(),
        date: raw.date,
        published,
        updated: raw.updated,
        position,
        searchable_text: String::new(),
    };
    record.searchable_text = build_searchable_text(&record, &profile.search_fields);
    record
}

fn build_searchable_text(record: &CatalogueRecord, fields: &[SearchField]) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for field in fields {
        match field {
            SearchField::Name => parts.push(&record.name),
            SearchField::Symbol => parts.extend(record.symbol.as_deref()),
            SearchField::Description => parts.push(&record.description),
            SearchField::Author => parts.extend(record.author.as_deref()),
            SearchField::Coin => parts.extend(record.coin.as_deref()),
            SearchField::Market => parts.extend(record.market.as_deref()),
            SearchField::Categories => parts.extend(record.categories.iter().map(String::as_str)),
            SearchField::Tags => parts.extend(record.tags.iter().map(String::as_str)),
        }
    }
    parts.join(" ").to_lowercase()
}

mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::Tokenomics;

    fn value_to_string(value: Value) -> Option<String> {
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn value_to_number(value: &Value) -> Option<f64> {
        let n = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        n.filter(|n| n.is_finite())
    }

    pub(super) fn string<'de, D>(d: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Value>::deserialize(d)?.and_then(value_to_string))
    }

    pub(super) fn number<'de, D>(d: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Value>::deserialize(d)?
            .as_ref()
            .and_then(value_to_number))
    }

    pub(super) fn string_list<'de, D>(d: D) -> Result<Option<Vec<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::Array(items)) => {
                Some(items.into_iter().filter_map(value_to_string).collect())
            }
            _ => None,
        })
    }

    pub(super) fn tokenomics<'de, D>(d: D) -> Result<Option<Tokenomics>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::Object(map)) => Some(Tokenomics {
                circulating: map.get("circulating").and_then(value_to_number),
                total: map.get("total").and_then(value_to_number),
            }),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> RawRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn slug_collapses_whitespace() {
        assert_eq!(slugify("Render  Network"), "render-network");
        assert_eq!(slugify(" Ethereum "), "ethereum");
    }

    #[test]
    fn wrong_types_read_as_missing() {
        let r = raw(r#"{"name": "X", "categories": "defi", "marketCap": "n/a", "tags": [1, "l2", null]}"#);
        assert_eq!(r.categories, None);
        assert_eq!(r.market_cap, None);
        assert_eq!(r.tags, Some(vec!["1".to_string(), "l2".to_string()]));
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let r = raw(r#"{"marketCap": "1200.5", "tokenomics": {"circulating": 10, "total": "40"}}"#);
        assert_eq!(r.market_cap, Some(1200.5));
        let t = r.tokenomics.unwrap();
        assert_eq!(t.percent(), Some(25));
    }

    #[test]
    fn single_category_is_promoted() {
        let profile = CatalogueProfile::posts();
        let record = normalize(raw(r#"{"title": "BTC wave 3", "category": "Bitcoin"}"#), 0, &profile);
        assert_eq!(record.categories, vec!["Bitcoin".to_string()]);
        assert_eq!(record.name, "BTC wave 3");
    }

    #[test]
    fn post_logo_comes_from_coin_key() {
        let profile = CatalogueProfile::posts();
        let record = normalize(raw(r#"{"title": "t", "coinKey": "eth"}"#), 0, &profile);
        assert_eq!(record.media, "/assets/coins/eth.svg");
    }

    #[test]
    fn dates_parse_in_both_shapes() {
        assert!(parse_date("2025-03-01").is_some());
        assert!(parse_date("2025-03-01T10:00:00Z").is_some());
        assert!(parse_date("March 1").is_none());
    }
}
