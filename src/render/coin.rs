use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::{escape_html, HostPage};

/// Per-coin analysis document, `data/{coin}.json` next to the coin list.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct CoinDetail {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub market: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub analyses: Vec<Analysis>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Analysis {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl CoinDetail {
    pub fn latest(&self) -> Option<&Analysis> {
        self.analyses.first()
    }

    pub fn history(&self) -> &[Analysis] {
        self.analyses.get(1..).unwrap_or(&[])
    }

    pub fn page_title(&self) -> String {
        format!("{} Wave Analysis", self.name)
    }

    pub fn subtitle(&self) -> String {
        [self.symbol.to_uppercase(), self.market.clone()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .join(" \u{2022} ")
    }
}

/// Coin ids end up in a file name, so only `[A-Za-z0-9_-]` is accepted.
pub fn validate_coin_id(id: &str) -> Result<(), String> {
    let id = id.trim();
    if id.is_empty() {
        return Err("coin id is empty".to_string());
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(format!("invalid coin id '{}'", id));
    }
    Ok(())
}

pub fn render_header(detail: &CoinDetail) -> String {
    let logo = detail
        .logo
        .as_deref()
        .map(|src| {
            format!(
                r#"<img id="coin-logo" class="coin-logo" src="{}" alt="{} logo" />"#,
                escape_html(src),
                escape_html(&detail.name)
            )
        })
        .unwrap_or_default();
    format!(
        r#"<header class="coin-header">
  {logo}
  <h1 id="coin-title">{name}</h1>
  <p id="coin-sub" class="muted">{sub}</p>
</header>"#,
        logo = logo,
        name = escape_html(&detail.name),
        sub = escape_html(&detail.subtitle()),
    )
}

pub fn render_latest(detail: &CoinDetail, empty_message: &str) -> String {
    let Some(latest) = detail.latest() else {
        return format!(
            r#"<p class="muted empty-state">{}</p>"#,
            escape_html(empty_message)
        );
    };
    let image = latest
        .image
        .as_deref()
        .map(|src| format!(r#"<img src="{}" class="viewable-img" />"#, escape_html(src)))
        .unwrap_or_default();
    format!(
        r#"<div id="analysis-content">
  <h3>{title}</h3>
  <p class="muted">{date}</p>
  <p>{text}</p>
  {image}
</div>"#,
        title = escape_html(&latest.title),
        date = escape_html(&latest.date),
        text = escape_html(&latest.text),
        image = image,
    )
}

pub fn render_history(detail: &CoinDetail) -> String {
    detail
        .history()
        .iter()
        .map(|a| {
            format!(
                r#"<div class="timeline-item">
  <h4>{}</h4>
  <p class="muted">{}</p>
</div>"#,
                escape_html(&a.title),
                escape_html(&a.date)
            )
        })
        .join("\n")
}

/// Fills `title`, `header`, `analysis` and `history`. Slots the page does
/// not define are skipped.
pub fn render_coin_page(detail: &CoinDetail, page: &mut HostPage, empty_message: &str) {
    page.fill("title", escape_html(&detail.page_title()));
    page.fill("header", render_header(detail));
    page.fill("analysis", render_latest(detail, empty_message));
    page.fill("history", render_history(detail));
}
