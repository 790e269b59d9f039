pub mod report;

use serde::Serialize;

use crate::calculator::Calculation;
use crate::catalogue::{CatalogueRecord, LoadState, QueryState, Session};
use crate::render::coin::CoinDetail;
use crate::utils::{format_short, EM_DASH};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Html => "html",
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

#[derive(Clone, Debug, Serialize)]
pub struct ListingReport<'a> {
    pub catalogue: &'static str,
    pub source: String,
    pub query: QueryState,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub categories: Vec<&'a str>,
    pub records: Vec<&'a CatalogueRecord>,
}

pub fn build_listing(session: &Session) -> ListingReport<'_> {
    let view = session.view();
    let (status, error) = match &view.load {
        LoadState::Loading => ("loading", None),
        LoadState::Ready => ("ready", None),
        LoadState::Failed(message) => ("failed", Some(message.clone())),
    };
    ListingReport {
        catalogue: session.profile().kind.label(),
        source: session.profile().source.clone(),
        query: view.state.clone(),
        page: view.page.page,
        total_pages: view.page.total_pages,
        total_items: view.page.total_items,
        page_size: view.page_size,
        status,
        error,
        categories: session.catalogue().categories(),
        records: view.page.items,
    }
}

pub fn render_text(report: &ListingReport<'_>) -> Vec<u8> {
    let mut out = String::new();
    if let Some(err) = &report.error {
        out.push_str(&format!("failed to load {}: {}\n", report.catalogue, err));
        return out.into_bytes();
    }
    for r in &report.records {
        let symbol = r.symbol.as_deref().unwrap_or(EM_DASH);
        let category = r.primary_category().unwrap_or(EM_DASH);
        let cap = match r.market_cap {
            Some(_) => format_short(r.market_cap),
            None => EM_DASH.to_string(),
        };
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\n",
            r.name, symbol, category, cap, r.link
        ));
    }
    out.push_str(&format!(
        "page {}/{} ({} {})\n",
        report.page, report.total_pages, report.total_items, report.catalogue
    ));
    out.into_bytes()
}

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Vec<u8> {
    let mut out = serde_json::to_vec_pretty(value).unwrap_or_else(|_| b"{}".to_vec());
    out.push(b'\n');
    out
}

pub fn render_listing(
    session: &Session,
    format: OutputFormat,
    template: Option<&str>,
) -> Vec<u8> {
    match format {
        OutputFormat::Text => render_text(&build_listing(session)),
        OutputFormat::Json => render_json(&build_listing(session)),
        OutputFormat::Html => report::render_listing_html(session, template).into_bytes(),
    }
}

pub fn render_coin(detail: &CoinDetail, format: OutputFormat, template: Option<&str>) -> Vec<u8> {
    match format {
        OutputFormat::Json => render_json(detail),
        OutputFormat::Html => report::render_coin_html(detail, template).into_bytes(),
        OutputFormat::Text => {
            let mut out = format!("{}\n{}\n", detail.name, detail.subtitle());
            match detail.latest() {
                Some(latest) => {
                    out.push_str(&format!("\nlatest: {} ({})\n{}\n", latest.title, latest.date, latest.text));
                }
                None => out.push_str("\nno analyses\n"),
            }
            for a in detail.history() {
                out.push_str(&format!("  {}\t{}\n", a.date, a.title));
            }
            out.into_bytes()
        }
    }
}

pub fn render_calculation(calc: &Calculation, format: OutputFormat) -> Vec<u8> {
    match format {
        OutputFormat::Json => render_json(calc),
        OutputFormat::Html => calc.render_html().into_bytes(),
        OutputFormat::Text => {
            let rows = calc.rows();
            let width = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
            let mut out = String::new();
            for (label, value) in rows {
                out.push_str(&format!("{:<width$}  {}\n", label, value, width = width));
            }
            out.push('\n');
            for line in calc.notes() {
                out.push_str(&line);
                out.push('\n');
            }
            out.into_bytes()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_parse_and_infer() {
        assert_eq!(OutputFormat::parse("HTM"), Some(OutputFormat::Html));
        assert_eq!(OutputFormat::parse("xml"), None);
        assert_eq!(infer_format_from_path("out/page.json"), Some(OutputFormat::Json));
        assert_eq!(infer_format_from_path("notes"), None);
    }
}
