use itertools::Itertools;

use super::{css_class, escape_html, safe_href};
use crate::catalogue::{CatalogueKind, CatalogueRecord};
use crate::utils::{format_date, format_short, EM_DASH};

/// Maps one record to the HTML of its card. Implementations escape every
/// field they interpolate.
pub trait CardTemplate {
    fn render_card(&self, record: &CatalogueRecord) -> String;
}

pub struct ProjectCard;
pub struct PostCard;
pub struct CoinCard;
pub struct WaveCard;

pub fn card_template(kind: CatalogueKind) -> Box<dyn CardTemplate> {
    match kind {
        CatalogueKind::Projects => Box::new(ProjectCard),
        CatalogueKind::Posts => Box::new(PostCard),
        CatalogueKind::Coins => Box::new(CoinCard),
        CatalogueKind::Waves => Box::new(WaveCard),
    }
}

pub fn render_grid(
    items: &[&CatalogueRecord],
    template: &dyn CardTemplate,
    empty_message: &str,
) -> String {
    if items.is_empty() {
        return format!(
            r#"<p class="muted empty-state">{}</p>"#,
            escape_html(empty_message)
        );
    }
    items.iter().map(|r| template.render_card(r)).join("\n")
}

pub fn failure_placeholder(message: &str) -> String {
    format!(
        r#"<article class="card load-failed"><p class="muted">{}</p></article>"#,
        escape_html(message)
    )
}

fn or_dash(value: Option<&str>) -> String {
    escape_html(value.unwrap_or(EM_DASH))
}

impl CardTemplate for ProjectCard {
    fn render_card(&self, p: &CatalogueRecord) -> String {
        let link = safe_href(&p.link);
        let name = escape_html(&p.name);
        let symbol = p
            .symbol
            .as_deref()
            .map(|s| format!(r#" <span class="muted">({})</span>"#, escape_html(s)))
            .unwrap_or_default();
        let tags = p
            .categories
            .iter()
            .map(|c| {
                format!(
                    r#"<span class="tag tag-{}">{}</span>"#,
                    css_class(c),
                    escape_html(c)
                )
            })
            .join("");
        let market_cap = match p.market_cap {
            Some(_) => escape_html(&format_short(p.market_cap)),
            None => EM_DASH.to_string(),
        };
        let tokenomics = match p.tokenomics.percent() {
            Some(percent) => format!(
                r#"<div class="tok-row small muted">Circulating / Total: {} / {} ({}%)</div>
        <div class="tok-bar"><div class="tok-fill" style="width:{}%"></div></div>"#,
                format_short(p.tokenomics.circulating),
                format_short(p.tokenomics.total),
                percent,
                percent
            ),
            None => {
                r#"<div class="small muted">Tokenomics: <em>details on project page</em></div>"#
                    .to_string()
            }
        };

        format!(
            r#"<article class="project-card clickable-card" data-category="{category}">
  <div class="card-body">
    <a href="{link}" class="project-link">
      <img src="{logo}" alt="{name} logo" class="coin-logo" />
    </a>
    <h3><a href="{link}">{name}{symbol}</a></h3>
    <p class="muted project-desc">{description}</p>
    <div class="meta-row">
      <div class="muted small">Status: <strong>{status}</strong></div>
      <div class="muted small">Updated: {updated}</div>
      <div class="muted small">Market Cap: {market_cap}</div>
    </div>
    <div class="tags">{tags}</div>
    <div class="tokenomics-preview">
        {tokenomics}
    </div>
  </div>
  <div class="card-footer">
    <a href="{link}" class="btn-small">View Analysis</a>
  </div>
</article>"#,
            category = escape_html(p.primary_category().unwrap_or("")),
            link = link,
            logo = escape_html(&p.media),
            name = name,
            symbol = symbol,
            description = escape_html(&p.description),
            status = or_dash(p.status.as_deref()),
            updated = or_dash(p.updated.as_deref()),
            market_cap = market_cap,
            tags = tags,
            tokenomics = tokenomics,
        )
    }
}

/// Badge class for an analysis status: active, completed, invalidated or
/// neutral.
pub fn status_badge(status: Option<&str>) -> String {
    let status = match status {
        Some(s) if !s.trim().is_empty() => s,
        _ => return String::new(),
    };
    let class = match status.to_lowercase().as_str() {
        "active" => "badge-active",
        "completed" => "badge-completed",
        "invalidated" => "badge-invalid",
        _ => "badge-neutral",
    };
    format!(
        r#"<span class="status-badge {}">{}</span>"#,
        class,
        escape_html(status)
    )
}

impl CardTemplate for PostCard {
    fn render_card(&self, post: &CatalogueRecord) -> String {
        let coin = post.coin.as_deref().unwrap_or("");
        let logo = if post.media.is_empty() {
            String::new()
        } else {
            format!(
                r#"<img src="{}" alt="{} logo" class="coin-logo" loading="lazy" />"#,
                escape_html(&post.media),
                escape_html(coin)
            )
        };
        let thumb = post
            .thumbnail
            .as_deref()
            .map(|src| {
                format!(
                    r#"<img src="{}" alt="{}" class="post-thumb" />"#,
                    escape_html(src),
                    escape_html(&post.name)
                )
            })
            .unwrap_or_default();
        let meta = [post.coin.as_deref(), post.timeframe.as_deref()]
            .into_iter()
            .flatten()
            .map(escape_html)
            .join(" &bull; ");
        let date = post.published.map(format_date).unwrap_or_default();

        format!(
            r#"<article class="card post-card clickable-card">
  <a href="{link}" class="post-link">
    {logo}
    {thumb}
    <div class="post-body">
      <div class="post-meta small muted">{meta} {badge}</div>
      <h3 class="post-title">{title}</h3>
      <p class="post-excerpt muted">{excerpt}</p>
      <div class="post-footer small muted">{date}</div>
    </div>
  </a>
</article>"#,
            link = safe_href(&post.link),
            logo = logo,
            thumb = thumb,
            meta = meta,
            badge = status_badge(post.status.as_deref()),
            title = escape_html(&post.name),
            excerpt = escape_html(&post.description),
            date = escape_html(&date),
        )
    }
}

impl CardTemplate for CoinCard {
    fn render_card(&self, coin: &CatalogueRecord) -> String {
        let background = coin
            .thumbnail
            .as_deref()
            .map(|t| format!(r#" style="--bg-image: url('{}')""#, escape_html(t)))
            .unwrap_or_default();
        let symbol = coin
            .symbol
            .as_deref()
            .map(|s| format!(r#" <span class="muted">({})</span>"#, escape_html(s)))
            .unwrap_or_default();

        format!(
            r#"<article class="card clickable-card analysis-card"{background}>
  <a href="{link}" class="card-link">
    <img class="coin-logo" src="{logo}" alt="{name} logo" />
    <div class="kicker">{market}</div>
    <h3>{name}{symbol}</h3>
    <p>{description}</p>
  </a>
</article>"#,
            background = background,
            link = safe_href(&coin.link),
            logo = escape_html(&coin.media),
            name = escape_html(&coin.name),
            market = escape_html(coin.market.as_deref().unwrap_or("")),
            symbol = symbol,
            description = escape_html(&coin.description),
        )
    }
}

impl CardTemplate for WaveCard {
    fn render_card(&self, post: &CatalogueRecord) -> String {
        let date = match (post.published, post.date.as_deref()) {
            (Some(d), _) => format_date(d),
            (None, Some(raw)) => raw.to_string(),
            (None, None) => String::new(),
        };
        let meta = [Some(date.as_str()), post.author.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .map(|s| format!(r#"<div class="muted">{}</div>"#, escape_html(s)))
            .join("\n    <div class=\"muted\">\u{2022}</div>\n    ");

        format!(
            r#"<article class="card wave-card">
  <div class="kicker">{category}</div>
  <h3>{title}</h3>
  <p>{excerpt}</p>
  <div class="meta">
    {meta}
  </div>
  <a href="{link}" class="pill read-more">Read More &rarr;</a>
</article>"#,
            category = escape_html(post.primary_category().unwrap_or("")),
            title = escape_html(&post.name),
            excerpt = escape_html(&post.description),
            meta = meta,
            link = safe_href(&post.link),
        )
    }
}
