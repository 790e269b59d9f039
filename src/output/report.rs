use crate::catalogue::{LoadState, Session};
use crate::render::coin::{render_coin_page, CoinDetail};
use crate::render::{
    card_template, controls, escape_html, failure_placeholder, render_controls, render_grid,
    HostPage,
};

fn json_for_script_tag(value: &str) -> String {
    value.replace("</", "<\\/")
}

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title><!-- slot:title --></title>
  <link href="https://fonts.googleapis.com/css2?family=Montserrat:wght@700;800&amp;family=Inter:wght@400;500;600;700&amp;display=swap" rel="stylesheet"/>
  <style>
    body { font-family: 'Inter', sans-serif; background: #0f172a; color: #e2e8f0; margin: 0; }
    h1, h2, h3 { font-family: 'Montserrat', sans-serif; font-weight: 800; letter-spacing: -0.025em; }
    main { max-width: 1440px; margin: 0 auto; padding: 40px 32px; }
    .muted { color: #94a3b8; }
    .small { font-size: 0.8rem; }
    .grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(280px, 1fr)); gap: 20px; }
    .card, .project-card { background: #111827; border: 1px solid #1e293b; border-radius: 16px; padding: 20px; }
    .coin-logo { width: 40px; height: 40px; }
    .tag { display: inline-block; padding: 2px 8px; margin: 2px; border-radius: 999px; background: #1e293b; font-size: 0.75rem; }
    .tok-bar { height: 6px; background: #1e293b; border-radius: 3px; }
    .tok-fill { height: 6px; background: #135bec; border-radius: 3px; }
    .status-badge { padding: 2px 8px; border-radius: 999px; font-size: 0.7rem; }
    .badge-active { background: #14532d; } .badge-completed { background: #1e3a8a; } .badge-invalid { background: #7f1d1d; }
    .pagination { display: flex; gap: 8px; margin-top: 24px; }
    .page-btn { min-width: 36px; height: 36px; border-radius: 8px; border: 1px solid #334155; background: transparent; color: inherit; }
    .page-btn.active { background: #135bec; color: #fff; }
    .timeline-item { border-left: 2px solid #334155; padding-left: 12px; margin-bottom: 12px; }
  </style>
</head>
"#;

pub fn default_listing_template() -> String {
    format!(
        r#"{head}<body>
  <script type="application/json" id="records-data"><!-- slot:data --></script>
  <main>
    <h1><!-- slot:heading --></h1>
    <p class="muted"><!-- slot:summary --></p>
    <div id="grid" class="grid"><!-- slot:grid --></div>
    <!-- slot:pagination -->
  </main>
</body>
</html>
"#,
        head = PAGE_HEAD
    )
}

pub fn default_coin_template() -> String {
    format!(
        r#"{head}<body>
  <main>
    <!-- slot:header -->
    <section class="card"><h2>Latest analysis</h2><!-- slot:analysis --></section>
    <section><h2>History</h2><div id="analysis-list"><!-- slot:history --></div></section>
  </main>
</body>
</html>
"#,
        head = PAGE_HEAD
    )
}

fn heading(kind: &str) -> String {
    let mut chars = kind.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn fill_listing(page: &mut HostPage, session: &Session) {
    let profile = session.profile();
    let view = session.view();
    let title = heading(profile.kind.label());

    page.fill("title", escape_html(&title));
    page.fill("heading", escape_html(&title));

    match &view.load {
        LoadState::Loading => {
            page.fill("summary", "Loading\u{2026}");
            page.fill("grid", "");
            page.fill("pagination", "");
            page.fill("data", "[]");
        }
        LoadState::Failed(_) => {
            page.fill("summary", "");
            page.fill("grid", failure_placeholder(&profile.failure_message));
            page.fill("pagination", "");
            page.fill("data", "[]");
        }
        LoadState::Ready => {
            let summary = if view.page.total_items == 0 {
                String::new()
            } else {
                format!(
                    "Showing {}-{} of {}",
                    view.page.first_index(view.page_size),
                    view.page.last_index(view.page_size),
                    view.page.total_items
                )
            };
            let template = card_template(profile.kind);
            page.fill("summary", summary);
            page.fill(
                "grid",
                render_grid(&view.page.items, &*template, &profile.empty_message),
            );
            page.fill(
                "pagination",
                render_controls(&controls(view.page.page, view.page.total_pages)),
            );
            let json = serde_json::to_string(&view.page.items).unwrap_or_else(|_| "[]".to_string());
            page.fill("data", json_for_script_tag(&json));
        }
    }
}

pub fn render_listing_html(session: &Session, template: Option<&str>) -> String {
    let mut page = match template {
        Some(t) => HostPage::parse(t),
        None => HostPage::parse(&default_listing_template()),
    };
    fill_listing(&mut page, session);
    page.render()
}

pub fn render_coin_html(detail: &CoinDetail, template: Option<&str>) -> String {
    let mut page = match template {
        Some(t) => HostPage::parse(t),
        None => HostPage::parse(&default_coin_template()),
    };
    render_coin_page(detail, &mut page, "No analysis published yet.");
    page.render()
}

pub fn render_coin_failure_html(message: &str, template: Option<&str>) -> String {
    let mut page = match template {
        Some(t) => HostPage::parse(t),
        None => HostPage::parse(&default_coin_template()),
    };
    page.fill("title", "Wave Analysis");
    page.fill("analysis", failure_placeholder(message));
    page.render()
}
