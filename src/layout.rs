//! Base HTML shell and small markup building blocks shared by every page.

use crate::pages::Page;
use crate::util::escape_html;
use std::fmt::Write;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
const BOOTSTRAP_ICONS_CDN: &str =
    "https://cdn.jsdelivr.net/npm/bootstrap-icons@1.11.1/font/bootstrap-icons.css";

/// Persistent sidebar toggle: a fixed button that collapses the sidebar and
/// remembers the choice in localStorage across page loads.
const SIDEBAR_TOGGLE_JS: &str = r#"
(function(){
  const KEY = 'sidebarCollapsed';
  function apply(collapsed){
    const aside = document.querySelector('aside.sidebar');
    const main = document.querySelector('main.content');
    if(!aside || !main) return;
    aside.classList.toggle('collapsed', collapsed);
    main.classList.toggle('expanded', collapsed);
  }
  window.addEventListener('DOMContentLoaded', function(){
    const btn = document.createElement('button');
    btn.id = 'sidebar-toggle';
    btn.title = 'Toggle sidebar';
    btn.innerHTML = '&#187;';
    Object.assign(btn.style, {
      position: 'fixed', left: '8px', top: '12px', zIndex: 2147483647,
      width: '34px', height: '34px', borderRadius: '6px', border: 'none',
      background: '#0f172a', color: '#ffffff', cursor: 'pointer',
      boxShadow: '0 2px 8px rgba(2,6,23,0.3)'
    });
    btn.onclick = function(){
      const collapsed = localStorage.getItem(KEY) !== 'true';
      localStorage.setItem(KEY, collapsed ? 'true' : 'false');
      apply(collapsed);
    };
    document.body.appendChild(btn);
    apply(localStorage.getItem(KEY) === 'true');
  });
})();
"#;

/// Wrap a rendered page body in the full document: head, sidebar navigation,
/// and content column.
pub fn page_shell(active: Page, body: &str) -> String {
    let mut nav = String::new();
    for page in Page::ALL {
        let class = if page == active { " class=\"active\"" } else { "" };
        let _ = write!(
            nav,
            "<a href=\"/page/{}\"{}>{}</a>\n",
            page.slug(),
            class,
            escape_html(page.label())
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} — Traffic Violation Dashboard</title>
<link rel="stylesheet" href="{icons}">
<link rel="stylesheet" href="/styles/main.css">
<script src="{plotly}"></script>
</head>
<body>
<aside class="sidebar">
<h2>Navigation</h2>
<nav class="pages">
{nav}</nav>
<div class="sidebar-divider"></div>
<p class="sidebar-caption">Smart Traffic Violation Pattern Detector</p>
</aside>
<main class="content">
{body}
</main>
<script>{toggle}</script>
</body>
</html>
"#,
        title = escape_html(active.label()),
        icons = BOOTSTRAP_ICONS_CDN,
        plotly = PLOTLY_CDN,
        nav = nav,
        body = body,
        toggle = SIDEBAR_TOGGLE_JS,
    )
}

pub fn metric_card(label: &str, value: &str) -> String {
    format!(
        "<div class=\"metric\"><div class=\"metric-label\">{}</div><div class=\"metric-value\">{}</div></div>",
        escape_html(label),
        escape_html(value)
    )
}

pub fn metrics_row(items: &[(&str, String)]) -> String {
    let mut out = String::from("<div class=\"metric-row\">");
    for (label, value) in items {
        out.push_str(&metric_card(label, value));
    }
    out.push_str("</div>");
    out
}

/// Styled card container with a title, the counterpart of the original
/// scrollable-card scaffold.
pub fn card(card_id: &str, title: &str, content: &str) -> String {
    format!(
        "<div class=\"card-container\" id=\"{}\"><div class=\"card-title\">{}</div><div class=\"card-content\">{}</div></div>",
        card_id,
        escape_html(title),
        content
    )
}

/// Plain data table; cell values are escaped.
pub fn data_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = String::from("<table class=\"data\"><thead><tr>");
    for h in headers {
        let _ = write!(out, "<th>{}</th>", escape_html(h));
    }
    out.push_str("</tr></thead><tbody>");
    for row in rows {
        out.push_str("<tr>");
        for cell in row {
            let _ = write!(out, "<td>{}</td>", escape_html(cell));
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>");
    out
}
