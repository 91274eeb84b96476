//! Static palette and stylesheet. Purely cosmetic; nothing here touches the
//! dataset.

use crate::config::AppConfig;
use std::fs;
use tracing::debug;

pub const PRIMARY: &str = "#807A81";
pub const ACCENT1: &str = "#6C5C7C";
pub const ACCENT2: &str = "#A08692";
pub const NEUTRAL1: &str = "#E1C8C2";
pub const NEUTRAL2: &str = "#E8DED9";
pub const TEXT: &str = "#FFFFFF";
pub const BACKGROUND: &str = "#1A1623";
pub const INPUT_BG: &str = "#2A2533";

/// Color cycle used by the map page accents.
pub const MAP_COLORS: [&str; 5] = ["#2927F7", "#6C5C7C", "#A08692", "#807A81", "#80FAD6"];

const BASE_CSS: &str = r#"
:root {
  --primary: #807A81;
  --accent1: #6C5C7C;
  --accent2: #A08692;
  --neutral1: #E1C8C2;
  --neutral2: #E8DED9;
  --text: #FFFFFF;
  --background: #1A1623;
  --input-bg: #2A2533;
}
* { box-sizing: border-box; }
body {
  margin: 0;
  background: var(--background);
  color: var(--text);
  font-family: Helvetica, Arial, sans-serif;
}
a { color: var(--neutral2); }
aside.sidebar {
  position: fixed;
  left: 0; top: 0; bottom: 0;
  width: 300px;
  padding: 18px;
  background: var(--input-bg);
  border-right: 2px solid var(--accent1);
  overflow-y: auto;
  transition: left 0.2s ease;
}
aside.sidebar.collapsed { left: -340px; }
aside.sidebar h2 { color: var(--accent2); margin-top: 28px; }
nav.pages a {
  display: block;
  padding: 8px 10px;
  margin: 2px 0;
  border-radius: 6px;
  color: var(--neutral2);
  text-decoration: none;
}
nav.pages a.active {
  background: var(--accent1);
  color: var(--text);
}
nav.pages a:hover { background: var(--primary); }
.sidebar-divider { border-top: 1px solid var(--accent1); margin: 12px 0; }
.sidebar-caption { color: var(--neutral1); font-size: 12px; }
main.content {
  margin-left: 300px;
  padding: 24px 32px;
  transition: margin-left 0.2s ease;
}
main.content.expanded { margin-left: 0; }
h1 { color: var(--accent2); }
.metric-row { display: flex; gap: 16px; flex-wrap: wrap; }
.metric {
  flex: 1;
  min-width: 180px;
  background: var(--input-bg);
  border: 1px solid var(--accent1);
  border-radius: 10px;
  padding: 14px 18px;
}
.metric .metric-label { color: var(--neutral1); font-size: 13px; }
.metric .metric-value { font-size: 26px; font-weight: bold; color: var(--neutral2); }
.plot { background: var(--input-bg); border-radius: 10px; margin: 18px 0; min-height: 320px; }
table.data {
  border-collapse: collapse;
  width: 100%;
  margin: 14px 0;
  font-size: 14px;
}
table.data th, table.data td {
  border: 1px solid var(--accent1);
  padding: 6px 10px;
  text-align: left;
}
table.data th { background: var(--accent1); }
.card-container {
  background: var(--input-bg);
  border: 1px solid var(--accent1);
  border-radius: 10px;
  padding: 16px;
  margin: 14px 0;
}
.card-title { color: var(--accent2); font-weight: bold; margin-bottom: 8px; }
.nav-cards { display: flex; gap: 10px; flex-wrap: wrap; margin: 14px 0; }
.nav-cards a {
  flex: 1;
  min-width: 140px;
  text-align: center;
  background: var(--input-bg);
  border: 1px solid var(--accent1);
  border-radius: 8px;
  padding: 10px 6px;
  text-decoration: none;
  color: var(--neutral2);
  font-size: 13px;
}
.nav-cards a:hover { background: var(--accent1); }
details.section {
  background: var(--input-bg);
  border: 1px solid var(--accent1);
  border-radius: 10px;
  margin: 12px 0;
  padding: 4px 14px;
}
details.section summary {
  cursor: pointer;
  color: var(--accent2);
  font-weight: bold;
  padding: 8px 0;
}
.error-note {
  background: #3d1f2a;
  border: 1px solid #a04060;
  border-radius: 8px;
  padding: 12px 16px;
  margin: 14px 0;
}
.warning-note {
  background: #3d3320;
  border: 1px solid #a08040;
  border-radius: 8px;
  padding: 12px 16px;
  margin: 14px 0;
}
"#;

/// Built-in stylesheet plus the optional on-disk override. An unreadable
/// override is skipped without surfacing an error anywhere user-visible.
pub fn stylesheet(config: &AppConfig) -> String {
    let mut css = BASE_CSS.to_string();
    if let Some(path) = &config.styles.override_css {
        match fs::read_to_string(path) {
            Ok(extra) => {
                css.push('\n');
                css.push_str(&extra);
            }
            Err(e) => {
                debug!(path = ?path, error = %e, "style override not loaded");
            }
        }
    }
    css
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CacheConfig, InputConfig, ServerConfig, StylesConfig};
    use std::io::Write;

    fn config(override_css: Option<std::path::PathBuf>) -> AppConfig {
        AppConfig {
            input: InputConfig {
                data_csv: "violations.csv".into(),
                india_geojson: "india_states.geojson".into(),
                world_geojson_url: "https://example.com/world.geojson".into(),
            },
            cache: CacheConfig::default(),
            server: ServerConfig { port: 0 },
            styles: StylesConfig { override_css },
        }
    }

    #[test]
    fn stylesheet_contains_palette() {
        let css = stylesheet(&config(None));
        assert!(css.contains("--background: #1A1623"));
        assert!(css.contains("--accent1: #6C5C7C"));
    }

    #[test]
    fn missing_override_is_silently_skipped() {
        let css = stylesheet(&config(Some("/nonexistent/main.css".into())));
        assert_eq!(css, stylesheet(&config(None)));
    }

    #[test]
    fn readable_override_is_appended() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, ".custom {{ color: red; }}").unwrap();
        let css = stylesheet(&config(Some(file.path().to_path_buf())));
        assert!(css.contains(".custom { color: red; }"));
    }
}
