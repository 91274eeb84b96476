//! Boundary data for the map page: a world geojson fetched from a public
//! URL and a local India-states file, both held behind a TTL cache.

use crate::config::AppConfig;
use anyhow::{Context, Result};
use geojson::GeoJson;
use serde_json::Value;
use std::fs;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// What a page render gets to work with. `world` is `None` only when the
/// fetch failed (the reason lands in `world_error`); `india` is `None`
/// whenever the local file is absent or unreadable.
#[derive(Debug, Clone, Default)]
pub struct GeoSnapshot {
    pub world: Option<Arc<Value>>,
    pub india: Option<Arc<Value>>,
    pub world_error: Option<String>,
}

impl GeoSnapshot {
    pub fn empty() -> Self {
        GeoSnapshot::default()
    }
}

struct CachedGeo {
    loaded_at: Instant,
    world: Arc<Value>,
    india: Option<Arc<Value>>,
}

/// TTL-cached geojson loader. One instance lives in the server state; every
/// map render goes through `load`, which refreshes at most once per window.
pub struct GeoStore {
    client: reqwest::Client,
    cache: Mutex<Option<CachedGeo>>,
}

impl GeoStore {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.cache.fetch_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(GeoStore {
            client,
            cache: Mutex::new(None),
        })
    }

    /// Return cached boundary data, refreshing it when the window expired.
    /// A failed world fetch is not cached: it surfaces in the snapshot and
    /// the next call tries again.
    pub async fn load(&self, config: &AppConfig) -> GeoSnapshot {
        let ttl = Duration::from_secs(config.cache.geojson_ttl_secs);
        let mut cache = self.cache.lock().await;

        if let Some(cached) = cache.as_ref() {
            if is_fresh(cached.loaded_at, ttl, Instant::now()) {
                return GeoSnapshot {
                    world: Some(cached.world.clone()),
                    india: cached.india.clone(),
                    world_error: None,
                };
            }
        }

        let india = match load_local_geojson(config) {
            Ok(value) => Some(Arc::new(value)),
            Err(e) => {
                warn!(
                    path = ?config.input.india_geojson,
                    error = %e,
                    "India geojson unavailable, state map will be degraded"
                );
                None
            }
        };

        match self.fetch_world(&config.input.world_geojson_url).await {
            Ok(world) => {
                let world = Arc::new(world);
                info!(url = %config.input.world_geojson_url, "world geojson refreshed");
                *cache = Some(CachedGeo {
                    loaded_at: Instant::now(),
                    world: world.clone(),
                    india: india.clone(),
                });
                GeoSnapshot {
                    world: Some(world),
                    india,
                    world_error: None,
                }
            }
            Err(e) => {
                warn!(error = %e, "world geojson fetch failed");
                GeoSnapshot {
                    world: None,
                    india,
                    world_error: Some(e.to_string()),
                }
            }
        }
    }

    async fn fetch_world(&self, url: &str) -> Result<Value> {
        let value = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch world geojson from {}", url))?
            .error_for_status()
            .context("World geojson request returned an error status")?
            .json::<Value>()
            .await
            .context("World geojson response was not valid JSON")?;
        Ok(value)
    }
}

fn load_local_geojson(config: &AppConfig) -> Result<Value> {
    let raw = fs::read_to_string(&config.input.india_geojson)
        .with_context(|| format!("Failed to read {:?}", config.input.india_geojson))?;
    let parsed: GeoJson = raw
        .parse()
        .with_context(|| format!("{:?} is not valid geojson", config.input.india_geojson))?;
    serde_json::to_value(&parsed).context("Failed to re-serialize geojson")
}

fn is_fresh(loaded_at: Instant, ttl: Duration, now: Instant) -> bool {
    now.duration_since(loaded_at) < ttl
}

/// Hand-coded label anchors for the major Indian states. Locations outside
/// this map simply get no label.
pub fn state_coordinates() -> &'static [(&'static str, (f64, f64))] {
    &[
        ("Karnataka", (12.97, 77.59)),
        ("Punjab", (30.90, 75.85)),
        ("Maharashtra", (19.07, 72.87)),
        ("West Bengal", (22.57, 88.36)),
        ("Tamil Nadu", (13.08, 80.27)),
        ("Delhi", (28.61, 77.23)),
        ("Uttar Pradesh", (26.85, 80.95)),
        ("Gujarat", (23.02, 72.57)),
        ("Rajasthan", (27.59, 75.62)),
        ("Madhya Pradesh", (22.85, 77.99)),
        ("Andhra Pradesh", (15.91, 78.16)),
        ("Telangana", (18.11, 79.01)),
        ("Bihar", (25.59, 85.54)),
        ("Jharkhand", (23.61, 85.28)),
        ("Odisha", (20.95, 85.09)),
        ("Assam", (26.20, 92.94)),
    ]
}

pub fn lookup_state(name: &str) -> Option<(f64, f64)> {
    state_coordinates()
        .iter()
        .find(|(state, _)| *state == name)
        .map(|(_, coords)| *coords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, CacheConfig, InputConfig, ServerConfig, StylesConfig};
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn freshness_respects_ttl() {
        let now = Instant::now();
        let ttl = Duration::from_secs(60);
        assert!(is_fresh(now, ttl, now + Duration::from_secs(59)));
        assert!(!is_fresh(now, ttl, now + Duration::from_secs(60)));
    }

    #[test]
    fn lookup_state_known_and_unknown() {
        assert_eq!(lookup_state("Karnataka"), Some((12.97, 77.59)));
        assert_eq!(lookup_state("Atlantis"), None);
    }

    #[test]
    fn state_coordinates_covers_sixteen_states() {
        assert_eq!(state_coordinates().len(), 16);
    }

    fn config_with_india(path: std::path::PathBuf) -> AppConfig {
        AppConfig {
            input: InputConfig {
                data_csv: "violations.csv".into(),
                india_geojson: path,
                world_geojson_url: "https://example.com/world.geojson".into(),
            },
            cache: CacheConfig::default(),
            server: ServerConfig { port: 0 },
            styles: StylesConfig::default(),
        }
    }

    #[test]
    fn local_geojson_missing_file_errors() {
        let config = config_with_india("/nonexistent/india.geojson".into());
        assert!(load_local_geojson(&config).is_err());
    }

    #[test]
    fn local_geojson_parses_feature_collection() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"type":"FeatureCollection","features":[{{"type":"Feature","properties":{{"ST_NM":"Karnataka"}},"geometry":{{"type":"Polygon","coordinates":[[[77.0,12.0],[78.0,12.0],[78.0,13.0],[77.0,12.0]]]}}}}]}}"#
        )
        .unwrap();
        let config = config_with_india(file.path().to_path_buf());
        let value = load_local_geojson(&config).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
    }

    #[test]
    fn local_geojson_rejects_invalid_payload() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not geojson at all").unwrap();
        let config = config_with_india(file.path().to_path_buf());
        assert!(load_local_geojson(&config).is_err());
    }

    /// Local endpoint serving a world geojson, counting hits. With
    /// `fail_first` the first request gets a 500 and the rest succeed.
    async fn spawn_world_endpoint(fail_first: bool) -> (String, Arc<AtomicUsize>) {
        use axum::http::StatusCode;
        use axum::response::IntoResponse;
        use axum::{routing::get, Json, Router};

        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/world.geojson",
            get(move || {
                let counter = counter.clone();
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst);
                    if fail_first && n == 0 {
                        StatusCode::INTERNAL_SERVER_ERROR.into_response()
                    } else {
                        Json(serde_json::json!({
                            "type": "FeatureCollection",
                            "features": []
                        }))
                        .into_response()
                    }
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}/world.geojson", addr), hits)
    }

    #[tokio::test]
    async fn load_reuses_cached_world_within_ttl() {
        let (url, hits) = spawn_world_endpoint(false).await;
        let mut config = config_with_india("/nonexistent/india.geojson".into());
        config.input.world_geojson_url = url;
        let store = GeoStore::new(&config).unwrap();

        let first = store.load(&config).await;
        assert!(first.world.is_some());
        let second = store.load(&config).await;
        assert!(second.world.is_some());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn load_retries_after_failed_world_fetch() {
        let (url, hits) = spawn_world_endpoint(true).await;
        let mut config = config_with_india("/nonexistent/india.geojson".into());
        config.input.world_geojson_url = url;
        let store = GeoStore::new(&config).unwrap();

        let first = store.load(&config).await;
        assert!(first.world.is_none());
        assert!(first.world_error.is_some());

        let second = store.load(&config).await;
        assert!(second.world.is_some());
        assert_eq!(second.world_error, None);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}
