//! Plotly figure specs built as JSON. The server never rasterizes anything:
//! each figure is a `{data, layout}` value that plotly.js hydrates in the
//! browser, the same division of labor the Rust side keeps with browser
//! charting elsewhere in this codebase's lineage.

use crate::geo::lookup_state;
use crate::theme;
use crate::types::LocationStat;
use crate::util::{escape_html, format_int};
use serde_json::{json, Value};

/// Static styling knobs for the two map figures.
pub struct MapOptions {
    pub color_label: String,
    pub color_scale: &'static str,
    pub height: u32,
    /// Geojson property the `Location` values join against,
    /// e.g. `properties.ST_NM` for the India file.
    pub feature_id_key: &'static str,
}

impl MapOptions {
    pub fn india(color_label: impl Into<String>) -> Self {
        MapOptions {
            color_label: color_label.into(),
            color_scale: "Viridis",
            height: 700,
            feature_id_key: "properties.ST_NM",
        }
    }

    pub fn world(color_label: impl Into<String>) -> Self {
        MapOptions {
            color_label: color_label.into(),
            color_scale: "Plasma",
            height: 700,
            feature_id_key: "properties.name",
        }
    }
}

fn themed_layout(title: &str, height: u32) -> Value {
    json!({
        "title": {"text": format!("<b>{}</b>", escape_html(title)), "font": {"size": 20}},
        "height": height,
        "paper_bgcolor": theme::BACKGROUND,
        "plot_bgcolor": theme::INPUT_BG,
        "font": {"size": 12, "color": theme::NEUTRAL2},
        "margin": {"r": 0, "t": 50, "l": 0, "b": 0},
        "hoverlabel": {"bgcolor": theme::INPUT_BG, "font": {"size": 13, "color": theme::TEXT}}
    })
}

/// Flat choropleth centered on India, dark tile background, static colorbar.
pub fn create_choropleth_map(
    stats: &[LocationStat],
    geojson: &Value,
    title: &str,
    opts: &MapOptions,
) -> Value {
    let locations: Vec<&str> = stats.iter().map(|s| s.location.as_str()).collect();
    let values: Vec<f64> = stats.iter().map(|s| s.value).collect();

    let mut layout = themed_layout(title, opts.height);
    layout["mapbox"] = json!({
        "style": "carto-darkmatter",
        "center": {"lat": 20.59, "lon": 78.96},
        "zoom": 4
    });

    json!({
        "data": [{
            "type": "choroplethmapbox",
            "geojson": geojson,
            "locations": locations,
            "z": values,
            "featureidkey": opts.feature_id_key,
            "colorscale": opts.color_scale,
            "marker": {"opacity": 0.8},
            "colorbar": {
                "title": {"text": opts.color_label},
                "thickness": 15,
                "len": 0.7,
                "x": 1.02,
                "tickfont": {"color": theme::NEUTRAL1}
            }
        }],
        "layout": layout
    })
}

/// Orthographic globe choropleth with the three projection relayout buttons.
pub fn create_globe_choropleth(
    stats: &[LocationStat],
    geojson: &Value,
    title: &str,
    opts: &MapOptions,
) -> Value {
    let locations: Vec<&str> = stats.iter().map(|s| s.location.as_str()).collect();
    let values: Vec<f64> = stats.iter().map(|s| s.value).collect();

    let mut layout = themed_layout(title, opts.height);
    layout["geo"] = json!({
        "projection": {"type": "orthographic"},
        "resolution": 110,
        "showcountries": true,
        "countrycolor": "#333",
        "countrywidth": 1.5,
        "landcolor": "#1a1b2e",
        "showocean": true,
        "oceancolor": "#0a0e17",
        "coastlinecolor": "#555",
        "coastlinewidth": 1.5,
        "bgcolor": theme::BACKGROUND
    });
    layout["updatemenus"] = json!([{
        "buttons": [
            {
                "args": [{"geo.projection.type": "orthographic"}],
                "label": "GLOBE",
                "method": "relayout"
            },
            {
                "args": [{"geo.projection.type": "equirectangular"}],
                "label": "FLAT",
                "method": "relayout"
            },
            {
                "args": [{
                    "geo.projection.type": "conic conformal",
                    "geo.center": {"lat": 20, "lon": 78}
                }],
                "label": "INDIA",
                "method": "relayout"
            }
        ],
        "direction": "left",
        "pad": {"r": 15, "t": 15},
        "x": 0.01, "xanchor": "left", "y": 1.02, "yanchor": "top",
        "bgcolor": "#0A0A3D",
        "font": {"color": theme::NEUTRAL2, "size": 11}
    }]);

    json!({
        "data": [{
            "type": "choropleth",
            "geojson": geojson,
            "locations": locations,
            "z": values,
            "featureidkey": opts.feature_id_key,
            "colorscale": opts.color_scale,
            "reversescale": true
        }],
        "layout": layout
    })
}

/// Overlay per-state text annotations at their fixed coordinates. Locations
/// without a known coordinate are skipped without error.
pub fn add_state_labels(fig: &mut Value, stats: &[LocationStat], offset_x: f64, offset_y: f64) {
    let annotations = fig["layout"]["annotations"]
        .as_array()
        .cloned()
        .unwrap_or_default();
    let mut annotations = annotations;

    for stat in stats {
        let Some((lat, lon)) = lookup_state(&stat.location) else {
            continue;
        };
        let abbrev: String = stat.location.chars().take(2).collect::<String>().to_uppercase();
        annotations.push(json!({
            "x": lon + offset_x,
            "y": lat + offset_y,
            "text": format!(
                "<b style='color:#94FEFE;font-size:16px'>{}</b><br><span style='color:#80FAD6;font-size:12px'>{}</span>",
                abbrev,
                format_int(stat.value.round() as i64)
            ),
            "showarrow": false,
            "font": {"size": 14, "color": theme::NEUTRAL2},
            "bgcolor": "rgba(0,20,60,0.95)",
            "bordercolor": theme::ACCENT1,
            "borderwidth": 2,
            "borderpad": 8,
            "xanchor": "center",
            "yanchor": "middle"
        }));
    }

    fig["layout"]["annotations"] = Value::Array(annotations);
}

/// Horizontal-category bar chart from (label, value) pairs.
pub fn bar_chart(pairs: &[(String, f64)], title: &str, value_label: &str) -> Value {
    let labels: Vec<&str> = pairs.iter().map(|(l, _)| l.as_str()).collect();
    let values: Vec<f64> = pairs.iter().map(|(_, v)| *v).collect();
    let mut layout = themed_layout(title, 420);
    layout["margin"] = json!({"r": 20, "t": 60, "l": 50, "b": 80});
    layout["yaxis"] = json!({"title": {"text": value_label}, "gridcolor": theme::ACCENT1});
    json!({
        "data": [{
            "type": "bar",
            "x": labels,
            "y": values,
            "marker": {"color": theme::ACCENT2}
        }],
        "layout": layout
    })
}

/// Single-trace line chart over ordered x labels.
pub fn line_chart(points: &[(String, f64)], title: &str, value_label: &str) -> Value {
    let x: Vec<&str> = points.iter().map(|(l, _)| l.as_str()).collect();
    let y: Vec<f64> = points.iter().map(|(_, v)| *v).collect();
    let mut layout = themed_layout(title, 420);
    layout["margin"] = json!({"r": 20, "t": 60, "l": 50, "b": 60});
    layout["yaxis"] = json!({"title": {"text": value_label}, "gridcolor": theme::ACCENT1});
    json!({
        "data": [{
            "type": "scatter",
            "mode": "lines+markers",
            "x": x,
            "y": y,
            "line": {"color": theme::MAP_COLORS[4], "width": 2},
            "marker": {"color": theme::ACCENT2}
        }],
        "layout": layout
    })
}

pub fn pie_chart(pairs: &[(String, f64)], title: &str) -> Value {
    let labels: Vec<&str> = pairs.iter().map(|(l, _)| l.as_str()).collect();
    let values: Vec<f64> = pairs.iter().map(|(_, v)| *v).collect();
    let mut layout = themed_layout(title, 420);
    layout["margin"] = json!({"r": 20, "t": 60, "l": 20, "b": 20});
    json!({
        "data": [{
            "type": "pie",
            "labels": labels,
            "values": values,
            "marker": {"colors": theme::MAP_COLORS},
            "hole": 0.35
        }],
        "layout": layout
    })
}

pub fn histogram(values: &[f64], title: &str, x_label: &str) -> Value {
    let mut layout = themed_layout(title, 380);
    layout["margin"] = json!({"r": 20, "t": 60, "l": 50, "b": 60});
    layout["xaxis"] = json!({"title": {"text": x_label}, "gridcolor": theme::ACCENT1});
    json!({
        "data": [{
            "type": "histogram",
            "x": values,
            "marker": {"color": theme::PRIMARY}
        }],
        "layout": layout
    })
}

/// HTML embedding for one figure: a target div plus the hydration script.
/// Dataset strings flow into the figure spec, so the serialized JSON must
/// not contain a literal `</script>` or `<!--`; escaping every `<` as
/// `<` keeps the payload inert inside the script element.
pub fn plot_div(id: &str, fig: &Value) -> String {
    let spec = fig.to_string().replace('<', "\\u003c");
    format!(
        "<div id=\"{id}\" class=\"plot\"></div>\n<script>(function(){{var fig={spec};Plotly.newPlot(\"{id}\",fig.data,fig.layout,{{responsive:true}});}})();</script>\n",
        id = id,
        spec = spec
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> Vec<LocationStat> {
        vec![
            LocationStat { location: "Karnataka".to_string(), value: 120.0 },
            LocationStat { location: "Punjab".to_string(), value: 45.0 },
        ]
    }

    fn boundary() -> Value {
        json!({"type": "FeatureCollection", "features": []})
    }

    #[test]
    fn choropleth_joins_locations_and_values() {
        let fig = create_choropleth_map(&stats(), &boundary(), "Test Map", &MapOptions::india("Violations"));
        assert_eq!(fig["data"][0]["type"], "choroplethmapbox");
        assert_eq!(fig["data"][0]["locations"][0], "Karnataka");
        assert_eq!(fig["data"][0]["z"][1], 45.0);
        assert_eq!(fig["data"][0]["featureidkey"], "properties.ST_NM");
        assert_eq!(fig["layout"]["mapbox"]["center"]["lat"], 20.59);
    }

    #[test]
    fn globe_carries_projection_buttons() {
        let fig = create_globe_choropleth(&stats(), &boundary(), "Globe", &MapOptions::world("Violations"));
        assert_eq!(fig["data"][0]["type"], "choropleth");
        assert_eq!(fig["layout"]["geo"]["projection"]["type"], "orthographic");
        let buttons = fig["layout"]["updatemenus"][0]["buttons"].as_array().unwrap();
        assert_eq!(buttons.len(), 3);
    }

    #[test]
    fn state_labels_skip_unknown_locations() {
        let mut fig = create_choropleth_map(&stats(), &boundary(), "Map", &MapOptions::india("Violations"));
        let mixed = vec![
            LocationStat { location: "Karnataka".to_string(), value: 120.0 },
            LocationStat { location: "Atlantis".to_string(), value: 9.0 },
        ];
        add_state_labels(&mut fig, &mixed, 0.0, 0.0);
        let annotations = fig["layout"]["annotations"].as_array().unwrap();
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0]["x"], 77.59);
        assert_eq!(annotations[0]["y"], 12.97);
        assert!(annotations[0]["text"].as_str().unwrap().contains("KA"));
    }

    #[test]
    fn state_labels_apply_offsets() {
        let mut fig = json!({"data": [], "layout": {}});
        let one = vec![LocationStat { location: "Delhi".to_string(), value: 3.0 }];
        add_state_labels(&mut fig, &one, 1.0, -1.0);
        let annotations = fig["layout"]["annotations"].as_array().unwrap();
        assert_eq!(annotations[0]["x"], 77.23 + 1.0);
        assert_eq!(annotations[0]["y"], 28.61 - 1.0);
    }

    #[test]
    fn plot_div_embeds_spec_and_target() {
        let fig = bar_chart(&[("Car".to_string(), 4.0)], "By Vehicle", "Count");
        let html = plot_div("fig-vehicle", &fig);
        assert!(html.contains("id=\"fig-vehicle\""));
        assert!(html.contains("Plotly.newPlot(\"fig-vehicle\""));
        assert!(html.contains("\"bar\""));
    }

    #[test]
    fn plot_div_neutralizes_script_breaking_values() {
        let hostile = vec![LocationStat {
            location: "</script><img src=x>".to_string(),
            value: 1.0,
        }];
        let fig = create_choropleth_map(&hostile, &boundary(), "Map", &MapOptions::india("Violations"));
        let html = plot_div("fig-hostile", &fig);
        // The only </script> allowed is the one closing the hydration block.
        assert_eq!(html.matches("</script>").count(), 1);
        assert!(html.ends_with("</script>\n"));
        assert!(html.contains("\\u003c/script>\\u003cimg src=x>"));
    }

    #[test]
    fn chart_builders_produce_expected_traces() {
        let pairs = vec![("Jan".to_string(), 1.0), ("Feb".to_string(), 2.0)];
        assert_eq!(line_chart(&pairs, "t", "v")["data"][0]["type"], "scatter");
        assert_eq!(pie_chart(&pairs, "t")["data"][0]["type"], "pie");
        assert_eq!(histogram(&[1.0, 2.0], "t", "x")["data"][0]["type"], "histogram");
    }
}
