//! The ten dashboard pages and the label-to-renderer dispatch.

mod about;
mod dashboard;
mod driver;
mod environment;
mod home;
mod map_view;
mod payment;
mod report;
mod time_trend;
mod vehicle;

use crate::geo::GeoSnapshot;
use crate::types::{Aggregation, ViolationTable};
use chrono::NaiveDate;

/// Everything a renderer needs: the immutable table (already date-filtered
/// when the request asked for a range) plus, for the map page, the current
/// boundary snapshot and the aggregation picked by the request.
pub struct RenderCtx<'a> {
    pub table: &'a ViolationTable,
    pub geo: GeoSnapshot,
    pub map_aggregation: Aggregation,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

/// Closed set of navigation targets. Exactly one renderer per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Dashboard,
    TimeTrend,
    Environment,
    Vehicle,
    DriverBehaviour,
    Payment,
    MapVisualisation,
    Report,
    About,
}

impl Page {
    pub const ALL: [Page; 10] = [
        Page::Home,
        Page::Dashboard,
        Page::TimeTrend,
        Page::Environment,
        Page::Vehicle,
        Page::DriverBehaviour,
        Page::Payment,
        Page::MapVisualisation,
        Page::Report,
        Page::About,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Dashboard => "Dashboard",
            Page::TimeTrend => "Time Trend Analysis",
            Page::Environment => "Environment Analysis",
            Page::Vehicle => "Vehicle Analysis",
            Page::DriverBehaviour => "Driver Behaviour Analysis",
            Page::Payment => "Payment Analysis",
            Page::MapVisualisation => "Map Visualisation",
            Page::Report => "Report",
            Page::About => "About",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Dashboard => "dashboard",
            Page::TimeTrend => "time-trend",
            Page::Environment => "environment",
            Page::Vehicle => "vehicle",
            Page::DriverBehaviour => "driver-behaviour",
            Page::Payment => "payment",
            Page::MapVisualisation => "map",
            Page::Report => "report",
            Page::About => "about",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Page> {
        Page::ALL.into_iter().find(|p| p.slug() == slug)
    }

    /// Dispatch to exactly one renderer; returns the page body, which
    /// `layout::page_shell` wraps into the full document.
    pub fn render(&self, ctx: &RenderCtx<'_>) -> String {
        match self {
            Page::Home => home::render(ctx),
            Page::Dashboard => dashboard::render(ctx),
            Page::TimeTrend => time_trend::render(ctx),
            Page::Environment => environment::render(ctx),
            Page::Vehicle => vehicle::render(ctx),
            Page::DriverBehaviour => driver::render(ctx),
            Page::Payment => payment::render(ctx),
            Page::MapVisualisation => map_view::render(ctx),
            Page::Report => report::render(ctx),
            Page::About => about::render(ctx),
        }
    }
}
