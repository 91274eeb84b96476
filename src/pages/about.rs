use crate::pages::RenderCtx;
use crate::util::format_int;

pub fn render(ctx: &RenderCtx<'_>) -> String {
    format!(
        "<section data-page=\"about\">\n<h1>About</h1>\n\
         <p>This dashboard analyses a fixed dataset of {} recorded traffic violations \
         across Indian states. The data is loaded once at startup and every page reads \
         from the same immutable table.</p>\n\
         <p>Pages cover time trends, environmental conditions, vehicle classes, driver \
         behaviour, payments and a geographic view built from public boundary data. \
         World boundaries are fetched from a public geojson source and cached; the \
         India state map uses a local boundary file when present.</p>\n\
         <p>All charts are rendered in the browser with plotly.js from figure \
         definitions produced by the server.</p>\n</section>",
        format_int(ctx.table.rows.len() as i64)
    )
}
