// HTML rendering for the dashboard page. All dynamic text goes through `escape`;
// chart data is embedded as Plotly.js JSON.

use serde_json::{Value, json};

use crate::models::{DashboardCharts, DashboardSummary, DualAxisFigure, RepoCard, Series, TimeSeriesFigure};

const TITLE: &str = "MQT Dashboard";
const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #f5f6f8; color: #1d2433; }
header { background: #0065bd; color: #fff; padding: 1.2rem 2rem; }
main { padding: 1.5rem 2rem; }
.totals { display: flex; gap: 1rem; margin-bottom: 2rem; }
.total { background: #fff; border-radius: 8px; padding: 1rem 1.5rem; box-shadow: 0 1px 3px rgba(0,0,0,.1); }
.total .value { display: block; font-size: 2rem; font-weight: 600; }
.cards { display: grid; grid-template-columns: repeat(auto-fill, minmax(260px, 1fr)); gap: 1rem; margin-bottom: 2rem; }
.card { background: #fff; border-radius: 8px; padding: 1rem; box-shadow: 0 1px 3px rgba(0,0,0,.1); }
.card h3 { margin: 0 0 .5rem; }
.card dl { display: grid; grid-template-columns: auto 1fr; gap: .2rem .8rem; margin: .5rem 0; }
.card dt { color: #5b6475; }
.card dd { margin: 0; }
table { border-collapse: collapse; width: 100%; background: #fff; margin-bottom: 2rem; }
th, td { padding: .5rem .8rem; border-bottom: 1px solid #e3e6eb; text-align: left; }
th { background: #eef1f5; }
.chart { background: #fff; border-radius: 8px; margin-bottom: 2rem; min-height: 420px; }
"#;

pub fn render_cards(summary: &DashboardSummary) -> String {
    let mut body = String::new();
    body.push_str("<section class=\"totals\">");
    body.push_str(&total_tile(&summary.total_stars.to_string(), "GitHub Stars"));
    body.push_str(&total_tile(&summary.total_downloads, "Total Downloads"));
    body.push_str("</section>\n");

    body.push_str(&card_section("Repositories by Stars", &summary.sorted_by_stars));
    body.push_str(&card_section("Repositories by Downloads", &summary.sorted_by_downloads));
    page(&body, false)
}

pub fn render_charts(charts: &DashboardCharts) -> anyhow::Result<String> {
    let mut body = String::new();
    body.push_str("<section>\n<h2>Repositories</h2>\n");
    body.push_str(&repo_table(&charts.table));
    body.push_str("</section>\n<section>\n");
    body.push_str(&chart_fragment(
        "stars-chart",
        &time_series_traces(&charts.stars),
        &time_series_layout(&charts.stars),
    )?);
    body.push_str(&chart_fragment(
        "downloads-chart",
        &time_series_traces(&charts.downloads),
        &time_series_layout(&charts.downloads),
    )?);
    body.push_str(&chart_fragment(
        "combined-chart",
        &dual_axis_traces(&charts.combined),
        &dual_axis_layout(&charts.combined),
    )?);
    body.push_str("</section>\n");
    Ok(page(&body, true))
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(body: &str, with_plotly: bool) -> String {
    let plotly = if with_plotly {
        format!("<script src=\"{}\" charset=\"utf-8\"></script>\n", PLOTLY_CDN)
    } else {
        String::new()
    };
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n<style>{style}</style>\n{plotly}</head>\n<body>\n\
         <header><h1>{title}</h1></header>\n<main>\n{body}</main>\n</body>\n</html>\n",
        title = TITLE,
        style = STYLE,
        plotly = plotly,
        body = body,
    )
}

fn total_tile(value: &str, label: &str) -> String {
    format!(
        "<div class=\"total\"><span class=\"value\">{}</span><span class=\"label\">{}</span></div>",
        escape(value),
        escape(label)
    )
}

fn card_section(heading: &str, cards: &[RepoCard]) -> String {
    let mut out = format!("<section>\n<h2>{}</h2>\n<div class=\"cards\">\n", escape(heading));
    for card in cards {
        out.push_str(&repo_card(card));
    }
    out.push_str("</div>\n</section>\n");
    out
}

fn repo_card(card: &RepoCard) -> String {
    let pypi = match &card.pypi_link {
        Some(link) => format!("<a href=\"{}\">PyPI</a>", escape(link)),
        None => String::new(),
    };
    format!(
        "<article class=\"card\">\n<h3><a href=\"{link}\">{repo}</a></h3>\n\
         <dl>\n<dt>Stars</dt><dd>{stars}</dd>\n\
         <dt>Latest release</dt><dd>{version}</dd>\n\
         <dt>Published</dt><dd>{published}</dd>\n\
         <dt>Daily</dt><dd>{daily}</dd>\n\
         <dt>Weekly</dt><dd>{weekly}</dd>\n\
         <dt>Monthly</dt><dd>{monthly}</dd>\n\
         <dt>Total</dt><dd>{total}</dd>\n</dl>\n{pypi}\n</article>\n",
        link = escape(&card.github_link),
        repo = escape(&card.repo),
        stars = card.stars,
        version = escape(&card.latest_release_version),
        published = escape(&card.published_at),
        daily = escape(&card.daily_downloads),
        weekly = escape(&card.weekly_downloads),
        monthly = escape(&card.monthly_downloads),
        total = escape(&card.total_downloads),
        pypi = pypi,
    )
}

fn repo_table(cards: &[RepoCard]) -> String {
    let mut out = String::from(
        "<table>\n<thead><tr><th>Repository</th><th>Stars</th><th>Latest Release</th>\
         <th>Published</th><th>Daily</th><th>Weekly</th><th>Monthly</th><th>Total</th>\
         </tr></thead>\n<tbody>\n",
    );
    for card in cards {
        out.push_str(&format!(
            "<tr><td><a href=\"{}\">{}</a></td><td>{}</td><td>{}</td><td>{}</td>\
             <td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape(&card.github_link),
            escape(&card.repo),
            card.stars,
            escape(&card.latest_release_version),
            escape(&card.published_at),
            escape(&card.daily_downloads),
            escape(&card.weekly_downloads),
            escape(&card.monthly_downloads),
            escape(&card.total_downloads),
        ));
    }
    out.push_str("</tbody>\n</table>\n");
    out
}

fn chart_fragment(id: &str, traces: &Value, layout: &Value) -> anyhow::Result<String> {
    Ok(format!(
        "<div id=\"{id}\" class=\"chart\"></div>\n\
         <script>Plotly.newPlot(\"{id}\", {traces}, {layout}, {{\"responsive\": true}});</script>\n",
        id = escape(id),
        traces = script_json(traces)?,
        layout = script_json(layout)?,
    ))
}

/// JSON safe to inline in a `<script>` element.
fn script_json(value: &Value) -> anyhow::Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

fn series_trace(series: &Series) -> Value {
    let x: Vec<String> = series
        .points
        .iter()
        .map(|p| p.timestamp.format("%Y-%m-%d %H:%M:%S").to_string())
        .collect();
    let y: Vec<f64> = series.points.iter().map(|p| p.value).collect();
    json!({
        "type": "scatter",
        "mode": "lines+markers",
        "name": series.name,
        "x": x,
        "y": y,
    })
}

fn time_series_traces(figure: &TimeSeriesFigure) -> Value {
    Value::Array(figure.series.iter().map(series_trace).collect())
}

fn time_series_layout(figure: &TimeSeriesFigure) -> Value {
    json!({
        "title": { "text": figure.title },
        "xaxis": { "title": { "text": "Date" } },
        "yaxis": { "title": { "text": figure.y_label } },
        "hovermode": "x unified",
    })
}

fn dual_axis_traces(figure: &DualAxisFigure) -> Value {
    let left = series_trace(&figure.left);
    let mut right = series_trace(&figure.right);
    right["yaxis"] = json!("y2");
    json!([left, right])
}

fn dual_axis_layout(figure: &DualAxisFigure) -> Value {
    json!({
        "title": { "text": figure.title },
        "xaxis": { "title": { "text": "Date" } },
        "yaxis": { "title": { "text": figure.left.name } },
        "yaxis2": {
            "title": { "text": figure.right.name },
            "overlaying": "y",
            "side": "right",
        },
        "hovermode": "x unified",
    })
}
