//! Per-day page engagement.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use tally_records::summary::{fixed2, round2};
use tally_records::{ClickRow, DateStyle, PageViewRow, ScrollRow, SummaryTable, TableData};

use crate::filter::DateFilter;
use crate::group::{distinct_count, group_by};

/// One output row of `page_engagement_metrics.csv`.
#[derive(Debug, Clone)]
pub struct PageDayRow {
    pub date: NaiveDate,
    pub path: String,
    pub pageviews: usize,
    pub unique_users: usize,
    pub sessions_with_page: usize,
    pub avg_scroll_depth: f64,
    pub total_clicks: usize,
}

/// Per-day traffic, scroll depth and clicks per page path.
#[derive(Debug, Clone)]
pub struct PageDayMetrics {
    rows: Vec<PageDayRow>,
}

impl PageDayMetrics {
    pub fn rows(&self) -> &[PageDayRow] {
        &self.rows
    }
}

/// Builds the per-day page rollup from pageviews.
///
/// Returns `None` when the pageview table is not loaded. Scroll and
/// click tables are optional; pages without matching rows report zero
/// scroll depth and zero clicks.
pub fn build(
    pageviews: Option<&TableData<PageViewRow>>,
    scrolls: Option<&TableData<ScrollRow>>,
    clicks: Option<&TableData<ClickRow>>,
    filter: &DateFilter,
) -> Option<PageDayMetrics> {
    let Some(pageviews) = pageviews else {
        warn!("pageview table not loaded, skipping page engagement");
        return None;
    };

    let views = group_by(pageviews.rows(), |pv| {
        let date = pv.time?.date();
        (filter.contains(date) && !pv.path.is_empty()).then(|| (date, pv.path.as_str()))
    });

    let mut scroll_sums: HashMap<(NaiveDate, &str), (f64, usize)> = HashMap::new();
    if let Some(scrolls) = scrolls {
        for scroll in scrolls.rows() {
            let (Some(time), Some(pct)) = (scroll.time, scroll.scroll_percent) else {
                continue;
            };
            let date = time.date();
            if scroll.path.is_empty() || !filter.contains(date) {
                continue;
            }
            let entry = scroll_sums.entry((date, scroll.path.as_str())).or_default();
            entry.0 += pct;
            entry.1 += 1;
        }
    }

    let mut click_counts: HashMap<(NaiveDate, &str), usize> = HashMap::new();
    if let Some(clicks) = clicks {
        for click in clicks.rows() {
            let Some(time) = click.time else { continue };
            let date = time.date();
            if click.path.is_empty() || !filter.contains(date) {
                continue;
            }
            *click_counts.entry((date, click.path.as_str())).or_default() += 1;
        }
    }

    let mut rows: Vec<PageDayRow> = views
        .into_iter()
        .map(|((date, path), group)| {
            let avg_scroll_depth = scroll_sums
                .get(&(date, path))
                .map(|&(sum, count)| round2(sum / count as f64))
                .unwrap_or(0.0);
            PageDayRow {
                date,
                path: path.to_string(),
                pageviews: group.len(),
                unique_users: distinct_count(&group, |pv| pv.user_id.as_str()),
                sessions_with_page: distinct_count(&group, |pv| pv.session_id.as_str()),
                avg_scroll_depth,
                total_clicks: click_counts.get(&(date, path)).copied().unwrap_or(0),
            }
        })
        .collect();

    rows.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| b.pageviews.cmp(&a.pageviews)));

    let mut by_path: BTreeMap<&str, usize> = BTreeMap::new();
    for row in &rows {
        *by_path.entry(row.path.as_str()).or_default() += row.pageviews;
    }
    let mut ranked: Vec<(&str, usize)> = by_path.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    for &(path, views) in ranked.iter().take(5) {
        debug!(path, views, "top page by views");
    }

    info!(
        rows = rows.len(),
        pages = ranked.len(),
        pageviews = pageviews.len(),
        "page engagement aggregated"
    );

    Some(PageDayMetrics { rows })
}

impl SummaryTable for PageDayMetrics {
    fn file_name(&self) -> &'static str {
        "page_engagement_metrics.csv"
    }

    fn header(&self) -> Vec<String> {
        [
            "date",
            "path",
            "pageviews",
            "unique_users",
            "sessions_with_page",
            "avg_scroll_depth",
            "total_clicks",
        ]
        .map(String::from)
        .into()
    }

    fn render(&self, dates: &DateStyle) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                vec![
                    dates.format(row.date),
                    row.path.clone(),
                    row.pageviews.to_string(),
                    row.unique_users.to_string(),
                    row.sessions_with_page.to_string(),
                    fixed2(row.avg_scroll_depth),
                    row.total_clicks.to_string(),
                ]
            })
            .collect()
    }

    fn len(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
#[path = "engagement_test.rs"]
mod engagement_test;
