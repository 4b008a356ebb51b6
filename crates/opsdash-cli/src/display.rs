//! Terminal rendering for the summary card, facet options and `watch` ticks.

use arrow::util::pretty::pretty_format_batches;
use opsdash_core::{Dataset, FilterSpec, FilteredView, Kpis, Status};
use opsdash_sync::Freshness;

use crate::pipeline::TickReport;

const MAX_FACET_ITEMS: usize = 15;

// ── Public API ──

/// KPI card, facet options, then the first `limit` rows as a table.
pub fn print_summary(
    dataset: &Dataset,
    spec: &FilterSpec,
    view: &FilteredView<'_>,
    kpis: &Kpis,
    limit: usize,
) -> anyhow::Result<()> {
    println!("=== Operations ===");
    println!("{}", describe_filters(spec));
    println!();

    println!("Indicators");
    println!("  {:<26} {}", "Records", kpis.records);
    for status in Status::ALL {
        let count = kpis.count(status);
        if count > 0 || status != Status::Unknown {
            println!("  {:<26} {}", status.label(), count);
        }
    }
    if dataset.dropped_rows() > 0 {
        println!("  {:<26} {}", "Skipped (bad coordinates)", dataset.dropped_rows());
    }
    println!();

    println!("Filter options");
    print_list("Zones", &dataset.zones());
    let statuses: Vec<&str> = dataset.statuses().iter().map(|s| s.label()).collect();
    print_list("Statuses", &statuses);
    println!();

    if view.is_empty() {
        println!("No records match the current filters.");
        return Ok(());
    }

    let batch = view.to_record_batch()?;
    let shown = batch.slice(0, limit.min(batch.num_rows()));
    println!("{}", pretty_format_batches(&[shown])?);
    if view.len() > limit {
        println!("... and {} more", view.len() - limit);
    }
    Ok(())
}

pub fn print_tick(report: &TickReport) {
    println!("{}", tick_line(report));
}

// ── Formatting ──

fn print_list(label: &str, items: &[&str]) {
    if items.is_empty() {
        println!("  {:<26} (none)", label);
        return;
    }
    let shown = &items[..items.len().min(MAX_FACET_ITEMS)];
    print!("  {:<26} {}", label, shown.join(", "));
    if items.len() > MAX_FACET_ITEMS {
        print!(" ... and {} more", items.len() - MAX_FACET_ITEMS);
    }
    println!();
}

fn describe_filters(spec: &FilterSpec) -> String {
    if let Some(term) = spec.search_term() {
        return format!("search: \"{term}\" (facets ignored)");
    }
    let statuses: Vec<&str> = spec.statuses.iter().map(|s| s.label()).collect();
    let zones: Vec<&str> = spec.zones.iter().map(String::as_str).collect();
    format!(
        "status: {}  zone: {}",
        or_all(&statuses.join(", ")),
        or_all(&zones.join(", "))
    )
}

fn or_all(joined: &str) -> &str {
    if joined.is_empty() { "all" } else { joined }
}

pub fn kpi_line(kpis: &Kpis) -> String {
    let parts: Vec<String> = Status::ALL
        .iter()
        .filter(|s| kpis.count(**s) > 0)
        .map(|s| format!("{}={}", s.label(), kpis.count(*s)))
        .collect();
    format!("records={} {}", kpis.records, parts.join(" "))
        .trim_end()
        .to_string()
}

fn tick_line(report: &TickReport) -> String {
    let state = match &report.freshness {
        Freshness::Online => "online".to_string(),
        Freshness::Stale { error } => format!("stale ({error})"),
        Freshness::Offline { error } => format!("offline ({error})"),
    };
    let at = report
        .fetched_at
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());
    let kpis = report
        .kpis
        .as_ref()
        .map(kpi_line)
        .unwrap_or_else(|| "no data".to_string());
    format!("[{:>3}] {state:<10} fetched {at}  {kpis}", report.tick)
}
