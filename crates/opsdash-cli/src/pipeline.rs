//! Load → filter → {KPIs, map, export} wiring shared by the commands.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, Utc};
use opsdash_core::{Dataset, FilterSpec, FilteredView, Kpis, filter};
use opsdash_export::{ExportArtifact, ExportFormat, build};
use opsdash_map::{MapArtifact, RenderOptions, render};
use opsdash_sync::{CsvSource, DatasetLoader, Freshness};
use tracing::info;

/// Everything a single dashboard pass derives from one dataset.
pub struct Dashboard<'a> {
    pub view: FilteredView<'a>,
    pub kpis: Kpis,
    pub map: MapArtifact,
}

pub fn run<'a>(dataset: &'a Dataset, spec: &FilterSpec, options: &RenderOptions) -> Dashboard<'a> {
    let view = filter(dataset, spec);
    let kpis = Kpis::of(&view);
    let map = render(&view, options);
    info!(
        rows = dataset.len(),
        kept = view.len(),
        dropped = dataset.dropped_rows(),
        "applied filters"
    );
    Dashboard { view, kpis, map }
}

/// Write `artifact` into `dir` under its own file name.
pub fn save(artifact: &ExportArtifact, dir: &Path) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(&artifact.filename);
    std::fs::write(&path, &artifact.bytes)
        .with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), bytes = artifact.bytes.len(), "saved export");
    Ok(path)
}

pub fn export_all(
    view: &FilteredView<'_>,
    spec: &FilterSpec,
    formats: &[ExportFormat],
    dir: &Path,
) -> anyhow::Result<Vec<PathBuf>> {
    formats
        .iter()
        .map(|format| {
            let artifact = build(view, spec, *format)?;
            save(&artifact, dir)
        })
        .collect()
}

/// One `watch` tick: freshness plus KPIs when any data is available.
#[derive(Debug, Clone)]
pub struct TickReport {
    pub tick: u64,
    pub freshness: Freshness,
    pub fetched_at: Option<DateTime<Utc>>,
    pub kpis: Option<Kpis>,
}

/// Refresh every `interval` until `ticks` reports have been produced (forever if `None`).
///
/// Fetch failures never end the loop; they show up as stale or offline reports.
pub async fn watch<S, F>(
    loader: &DatasetLoader<S>,
    url: &str,
    spec: &FilterSpec,
    interval: Duration,
    ticks: Option<u64>,
    mut on_tick: F,
) where
    S: CsvSource,
    F: FnMut(&TickReport),
{
    let mut timer = tokio::time::interval(interval);
    let mut tick = 0u64;
    while ticks.is_none_or(|limit| tick < limit) {
        timer.tick().await;
        tick += 1;

        let snapshot = loader.refresh(url).await;
        let kpis = snapshot
            .dataset
            .as_deref()
            .map(|dataset| Kpis::of(&filter(dataset, spec)));

        on_tick(&TickReport {
            tick,
            freshness: snapshot.freshness,
            fetched_at: snapshot.fetched_at,
            kpis,
        });
    }
}
