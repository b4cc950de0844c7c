//! Layout command implementation - extraction followed by a full layout pass

use anyhow::{Context, Result};
use bubblemap_core::{BubbleChart, CategoryFilter, ChartKind, LabelOffset, Layout, SortKey, TopN};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::CliError;

/// View options collected from the command line
#[derive(Debug, Clone)]
pub struct LayoutArgs {
    pub hide: Vec<String>,
    pub category: CategoryFilter,
    pub top_n: Option<usize>,
    pub sort_by: SortKey,
    pub highlight: Option<String>,
    pub affinity_line: Option<f64>,
    pub offsets: Option<PathBuf>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// Document written by the layout command
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutReport<'a> {
    pub kind: ChartKind,
    pub target_name: &'a str,
    #[serde(flatten)]
    pub layout: &'a Layout,
}

pub fn execute(
    config: &Config,
    input: PathBuf,
    kind: ChartKind,
    args: LayoutArgs,
    output: Option<PathBuf>,
) -> Result<()> {
    log::info!("Computing {} layout for {}", kind, input.display());

    let layout_config = config.layout_for(kind)?;
    let grid = super::read_grid(&input)?;
    let extraction = bubblemap_core::extract(&grid, kind).map_err(CliError::from)?;
    let target_name = extraction.target_name.clone();

    let mut chart = BubbleChart::new(layout_config);
    chart.load(extraction);
    apply_args(&mut chart, &args)?;

    let layout = chart.layout();
    log::info!(
        "{} of {} points visible, {} overlapping pairs",
        layout.visible_points().count(),
        layout.points.len(),
        layout.overlaps.len()
    );

    let report = LayoutReport { kind, target_name: &target_name, layout };
    super::write_json(&report, output.as_ref(), config.general.pretty_json)
}

/// Apply the command-line view options to a loaded chart
pub fn apply_args(chart: &mut BubbleChart, args: &LayoutArgs) -> Result<()> {
    for name in &args.hide {
        let visible = chart.points().iter().find(|p| &p.id == name).map(|p| p.visible);
        match visible {
            Some(true) => {
                chart.toggle_visibility(name);
                log::debug!("Hiding '{}'", name);
            }
            Some(false) => {}
            None => log::warn!("Cannot hide unknown point '{}'", name),
        }
    }

    chart.set_category_filter(args.category);

    if let Some(n) = args.top_n {
        if n == 0 {
            return Err(CliError::validation("--top-n must be at least 1").into());
        }
        chart.set_top_n(Some(TopN::new(n, args.sort_by)));
    }

    if args.width.is_some() || args.height.is_some() {
        let mut viewport = chart.config().viewport;
        if let Some(width) = args.width {
            viewport.width = width;
        }
        if let Some(height) = args.height {
            viewport.height = height;
        }
        chart.set_viewport(viewport);
    }

    if let Some(path) = &args.offsets {
        let offsets = read_offsets(path)?;
        log::info!("Restoring {} manual label offsets", offsets.len());
        chart.set_manual_offsets(offsets);
    }

    chart.set_affinity_line(args.affinity_line);

    if let Some(id) = &args.highlight {
        chart.set_highlight(Some(id.as_str()));
        if chart.highlight().is_none() {
            log::warn!("Cannot highlight '{}': unknown or hidden", id);
        }
    }

    Ok(())
}

/// Read a `{ "<point id>": { "dx": .., "dy": .. } }` offsets file
pub fn read_offsets(path: &Path) -> Result<BTreeMap<String, LabelOffset>> {
    if !path.exists() {
        return Err(CliError::file_not_found(path.to_path_buf()).into());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read offsets file: {}", path.display()))?;
    let offsets = serde_json::from_str(&content)
        .map_err(|e| CliError::invalid_format(format!("{}: {}", path.display(), e)))?;
    Ok(offsets)
}
