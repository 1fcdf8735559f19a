//! Export — JSON and CSV artifacts from a walk-forward run.
//!
//! Two CSV shapes: the window log (one row per out-of-sample window) and the
//! score surface (one row per delta pair). JSON carries the full log for
//! round-tripping into other tools.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::aggregate::summarize;
use crate::surface::ScoreSurface;
use crate::walk_forward::WalkForwardLog;

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize the full log to pretty JSON.
pub fn export_log_json(log: &WalkForwardLog) -> Result<String> {
    serde_json::to_string_pretty(log).context("failed to serialize walk-forward log to JSON")
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export the window log as CSV, one row per evaluated window.
///
/// Columns: period_start, period_end, params, net_profit, trade_count, score
pub fn export_log_csv(log: &WalkForwardLog) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "period_start",
        "period_end",
        "params",
        "net_profit",
        "trade_count",
        "score",
    ])?;

    for r in &log.records {
        wtr.write_record([
            &r.period_start.to_string(),
            &r.period_end.to_string(),
            &r.params.key(),
            &format!("{:.2}", r.net_profit),
            &r.trade_count.to_string(),
            &format!("{:.4}", r.score),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export a score surface as a delta_htf × delta_ltf matrix: one row per
/// HTF delta, one column per LTF delta. Cells nothing scored are written
/// empty rather than as "NaN".
pub fn export_surface_csv(surface: &ScoreSurface) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec!["rsi_delta_htf".to_string()];
    header.extend(surface.delta_ltf_axis().iter().map(|v| v.to_string()));
    wtr.write_record(&header)?;

    for (r, &htf) in surface.delta_htf_axis().iter().enumerate() {
        let mut row = vec![htf.to_string()];
        for score in &surface.cells()[r] {
            row.push(if score.is_nan() {
                String::new()
            } else {
                format!("{score:.4}")
            });
        }
        wtr.write_record(&row)?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the artifact set of a run under `output_dir`:
/// - `log.json` — the full window log
/// - `windows.csv` — the window log as CSV
/// - `summary.json` — aggregate numbers over the log
///
/// Returns the paths written.
pub fn save_artifacts(log: &WalkForwardLog, output_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create artifact dir: {}", output_dir.display()))?;

    let log_json = output_dir.join("log.json");
    std::fs::write(&log_json, export_log_json(log)?)?;

    let windows_csv = output_dir.join("windows.csv");
    std::fs::write(&windows_csv, export_log_csv(log)?)?;

    let summary_json = output_dir.join("summary.json");
    let summary = serde_json::to_string_pretty(&summarize(log))
        .context("failed to serialize summary to JSON")?;
    std::fs::write(&summary_json, summary)?;

    Ok(vec![log_json, windows_csv, summary_json])
}
