// Result publishing: the frozen run outcome goes to disk (violations as
// JSONL, the full report as JSON) and to the log as a summary block the
// operator can read at a glance.

use anyhow::Result;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::engine::FinalReport;

/// Write one JSON line per violation, in log order.
pub fn write_violations_jsonl(report: &FinalReport, out_dir: &Path, session: &str) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(format!("{}_violations.jsonl", session));
    let mut file = fs::File::create(&path)?;
    for record in &report.records {
        writeln!(file, "{}", serde_json::to_string(record)?)?;
    }
    file.flush()?;
    info!("💾 Violations written to {}", path.display());
    Ok(path)
}

/// Write the full report, stamped so successive runs of the same session
/// don't clobber each other.
pub fn write_report_json(report: &FinalReport, out_dir: &Path, session: &str) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)?;
    let stamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let path = out_dir.join(format!("{}_report_{}.json", session, stamp));
    fs::write(&path, serde_json::to_string_pretty(report)?)?;
    info!("💾 Report written to {}", path.display());
    Ok(path)
}

/// Operator-facing summary, one line per category plus the verdict.
pub fn log_summary(session: &str, report: &FinalReport) {
    info!("📊 Result for {}:", session);
    for entry in &report.counts_by_module {
        if entry.count > 0 {
            info!("  {}: {}", entry.label, entry.count);
        }
    }
    info!("  Total violations: {}", report.total_violations);
    if report.failed {
        warn!("  ❌ Verdict: FAILED");
    } else {
        info!("  ✅ Verdict: PASSED");
    }
}
