mod adapters;
mod config;
mod engine;
mod environment;
mod replay;
mod report;
mod rules;
mod turn_commit;
mod types;

use anyhow::Result;
use std::path::Path;
use tracing::{error, info, warn};
use types::Config;

fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.yaml".to_string());

    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            // missing config is not fatal; defaults carry the full rule set
            eprintln!(
                "Could not load {} ({}); continuing with defaults",
                config_path, e
            );
            Config::default()
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "traffic_rule_detection={}",
            config.logging.level
        ))
        .init();

    info!("🚗 Traffic Rule Detection starting");
    info!(
        "Engine config: max_violations={}, look_window={:.0}s, speed_limit={:.0} km/h",
        config.engine.max_allowed_violations,
        config.engine.look_time_window_s,
        config.speed.limit_kmh
    );

    let sessions = replay::find_session_files(&config.replay.input_dir)?;
    if sessions.is_empty() {
        error!("No session files found in {}", config.replay.input_dir);
        return Ok(());
    }

    let out_dir = Path::new(&config.replay.output_dir);
    let mut failed_runs = 0usize;

    for (idx, session_path) in sessions.iter().enumerate() {
        info!("========================================");
        info!(
            "Replaying session {}/{}: {}",
            idx + 1,
            sessions.len(),
            session_path.display()
        );

        let session_name = session_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("session")
            .to_string();

        match replay::replay_session(session_path, &config) {
            Ok((final_report, stats)) => {
                info!(
                    "  {} tick(s), {} event(s), {} skipped line(s), {} checkpoint(s)",
                    stats.ticks, stats.events, stats.skipped_lines, stats.checkpoints_cleared
                );
                if !stats.finished_by_goal {
                    warn!("  Session had no finish trigger");
                }

                report::log_summary(&session_name, &final_report);

                if final_report.failed {
                    failed_runs += 1;
                }

                if let Err(e) = report::write_violations_jsonl(&final_report, out_dir, &session_name)
                {
                    warn!("Failed to write violations for {}: {}", session_name, e);
                }
                if let Err(e) = report::write_report_json(&final_report, out_dir, &session_name) {
                    warn!("Failed to write report for {}: {}", session_name, e);
                }
            }
            Err(e) => error!("Failed to replay {}: {}", session_path.display(), e),
        }
    }

    info!("========================================");
    info!(
        "Done: {} session(s), {} failed run(s)",
        sessions.len(),
        failed_runs
    );

    Ok(())
}
