//! Process every unit directory of a folder.
//!
//! Units are independent: each runs on the blocking pool, a failing unit is
//! reported without stopping the others, and units with missing inputs are
//! skipped with a notice.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bowsync_common::config::AppConfig;
use bowsync_common::error::{BowsyncResult, ErrorClass};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};

use crate::pipeline::{self, UnitInputs, UnitSummary};

pub const REPORT_FILE: &str = "bowsync-report.json";

/// Outcome of one unit.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UnitStatus {
    Completed(UnitSummary),
    Skipped { missing: Vec<String> },
    Failed { class: ErrorClass, message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct UnitReport {
    pub name: String,
    #[serde(flatten)]
    pub status: UnitStatus,
}

/// Batch run report, written next to the units.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub root: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub units: Vec<UnitReport>,
}

impl BatchReport {
    fn count(&self, pred: impl Fn(&UnitStatus) -> bool) -> usize {
        self.units.iter().filter(|u| pred(&u.status)).count()
    }

    pub fn completed(&self) -> usize {
        self.count(|s| matches!(s, UnitStatus::Completed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, UnitStatus::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, UnitStatus::Failed { .. }))
    }
}

pub async fn run(dir: PathBuf, jobs: Option<usize>, config: AppConfig) -> anyhow::Result<()> {
    println!("Batch processing: {}", dir.display());

    let report = process_dir(&dir, jobs, config).await?;

    for unit in &report.units {
        match &unit.status {
            UnitStatus::Completed(summary) => {
                println!(
                    "  [OK]   {}: {} segments, {} events, {} annotations",
                    unit.name, summary.segments, summary.events, summary.annotations
                );
                if let Some(alignment) = &summary.alignment {
                    println!("         [WARN] {alignment}");
                }
            }
            UnitStatus::Skipped { missing } => {
                println!("  [SKIP] {}: missing {}", unit.name, missing.join(", "));
            }
            UnitStatus::Failed { class, message } => {
                println!("  [FAIL] {} ({class:?}): {message}", unit.name);
            }
        }
    }

    let report_path = dir.join(REPORT_FILE);
    std::fs::write(&report_path, serde_json::to_string_pretty(&report)?)?;

    println!(
        "\n{} completed, {} skipped, {} failed in {:.2}s",
        report.completed(),
        report.skipped(),
        report.failed(),
        (report.finished_at - report.started_at).num_milliseconds() as f64 / 1000.0
    );
    println!("Report saved to: {}", report_path.display());

    Ok(())
}

/// Run every unit under `dir`, at most `jobs` at a time.
pub async fn process_dir(
    dir: &Path,
    jobs: Option<usize>,
    config: AppConfig,
) -> anyhow::Result<BatchReport> {
    let started_at = Utc::now();
    let unit_dirs = unit_dirs(dir)?;
    let jobs = jobs
        .or_else(|| std::thread::available_parallelism().map(|n| n.get()).ok())
        .unwrap_or(1)
        .max(1);

    tracing::info!(root = %dir.display(), units = unit_dirs.len(), jobs, "Starting batch");

    let config = Arc::new(config);
    let semaphore = Arc::new(Semaphore::new(jobs));
    let mut units = Vec::with_capacity(unit_dirs.len());
    let mut set = JoinSet::new();

    for unit_dir in unit_dirs {
        let inputs = match UnitInputs::discover(&unit_dir) {
            Ok(inputs) => inputs,
            Err(missing) => {
                let name = display_name(&unit_dir);
                tracing::warn!(unit = %name, ?missing, "Skipping unit with missing inputs");
                units.push(UnitReport {
                    name,
                    status: UnitStatus::Skipped {
                        missing: missing.into_iter().map(String::from).collect(),
                    },
                });
                continue;
            }
        };

        let permit = semaphore.clone().acquire_owned().await?;
        let config = Arc::clone(&config);
        set.spawn(async move {
            let _permit = permit;
            let name = inputs.name.clone();
            let joined =
                tokio::task::spawn_blocking(move || pipeline::run_unit(&inputs, &config)).await;
            UnitReport {
                status: unit_status(&name, joined),
                name,
            }
        });
    }

    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(report) => units.push(report),
            Err(e) => tracing::error!("Batch task aborted: {e}"),
        }
    }
    units.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(BatchReport {
        root: dir.to_path_buf(),
        started_at,
        finished_at: Utc::now(),
        units,
    })
}

/// Status of a finished unit. A panic inside the unit is contained to it.
fn unit_status(name: &str, joined: Result<BowsyncResult<UnitSummary>, JoinError>) -> UnitStatus {
    match joined {
        Ok(Ok(summary)) => UnitStatus::Completed(summary),
        Ok(Err(e)) => {
            tracing::error!(unit = %name, class = ?e.class(), "Unit failed: {e}");
            UnitStatus::Failed {
                class: e.class(),
                message: e.to_string(),
            }
        }
        Err(e) => {
            tracing::error!(unit = %name, "Unit task aborted: {e}");
            UnitStatus::Failed {
                class: ErrorClass::Resource,
                message: format!("unit task aborted: {e}"),
            }
        }
    }
}

/// Immediate subdirectories, sorted by name.
fn unit_dirs(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(dir)
        .map_err(|e| anyhow::anyhow!("Cannot read batch folder {}: {e}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn display_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_support::write_unit;

    #[tokio::test]
    async fn test_batch_isolates_units() {
        let root = tempfile::tempdir().unwrap();
        write_unit(&root.path().join("a-good"));
        write_unit(&root.path().join("c-good"));

        // Missing audio: skipped.
        let partial = root.path().join("b-partial");
        write_unit(&partial);
        std::fs::remove_file(partial.join(pipeline::AUDIO_FILE)).unwrap();

        // One-sample trajectory: fails with an input error.
        let short = root.path().join("d-short");
        write_unit(&short);
        std::fs::write(
            short.join(pipeline::KEYPOINTS_FILE),
            "Frame,Keypoint Index,X,Y\n0,0,1.0,1.0\n",
        )
        .unwrap();

        let report = process_dir(root.path(), Some(2), AppConfig::default())
            .await
            .unwrap();

        let names: Vec<&str> = report.units.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["a-good", "b-partial", "c-good", "d-short"]);
        assert_eq!(report.completed(), 2);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.failed(), 1);

        match &report.units[3].status {
            UnitStatus::Failed { class, .. } => assert_eq!(*class, ErrorClass::Input),
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(root.path().join("a-good").join(pipeline::ANNOTATED_FILE).is_file());
        assert!(!partial.join(pipeline::ANNOTATED_FILE).exists());
    }

    #[tokio::test]
    async fn test_misaligned_unit_completes_with_warning() {
        let root = tempfile::tempdir().unwrap();
        write_unit(&root.path().join("late"));

        let config = AppConfig {
            sync: bowsync_common::config::SyncConfig {
                frame_offset: 5000,
                ..Default::default()
            },
            ..Default::default()
        };
        let report = process_dir(root.path(), None, config).await.unwrap();

        match &report.units[0].status {
            UnitStatus::Completed(summary) => {
                assert_eq!(summary.annotations, 0);
                assert!(summary.alignment.is_some());
            }
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_frames_at_integer_limit_fail_only_their_unit() {
        let root = tempfile::tempdir().unwrap();
        write_unit(&root.path().join("a-good"));

        let huge = root.path().join("b-huge");
        write_unit(&huge);
        std::fs::write(
            huge.join(pipeline::KEYPOINTS_FILE),
            "Frame,Keypoint Index,X,Y\n\
             9223372036854775700,0,100.0,0.0\n\
             9223372036854775701,0,100.0,5.0\n",
        )
        .unwrap();

        let report = process_dir(root.path(), Some(2), AppConfig::default())
            .await
            .unwrap();

        assert_eq!(report.completed(), 1);
        match &report.units[1].status {
            UnitStatus::Failed { class, message } => {
                assert_eq!(*class, ErrorClass::Input);
                assert!(message.contains("overflow"), "{message}");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_panicking_unit_becomes_failed_status() {
        let joined = tokio::task::spawn_blocking(|| -> BowsyncResult<UnitSummary> {
            panic!("unit exploded")
        })
        .await;
        assert!(joined.is_err());

        match unit_status("boom", joined) {
            UnitStatus::Failed { class, message } => {
                assert_eq!(class, ErrorClass::Resource);
                assert!(message.contains("panicked"), "{message}");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_report_serializes_status_tag() {
        let report = UnitReport {
            name: "x".into(),
            status: UnitStatus::Skipped {
                missing: vec!["audio.wav".into()],
            },
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "skipped");
        assert_eq!(json["missing"][0], "audio.wav");
    }
}
