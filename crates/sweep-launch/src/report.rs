use std::{fs, path::Path};

use anyhow::Context;
use colored::Colorize;
use sweep_model::{JobRecord, JobStatus, RunSummary};

fn marker(status: JobStatus) -> colored::ColoredString {
    match status {
        JobStatus::Completed => "OK".green().bold(),
        JobStatus::Failed => "FAIL".red().bold(),
        JobStatus::Cancelled => "CANCEL".yellow().bold(),
        JobStatus::Queued => "SKIP".dimmed(),
        JobStatus::Running => "RUN".cyan(),
    }
}

fn line(job: &JobRecord) -> String {
    let mut out = format!("{:>6} #{:<4}", marker(job.status), job.index);
    if let Some(slot) = &job.slot {
        out.push_str(&format!(" [{slot}]"));
    }
    if let Some(secs) = job.duration_secs {
        out.push_str(&format!(" {secs:.1}s"));
    }
    if let Some(err) = &job.error {
        out.push_str(&format!(" {}", err.red()));
    }
    out.push_str("  ");
    out.push_str(&job.command_line);
    out
}

/// Per-job outcome lines followed by the totals.
pub fn render(summary: &RunSummary) -> String {
    let mut out = String::new();
    for job in &summary.jobs {
        out.push_str(&line(job));
        out.push('\n');
    }

    let totals = format!(
        "{} jobs: {} completed, {} failed, {} cancelled, {} not started; peak {} running; {:.1}s",
        summary.total(),
        summary.completed,
        summary.failed,
        summary.cancelled,
        summary.queued,
        summary.peak_running,
        summary.wall_secs,
    );
    let totals = if summary.all_completed() {
        totals.green()
    } else if summary.interrupted {
        totals.yellow()
    } else {
        totals.red()
    };
    out.push_str(&totals.to_string());
    out.push('\n');
    out
}

/// Indices of the jobs that were terminated by an interrupt.
pub fn terminated(summary: &RunSummary) -> Vec<usize> {
    summary
        .jobs
        .iter()
        .filter(|j| j.status == JobStatus::Cancelled)
        .map(|j| j.index)
        .collect()
}

pub fn write_summary(summary: &RunSummary, path: &Path) -> anyhow::Result<()> {
    if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("cannot create {}", dir.display()))?;
    }
    let json = serde_json::to_string_pretty(summary).context("cannot serialize run summary")?;
    fs::write(path, json).with_context(|| format!("cannot write summary {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn record(index: usize, status: JobStatus) -> JobRecord {
        JobRecord {
            index,
            status,
            slot: (status != JobStatus::Queued).then(|| "-pu0".to_string()),
            exit_code: match status {
                JobStatus::Completed => Some(0),
                JobStatus::Failed => Some(2),
                _ => None,
            },
            duration_secs: (status != JobStatus::Queued).then_some(1.25),
            error: (status == JobStatus::Failed).then(|| "exit code: 2".to_string()),
            command_line: format!("START /NORMAL /WAIT \"\" \"engine\" -e1 {index:02} \"t.tcf\""),
        }
    }

    fn summary(statuses: &[JobStatus], interrupted: bool) -> RunSummary {
        let jobs = statuses
            .iter()
            .enumerate()
            .map(|(i, s)| record(i + 1, *s))
            .collect();
        RunSummary::from_records(jobs, 2, Duration::from_secs(3), interrupted)
    }

    #[test]
    fn report_lists_every_job_and_totals() {
        colored::control::set_override(false);
        let s = summary(
            &[JobStatus::Completed, JobStatus::Failed, JobStatus::Queued],
            false,
        );
        let text = render(&s);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("OK") && lines[0].contains("#1") && lines[0].contains("[-pu0]"));
        assert!(lines[1].contains("FAIL") && lines[1].contains("exit code: 2"));
        assert!(lines[2].contains("SKIP") && !lines[2].contains("[-pu0]"));
        assert!(lines[3].starts_with("3 jobs: 1 completed, 1 failed, 0 cancelled, 1 not started"));
    }

    #[test]
    fn terminated_lists_cancelled_jobs_only() {
        let s = summary(
            &[
                JobStatus::Completed,
                JobStatus::Cancelled,
                JobStatus::Cancelled,
                JobStatus::Queued,
            ],
            true,
        );
        assert_eq!(terminated(&s), vec![2, 3]);
    }

    #[test]
    fn summary_is_written_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/summary.json");
        let s = summary(&[JobStatus::Completed], false);

        write_summary(&s, &path).unwrap();

        let back: RunSummary = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, s);
        assert!(fs::read_to_string(&path).unwrap().contains("\"peakRunning\": 2"));
    }
}
