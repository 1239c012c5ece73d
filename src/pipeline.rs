//! End-to-end analysis of one task list.
//!
//! normalize → discover groups → check compliance → detect nesting →
//! summarize. Each call is a pure function of the records and the config;
//! nothing is kept between runs.

use crate::analysis::groups::discover_groups;
use crate::analysis::partition::{Partitioner, partitioner_for};
use crate::analysis::summary::summarize_groups;
use crate::check::compliance::{assess, split_by_status};
use crate::check::nested::detect_nested_groups;
use crate::config::{AnalysisConfig, NESTED_TARGET_RATIO};
use crate::logging::{self, Stage};
use crate::model::{AnalysisError, NormalizedTask, TaskAssessment, TaskRecord, group_label};
use crate::normalize::normalize_all;
use crate::report::{AnalysisRun, RunMetrics};

/// Runs the pipeline with the partitioner named in the config.
pub fn run_analysis(
    records: &[TaskRecord],
    config: &AnalysisConfig,
) -> Result<AnalysisRun, AnalysisError> {
    let partitioner = partitioner_for(config.grouping.algorithm);
    run_analysis_with(records, config, partitioner.as_ref())
}

/// Runs the pipeline with an explicit partitioner.
///
/// Fails only when no record has a usable interval, or when the config is
/// out of range. Every other data problem degrades per task.
pub fn run_analysis_with(
    records: &[TaskRecord],
    config: &AnalysisConfig,
    partitioner: &dyn Partitioner,
) -> Result<AnalysisRun, AnalysisError> {
    config.validate()?;

    let preview = normalize_all(records, &config.conversion);
    for task in preview.iter().filter(|t| !t.is_groupable()) {
        logging::debug(
            Stage::Normalize,
            Some(&task.record.task_id),
            "no positive FH/FC/calendar interval; excluded from grouping",
        );
    }

    let grouped: Vec<&NormalizedTask> = preview.iter().filter(|t| t.is_groupable()).collect();
    let intervals: Vec<f64> = grouped.iter().filter_map(|t| t.interval_efh).collect();
    if intervals.is_empty() {
        logging::error(Stage::Normalize, None, "No task has a valid EFH interval");
        return Err(AnalysisError::NoValidIntervals {
            tasks_seen: records.len(),
        });
    }

    let discovery = discover_groups(&intervals, &config.grouping, partitioner)?;

    let tolerance = config.compliance.tolerance;
    let assessments: Vec<TaskAssessment> = grouped
        .iter()
        .zip(&discovery.assignments)
        .zip(&intervals)
        .map(|((task, &group_id), &interval)| {
            let center = discovery.center_of(group_id);
            let verdict = assess(Some(interval), center, tolerance);
            let r = &task.record;
            TaskAssessment {
                task_id: r.task_id.clone(),
                title: r.title.clone(),
                ata: r.ata.clone(),
                fh: r.fh,
                cy: r.cy,
                cal: r.cal,
                cal_code: r.cal_code.clone(),
                interval_efh: interval,
                group_id,
                group_center_efh: center.unwrap_or(f64::NAN),
                verdict,
            }
        })
        .collect();

    let (in_group, out_of_phase) = split_by_status(&assessments);
    for task in &out_of_phase {
        logging::debug(
            Stage::Compliance,
            Some(&task.task_id),
            &format!(
                "out of phase with {} (interval {:.1}, center {:.1}, late risk {})",
                group_label(task.group_id),
                task.interval_efh,
                task.group_center_efh,
                task.verdict.late_risk
            ),
        );
    }

    let nested = detect_nested_groups(&discovery.centers, config.nesting.eps);
    logging::info(
        Stage::Nesting,
        None,
        &format!(
            "{} of {} groups nested; {} effective",
            nested.nested_count(),
            nested.total_groups(),
            nested.effective_count()
        ),
    );

    let group_summary = summarize_groups(&assessments);

    let metrics = RunMetrics {
        chosen_k: discovery.k,
        k_forced: discovery.forced,
        partitioner: partitioner.name().to_string(),
        fc_to_fh: config.conversion.fc_to_fh,
        mo_to_fh: config.conversion.mo_to_fh,
        tolerance,
        nested_target_ratio: NESTED_TARGET_RATIO,
        nested_eps: config.nesting.eps,
        effective_groups: nested.effective_count(),
        total_groups: nested.total_groups(),
        effective_reduction: nested.effective_reduction,
        tasks_total: records.len(),
        tasks_grouped: assessments.len(),
        tasks_excluded: records.len() - assessments.len(),
        tasks_in_group: in_group.len(),
        tasks_out_of_phase: out_of_phase.len(),
    };
    logging::log_run_summary(
        metrics.tasks_total,
        metrics.tasks_grouped,
        metrics.tasks_in_group,
        metrics.tasks_out_of_phase,
    );

    Ok(AnalysisRun {
        preview,
        in_group,
        out_of_phase,
        group_centers: discovery.centers.clone(),
        inertia_trace: discovery.inertia_trace,
        nested,
        group_summary,
        metrics,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
