use serde::Serialize;

use mentorbridge_common::{AppError, WeekStatus};

use crate::roadmap::{Roadmap, Week};

/// Sets the completion flag of the task with `task_id`. Leaves the roadmap untouched
/// when no week holds such a task.
pub fn set_task_completion<'a>(
    roadmap: &'a mut Roadmap,
    task_id: &str,
    completed: bool,
) -> Result<&'a Roadmap, AppError> {
    let task = roadmap
        .weeks
        .iter_mut()
        .flat_map(|week| week.tasks.iter_mut())
        .find(|task| task.id == task_id)
        .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;

    task.completed = completed;
    Ok(roadmap)
}

/// Display status of the week at position `index`.
///
/// The first week reports in-progress even with nothing done; this is a display rule
/// only, later weeks are never gated on earlier ones.
pub fn week_status(week: &Week, index: usize) -> WeekStatus {
    let done = week.tasks.iter().filter(|t| t.completed).count();
    if done == week.tasks.len() {
        WeekStatus::Completed
    } else if done > 0 || index == 0 {
        WeekStatus::InProgress
    } else {
        WeekStatus::Upcoming
    }
}

/// `round(100 * completed / total)`, 0 for a roadmap without tasks.
pub fn completion_percent(roadmap: &Roadmap) -> u8 {
    let total = roadmap.task_count();
    if total == 0 {
        return 0;
    }
    let done = roadmap.tasks().filter(|t| t.completed).count();
    // integer round-half-up
    ((200 * done + total) / (2 * total)) as u8
}

pub fn all_complete(roadmap: &Roadmap) -> bool {
    roadmap.task_count() > 0 && roadmap.tasks().all(|t| t.completed)
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WeekProgress {
    pub week_id: String,
    pub status: WeekStatus,
    pub completed_tasks: usize,
    pub total_tasks: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub completion_percent: u8,
    pub all_complete: bool,
    pub weeks: Vec<WeekProgress>,
}

pub fn summarize(roadmap: &Roadmap) -> ProgressSummary {
    ProgressSummary {
        completion_percent: completion_percent(roadmap),
        all_complete: all_complete(roadmap),
        weeks: roadmap
            .weeks
            .iter()
            .enumerate()
            .map(|(index, week)| WeekProgress {
                week_id: week.week_id.clone(),
                status: week_status(week, index),
                completed_tasks: week.tasks.iter().filter(|t| t.completed).count(),
                total_tasks: week.tasks.len(),
            })
            .collect(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskUpdate {
    /// True only on the toggle that took the roadmap from unfinished to finished.
    pub just_completed: bool,
}

/// Single-task toggle that also reports the completion edge, so the completion
/// notification fires once per transition rather than on every later update.
pub fn update_task(
    roadmap: &mut Roadmap,
    task_id: &str,
    completed: bool,
) -> Result<TaskUpdate, AppError> {
    let was_complete = all_complete(roadmap);
    set_task_completion(roadmap, task_id, completed)?;

    Ok(TaskUpdate {
        just_completed: !was_complete && all_complete(roadmap),
    })
}
