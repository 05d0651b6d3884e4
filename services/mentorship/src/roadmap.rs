use std::collections::HashSet;

use dashmap::{mapref::one::RefMut, DashMap};
use serde::{Deserialize, Serialize};

use mentorbridge_common::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Week {
    pub week_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Roadmap {
    pub weeks: Vec<Week>,
}

impl Roadmap {
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.weeks.iter().flat_map(|week| week.tasks.iter())
    }

    pub fn task_count(&self) -> usize {
        self.weeks.iter().map(|week| week.tasks.len()).sum()
    }

    /// Structural checks for roadmaps that come from outside the process.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.weeks.is_empty() {
            return Err(AppError::InvalidArgument("roadmap has no weeks".to_string()));
        }

        let mut seen = HashSet::new();
        for week in &self.weeks {
            if week.tasks.is_empty() {
                return Err(AppError::InvalidArgument(format!(
                    "week {} has no tasks",
                    week.week_id
                )));
            }
            for task in &week.tasks {
                if task.id.trim().is_empty() {
                    return Err(AppError::InvalidArgument("task without id".to_string()));
                }
                if !seen.insert(task.id.as_str()) {
                    return Err(AppError::InvalidArgument(format!(
                        "duplicate task id {}",
                        task.id
                    )));
                }
            }
        }

        Ok(())
    }
}

fn week(week_id: &str, title: &str, description: &str, tasks: [&str; 3]) -> Week {
    Week {
        week_id: week_id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        tasks: tasks
            .iter()
            .enumerate()
            .map(|(i, title)| Task {
                id: format!("{}t{}", week_id, i + 1),
                title: title.to_string(),
                completed: false,
            })
            .collect(),
    }
}

/// The four-week plan every user starts from.
pub fn default_template() -> Roadmap {
    Roadmap {
        weeks: vec![
            week(
                "w1",
                "Foundation & Assessment",
                "Master environment configuration and fundamental concepts.",
                [
                    "Complete skills assessment quiz",
                    "Set up development environment",
                    "Review fundamentals & prerequisites",
                ],
            ),
            week(
                "w2",
                "Core Concepts Deep Dive",
                "Explore complex concepts and hands-on exercises.",
                [
                    "Study core theory & principles",
                    "Complete 3 hands-on exercises",
                    "Join peer study group session",
                ],
            ),
            week(
                "w3",
                "Practical Application",
                "Build real projects and get code review.",
                [
                    "Build a mini-project",
                    "Code review with mentor",
                    "Document learnings & patterns",
                ],
            ),
            week(
                "w4",
                "Capstone & Reflection",
                "Complete capstone and plan next phase.",
                [
                    "Complete capstone project",
                    "Present to mentor for feedback",
                    "Plan next learning phase",
                ],
            ),
        ],
    }
}

/// Per-user roadmaps, instantiated from the template on first access.
///
/// Each user's roadmap is its own owned value; the map shards give one writer per
/// roadmap at a time. Callers must not hold the returned guard while touching another
/// user's roadmap.
pub struct RoadmapStore {
    template: Roadmap,
    roadmaps: DashMap<String, Roadmap>,
}

impl Default for RoadmapStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RoadmapStore {
    pub fn new() -> Self {
        Self::with_template(default_template())
    }

    pub fn with_template(template: Roadmap) -> Self {
        Self {
            template,
            roadmaps: DashMap::new(),
        }
    }

    pub fn template(&self) -> &Roadmap {
        &self.template
    }

    pub fn get_or_create(&self, user_id: &str) -> RefMut<'_, String, Roadmap> {
        self.roadmaps
            .entry(user_id.to_string())
            .or_insert_with(|| {
                tracing::debug!("Creating roadmap for user {}", user_id);
                self.template.clone()
            })
    }

    /// Owned copy of the user's roadmap, creating it if needed.
    pub fn snapshot(&self, user_id: &str) -> Roadmap {
        self.get_or_create(user_id).clone()
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.roadmaps.contains_key(user_id)
    }

    pub fn len(&self) -> usize {
        self.roadmaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roadmaps.is_empty()
    }
}
