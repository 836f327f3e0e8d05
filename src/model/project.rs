use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::task::{Dependency, Task};

/// Receives the normalized task list after every schedule edit.
///
/// This is the project-update interface of the surrounding application: the
/// engine never knows where the tasks end up.
pub trait ProjectUpdate {
    fn update_tasks(&mut self, tasks: Vec<Task>);
}

impl<F> ProjectUpdate for F
where
    F: FnMut(Vec<Task>),
{
    fn update_tasks(&mut self, tasks: Vec<Task>) {
        self(tasks)
    }
}

/// A construction project with its activity list and metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub tasks: Vec<Task>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            name: "Untitled Project".to_string(),
            tasks: Vec::new(),
            created: Utc::now(),
            modified: Utc::now(),
        }
    }
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Touch the modified timestamp.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }

    pub fn task(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn add_task(&mut self, task: Task) {
        self.tasks.push(task);
        self.touch();
    }

    /// Remove a task and every dependency edge that points at it.
    pub fn remove_task(&mut self, id: Uuid) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == id)?;
        let removed = self.tasks.remove(index);
        for task in &mut self.tasks {
            task.dependencies.retain(|d| d.task_id != id);
        }
        self.touch();
        Some(removed)
    }

    /// Attach a predecessor edge to `successor`.
    ///
    /// Returns false for self-links, unknown tasks, and a second edge to the
    /// same predecessor.
    pub fn add_dependency(&mut self, successor: Uuid, dependency: Dependency) -> bool {
        if successor == dependency.task_id || self.task(dependency.task_id).is_none() {
            return false;
        }
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == successor) else {
            return false;
        };
        if task.depends_on(dependency.task_id) {
            return false;
        }
        task.dependencies.push(dependency);
        self.touch();
        true
    }

    pub fn remove_dependency(&mut self, successor: Uuid, predecessor: Uuid) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == successor) else {
            return false;
        };
        let before = task.dependencies.len();
        task.dependencies.retain(|d| d.task_id != predecessor);
        let removed = task.dependencies.len() != before;
        if removed {
            self.touch();
        }
        removed
    }
}

impl ProjectUpdate for Project {
    fn update_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::{fixture, rstest};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, d).unwrap()
    }

    #[fixture]
    fn project() -> Project {
        let mut project = Project::new("Warehouse");
        project.add_task(Task::new("Site clearing", day(1), day(3)));
        project.add_task(Task::new("Foundations", day(4), day(10)));
        project
    }

    #[rstest]
    fn removing_a_task_strips_edges_to_it(mut project: Project) {
        let (a, b) = (project.tasks[0].id, project.tasks[1].id);
        assert!(project.add_dependency(b, Dependency::finish_to_start(a)));
        assert!(project.remove_task(a).is_some());
        assert!(project.tasks[0].dependencies.is_empty());
    }

    #[rstest]
    fn self_and_duplicate_links_are_rejected(mut project: Project) {
        let (a, b) = (project.tasks[0].id, project.tasks[1].id);
        assert!(!project.add_dependency(a, Dependency::finish_to_start(a)));
        assert!(project.add_dependency(b, Dependency::finish_to_start(a)));
        assert!(!project.add_dependency(b, Dependency::finish_to_start(a)));
        assert!(!project.add_dependency(b, Dependency::finish_to_start(Uuid::new_v4())));
        assert!(project.remove_dependency(b, a));
        assert!(!project.remove_dependency(b, a));
    }

    #[rstest]
    fn closures_act_as_update_sinks() {
        let mut received = Vec::new();
        let mut sink = |tasks: Vec<Task>| received = tasks;
        sink.update_tasks(vec![Task::new("Roofing", day(1), day(2))]);
        assert_eq!(received.len(), 1);
    }
}
