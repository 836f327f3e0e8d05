use std::path::Path;

use tracing::info;

use crate::error::StoreError;
use crate::model::Project;

/// Save a project to a JSON file.
pub fn save_project(project: &Project, path: &Path) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(project)?;
    std::fs::write(path, json)?;
    info!(path = %path.display(), tasks = project.tasks.len(), "project saved");
    Ok(())
}

/// Load a project from a JSON file.
pub fn load_project(path: &Path) -> Result<Project, StoreError> {
    let json = std::fs::read_to_string(path)?;
    let project: Project = serde_json::from_str(&json)?;
    info!(path = %path.display(), tasks = project.tasks.len(), "project loaded");
    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Dependency, DependencyKind, Task};
    use chrono::NaiveDate;
    use rstest::rstest;

    #[rstest]
    fn saved_projects_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("depot.site.json");

        let start = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 9, 12).unwrap();
        let mut project = Project::new("Bus depot");
        let slab = Task::new("Ground slab", start, end);
        let mut walls = Task::new("Walls", end, end)
            .with_dependency(Dependency::new(slab.id, DependencyKind::StartToFinish, -2));
        walls.boq_item_id = Some("BOQ-7".to_string());
        project.tasks = vec![slab, walls];

        save_project(&project, &path).unwrap();
        let loaded = load_project(&path).unwrap();
        assert_eq!(loaded.name, "Bus depot");
        assert_eq!(loaded.tasks, project.tasks);
    }

    #[rstest]
    fn out_of_range_progress_loads_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edited.site.json");
        let mut project = Project::new("Hand edited");
        let day = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        project.tasks = vec![Task::new("Roof", day, day)];
        let json = serde_json::to_string(&project)
            .unwrap()
            .replace("\"progress\":0", "\"progress\":250");
        std::fs::write(&path, json).unwrap();

        let loaded = load_project(&path).unwrap();
        let resolved = crate::engine::resolve(&loaded.tasks);
        assert_eq!(resolved[0].progress, 100);
    }

    #[rstest]
    fn missing_files_surface_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_project(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(StoreError::Io(_))));
    }
}
