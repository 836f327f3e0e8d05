pub mod draft;
pub mod project;
pub mod task;
pub mod timeline;

pub use draft::TaskDraft;
pub use project::{Project, ProjectUpdate};
pub use task::{Constraint, Dependency, DependencyKind, Task, TaskStatus};
pub use timeline::{BarSpan, DayTick, TimelineMapper, ZoomLevel};
