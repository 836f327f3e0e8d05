//! Interactive schedule engine for construction projects.
//!
//! Tasks are linked by finish/start precedence constraints. The engine keeps
//! their dates consistent after every edit:
//!
//! - [`engine::resolve`] pushes tasks later until every dependency holds,
//!   within a fixed round cap so cyclic graphs cannot hang the caller.
//! - [`model::TimelineMapper`] converts between dates and chart offsets.
//! - [`engine::ScheduleEditor`] turns press-drag-release gestures and form
//!   edits into resolved task lists handed to a [`model::ProjectUpdate`] sink.

pub mod engine;
pub mod error;
pub mod io;
pub mod model;
pub mod settings;

pub use engine::{resolve, resolve_with_report, ScheduleEditor};
pub use error::{DraftError, GestureError, StoreError};
pub use model::{Dependency, DependencyKind, Project, Task, TaskStatus, TimelineMapper, ZoomLevel};
