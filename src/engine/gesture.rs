//! Press-drag-release gestures on task bars.
//!
//! A gesture is an explicit [`GestureSession`] value owned by the host's event
//! loop. The controller never installs pointer listeners of its own.

use chrono::NaiveDate;
use tracing::{debug, trace};
use uuid::Uuid;

use super::resolver::resolve;
use crate::error::GestureError;
use crate::model::task::{shift_days, Task};
use crate::model::timeline::{BarSpan, TimelineMapper};

/// Width of the resize grip at either end of a bar.
pub const EDGE_HANDLE_WIDTH: f32 = 10.0;

/// What a gesture does to its task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureMode {
    Move,
    ResizeStart,
    ResizeEnd,
    Progress,
}

/// Task values captured when the gesture began.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureSnapshot {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub progress: u8,
}

impl GestureSnapshot {
    fn of(task: &Task) -> Self {
        Self {
            start: task.start,
            end: task.end,
            progress: task.progress,
        }
    }
}

/// One in-progress press-drag-release interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureSession {
    pub task_id: Uuid,
    pub mode: GestureMode,
    /// Pointer x, in timeline coordinates, at press time.
    pub anchor_offset: f32,
    pub original: GestureSnapshot,
}

/// Which part of a bar a press at `pointer_x` lands on.
///
/// The outer `edge_width` pixels on each side resize; the rest moves. Bars too
/// narrow for two full grips split into thirds so every region stays reachable.
pub fn hit_test(bar: BarSpan, pointer_x: f32, edge_width: f32) -> Option<GestureMode> {
    if pointer_x < bar.left || pointer_x > bar.right() {
        return None;
    }
    let edge = edge_width.min(bar.width / 3.0);
    if pointer_x < bar.left + edge {
        Some(GestureMode::ResizeStart)
    } else if pointer_x > bar.right() - edge {
        Some(GestureMode::ResizeEnd)
    } else {
        Some(GestureMode::Move)
    }
}

/// Turns pointer movement into schedule edits, gated on edit permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureController {
    editable: bool,
}

impl GestureController {
    pub fn new(editable: bool) -> Self {
        Self { editable }
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    /// Start a gesture on `task_id`, snapshotting its current values.
    pub fn begin(
        &self,
        tasks: &[Task],
        task_id: Uuid,
        mode: GestureMode,
        anchor_offset: f32,
    ) -> Result<GestureSession, GestureError> {
        if !self.editable {
            return Err(GestureError::ReadOnly);
        }
        let task = tasks
            .iter()
            .find(|t| t.id == task_id)
            .ok_or(GestureError::UnknownTask(task_id))?;

        debug!(task = %task_id, ?mode, anchor_offset, "gesture started");
        Ok(GestureSession {
            task_id,
            mode,
            anchor_offset,
            original: GestureSnapshot::of(task),
        })
    }

    /// Apply one pointer frame and return the resolved task list.
    ///
    /// Returns `None` when the frame is rejected (a resize crossing the
    /// opposite edge) or the task is no longer in the list.
    pub fn update(
        &self,
        session: &GestureSession,
        tasks: &[Task],
        pointer_offset: f32,
        mapper: &TimelineMapper,
    ) -> Option<Vec<Task>> {
        if !self.editable {
            return None;
        }
        let Some(current) = tasks.iter().find(|t| t.id == session.task_id) else {
            debug!(task = %session.task_id, "gesture target vanished");
            return None;
        };
        let Some(proposed) = propose(session, current, pointer_offset, mapper) else {
            trace!(task = %session.task_id, pointer_offset, "frame rejected");
            return None;
        };
        trace!(
            task = %session.task_id,
            start = %proposed.start,
            end = %proposed.end,
            progress = proposed.progress,
            "frame accepted"
        );

        let edited: Vec<Task> = tasks
            .iter()
            .map(|t| {
                if t.id == session.task_id {
                    proposed.clone()
                } else {
                    t.clone()
                }
            })
            .collect();
        Some(resolve(&edited))
    }

    /// Finish a gesture. The last accepted frame is already persisted.
    pub fn end(&self, session: &GestureSession) {
        debug!(task = %session.task_id, mode = ?session.mode, "gesture ended");
    }
}

/// Tentative task for a pointer position, before dependency resolution.
fn propose(
    session: &GestureSession,
    current: &Task,
    pointer_offset: f32,
    mapper: &TimelineMapper,
) -> Option<Task> {
    let original = session.original;
    let delta_days = mapper.offset_to_days(pointer_offset - session.anchor_offset);
    let mut task = current.clone();

    match session.mode {
        GestureMode::Move => {
            task.start = shift_days(original.start, delta_days);
            task.end = shift_days(original.end, delta_days);
        }
        GestureMode::ResizeStart => {
            let start = shift_days(original.start, delta_days);
            if start >= original.end {
                return None;
            }
            task.start = start;
            task.end = original.end;
        }
        GestureMode::ResizeEnd => {
            let end = shift_days(original.end, delta_days);
            if end <= original.start {
                return None;
            }
            task.start = original.start;
            task.end = end;
        }
        GestureMode::Progress => {
            let bar = mapper.bar_span(current.start, current.end);
            task.progress = bar.progress_at(pointer_offset);
        }
    }
    Some(task)
}
