pub mod editor;
pub mod gesture;
pub mod resolver;

pub use editor::ScheduleEditor;
pub use gesture::{hit_test, GestureController, GestureMode, GestureSession, EDGE_HANDLE_WIDTH};
pub use resolver::{resolve, resolve_with_report, unsatisfied, Outcome, Resolution, Violation, MAX_ROUNDS};
