pub mod dialogs;
pub mod schedule_chart;
pub mod task_editor;
pub mod task_table;
pub mod theme;
pub mod toolbar;
