pub mod config;
pub mod error;
pub mod logging;
pub mod notify;
pub mod storage;
pub mod task;
pub mod task_list;
pub mod transition;
pub mod ui;
