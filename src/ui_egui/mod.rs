mod app;
pub mod drag;
pub mod resize;
pub mod scheduler;
pub mod views;

pub use app::WeekPlannerApp;
