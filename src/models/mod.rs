// Module exports for models

pub mod entry;
pub mod settings;
pub mod task;
