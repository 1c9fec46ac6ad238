// Service module exports

pub mod commit;
pub mod layout;
pub mod settings;
pub mod store;
pub mod week_window;
