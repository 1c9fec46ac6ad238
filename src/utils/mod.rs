// Utility modules
// Pure helpers shared by the services and the egui surface

pub mod date;
pub mod time;
