pub mod budget;
pub mod expense;
pub mod investment;
pub mod profile;
pub mod record;
pub mod report;
pub mod settings;
pub mod snapshot;
