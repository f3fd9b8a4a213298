pub mod person_store;
pub mod samples;

pub use person_store::{PersonRecord, PersonStore};
pub use samples::TrainingSet;
