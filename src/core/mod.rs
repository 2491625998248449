pub mod baseline;
pub mod errors;
pub mod models;
pub mod prober;
pub mod scheduler;
pub mod state;
