pub mod events;
pub mod printer;
pub mod progress;
