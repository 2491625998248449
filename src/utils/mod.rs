pub mod logging;
pub mod net;
