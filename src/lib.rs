pub mod interrupt;
pub mod logging;
pub mod options;
pub mod platform;
pub mod runner;
