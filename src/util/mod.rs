pub mod connection;
pub mod log;
pub mod misc;
pub mod timer;
pub mod variant;
