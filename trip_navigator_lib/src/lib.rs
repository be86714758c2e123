pub mod comms;
pub mod progress;
pub mod route;
