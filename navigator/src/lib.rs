mod clock;
mod reporter;

pub mod display;
pub mod navigator;
pub mod session;
pub mod tracking;
