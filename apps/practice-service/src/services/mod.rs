pub mod attempt;
pub mod progress;
pub mod session;
