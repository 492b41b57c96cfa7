pub mod question;
pub mod report;
pub mod state;
pub mod timer;
