pub mod attendance;
pub mod reports;
