pub mod attendance;
pub mod employee;
pub mod mapping;
pub mod punch;
pub mod shift;
