pub mod attendance;
pub mod core;
pub mod eligibility;
pub mod students;
