pub mod analyze;
pub mod doctor;
pub mod onboard;
pub mod roles;
