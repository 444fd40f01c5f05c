pub mod entities;
pub mod messages;
pub mod schedule;
pub mod staging;
pub mod state;
pub mod validation;
