pub mod assistant;
pub mod detect;
pub mod health;
pub mod study;
pub mod users;
