pub mod lead;
pub mod project;
pub mod session;
pub mod tower;
pub mod user;
