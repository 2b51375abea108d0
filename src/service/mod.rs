pub mod admin;
pub mod auth;
pub mod draft;
pub mod submit;
