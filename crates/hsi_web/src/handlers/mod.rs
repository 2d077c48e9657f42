pub mod admin;
pub mod blog;
pub mod chat;
pub mod news;
