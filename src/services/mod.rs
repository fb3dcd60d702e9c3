// src/services/mod.rs
pub mod contacts;
pub mod users;

pub use contacts::ContactService;
pub use users::UserService;
