// Core auth module - registration, login and bearer tokens.

pub mod auth_models;
pub mod auth_service;
pub mod password;

pub use auth_models::*;
pub use auth_service::*;
