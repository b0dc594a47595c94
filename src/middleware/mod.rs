//! Middleware del sistema
//!
//! Este módulo contiene la capa de CORS y el extractor del usuario que actúa
//! en cada petición.

pub mod acting_user;
pub mod cors;

pub use acting_user::ActingUser;
pub use cors::cors_layer;
