//! Controllers de la API
//!
//! Orquestan permisos, guards, transacciones y el mapeo a respuestas.

pub mod auth_controller;
pub mod booking_controller;
pub mod kart_controller;
pub mod session_controller;
pub mod track_controller;
