pub mod auth_routes;
pub mod booking_routes;
pub mod kart_routes;
pub mod session_routes;
pub mod track_routes;
pub mod user_routes;
