pub mod handlers;
pub mod models;
mod service;

pub use models::Favorite;
pub use service::FavoritesService;
