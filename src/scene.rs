pub mod compose;
pub mod config;
pub mod model;
pub mod sign;
pub mod stars;
pub mod sun;
