pub mod dashes;
pub mod perspective;
