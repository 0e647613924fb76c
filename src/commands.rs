pub mod import;
pub mod score;
pub mod status;
