pub mod dedup;
pub mod input;
pub mod render;
