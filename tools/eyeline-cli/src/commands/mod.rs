pub mod align;
pub mod check;
pub mod config;
pub mod replay;
