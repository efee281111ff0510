pub mod constants;
pub mod draw;
pub mod frame;
