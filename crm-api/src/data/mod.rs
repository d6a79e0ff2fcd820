pub mod interaction;
pub mod opportunity;
pub mod timestamp;
pub mod user;
