#![forbid(unsafe_code)]

pub mod gesture;
pub mod model;
pub mod study;
pub mod time;
pub mod wordlist;

pub use time::Clock;
