pub mod aircraft;
pub mod authorization;
pub mod availability;
pub mod booking;
pub mod catalog;
pub mod config;
pub mod error;
pub mod flight;
pub mod grid;
pub mod instructor;
pub mod logger;
pub mod schedule;
pub mod slots;
pub mod time;
pub mod timeline;
