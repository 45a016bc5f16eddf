pub mod config;
pub mod context;
pub mod controller;
pub mod greeting;
pub mod logging;
pub mod process_group;
pub mod region;
