pub mod alert;
pub mod anilist;
pub mod config;
pub mod controller;
pub mod data_models;
pub mod error;
pub mod style;
pub mod telemetry;
pub mod tui;
pub mod view;
