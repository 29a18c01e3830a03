#![deny(warnings)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(unsafe_code)]

pub mod app;
pub mod envs;
pub mod models;
pub mod render;
pub mod rl;
pub mod view;
pub mod view_model;
pub mod view_models;
pub mod views;
