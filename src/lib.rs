pub mod audio;
pub mod backend;
pub mod collision;
pub mod compute;
pub mod config;
pub mod display;
pub mod entities;
pub mod error;
pub mod frame_loop;
pub mod game;
pub mod scene;
pub mod score;
pub mod sprite;
