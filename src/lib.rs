pub mod collision;
pub mod compute;
pub mod config;
pub mod controls;
pub mod entities;
pub mod level;
pub mod sprites;
pub mod tilemap;
