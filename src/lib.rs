pub mod cli;
pub mod config;
pub mod console;
pub mod draw;
pub mod game;
pub mod money;
pub mod parallel;
pub mod report;
pub mod simulation;
