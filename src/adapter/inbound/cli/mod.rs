//! CLI module graph.

pub mod check;
pub mod command;
pub mod compare;
mod context;
pub mod dispatch;
pub mod output;
pub mod run;
pub mod show;
