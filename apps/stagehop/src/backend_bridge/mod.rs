//! Backend bridge: command queue into the async worker, UI events back out.

pub mod commands;
pub mod runtime;
