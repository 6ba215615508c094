//! UI components.

pub mod network;
