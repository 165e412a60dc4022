pub mod actions;
pub mod component_context;
pub mod components;
pub mod config;
pub mod constants;
pub mod content;
pub mod drivers;
pub mod event_loop;
pub mod keybindings;
pub mod layout;
pub mod panel;
pub mod persistence;
pub mod runner;
pub mod snapshot;
pub mod theme;
pub mod tracing_sub;
pub mod ui;
pub mod window;
