/// UI module exports
pub mod bridge;
pub mod components;
pub mod history_panel;
pub mod popup;
