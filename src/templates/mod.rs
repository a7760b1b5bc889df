pub mod components;
pub mod layouts;
pub mod pages;

// Re-export for convenience
pub use layouts::panel::panel_layout;
