pub mod dom;
pub mod editor;
pub mod format;
pub mod history;
pub mod render;
pub mod theme;
