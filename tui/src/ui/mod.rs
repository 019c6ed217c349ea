pub mod draw;
pub mod layout;
pub mod plots;
pub mod theme;
pub mod widgets;
