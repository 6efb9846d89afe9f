pub mod navigation;
pub mod panels;
pub mod plot;
pub mod table;
