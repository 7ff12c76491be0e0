pub mod panels;
pub mod plot;
pub mod sheet;
pub mod table;
