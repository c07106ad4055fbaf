pub mod bubble_chart;
pub mod controls;
pub mod datatable;
pub mod debug;
pub mod help;
pub mod text_input;
