pub mod fixed_width;
pub mod html_table;
pub mod price;
pub mod property;

pub use fixed_width::*;
pub use html_table::*;
pub use price::*;
pub use property::*;
