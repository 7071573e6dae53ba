pub mod alert;
pub mod history;
pub mod reading;

pub use alert::*;
pub use history::*;
pub use reading::*;
