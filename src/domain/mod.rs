mod page_size;
mod pages;
mod printer;
mod printing_log;
mod student;

pub use page_size::*;
pub use pages::*;
pub use printer::*;
pub use printing_log::*;
pub use student::*;
