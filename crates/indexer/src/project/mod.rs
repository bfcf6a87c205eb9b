pub mod file_info;
pub mod io;
pub mod source;
