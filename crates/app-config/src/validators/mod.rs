pub mod directory;
pub mod url;
