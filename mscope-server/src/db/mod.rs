//! Database access for mscope-server

pub mod specimens;
