//! Route modules for the Glosa server

pub mod codes;
pub mod review;
pub mod session;
pub mod texts;
