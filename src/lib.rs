pub mod command;
pub mod helpers;
pub mod simplex;
