pub mod config;
pub mod console_interface;
pub mod core;
pub mod driver;
pub mod models;

#[cfg(test)]
mod test;
