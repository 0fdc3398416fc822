//! Shared domain and persistence modules for the Mesa ordering platform.

pub mod context;
pub mod database;
pub mod domain;
pub mod ids;
pub mod notifications;

#[cfg(test)]
mod test;
