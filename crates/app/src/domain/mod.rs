//! Mesa Domain Concerns

pub mod audit;
pub mod integrations;
pub mod locations;
pub mod menu;
pub mod orders;
pub mod reporting;
pub mod restaurants;
pub mod staff;
