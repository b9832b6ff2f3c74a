// src/handlers/mod.rs

pub mod admins;
pub mod auth;
pub mod batches;
pub mod cards;
pub mod exams;
pub mod navigation;
pub mod notifications;
pub mod reports;
pub mod results;
pub mod students;
pub mod subjects;
