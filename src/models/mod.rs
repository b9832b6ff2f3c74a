// src/models/mod.rs

pub mod admin;
pub mod batch;
pub mod exam;
pub mod notification;
pub mod result;
pub mod student;
pub mod subject;
