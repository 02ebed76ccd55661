//! Shared wire contracts between the frontend and the personalization service.

pub mod usecases;
