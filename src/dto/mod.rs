//! DTOs de la API HTTP

pub mod fee_dto;

pub use fee_dto::{FeeRequest, FeeResult, FeeStatus};
