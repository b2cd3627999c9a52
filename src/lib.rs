//! Cálculo de frete de entrega
//!
//! Normaliza la dirección de destino, resuelve distancia y duración con una
//! cadena de proveedores con fallback y aplica la tabla de precios con isenção.

pub mod cache;
pub mod clients;
pub mod config;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
