//! Configuración del proyecto
//!
//! Este módulo contiene la carga de variables de entorno y los valores por
//! defecto del sistema.

pub mod environment;

pub use environment::*;
