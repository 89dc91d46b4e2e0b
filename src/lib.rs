//! Motor de reconciliación de telemetría y agenda de mantenimiento de flota
//!
//! El crate expone dos binarios: la API HTTP que consume el dashboard y el
//! job batch de sincronización contra el feed de telemetría. Ambos
//! comparten estos módulos.

pub mod clients;
pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
