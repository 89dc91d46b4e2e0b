//! Repositorios de acceso a datos
//!
//! Un repositorio por colección. Las escrituras pasan por `with_write_retry`:
//! ante contención transitoria del store se reintenta hasta 4 veces con
//! backoff creciente; agotados los reintentos la escritura se abandona y el
//! caller recibe `StoreContention` (la operación NO tuvo efecto).

pub mod maintenance_repository;
pub mod override_repository;
pub mod position_repository;
pub mod service_type_repository;
pub mod vehicle_repository;

use std::future::Future;
use std::time::Duration;

use crate::utils::errors::AppError;

const MAX_WRITE_ATTEMPTS: u32 = 4;

/// Errores del store que vale la pena reintentar
fn is_transient(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut => true,
        // serialization_failure, deadlock_detected, lock_not_available
        sqlx::Error::Database(db) => matches!(
            db.code().as_deref(),
            Some("40001") | Some("40P01") | Some("55P03")
        ),
        _ => false,
    }
}

/// Ejecutar una escritura con reintentos acotados.
///
/// La closure se invoca de nuevo en cada intento, de modo que cada retry
/// relee el estado fresco que necesite.
pub async fn with_write_retry<T, F, Fut>(operation: &str, mut f: F) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    let mut attempt: u32 = 1;
    loop {
        match f().await {
            Ok(value) => return Ok(value),
            Err(e) if is_transient(&e) => {
                if attempt >= MAX_WRITE_ATTEMPTS {
                    log::error!(
                        "❌ Escritura '{}' abandonada tras {} intentos: {}",
                        operation,
                        attempt,
                        e
                    );
                    return Err(AppError::StoreContention(format!("{}: {}", operation, e)));
                }
                let backoff = Duration::from_secs(2 * u64::from(attempt));
                log::warn!(
                    "⚠️ Contención en '{}' (intento {}/{}), reintentando en {:?}",
                    operation,
                    attempt,
                    MAX_WRITE_ATTEMPTS,
                    backoff
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
            Err(e) => return Err(AppError::Database(e)),
        }
    }
}
