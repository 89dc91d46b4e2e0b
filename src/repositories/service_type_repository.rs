//! Repositorio del catálogo de tipos de servicio

use sqlx::PgPool;

use crate::models::service_type::default_service_names;
use crate::models::ServiceType;
use crate::utils::errors::AppError;

pub struct ServiceTypeRepository {
    pool: PgPool,
}

impl ServiceTypeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Nombres del catálogo; si la colección está ausente o vacía se sirve
    /// la lista por defecto
    pub async fn list_names(&self) -> Result<Vec<String>, AppError> {
        let types = match sqlx::query_as::<_, ServiceType>(
            "SELECT id, name FROM service_types ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        {
            Ok(types) => types,
            Err(e) if is_missing_collection(&e) => {
                log::warn!("⚠️ Colección service_types ausente; se sirve el catálogo por defecto");
                return Ok(default_service_names());
            }
            Err(e) => return Err(e.into()),
        };

        if types.is_empty() {
            return Ok(default_service_names());
        }

        Ok(types.into_iter().map(|t| t.name).collect())
    }
}

/// La colección puede no existir todavía (deploy fresco): undefined_table
fn is_missing_collection(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some("42P01"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use std::error::Error as StdError;

    #[derive(Debug)]
    struct MissingTable;

    impl std::fmt::Display for MissingTable {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("relation \"service_types\" does not exist")
        }
    }

    impl StdError for MissingTable {}

    impl sqlx::error::DatabaseError for MissingTable {
        fn message(&self) -> &str {
            "relation \"service_types\" does not exist"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some("42P01".into())
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::Other
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }
    }

    #[test]
    fn test_missing_collection_is_detected() {
        let missing = sqlx::Error::Database(Box::new(MissingTable));
        assert!(is_missing_collection(&missing));
    }

    #[test]
    fn test_other_errors_still_surface() {
        assert!(!is_missing_collection(&sqlx::Error::RowNotFound));
    }
}
