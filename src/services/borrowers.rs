//! Borrower management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use std::sync::Arc;
use validator::Validate;

use crate::{
    clock::Clock,
    config::LendingConfig,
    error::{AppError, AppResult},
    lending::identifier,
    models::{
        borrower::{CreateBorrower, NewBorrower},
        Borrower, BorrowerType, RecordStatus,
    },
    repository::LendingStore,
};

#[derive(Clone)]
pub struct BorrowersService {
    store: Arc<dyn LendingStore>,
    clock: Arc<dyn Clock>,
    config: LendingConfig,
}

impl BorrowersService {
    pub fn new(store: Arc<dyn LendingStore>, clock: Arc<dyn Clock>, config: LendingConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// Next school ID for a borrower type in the current year.
    ///
    /// When the lookup of existing IDs fails, the error carries a
    /// timestamp-derived substitute so the caller can decide whether to use it.
    pub async fn generate_school_id(&self, borrower_type: Option<BorrowerType>) -> AppResult<String> {
        let borrower_type = BorrowerType::from(borrower_type);
        let prefix = borrower_type.prefix();
        let year = self.clock.current_year();
        let scope = identifier::scope_prefix(prefix, year);

        match self.store.school_ids_in_scope(&scope, borrower_type).await {
            Ok(existing) => Ok(identifier::next_id(prefix, year, existing)),
            Err(e) => Err(AppError::GenerationFallback {
                school_id: identifier::fallback_id(prefix, year, self.clock.now()),
                reason: e.to_string(),
            }),
        }
    }

    /// Create a borrower with a freshly generated school ID.
    ///
    /// A concurrent creator may take the same ID between generation and
    /// insert; the unique constraint rejects the loser, which regenerates.
    #[tracing::instrument(skip(self, data), fields(firstname = %data.firstname, lastname = %data.lastname))]
    pub async fn create(&self, data: CreateBorrower) -> AppResult<Borrower> {
        data.validate()?;

        let password_hash = match data.password {
            Some(ref password) => Some(hash_password(password)?),
            None => None,
        };
        let borrower_type = BorrowerType::from(data.borrower_type);
        let attempts = self.config.max_id_attempts.max(1);

        for attempt in 1..=attempts {
            let school_id = match self.generate_school_id(Some(borrower_type)).await {
                Ok(id) => id,
                Err(AppError::GenerationFallback { school_id, reason }) if self.config.allow_id_fallback => {
                    tracing::warn!(
                        "School ID lookup failed ({}), using fallback ID {} with weak uniqueness",
                        reason,
                        school_id
                    );
                    school_id
                }
                Err(e) => return Err(e),
            };

            let new_borrower = NewBorrower {
                school_id,
                borrower_type,
                firstname: data.firstname.trim().to_string(),
                lastname: data.lastname.trim().to_string(),
                gender: data.gender.clone(),
                contact: data.contact.clone(),
                department: data.department.clone(),
                year_section: data.year_section.clone(),
                password_hash: password_hash.clone(),
            };

            match self.store.insert_borrower(&new_borrower).await {
                Ok(borrower) => {
                    tracing::info!(
                        "Created {} borrower {} ({})",
                        borrower.borrower_type,
                        borrower.id,
                        borrower.school_id
                    );
                    return Ok(borrower);
                }
                Err(AppError::Conflict(msg)) => {
                    tracing::warn!("School ID collision on attempt {}/{}: {}", attempt, attempts, msg);
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::Conflict(format!(
            "Could not allocate a unique school ID after {} attempts",
            attempts
        )))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Borrower> {
        self.store.get_borrower(id).await
    }

    pub async fn list(&self) -> AppResult<Vec<Borrower>> {
        self.store.list_borrowers().await
    }

    /// Deactivate (soft delete) or reactivate a borrower
    pub async fn set_status(&self, id: i32, status: RecordStatus) -> AppResult<Borrower> {
        let borrower = self.store.set_borrower_status(id, status).await?;
        tracing::info!("Borrower {} status set to {:?}", id, status);
        Ok(borrower)
    }
}

/// Hash a password using Argon2
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}
