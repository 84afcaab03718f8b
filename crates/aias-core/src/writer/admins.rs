// Admin list management (`config/admins`).

use std::sync::LazyLock;

use aias_api::DocumentStore;
use regex::Regex;
use tracing::info;

use super::ContentWriter;
use crate::error::CoreError;
use crate::model::AdminList;
use crate::schema::{self, paths};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Trim and lower-case an address for comparison and storage.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Whether `email` (already normalized) looks like `local@domain.tld`.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

impl<S: DocumentStore> ContentWriter<S> {
    /// Current admin emails. An absent list reads as empty.
    pub async fn get_admins(&self) -> Result<Vec<String>, CoreError> {
        match self.store.get(paths::ADMINS).await? {
            Some(doc) => {
                let list: AdminList = schema::from_fields(paths::ADMINS, doc.fields)?;
                Ok(list.admins)
            }
            None => Ok(Vec::new()),
        }
    }

    /// Add an admin, returning the resulting list.
    pub async fn add_admin(&self, email: &str) -> Result<Vec<String>, CoreError> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(CoreError::InvalidEmail { email });
        }

        let mut admins = self.get_admins().await?;
        if admins.iter().any(|a| normalize_email(a) == email) {
            return Err(CoreError::DuplicateAdmin { email });
        }
        admins.push(email.clone());
        self.save_admins(&admins).await?;

        info!(%email, count = admins.len(), "admin added");
        Ok(admins)
    }

    /// Remove an admin, returning the resulting list.
    pub async fn remove_admin(&self, email: &str) -> Result<Vec<String>, CoreError> {
        let email = normalize_email(email);
        let mut admins = self.get_admins().await?;
        let before = admins.len();
        admins.retain(|a| normalize_email(a) != email);
        if admins.len() == before {
            return Err(CoreError::AdminNotFound { email });
        }
        self.save_admins(&admins).await?;

        info!(%email, count = admins.len(), "admin removed");
        Ok(admins)
    }

    async fn save_admins(&self, admins: &[String]) -> Result<(), CoreError> {
        let list = AdminList {
            admins: admins.to_vec(),
        };
        self.store
            .set(paths::ADMINS, schema::to_fields(&list)?)
            .await?;
        self.cache.clear();
        Ok(())
    }
}
