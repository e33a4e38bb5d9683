use crate::{
    db::{keys, TypedStore},
    error::{AppError, AppResult},
    models::UserProfile,
};

/// Locally stored user profile
#[derive(Clone)]
pub struct ProfileService {
    store: TypedStore,
}

impl ProfileService {
    pub fn new(store: TypedStore) -> Self {
        Self { store }
    }

    /// Returns the profile only when all three fields have been saved
    pub async fn get(&self) -> AppResult<Option<UserProfile>> {
        let first_name = self.store.load(&keys::PROFILE_FIRST_NAME).await?;
        let last_name = self.store.load(&keys::PROFILE_LAST_NAME).await?;
        let email = self.store.load(&keys::PROFILE_EMAIL).await?;

        Ok(match (first_name, last_name, email) {
            (Some(first_name), Some(last_name), Some(email)) => Some(UserProfile {
                first_name,
                last_name,
                email,
            }),
            _ => None,
        })
    }

    pub async fn save(&self, profile: &UserProfile) -> AppResult<()> {
        let email = profile.email.trim();
        if !email.is_empty() && !email.contains('@') {
            return Err(AppError::InvalidInput(format!(
                "'{}' is not an email address",
                email
            )));
        }

        self.store
            .save(&keys::PROFILE_FIRST_NAME, &profile.first_name)
            .await?;
        self.store
            .save(&keys::PROFILE_LAST_NAME, &profile.last_name)
            .await?;
        self.store.save(&keys::PROFILE_EMAIL, &profile.email).await?;

        tracing::info!("Profile saved");
        Ok(())
    }

    /// Whether `candidate` differs from what is stored
    pub async fn has_changes(&self, candidate: &UserProfile) -> AppResult<bool> {
        Ok(match self.get().await? {
            Some(saved) => saved != *candidate,
            None => !candidate.is_blank(),
        })
    }
}
