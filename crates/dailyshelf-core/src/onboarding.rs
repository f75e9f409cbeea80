//! First-run hints shown on the home screen.
//!
//! Each flag is stored as `"1"` or `"0"` under its own key.

use tracing::warn;

use crate::error::StoreError;
use crate::store::KeyValueStore;

const WELCOME_KEY: &str = "hasSeenWelcomeToast";
const PROFILE_KEY: &str = "hasSeenProfileToast";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OnboardingFlags {
    pub has_seen_welcome: bool,
    pub has_seen_profile: bool,
}

impl OnboardingFlags {
    /// Read both flags. Unreadable flags count as not seen.
    pub async fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        Self {
            has_seen_welcome: read_flag(store, WELCOME_KEY).await,
            has_seen_profile: read_flag(store, PROFILE_KEY).await,
        }
    }

    pub async fn set_seen_welcome<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &S,
        seen: bool,
    ) -> Result<(), StoreError> {
        self.has_seen_welcome = seen;
        write_flag(store, WELCOME_KEY, seen).await
    }

    pub async fn set_seen_profile<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &S,
        seen: bool,
    ) -> Result<(), StoreError> {
        self.has_seen_profile = seen;
        write_flag(store, PROFILE_KEY, seen).await
    }
}

async fn read_flag<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> bool {
    match store.get(key).await {
        Ok(value) => value.as_deref() == Some("1"),
        Err(e) => {
            warn!(key = key, error = %e, "Failed to read onboarding flag");
            false
        }
    }
}

async fn write_flag<S: KeyValueStore + ?Sized>(
    store: &S,
    key: &str,
    seen: bool,
) -> Result<(), StoreError> {
    store.set(key, if seen { "1" } else { "0" }).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_defaults_to_unseen() {
        let store = MemoryStore::new();
        assert_eq!(OnboardingFlags::load(&store).await, OnboardingFlags::default());
    }

    #[tokio::test]
    async fn test_flags_round_trip_through_store() {
        let store = MemoryStore::new();
        let mut flags = OnboardingFlags::load(&store).await;
        flags.set_seen_welcome(&store, true).await.unwrap();
        assert_eq!(store.get(WELCOME_KEY).await.unwrap().as_deref(), Some("1"));

        let reloaded = OnboardingFlags::load(&store).await;
        assert!(reloaded.has_seen_welcome);
        assert!(!reloaded.has_seen_profile);

        flags.set_seen_welcome(&store, false).await.unwrap();
        assert!(!OnboardingFlags::load(&store).await.has_seen_welcome);
    }

    #[tokio::test]
    async fn test_profile_hint_is_independent_of_welcome() {
        let store = MemoryStore::new();
        let mut flags = OnboardingFlags::load(&store).await;
        flags.set_seen_profile(&store, true).await.unwrap();
        assert_eq!(store.get(PROFILE_KEY).await.unwrap().as_deref(), Some("1"));

        let reloaded = OnboardingFlags::load(&store).await;
        assert!(reloaded.has_seen_profile);
        assert!(!reloaded.has_seen_welcome);
    }

    #[tokio::test]
    async fn test_unexpected_value_is_unseen() {
        let store = MemoryStore::new();
        store.set(PROFILE_KEY, "yes").await.unwrap();
        assert!(!OnboardingFlags::load(&store).await.has_seen_profile);
    }
}
