use super::profile::EnergyProfile;

/// Fixed device-storage key. Saves fully overwrite any prior record; there
/// is no merge and no versioning.
pub const PROFILE_STORE_KEY: &str = "energyMatch_userProfile";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("profile storage unavailable: {0}")]
    Unavailable(String),
    #[error("profile serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Single-slot profile persistence, last-write-wins.
pub trait ProfileStore: Send + Sync {
    fn save(&self, profile: &EnergyProfile) -> Result<(), StoreError>;
    fn load(&self) -> Result<Option<EnergyProfile>, StoreError>;
}
