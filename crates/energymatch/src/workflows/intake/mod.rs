pub mod location;
pub mod profile;
pub mod store;
pub mod wizard;

pub use location::{Coordinates, LocationError, LocationProvider, GPS_PLACEHOLDER_ADDRESS};
pub use profile::{
    BudgetBracket, ClientCategory, EnergyProfile, Geolocation, PropertyCategory, UserRole,
};
pub use store::{ProfileStore, StoreError, PROFILE_STORE_KEY};
pub use wizard::{BillSource, IntakeError, IntakePolicy, IntakeStep, IntakeWizard};
