//! Integration specifications for the profile-intake wizard: step
//! navigation, field preservation, device collaborators, and persistence.

use std::sync::Mutex;

use energymatch::workflows::intake::{
    BillSource, BudgetBracket, Coordinates, EnergyProfile, IntakePolicy, IntakeStep, IntakeWizard,
    LocationError, LocationProvider, ProfileStore, PropertyCategory, StoreError,
    GPS_PLACEHOLDER_ADDRESS,
};

#[derive(Default)]
struct MemoryStore {
    slot: Mutex<Option<String>>,
    saves: Mutex<u32>,
}

impl MemoryStore {
    fn saved_profile(&self) -> Option<EnergyProfile> {
        self.slot
            .lock()
            .expect("store mutex poisoned")
            .as_deref()
            .map(|raw| serde_json::from_str(raw).expect("stored profile parses"))
    }

    fn save_count(&self) -> u32 {
        *self.saves.lock().expect("store mutex poisoned")
    }
}

impl ProfileStore for MemoryStore {
    fn save(&self, profile: &EnergyProfile) -> Result<(), StoreError> {
        let raw = serde_json::to_string(profile)?;
        *self.slot.lock().expect("store mutex poisoned") = Some(raw);
        *self.saves.lock().expect("store mutex poisoned") += 1;
        Ok(())
    }

    fn load(&self) -> Result<Option<EnergyProfile>, StoreError> {
        Ok(self.saved_profile())
    }
}

struct CartagenaFix;

impl LocationProvider for CartagenaFix {
    fn current_position(&self) -> Result<Coordinates, LocationError> {
        Ok(Coordinates {
            lat: 10.4236,
            lng: -75.5378,
        })
    }
}

struct DeniedFix;

impl LocationProvider for DeniedFix {
    fn current_position(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::PermissionDenied)
    }
}

fn filled_wizard() -> IntakeWizard {
    let mut wizard = IntakeWizard::new(IntakePolicy::lenient());
    wizard.choose_bill_source(BillSource::Manual);
    {
        let profile = wizard.profile_mut();
        profile.name = "Familia Pérez".to_string();
        profile.email = "familia.perez@ejemplo.com".to_string();
        profile.set_monthly_consumption_kwh(450.0);
        profile.set_monthly_cost_cop(380_000.0);
        profile.set_operating_hours(12);
        profile.set_operating_days(7);
    }
    wizard
}

#[test]
fn advancing_and_retreating_never_loses_fields() {
    let mut wizard = filled_wizard();

    wizard.advance().expect("to property");
    wizard.profile_mut().property_category = PropertyCategory::ResidentialHome;
    wizard.profile_mut().neighborhood = "Getsemaní".to_string();

    wizard.advance().expect("to resources");
    wizard.profile_mut().budget = Some(BudgetBracket::Medium);

    wizard.retreat();
    wizard.retreat();
    assert_eq!(wizard.step(), IntakeStep::Consumption);

    let profile = wizard.profile();
    assert_eq!(profile.name, "Familia Pérez");
    assert_eq!(profile.email, "familia.perez@ejemplo.com");
    assert_eq!(profile.monthly_consumption_kwh(), 450.0);
    assert_eq!(profile.monthly_cost_cop(), 380_000.0);
    assert_eq!(profile.property_category, PropertyCategory::ResidentialHome);
    assert_eq!(profile.neighborhood, "Getsemaní");
    assert_eq!(profile.budget, Some(BudgetBracket::Medium));

    wizard.advance().expect("forward again");
    wizard.advance().expect("back to resources");
    assert_eq!(wizard.profile().budget, Some(BudgetBracket::Medium));
}

#[test]
fn successful_capture_stores_coordinates_and_placeholder_address() {
    let mut wizard = filled_wizard();
    wizard.advance().expect("to property");

    let location = wizard
        .capture_location(&CartagenaFix)
        .expect("device position available");
    assert_eq!(location.lat, 10.4236);
    assert_eq!(location.lng, -75.5378);

    let stored = wizard.profile().location.as_ref().expect("location stored");
    assert_eq!(stored.address.as_deref(), Some(GPS_PLACEHOLDER_ADDRESS));
}

#[test]
fn failed_capture_leaves_location_unset_and_profile_untouched() {
    let mut wizard = filled_wizard();
    wizard.advance().expect("to property");
    let before = wizard.profile().clone();

    let result = wizard.capture_location(&DeniedFix);
    assert!(result.is_err());
    assert!(wizard.profile().location.is_none());
    assert_eq!(wizard.profile(), &before);

    // The failure is non-fatal: the wizard still advances.
    wizard.advance().expect("to resources");
    assert_eq!(wizard.step(), IntakeStep::Resources);
}

#[test]
fn repeated_saves_keep_one_record_equal_to_the_live_profile() {
    let store = MemoryStore::default();
    let mut wizard = filled_wizard();
    wizard.advance().expect("to property");
    wizard.advance().expect("to resources");

    wizard.save_profile(&store).expect("first save");
    wizard.profile_mut().budget = Some(BudgetBracket::High);
    wizard.save_profile(&store).expect("second save");
    wizard.save_profile(&store).expect("third save");

    assert_eq!(store.save_count(), 3);
    let stored = store.saved_profile().expect("one record present");
    assert_eq!(&stored, wizard.profile());
    assert_eq!(stored.budget, Some(BudgetBracket::High));
}

#[test]
fn saved_profile_can_seed_a_new_session() {
    let store = MemoryStore::default();
    let wizard = filled_wizard();
    wizard.save_profile(&store).expect("save");

    let restored = store
        .load()
        .expect("store reachable")
        .expect("record present");
    let resumed = IntakeWizard::with_profile(IntakePolicy::lenient(), restored);
    assert_eq!(resumed.step(), IntakeStep::Consumption);
    assert_eq!(resumed.profile().name, "Familia Pérez");
}
