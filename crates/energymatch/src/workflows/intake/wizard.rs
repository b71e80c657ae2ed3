use serde::{Deserialize, Serialize};

use super::location::{LocationError, LocationProvider, GPS_PLACEHOLDER_ADDRESS};
use super::profile::{EnergyProfile, Geolocation};
use super::store::{ProfileStore, StoreError};
use crate::workflows::quoting::bill::BillAnalysis;

/// The three internal intake steps, strictly linear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeStep {
    Consumption,
    Property,
    Resources,
}

impl IntakeStep {
    pub const fn ordered() -> [Self; 3] {
        [Self::Consumption, Self::Property, Self::Resources]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Consumption => "Análisis de Consumo",
            Self::Property => "Características de Propiedad",
            Self::Resources => "Recursos y Objetivos",
        }
    }
}

/// Whether a bill document will be supplied. `Undecided` is a real state:
/// consumption figures stay locked until the visitor picks a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillSource {
    Undecided,
    Upload,
    Manual,
}

impl BillSource {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Undecided => "undecided",
            Self::Upload => "upload",
            Self::Manual => "manual",
        }
    }
}

/// Gating knobs for the consumption step. The default is lenient: zero or
/// blank figures do not block advancing, matching the shipped flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IntakePolicy {
    pub require_consumption_figures: bool,
}

impl IntakePolicy {
    pub const fn lenient() -> Self {
        Self {
            require_consumption_figures: false,
        }
    }

    pub const fn strict() -> Self {
        Self {
            require_consumption_figures: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    #[error("choose whether a bill will be uploaded before continuing")]
    BillDecisionPending,
    #[error("consumption and cost figures are required before continuing")]
    MissingConsumptionFigures,
    #[error("already at the final step")]
    AtFinalStep,
    #[error("the analysis can only be generated from the final step")]
    NotAtFinalStep,
}

/// The profile-intake state machine. Owns the live profile, exposes it for
/// in-place editing at every step, and releases it only through
/// [`IntakeWizard::complete`] on the final step.
#[derive(Debug, Clone)]
pub struct IntakeWizard {
    step: IntakeStep,
    bill_source: BillSource,
    bill_analysis_applied: bool,
    policy: IntakePolicy,
    profile: EnergyProfile,
}

impl IntakeWizard {
    pub fn new(policy: IntakePolicy) -> Self {
        Self::with_profile(policy, EnergyProfile::default())
    }

    /// Resume intake from a previously saved profile.
    pub fn with_profile(policy: IntakePolicy, profile: EnergyProfile) -> Self {
        Self {
            step: IntakeStep::Consumption,
            bill_source: BillSource::Undecided,
            bill_analysis_applied: false,
            policy,
            profile,
        }
    }

    pub fn step(&self) -> IntakeStep {
        self.step
    }

    pub fn bill_source(&self) -> BillSource {
        self.bill_source
    }

    pub fn profile(&self) -> &EnergyProfile {
        &self.profile
    }

    pub fn profile_mut(&mut self) -> &mut EnergyProfile {
        &mut self.profile
    }

    pub fn choose_bill_source(&mut self, source: BillSource) {
        self.bill_source = source;
    }

    /// Name and email stay editable regardless of the bill branch; the
    /// numeric consumption fields unlock per branch.
    pub fn consumption_fields_editable(&self) -> bool {
        match self.bill_source {
            BillSource::Undecided => false,
            BillSource::Manual => true,
            BillSource::Upload => self.bill_analysis_applied,
        }
    }

    /// Copy an extraction result into the profile and unlock the figures for
    /// manual correction.
    pub fn apply_bill_analysis(&mut self, analysis: &BillAnalysis) {
        self.profile
            .set_monthly_consumption_kwh(analysis.consumption);
        self.profile.set_monthly_cost_cop(analysis.cost);
        self.profile.energy_rate = Some(analysis.rate);
        self.profile.has_peak_consumption = Some(analysis.has_peaks);
        self.bill_analysis_applied = true;
    }

    /// Move forward one step if the current step's requirements are met.
    pub fn advance(&mut self) -> Result<IntakeStep, IntakeError> {
        match self.step {
            IntakeStep::Consumption => {
                if self.policy.require_consumption_figures {
                    if self.bill_source == BillSource::Undecided {
                        return Err(IntakeError::BillDecisionPending);
                    }
                    if self.profile.monthly_consumption_kwh() <= 0.0
                        || self.profile.monthly_cost_cop() <= 0.0
                    {
                        return Err(IntakeError::MissingConsumptionFigures);
                    }
                }
                self.step = IntakeStep::Property;
            }
            IntakeStep::Property => self.step = IntakeStep::Resources,
            IntakeStep::Resources => return Err(IntakeError::AtFinalStep),
        }
        Ok(self.step)
    }

    /// Move back one step unconditionally; a no-op on the first step.
    pub fn retreat(&mut self) -> IntakeStep {
        self.step = match self.step {
            IntakeStep::Consumption => IntakeStep::Consumption,
            IntakeStep::Property => IntakeStep::Consumption,
            IntakeStep::Resources => IntakeStep::Property,
        };
        self.step
    }

    /// One-shot device position capture. On success the profile gains the
    /// coordinates plus the fixed placeholder address; on failure nothing is
    /// mutated and the error is handed back for display.
    pub fn capture_location<P: LocationProvider>(
        &mut self,
        provider: &P,
    ) -> Result<Geolocation, LocationError> {
        let fix = provider.current_position()?;
        let location = Geolocation {
            lat: fix.lat,
            lng: fix.lng,
            address: Some(GPS_PLACEHOLDER_ADDRESS.to_string()),
        };
        self.profile.location = Some(location.clone());
        Ok(location)
    }

    /// Persist the live profile under the fixed key, overwriting any prior
    /// save. Independent of wizard progression.
    pub fn save_profile<S: ProfileStore>(&self, store: &S) -> Result<(), StoreError> {
        store.save(&self.profile)
    }

    /// The wizard's only exit: hand over the finished profile, available
    /// only from the final step.
    pub fn complete(&self) -> Result<EnergyProfile, IntakeError> {
        if self.step == IntakeStep::Resources {
            Ok(self.profile.clone())
        } else {
            Err(IntakeError::NotAtFinalStep)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::intake::location::Coordinates;

    struct FixedPosition;

    impl LocationProvider for FixedPosition {
        fn current_position(&self) -> Result<Coordinates, LocationError> {
            Ok(Coordinates {
                lat: 10.3910,
                lng: -75.4794,
            })
        }
    }

    struct NoSignal;

    impl LocationProvider for NoSignal {
        fn current_position(&self) -> Result<Coordinates, LocationError> {
            Err(LocationError::Unavailable("no fix".to_string()))
        }
    }

    #[test]
    fn steps_walk_forward_and_back_in_order() {
        let mut wizard = IntakeWizard::new(IntakePolicy::lenient());
        assert_eq!(wizard.step(), IntakeStep::Consumption);
        assert_eq!(wizard.advance().expect("advance"), IntakeStep::Property);
        assert_eq!(wizard.advance().expect("advance"), IntakeStep::Resources);
        assert_eq!(wizard.advance(), Err(IntakeError::AtFinalStep));
        assert_eq!(wizard.retreat(), IntakeStep::Property);
        assert_eq!(wizard.retreat(), IntakeStep::Consumption);
        // Retreating from the first step stays put.
        assert_eq!(wizard.retreat(), IntakeStep::Consumption);
    }

    #[test]
    fn lenient_policy_allows_blank_figures() {
        let mut wizard = IntakeWizard::new(IntakePolicy::lenient());
        assert_eq!(wizard.bill_source(), BillSource::Undecided);
        assert!(wizard.advance().is_ok());
    }

    #[test]
    fn strict_policy_gates_the_consumption_step() {
        let mut wizard = IntakeWizard::new(IntakePolicy::strict());
        assert_eq!(wizard.advance(), Err(IntakeError::BillDecisionPending));

        wizard.choose_bill_source(BillSource::Manual);
        assert_eq!(wizard.advance(), Err(IntakeError::MissingConsumptionFigures));

        wizard.profile_mut().set_monthly_consumption_kwh(3500.0);
        wizard.profile_mut().set_monthly_cost_cop(2_000_000.0);
        assert_eq!(wizard.advance().expect("advance"), IntakeStep::Property);
    }

    #[test]
    fn consumption_fields_unlock_per_branch() {
        let mut wizard = IntakeWizard::new(IntakePolicy::lenient());
        assert!(!wizard.consumption_fields_editable());

        wizard.choose_bill_source(BillSource::Manual);
        assert!(wizard.consumption_fields_editable());

        wizard.choose_bill_source(BillSource::Upload);
        assert!(!wizard.consumption_fields_editable());

        wizard.apply_bill_analysis(&BillAnalysis {
            consumption: 420.0,
            cost: 350_000.0,
            rate: 833.0,
            has_peaks: true,
        });
        assert!(wizard.consumption_fields_editable());
        assert_eq!(wizard.profile().monthly_consumption_kwh(), 420.0);
        assert_eq!(wizard.profile().energy_rate, Some(833.0));
        assert_eq!(wizard.profile().has_peak_consumption, Some(true));
    }

    #[test]
    fn location_capture_stores_the_placeholder_address() {
        let mut wizard = IntakeWizard::new(IntakePolicy::lenient());
        let location = wizard
            .capture_location(&FixedPosition)
            .expect("position available");
        assert_eq!(location.lat, 10.3910);
        assert_eq!(location.lng, -75.4794);
        assert_eq!(
            wizard.profile().location.as_ref().and_then(|l| l.address.as_deref()),
            Some(GPS_PLACEHOLDER_ADDRESS)
        );
    }

    #[test]
    fn failed_capture_mutates_nothing() {
        let mut wizard = IntakeWizard::new(IntakePolicy::lenient());
        wizard.profile_mut().neighborhood = "Bocagrande".to_string();
        let before = wizard.profile().clone();

        assert!(wizard.capture_location(&NoSignal).is_err());
        assert_eq!(wizard.profile(), &before);
        assert!(wizard.profile().location.is_none());
    }

    #[test]
    fn completion_requires_the_final_step() {
        let mut wizard = IntakeWizard::new(IntakePolicy::lenient());
        assert_eq!(wizard.complete(), Err(IntakeError::NotAtFinalStep));
        wizard.advance().expect("to property");
        wizard.advance().expect("to resources");
        let profile = wizard.complete().expect("finished profile");
        assert_eq!(profile, *wizard.profile());
    }
}
