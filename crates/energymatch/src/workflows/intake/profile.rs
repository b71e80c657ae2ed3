use serde::{Deserialize, Deserializer, Serialize};

pub const OPERATING_HOURS_MAX: u8 = 24;
pub const OPERATING_DAYS_MAX: u8 = 7;

/// Top-level view a visitor lands in. Carries no state beyond the active tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Client,
    Provider,
    Admin,
}

impl UserRole {
    pub const fn ordered() -> [Self; 3] {
        [Self::Client, Self::Provider, Self::Admin]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Provider => "provider",
            Self::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientCategory {
    Enterprise,
    Home,
}

impl ClientCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Enterprise => "enterprise",
            Self::Home => "home",
        }
    }
}

/// Fixed enumeration of property kinds; never free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyCategory {
    Commercial,
    Industrial,
    ResidentialOffice,
    ResidentialHome,
}

impl PropertyCategory {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Commercial,
            Self::Industrial,
            Self::ResidentialOffice,
            Self::ResidentialHome,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Commercial => "Comercial",
            Self::Industrial => "Industrial",
            Self::ResidentialOffice => "Oficina Residencial",
            Self::ResidentialHome => "Casa/Residencia",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetBracket {
    Low,
    Medium,
    High,
}

impl BudgetBracket {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Device-reported position, present only after a successful capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geolocation {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// The prospective customer's intake record. One per session; mutated field
/// by field by the wizard and discarded unless explicitly saved.
///
/// Numeric invariants (hours in [0, 24], days in [0, 7], non-negative
/// consumption and cost) are held by the clamping mutators and enforced
/// again when a profile is deserialized from an external payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyProfile {
    pub client_category: ClientCategory,
    pub name: String,
    pub email: String,
    #[serde(deserialize_with = "deserialize_non_negative")]
    monthly_consumption_kwh: f64,
    #[serde(deserialize_with = "deserialize_non_negative")]
    monthly_cost_cop: f64,
    pub energy_rate: Option<f64>,
    pub has_peak_consumption: Option<bool>,
    #[serde(deserialize_with = "deserialize_operating_hours")]
    operating_hours: u8,
    #[serde(deserialize_with = "deserialize_operating_days")]
    operating_days: u8,
    pub property_category: PropertyCategory,
    pub location: Option<Geolocation>,
    pub neighborhood: String,
    pub budget: Option<BudgetBracket>,
    /// Reserved for the map-based sizing flow; nothing populates it yet.
    pub roof_area_m2: f64,
}

impl Default for EnergyProfile {
    fn default() -> Self {
        Self {
            client_category: ClientCategory::Enterprise,
            name: String::new(),
            email: String::new(),
            monthly_consumption_kwh: 0.0,
            monthly_cost_cop: 0.0,
            energy_rate: None,
            has_peak_consumption: None,
            operating_hours: 8,
            operating_days: 6,
            property_category: PropertyCategory::Commercial,
            location: None,
            neighborhood: String::new(),
            budget: None,
            roof_area_m2: 0.0,
        }
    }
}

impl EnergyProfile {
    pub fn monthly_consumption_kwh(&self) -> f64 {
        self.monthly_consumption_kwh
    }

    pub fn set_monthly_consumption_kwh(&mut self, kwh: f64) {
        self.monthly_consumption_kwh = clamp_non_negative(kwh);
    }

    pub fn monthly_cost_cop(&self) -> f64 {
        self.monthly_cost_cop
    }

    pub fn set_monthly_cost_cop(&mut self, cost: f64) {
        self.monthly_cost_cop = clamp_non_negative(cost);
    }

    pub fn operating_hours(&self) -> u8 {
        self.operating_hours
    }

    pub fn set_operating_hours(&mut self, hours: u8) {
        self.operating_hours = hours.min(OPERATING_HOURS_MAX);
    }

    pub fn operating_days(&self) -> u8 {
        self.operating_days
    }

    pub fn set_operating_days(&mut self, days: u8) {
        self.operating_days = days.min(OPERATING_DAYS_MAX);
    }
}

fn clamp_non_negative(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

fn deserialize_non_negative<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    Ok(clamp_non_negative(raw))
}

fn deserialize_operating_hours<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = u8::deserialize(deserializer)?;
    Ok(raw.min(OPERATING_HOURS_MAX))
}

fn deserialize_operating_days<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = u8::deserialize(deserializer)?;
    Ok(raw.min(OPERATING_DAYS_MAX))
}
