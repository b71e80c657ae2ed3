use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use clap::Args;
use serde_json::json;

use crate::infra::InMemoryProfileStore;
use energymatch::error::AppError;
use energymatch::workflows::intake::{
    BillSource, BudgetBracket, Coordinates, IntakePolicy, IntakeWizard, LocationError,
    LocationProvider, ProfileStore,
};
use energymatch::workflows::quoting::{
    DeliveryError, GatewayError, GenerationRequest, GenerativeGateway, LeadGateway, LeadPayload,
    ProviderCatalog, QuoteReport, QuoteService, Recommendation, SOLAR_YIELD_KWH_PER_KWP,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Monthly consumption in kWh for the scripted client
    #[arg(long, default_value_t = 3500.0)]
    pub(crate) consumption: f64,
    /// Contact email; leave empty to skip lead delivery
    #[arg(long, default_value = "industrias@ejemplo.com")]
    pub(crate) email: String,
    /// Gate the consumption step on positive figures
    #[arg(long)]
    pub(crate) strict: bool,
    /// Pretend the generative service is unreachable to show the fallback
    #[arg(long)]
    pub(crate) simulate_outage: bool,
}

/// Gateway double quoting each catalog source at the original engine's
/// sizing heuristic, so the demo runs without network access.
struct ScriptedGateway {
    catalog: ProviderCatalog,
    consumption: f64,
}

#[async_trait]
impl GenerativeGateway for ScriptedGateway {
    async fn generate(&self, _request: GenerationRequest) -> Result<String, GatewayError> {
        let capacity = (self.consumption / SOLAR_YIELD_KWH_PER_KWP * 10.0).round() / 10.0;
        let offers: Vec<serde_json::Value> = self
            .catalog
            .sources()
            .iter()
            .enumerate()
            .map(|(index, source)| {
                let price = f64::from(source.price_per_kwp);
                json!({
                    "id": format!("rec_{}", index + 1),
                    "providerName": source.name,
                    "technology": "Solar PV",
                    "capacityKW": capacity,
                    "pricePerKW": price,
                    "estimatedGenerationMonthly": capacity * SOLAR_YIELD_KWH_PER_KWP,
                    "roiYears": 4.2,
                    "upfrontCost": capacity * price,
                    "savingsMonthly": 600_000.0,
                    "co2Offset": 2.1,
                    "confidenceScore": 92,
                    "hash": format!("0xdemo{}", index + 1),
                })
            })
            .collect();
        Ok(serde_json::Value::Array(offers).to_string())
    }
}

struct OfflineGateway;

#[async_trait]
impl GenerativeGateway for OfflineGateway {
    async fn generate(&self, _request: GenerationRequest) -> Result<String, GatewayError> {
        Err(GatewayError::Transport(
            "simulated outage (--simulate-outage)".to_string(),
        ))
    }
}

#[derive(Default)]
struct PrintingLeads {
    deliveries: Mutex<Vec<LeadPayload>>,
}

#[async_trait]
impl LeadGateway for PrintingLeads {
    async fn deliver(&self, payload: &LeadPayload) -> Result<(), DeliveryError> {
        self.deliveries
            .lock()
            .expect("lead mutex poisoned")
            .push(payload.clone());
        Ok(())
    }
}

struct DemoPosition;

impl LocationProvider for DemoPosition {
    fn current_position(&self) -> Result<Coordinates, LocationError> {
        Ok(Coordinates {
            lat: 10.3910,
            lng: -75.4794,
        })
    }
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        consumption,
        email,
        strict,
        simulate_outage,
    } = args;

    println!("EnergyMatch intake demo");

    let policy = if strict {
        IntakePolicy::strict()
    } else {
        IntakePolicy::lenient()
    };
    let mut wizard = IntakeWizard::new(policy);

    println!("\nStep: {}", wizard.step().label());
    wizard.choose_bill_source(BillSource::Manual);
    {
        let profile = wizard.profile_mut();
        profile.name = "Industrias SAS".to_string();
        profile.email = email;
        profile.set_monthly_consumption_kwh(consumption);
        profile.set_monthly_cost_cop(consumption * 571.0);
    }
    println!(
        "- Manual entry: {} kWh/month, ~{:.0} COP/month",
        wizard.profile().monthly_consumption_kwh(),
        wizard.profile().monthly_cost_cop()
    );

    match wizard.advance() {
        Ok(step) => println!("\nStep: {}", step.label()),
        Err(err) => {
            println!("  Cannot continue: {err}");
            return Ok(());
        }
    }
    wizard.profile_mut().neighborhood = "Bocagrande".to_string();
    match wizard.capture_location(&DemoPosition) {
        Ok(location) => println!(
            "- Device position: {:.4}, {:.4} ({})",
            location.lat,
            location.lng,
            location.address.as_deref().unwrap_or("sin dirección")
        ),
        Err(err) => println!("- Device position unavailable: {err}"),
    }

    match wizard.advance() {
        Ok(step) => println!("\nStep: {}", step.label()),
        Err(err) => {
            println!("  Cannot continue: {err}");
            return Ok(());
        }
    }
    wizard.profile_mut().budget = Some(BudgetBracket::Medium);

    let store = InMemoryProfileStore::default();
    match wizard.save_profile(&store) {
        Ok(()) => println!("- Profile saved to device storage"),
        Err(err) => println!("- Profile save failed: {err}"),
    }
    if let Ok(Some(saved)) = store.load() {
        println!("  Stored record: {} <{}>", saved.name, saved.email);
    }

    let profile = match wizard.complete() {
        Ok(profile) => profile,
        Err(err) => {
            println!("  Wizard not finished: {err}");
            return Ok(());
        }
    };

    let catalog = ProviderCatalog::standard();
    let leads = Arc::new(PrintingLeads::default());
    let offers = if simulate_outage {
        let service = QuoteService::new(Arc::new(OfflineGateway), leads.clone(), catalog);
        service.run_analysis(&profile).await
    } else {
        let gateway = Arc::new(ScriptedGateway {
            catalog: catalog.clone(),
            consumption: profile.monthly_consumption_kwh(),
        });
        let service = QuoteService::new(gateway, leads.clone(), catalog);
        service.run_analysis(&profile).await
    };

    render_offers(&offers);

    let deliveries = leads.deliveries.lock().expect("lead mutex poisoned");
    if deliveries.is_empty() {
        println!("\nLead delivery: skipped (no contact email)");
    } else {
        println!("\nLead delivery payload");
        for payload in deliveries.iter() {
            println!(
                "- {} <{}> | {} kWh | {} offers",
                payload.user.name,
                payload.user.email,
                payload.project.consumption,
                payload.offers.len()
            );
        }
    }

    Ok(())
}

fn render_offers(offers: &[Recommendation]) {
    println!("\nProvider ranking");
    let report = QuoteReport::new(offers);
    for card in &report.offers {
        let badge = if card.best_value { " [best value]" } else { "" };
        println!(
            "{}. {}{} | {} | {} kWp | {:.2}M COP/kWp | {:.1}M COP total | ROI {} años",
            card.rank,
            card.provider_name,
            badge,
            card.technology,
            card.capacity_kw,
            card.price_per_kw_millions,
            card.upfront_cost_millions,
            card.roi_years
        );
    }

    println!("\nInvestment vs five-year savings (millions COP)");
    for entry in &report.chart {
        println!(
            "- {}: invest {:.1} | save {:.1}",
            entry.name, entry.investment_millions, entry.savings_millions
        );
    }
}
