use std::fmt::Write as _;

use serde::Serialize;

/// One entry of the fixed price catalog embedded in every quote prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteSource {
    pub name: &'static str,
    pub price_per_kwp: u32,
    pub equipment: &'static str,
}

/// The verified-provider price catalog. Quotes returned by the generative
/// service must be traceable to one of these names.
#[derive(Debug, Clone)]
pub struct ProviderCatalog {
    sources: Vec<QuoteSource>,
}

impl ProviderCatalog {
    pub fn standard() -> Self {
        Self {
            sources: vec![
                QuoteSource {
                    name: "SolarCaribe Pro",
                    price_per_kwp: 4_200_000,
                    equipment: "Tier 1 Panels",
                },
                QuoteSource {
                    name: "EcoEnergy Cartagena",
                    price_per_kwp: 4_500_000,
                    equipment: "Includes Microinverters",
                },
                QuoteSource {
                    name: "Ingeniería Sostenible SAS",
                    price_per_kwp: 3_900_000,
                    equipment: "Standard String Inverter",
                },
            ],
        }
    }

    pub fn sources(&self) -> &[QuoteSource] {
        &self.sources
    }

    pub fn contains(&self, provider_name: &str) -> bool {
        self.sources.iter().any(|source| source.name == provider_name)
    }

    /// Render the catalog the way the quote prompt embeds it.
    pub(crate) fn prompt_block(&self) -> String {
        let mut block = String::from("Available Verified Providers in Cartagena Database:\n");
        for (index, source) in self.sources.iter().enumerate() {
            writeln!(
                block,
                "{}. \"{}\" - Price: {} COP/kWp. Specs: {}.",
                index + 1,
                source.name,
                format_thousands(source.price_per_kwp),
                source.equipment
            )
            .expect("write catalog line");
        }
        block
    }
}

fn format_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (offset, ch) in digits.chars().enumerate() {
        if offset > 0 && (digits.len() - offset) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Directory record backing the provider dashboard. Static demo data; no
/// invariants beyond what the fields say.
#[derive(Debug, Clone, Serialize)]
pub struct Provider {
    pub id: &'static str,
    pub name: &'static str,
    pub rating: f32,
    pub verified: bool,
    pub specialties: Vec<&'static str>,
    pub certifications: Vec<&'static str>,
    pub zone: &'static str,
    pub price_per_kw: u32,
    pub years_experience: u8,
    pub service_locations: Vec<&'static str>,
}

pub fn verified_directory() -> Vec<Provider> {
    vec![
        Provider {
            id: "1",
            name: "SolarCaribe Pro",
            rating: 4.8,
            verified: true,
            specialties: vec!["Residencial", "PyME", "Certificado RETIE"],
            certifications: vec!["RETIE", "ISO 9001", "Bureau Veritas"],
            zone: "Costa Caribe",
            price_per_kw: 4_200_000,
            years_experience: 8,
            service_locations: vec!["Cartagena", "Barranquilla", "Santa Marta"],
        },
        Provider {
            id: "2",
            name: "EcoEnergy Cartagena",
            rating: 4.5,
            verified: true,
            specialties: vec!["Industrial", "Eólica", "Mantenimiento"],
            certifications: vec!["RETIE"],
            zone: "Costa Caribe",
            price_per_kw: 4_500_000,
            years_experience: 6,
            service_locations: vec!["Cartagena"],
        },
        Provider {
            id: "3",
            name: "Ingeniería Sostenible SAS",
            rating: 4.2,
            verified: false,
            specialties: vec!["Consultoría", "Diseño"],
            certifications: vec![],
            zone: "Bolívar",
            price_per_kw: 3_900_000,
            years_experience: 4,
            service_locations: vec!["Cartagena", "Toda Colombia"],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_has_the_three_verified_sources() {
        let catalog = ProviderCatalog::standard();
        assert_eq!(catalog.sources().len(), 3);
        assert!(catalog.contains("SolarCaribe Pro"));
        assert!(catalog.contains("EcoEnergy Cartagena"));
        assert!(catalog.contains("Ingeniería Sostenible SAS"));
        assert!(!catalog.contains("Solar del Norte"));
    }

    #[test]
    fn prompt_block_lists_prices_with_separators() {
        let block = ProviderCatalog::standard().prompt_block();
        assert!(block.contains("1. \"SolarCaribe Pro\" - Price: 4,200,000 COP/kWp"));
        assert!(block.contains("3. \"Ingeniería Sostenible SAS\" - Price: 3,900,000 COP/kWp"));
    }

    #[test]
    fn directory_matches_catalog_pricing() {
        let catalog = ProviderCatalog::standard();
        for provider in verified_directory() {
            let source = catalog
                .sources()
                .iter()
                .find(|source| source.name == provider.name)
                .expect("directory entries map to catalog sources");
            assert_eq!(source.price_per_kwp, provider.price_per_kw);
        }
    }
}
