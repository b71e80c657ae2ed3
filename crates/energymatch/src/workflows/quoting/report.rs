use serde::Serialize;

use super::recommendation::Recommendation;

/// Comparison window for the savings bars: five years of monthly savings.
const SAVINGS_HORIZON_MONTHS: f64 = 60.0;
const COP_PER_MILLION: f64 = 1_000_000.0;

/// Card projection of one ranked offer; prices rendered in millions the way
/// the results view displays them.
#[derive(Debug, Clone, Serialize)]
pub struct OfferView {
    pub rank: usize,
    pub best_value: bool,
    pub provider_name: String,
    pub technology: String,
    pub capacity_kw: f64,
    pub price_per_kw_millions: f64,
    pub upfront_cost_millions: f64,
    pub roi_years: f64,
    pub confidence_score: f64,
}

/// One bar pair of the investment-vs-savings chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartEntry {
    pub name: String,
    pub investment_millions: f64,
    pub savings_millions: f64,
}

/// Pure projection of a ranked batch: offer cards plus the derived chart
/// series. No logic beyond unit conversion.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteReport {
    pub offers: Vec<OfferView>,
    pub chart: Vec<ChartEntry>,
}

impl QuoteReport {
    pub fn new(offers: &[Recommendation]) -> Self {
        let views = offers
            .iter()
            .enumerate()
            .map(|(index, offer)| OfferView {
                rank: index + 1,
                best_value: index == 0,
                provider_name: offer.provider_name.clone(),
                technology: offer.technology.label().to_string(),
                capacity_kw: offer.capacity_kw,
                price_per_kw_millions: round_to(offer.price_per_kw / COP_PER_MILLION, 2),
                upfront_cost_millions: round_to(offer.upfront_cost / COP_PER_MILLION, 1),
                roi_years: offer.roi_years,
                confidence_score: offer.confidence_score,
            })
            .collect();

        let chart = offers
            .iter()
            .map(|offer| ChartEntry {
                name: short_name(&offer.provider_name),
                investment_millions: offer.upfront_cost / COP_PER_MILLION,
                savings_millions: offer.savings_monthly * SAVINGS_HORIZON_MONTHS / COP_PER_MILLION,
            })
            .collect();

        Self {
            offers: views,
            chart,
        }
    }
}

fn short_name(provider: &str) -> String {
    provider
        .split_whitespace()
        .next()
        .unwrap_or(provider)
        .to_string()
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
