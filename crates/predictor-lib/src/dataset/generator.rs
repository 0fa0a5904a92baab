//! Synthetic construction-project generator
//!
//! Produces training data from fixed project-type and location profiles.
//! Feature and target formulas mirror observed delay patterns: delays grow
//! with inefficiency, resource shortage, complexity, weather risk, and
//! timeline pressure, with bounded noise on top.

use crate::models::{DatasetRow, FEATURE_NAMES};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::Serialize;

/// Seed used when the caller does not supply one
pub const DEFAULT_SEED: u64 = 42;

/// Std-dev of the gaussian noise added to the delay target, in days
const DELAY_NOISE_STD: f64 = 5.0;

/// Cost escalation applied to each day of delay
const COST_ESCALATION_RATE: f64 = 1.2;

/// Delays are capped at this fraction of the planned duration
const MAX_DELAY_FRACTION: f64 = 0.5;

struct ProjectTypeProfile {
    name: &'static str,
    avg_budget: f64,
    avg_duration_days: f64,
    complexity_factor: f64,
    weather_sensitivity: f64,
}

struct LocationProfile {
    name: &'static str,
    weather_risk: f64,
    labor_availability: f64,
    material_cost_factor: f64,
}

const PROJECT_TYPES: [ProjectTypeProfile; 5] = [
    ProjectTypeProfile {
        name: "residential_building",
        avg_budget: 2_500_000.0,
        avg_duration_days: 180.0,
        complexity_factor: 1.0,
        weather_sensitivity: 0.7,
    },
    ProjectTypeProfile {
        name: "commercial_building",
        avg_budget: 8_500_000.0,
        avg_duration_days: 365.0,
        complexity_factor: 1.5,
        weather_sensitivity: 0.6,
    },
    ProjectTypeProfile {
        name: "highway_construction",
        avg_budget: 15_000_000.0,
        avg_duration_days: 540.0,
        complexity_factor: 2.0,
        weather_sensitivity: 0.9,
    },
    ProjectTypeProfile {
        name: "bridge_construction",
        avg_budget: 25_000_000.0,
        avg_duration_days: 720.0,
        complexity_factor: 2.5,
        weather_sensitivity: 0.8,
    },
    ProjectTypeProfile {
        name: "industrial_facility",
        avg_budget: 45_000_000.0,
        avg_duration_days: 900.0,
        complexity_factor: 3.0,
        weather_sensitivity: 0.5,
    },
];

const LOCATIONS: [LocationProfile; 8] = [
    LocationProfile {
        name: "Delhi",
        weather_risk: 0.8,
        labor_availability: 0.9,
        material_cost_factor: 1.0,
    },
    LocationProfile {
        name: "Mumbai",
        weather_risk: 0.9,
        labor_availability: 0.8,
        material_cost_factor: 1.1,
    },
    LocationProfile {
        name: "Bangalore",
        weather_risk: 0.6,
        labor_availability: 0.9,
        material_cost_factor: 1.05,
    },
    LocationProfile {
        name: "Chennai",
        weather_risk: 0.8,
        labor_availability: 0.8,
        material_cost_factor: 1.0,
    },
    LocationProfile {
        name: "Kolkata",
        weather_risk: 0.9,
        labor_availability: 0.7,
        material_cost_factor: 0.95,
    },
    LocationProfile {
        name: "Hyderabad",
        weather_risk: 0.7,
        labor_availability: 0.8,
        material_cost_factor: 1.0,
    },
    LocationProfile {
        name: "Pune",
        weather_risk: 0.7,
        labor_availability: 0.9,
        material_cost_factor: 1.05,
    },
    LocationProfile {
        name: "Ahmedabad",
        weather_risk: 0.8,
        labor_availability: 0.8,
        material_cost_factor: 0.98,
    },
];

/// Seeded generator for reproducible datasets
pub struct DatasetGenerator {
    rng: StdRng,
    delay_noise: Normal<f64>,
}

impl DatasetGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            delay_noise: Normal::new(0.0, DELAY_NOISE_STD)
                .expect("valid gaussian parameters"),
        }
    }

    pub fn generate(&mut self, count: usize) -> Vec<DatasetRow> {
        (0..count).map(|i| self.generate_row(i + 1)).collect()
    }

    fn generate_row(&mut self, id: usize) -> DatasetRow {
        let ptype = &PROJECT_TYPES[self.rng.random_range(0..PROJECT_TYPES.len())];
        let location = &LOCATIONS[self.rng.random_range(0..LOCATIONS.len())];

        let budget = ptype.avg_budget * self.rng.random_range(0.7..1.5);
        let planned_duration = ptype.avg_duration_days * self.rng.random_range(0.8..1.3);

        // Progress efficiency: base crew efficiency damped by local labor supply
        let base_efficiency = self.rng.random_range(0.6..1.0);
        let progress_efficiency = base_efficiency * location.labor_availability;

        // Resource availability: labor, material, and equipment terms
        let resource_availability = location.labor_availability * 0.4
            + self.rng.random_range(0.7..1.0) * 0.3
            + self.rng.random_range(0.6..0.95) * 0.3;

        // Complexity: type factor, budget scale, and residual variation
        let budget_complexity = (budget / 50_000_000.0).min(1.0);
        let project_complexity = (ptype.complexity_factor * 0.4
            + budget_complexity * 0.3
            + self.rng.random_range(0.5..1.0) * 0.3)
            / 3.0;

        // Weather: location risk blended with type sensitivity, seasonal swing
        let seasonal_factor = self.rng.random_range(0.5..1.0);
        let weather_impact =
            (location.weather_risk * 0.6 + ptype.weather_sensitivity * 0.4) * seasonal_factor;

        // Timeline pressure from schedule slippage
        let current_progress: f64 = self.rng.random_range(0.1..0.9);
        let time_elapsed: f64 = self.rng.random_range(0.1..0.8);
        let progress_variance = current_progress - time_elapsed;
        let late_penalty: f64 = if time_elapsed > 0.7 { 0.3 } else { 0.0 };
        let timeline_pressure = ((-progress_variance).max(0.0) + late_penalty).min(1.0);

        // Delay target: weighted contributions, noisy, capped at half the plan
        let base_delay = (1.0 - progress_efficiency).max(0.0) * 30.0
            + (1.0 - resource_availability).max(0.0) * 25.0
            + project_complexity * 20.0
            + weather_impact * 15.0
            + timeline_pressure * 10.0;
        let noisy_delay =
            base_delay * self.rng.random_range(0.7..1.4) + self.delay_noise.sample(&mut self.rng);
        let delay_days = noisy_delay
            .max(0.0)
            .min(planned_duration * MAX_DELAY_FRACTION);

        let daily_cost = budget / planned_duration;
        let additional_cost = delay_days * daily_cost * COST_ESCALATION_RATE;

        DatasetRow {
            project_id: format!("PROJ_{:04}", id),
            project_type: ptype.name.to_string(),
            location: location.name.to_string(),
            budget: round2(budget),
            planned_duration_days: planned_duration.round() as u32,
            current_progress_pct: round1(current_progress * 100.0),
            time_elapsed_pct: round1(time_elapsed * 100.0),
            progress_efficiency: round3(progress_efficiency),
            resource_availability: round3(resource_availability),
            project_complexity: round3(project_complexity),
            weather_impact: round3(weather_impact),
            timeline_pressure: round3(timeline_pressure),
            delay_days: round1(delay_days),
            additional_cost_usd: round2(additional_cost),
            progress_variance: round3(progress_variance),
            labor_availability: location.labor_availability,
            weather_risk_location: location.weather_risk,
            material_cost_factor: location.material_cost_factor,
        }
    }
}

/// Aggregate statistics over a generated dataset
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub mean_delay_days: f64,
    pub mean_additional_cost_usd: f64,
    /// Pearson correlation of each feature with the delay target
    pub delay_correlations: Vec<(String, f64)>,
}

impl DatasetSummary {
    pub fn from_rows(rows: &[DatasetRow]) -> Self {
        let n = rows.len().max(1) as f64;
        let mean_delay = rows.iter().map(|r| r.delay_days).sum::<f64>() / n;
        let mean_cost = rows.iter().map(|r| r.additional_cost_usd).sum::<f64>() / n;

        let delays: Vec<f64> = rows.iter().map(|r| r.delay_days).collect();
        let delay_correlations = FEATURE_NAMES
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let values: Vec<f64> = rows.iter().map(|r| r.features().as_array()[i]).collect();
                (name.to_string(), pearson(&values, &delays))
            })
            .collect();

        Self {
            rows: rows.len(),
            mean_delay_days: mean_delay,
            mean_additional_cost_usd: mean_cost,
            delay_correlations,
        }
    }
}

fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() < 2 || xs.len() != ys.len() {
        return 0.0;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        cov += (x - mean_x) * (y - mean_y);
        var_x += (x - mean_x).powi(2);
        var_y += (y - mean_y).powi(2);
    }
    let denom = (var_x * var_y).sqrt();
    if denom < f64::EPSILON {
        return 0.0;
    }
    cov / denom
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
