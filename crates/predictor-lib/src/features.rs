//! Feature extraction for delay prediction
//!
//! Derives the five bounded [0, 1] indicators the regressors consume from
//! raw project attributes. Every formula is a fixed arithmetic mapping;
//! missing inputs fall back to literal default constants.

use crate::error::Result;
use crate::models::{FeatureVector, ProjectRecord};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Efficiency assumed when timeline dates are missing or degenerate
const DEFAULT_PROGRESS_EFFICIENCY: f64 = 0.8;

/// Availability assumed when no resources are attached to the project
const DEFAULT_RESOURCE_AVAILABILITY: f64 = 0.5;

/// Weather risk for locations outside the lookup table
const DEFAULT_WEATHER_IMPACT: f64 = 0.7;

/// Pressure assumed when timeline dates are missing
const DEFAULT_TIMELINE_PRESSURE: f64 = 0.4;

/// Budget assumed when the request carries none
const DEFAULT_BUDGET: f64 = 1_000_000.0;

/// City substring -> seasonal weather risk score
const WEATHER_RISK: [(&str, f64); 8] = [
    ("delhi", 0.8),
    ("mumbai", 0.9),
    ("bangalore", 0.6),
    ("chennai", 0.8),
    ("kolkata", 0.9),
    ("hyderabad", 0.7),
    ("pune", 0.7),
    ("ahmedabad", 0.8),
];

/// Project timeline resolved from start/end dates, in whole days
struct Timeline {
    total_days: f64,
    elapsed_days: f64,
    remaining_days: f64,
}

/// Extracts engineered features from raw project records
pub struct FeatureExtractor {
    now: DateTime<Utc>,
}

impl FeatureExtractor {
    pub fn new() -> Self {
        Self { now: Utc::now() }
    }

    /// Pin "now" to a fixed instant; timeline features become deterministic
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    pub fn extract(&self, project: &ProjectRecord) -> Result<FeatureVector> {
        let current = project.current_progress.unwrap_or(0.0) / 100.0;
        let budget = project.total_budget.unwrap_or(DEFAULT_BUDGET);
        let resources = project.resource_count();
        let timeline = self.resolve_timeline(project)?;

        Ok(FeatureVector {
            progress_efficiency: round3(self.progress_efficiency(&timeline, current)),
            resource_availability: round3(resource_availability(resources, budget)),
            project_complexity: round3(project_complexity(resources, budget)),
            weather_impact: round3(weather_impact(project.location.as_deref())),
            timeline_pressure: round3(timeline_pressure(&timeline, current)),
        })
    }

    /// Actual-vs-expected progress given the timeline; clamped to [0.1, 1.0]
    fn progress_efficiency(&self, timeline: &Option<Timeline>, current: f64) -> f64 {
        match timeline {
            Some(t) => {
                let expected = (t.elapsed_days / t.total_days).clamp(0.0, 1.0);
                (1.0 + (current - expected)).clamp(0.1, 1.0)
            }
            None => DEFAULT_PROGRESS_EFFICIENCY,
        }
    }

    fn resolve_timeline(&self, project: &ProjectRecord) -> Result<Option<Timeline>> {
        let (Some(start), Some(end)) = (project.start_date.as_deref(), project.end_date.as_deref())
        else {
            return Ok(None);
        };

        let start = parse_date(start)?;
        let end = parse_date(end)?;
        let total_days = (end - start).num_days() as f64;

        // Zero or negative spans give no usable timeline signal
        if total_days <= 0.0 {
            return Ok(None);
        }

        Ok(Some(Timeline {
            total_days,
            elapsed_days: (self.now - start).num_days() as f64,
            remaining_days: (end - self.now).num_days() as f64,
        }))
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Resource density blended with budget scale
fn resource_availability(resources: usize, budget: f64) -> f64 {
    if resources == 0 {
        return DEFAULT_RESOURCE_AVAILABILITY;
    }
    let density = (resources as f64 / 15.0).min(1.0);
    let budget_factor = (budget / 10_000_000.0).min(1.0);
    density * 0.6 + budget_factor * 0.4
}

fn project_complexity(resources: usize, budget: f64) -> f64 {
    let budget_complexity = (budget / 50_000_000.0).min(1.0);
    let resource_complexity = (resources as f64 / 20.0).min(1.0);
    budget_complexity * 0.6 + resource_complexity * 0.4
}

/// Location-based weather risk via substring match against the city table
fn weather_impact(location: Option<&str>) -> f64 {
    let location = location.unwrap_or("").to_lowercase();
    WEATHER_RISK
        .iter()
        .find(|(city, _)| location.contains(city))
        .map(|(_, risk)| *risk)
        .unwrap_or(DEFAULT_WEATHER_IMPACT)
}

/// Urgency from remaining time versus completion status
fn timeline_pressure(timeline: &Option<Timeline>, current: f64) -> f64 {
    match timeline {
        Some(t) => {
            let remaining_ratio = (t.remaining_days / t.total_days).max(0.0);
            if remaining_ratio < 0.3 && current < 0.8 {
                0.8
            } else if remaining_ratio < 0.5 && current < 0.7 {
                0.6
            } else {
                0.3
            }
        }
        None => DEFAULT_TIMELINE_PRESSURE,
    }
}

/// Parse an ISO-8601 datetime, or a bare date taken as midnight UTC
fn parse_date(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")?;
    Ok(date.and_time(NaiveTime::MIN).and_utc())
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
