//! Derivation of the visible bus list from search text and date filter

use crate::core::data::{BusRecord, BusRegistry};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Date-availability filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum DateFilter {
    #[default]
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "tomorrow")]
    Tomorrow,
    #[serde(rename = "7days")]
    #[value(name = "7days", alias = "week")]
    Next7Days,
}

impl DateFilter {
    pub fn admits(&self, bus: &BusRecord) -> bool {
        match self {
            DateFilter::Today => true,
            DateFilter::Tomorrow => bus.available_tomorrow,
            DateFilter::Next7Days => bus.available_next7_days,
        }
    }
}

impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DateFilter::Today => "today",
            DateFilter::Tomorrow => "tomorrow",
            DateFilter::Next7Days => "7days",
        };
        f.write_str(label)
    }
}

pub struct SearchEngine;

impl SearchEngine {
    /// Case-insensitive substring match on name or registration number
    pub fn matches_query(bus: &BusRecord, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        bus.name.to_lowercase().contains(&needle) || bus.number.to_lowercase().contains(&needle)
    }

    /// Buses matching both the query and the date filter, in registry order
    pub fn visible_buses<'a>(
        registry: &'a BusRegistry,
        query: &str,
        filter: DateFilter,
    ) -> Vec<&'a BusRecord> {
        registry
            .list_all()
            .iter()
            .filter(|bus| Self::matches_query(bus, query) && filter.admits(bus))
            .collect()
    }
}
