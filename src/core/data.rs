//! Core data structures for the bus board
//!
//! Bus records, user profiles and the ordered bus registry that owns
//! every record for the lifetime of the board.

use crate::utils::error::{AppError, AppResult};
use crate::utils::time_format;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Role attached to every account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum Role {
    Admin,
    Passenger,
    Conductor,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Admin => "Admin",
            Role::Passenger => "Passenger",
            Role::Conductor => "Conductor",
        };
        f.write_str(name)
    }
}

/// Live status reported for a bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum BusStatus {
    #[serde(rename = "On the Way")]
    OnTheWay,
    Arrived,
    Delayed,
}

impl fmt::Display for BusStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BusStatus::OnTheWay => "On the Way",
            BusStatus::Arrived => "Arrived",
            BusStatus::Delayed => "Delayed",
        };
        f.write_str(label)
    }
}

/// A single bus with its latest reported status and attribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusRecord {
    pub id: String,
    pub name: String,
    pub number: String,
    status: BusStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    delay_minutes: Option<u32>,
    #[serde(default)]
    pub route_stops: Vec<String>,
    pub available_tomorrow: bool,
    pub available_next7_days: bool,
    pub updated_by: String,
    #[serde(rename = "updatedByType")]
    pub updated_by_role: Role,
    #[serde(with = "time_format")]
    pub last_update_time: DateTime<Utc>,
}

/// Form fields for creating or editing a bus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusInput {
    pub name: String,
    pub number: String,
    /// Comma-separated stop names
    pub stops: String,
    pub available_tomorrow: bool,
    pub available_next7_days: bool,
}

impl Default for BusInput {
    fn default() -> Self {
        Self {
            name: String::new(),
            number: String::new(),
            stops: String::new(),
            available_tomorrow: true,
            available_next7_days: true,
        }
    }
}

impl BusInput {
    pub fn new(name: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number: number.into(),
            ..Self::default()
        }
    }

    pub fn with_stops(mut self, stops: impl Into<String>) -> Self {
        self.stops = stops.into();
        self
    }

    pub fn with_availability(mut self, tomorrow: bool, next7_days: bool) -> Self {
        self.available_tomorrow = tomorrow;
        self.available_next7_days = next7_days;
        self
    }

    /// Pre-filled form for editing an existing record
    pub fn from_record(bus: &BusRecord) -> Self {
        Self {
            name: bus.name.clone(),
            number: bus.number.clone(),
            stops: bus.route_stops.join(","),
            available_tomorrow: bus.available_tomorrow,
            available_next7_days: bus.available_next7_days,
        }
    }

    fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() || self.number.trim().is_empty() {
            return Err(AppError::Validation(
                "Bus name and number are required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Split a comma-separated stop list, dropping blank entries
pub fn parse_stops(stops: &str) -> Vec<String> {
    stops
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Who a record change is credited to
#[derive(Debug, Clone, Copy)]
struct Attribution<'a> {
    name: &'a str,
    role: Role,
}

impl<'a> From<&'a UserProfile> for Attribution<'a> {
    fn from(actor: &'a UserProfile) -> Self {
        Self {
            name: &actor.name,
            role: actor.role,
        }
    }
}

impl BusRecord {
    fn new(input: &BusInput, by: Attribution<'_>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: input.name.clone(),
            number: input.number.clone(),
            status: BusStatus::OnTheWay,
            delay_minutes: None,
            route_stops: parse_stops(&input.stops),
            available_tomorrow: input.available_tomorrow,
            available_next7_days: input.available_next7_days,
            updated_by: by.name.to_string(),
            updated_by_role: by.role,
            last_update_time: Utc::now(),
        }
    }

    pub fn status(&self) -> BusStatus {
        self.status
    }

    /// Reported delay; only ever present while the bus is delayed
    pub fn delay_minutes(&self) -> Option<u32> {
        self.delay_minutes
    }

    fn stamp(&mut self, by: Attribution<'_>) {
        self.updated_by = by.name.to_string();
        self.updated_by_role = by.role;
        self.last_update_time = Utc::now();
    }

    fn set_status(&mut self, status: BusStatus, delay_minutes: Option<u32>) {
        self.status = status;
        self.delay_minutes = match status {
            BusStatus::Delayed => delay_minutes,
            _ => None,
        };
    }

    fn apply_input(&mut self, input: &BusInput) {
        self.name = input.name.clone();
        self.number = input.number.clone();
        self.route_stops = parse_stops(&input.stops);
        self.available_tomorrow = input.available_tomorrow;
        self.available_next7_days = input.available_next7_days;
    }
}

impl fmt::Display for BusRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) - {}", self.name, self.number, self.status)?;
        if let Some(minutes) = self.delay_minutes {
            write!(f, " {} min", minutes)?;
        }
        Ok(())
    }
}

/// A registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub phone: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl UserProfile {
    pub fn new(name: impl Into<String>, phone: impl Into<String>, role: Role) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            phone: phone.into(),
            role,
            password: None,
            photo_url: None,
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

/// Ordered collection of bus records; insertion order is display order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BusRegistry {
    buses: Vec<BusRecord>,
}

impl BusRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the demo buses shown on a fresh board
    pub fn with_samples() -> Self {
        let admin = Attribution {
            name: "Admin",
            role: Role::Admin,
        };
        let passenger = Attribution {
            name: "Ravi Kumar",
            role: Role::Passenger,
        };
        let mut registry = Self::new();

        let samples = [
            (
                BusInput::new("Hyderabad Express", "AP 28 Z 1234")
                    .with_stops("MGBS, Koti, Dilsukhnagar, Hayathnagar"),
                BusStatus::OnTheWay,
                None,
                admin,
            ),
            (
                BusInput::new("Village Local", "AP 10 K 5566")
                    .with_stops("Village Center, Main School, Post Office, Bus Stand")
                    .with_availability(false, true),
                BusStatus::Arrived,
                None,
                passenger,
            ),
            (
                BusInput::new("Main Road Bus", "TS 09 J 9900")
                    .with_stops("Crossroads, Market, Hospital"),
                BusStatus::Delayed,
                Some(15),
                admin,
            ),
        ];

        for (input, status, delay, actor) in samples {
            let mut bus = BusRecord::new(&input, actor);
            bus.set_status(status, delay);
            registry.buses.push(bus);
        }
        registry
    }

    /// Restore invariants on records that came from storage
    pub fn normalize(&mut self) {
        for bus in &mut self.buses {
            if bus.id.is_empty() {
                bus.id = Uuid::new_v4().to_string();
            }
            if bus.status != BusStatus::Delayed {
                bus.delay_minutes = None;
            }
        }
    }

    pub fn create_bus(&mut self, input: &BusInput, actor: &UserProfile) -> AppResult<BusRecord> {
        input.validate()?;
        let bus = BusRecord::new(input, actor.into());
        self.buses.push(bus.clone());
        Ok(bus)
    }

    pub fn edit_bus(
        &mut self,
        id: &str,
        input: &BusInput,
        actor: &UserProfile,
    ) -> AppResult<BusRecord> {
        let bus = self.find_mut(id)?;
        input.validate()?;
        bus.apply_input(input);
        bus.stamp(actor.into());
        Ok(bus.clone())
    }

    /// Record a status report. Callers are expected to have checked the role.
    pub fn update_status(
        &mut self,
        id: &str,
        status: BusStatus,
        delay_minutes: Option<u32>,
        actor: &UserProfile,
    ) -> AppResult<BusRecord> {
        let bus = self.find_mut(id)?;
        bus.set_status(status, delay_minutes);
        bus.stamp(actor.into());
        Ok(bus.clone())
    }

    pub fn delete_bus(&mut self, id: &str) -> AppResult<BusRecord> {
        let index = self
            .buses
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| not_found(id))?;
        Ok(self.buses.remove(index))
    }

    pub fn list_all(&self) -> &[BusRecord] {
        &self.buses
    }

    pub fn len(&self) -> usize {
        self.buses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buses.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&BusRecord> {
        self.buses.iter().find(|b| b.id == id)
    }

    /// Find a bus by ID, falling back to its registration number
    pub fn resolve(&self, identifier: &str) -> Option<&BusRecord> {
        self.find(identifier).or_else(|| {
            self.buses
                .iter()
                .find(|b| b.number.eq_ignore_ascii_case(identifier.trim()))
        })
    }

    fn find_mut(&mut self, id: &str) -> AppResult<&mut BusRecord> {
        self.buses
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| not_found(id))
    }
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Bus '{}'", id))
}
