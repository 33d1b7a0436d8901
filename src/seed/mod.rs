//! Populates an empty employee store with sample identities.
//!
//! The adapter only runs when the store is empty and serializes concurrent
//! callers, so a burst of page loads against an empty store triggers a
//! single outbound fetch.

mod random_user;

use chrono::{Local, NaiveDate};
use futures_util::future::BoxFuture;
use log::{error, info, warn};
use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

pub use random_user::RandomUserClient;

use crate::db::EmployeeStore;
use crate::models::employee::{canonical_state, Employee, Gender, Status};
use crate::utils::validation::dob_in_range;

#[derive(Debug)]
pub enum SeedError {
    Http(reqwest::Error),
    Decode(String),
}

impl fmt::Display for SeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedError::Http(err) => write!(f, "seed request failed: {}", err),
            SeedError::Decode(msg) => write!(f, "seed response unreadable: {}", msg),
        }
    }
}

impl Error for SeedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SeedError::Http(err) => Some(err),
            SeedError::Decode(_) => None,
        }
    }
}

impl From<reqwest::Error> for SeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SeedError::Decode(err.to_string())
        } else {
            SeedError::Http(err)
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct IdentityName {
    pub first: String,
    pub last: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct IdentityDob {
    pub date: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct IdentityLocation {
    pub state: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct IdentityPicture {
    pub large: String,
}

/// One entry of the generator's `results` array.
#[derive(Deserialize, Debug, Clone)]
pub struct RandomIdentity {
    pub gender: String,
    pub name: IdentityName,
    pub email: String,
    pub dob: IdentityDob,
    pub location: IdentityLocation,
    #[serde(default)]
    pub picture: Option<IdentityPicture>,
}

/// Where sample identities come from.
pub trait IdentitySource: Send + Sync {
    fn fetch(&self, count: usize) -> BoxFuture<'_, Result<Vec<RandomIdentity>, SeedError>>;
}

/// Maps a generated identity onto an employee. The generator has no notion
/// of employment status, so the caller supplies one.
///
/// Identities whose dob or state cannot be expressed as a saveable employee
/// yield `None`.
pub fn identity_to_employee(identity: &RandomIdentity, status: Status) -> Option<Employee> {
    let gender = match identity.gender.to_ascii_lowercase().as_str() {
        "male" => Gender::Male,
        "female" => Gender::Female,
        _ => Gender::Other,
    };
    let date = identity.dob.date.get(..10)?;
    let dob = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .filter(|dob| dob_in_range(*dob, Local::now().date_naive()))?;
    let state = canonical_state(&identity.location.state)?;

    Some(Employee {
        id: None,
        full_name: format!("{} {}", identity.name.first, identity.name.last),
        email: identity.email.clone(),
        gender,
        dob,
        state: state.to_string(),
        status,
        image: identity.picture.as_ref().map(|picture| picture.large.clone()),
    })
}

fn random_status() -> Status {
    if rand::random::<bool>() {
        Status::Active
    } else {
        Status::Inactive
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Disabled,
    AlreadyPopulated,
    Seeded(usize),
    Failed,
}

pub struct SeedAdapter {
    source: Arc<dyn IdentitySource>,
    employees: Arc<EmployeeStore>,
    count: usize,
    enabled: bool,
    in_flight: Mutex<()>,
}

impl SeedAdapter {
    pub fn new(
        source: Arc<dyn IdentitySource>,
        employees: Arc<EmployeeStore>,
        count: usize,
        enabled: bool,
    ) -> Self {
        Self {
            source,
            employees,
            count,
            enabled,
            in_flight: Mutex::new(()),
        }
    }

    /// Fetches and stores sample employees if, and only if, the store is
    /// empty. Failures are logged and leave the store empty.
    pub async fn ensure_seeded(&self) -> SeedOutcome {
        if !self.enabled {
            return SeedOutcome::Disabled;
        }
        if !self.employees.is_empty() {
            return SeedOutcome::AlreadyPopulated;
        }

        let _guard = self.in_flight.lock().await;
        // Another caller may have finished seeding while we waited.
        if !self.employees.is_empty() {
            return SeedOutcome::AlreadyPopulated;
        }

        info!("employee store is empty, fetching {} sample identities", self.count);
        let identities = match self.source.fetch(self.count).await {
            Ok(identities) => identities,
            Err(err) => {
                error!("failed to seed employees: {}", err);
                return SeedOutcome::Failed;
            }
        };

        let mut seeded = 0;
        for identity in &identities {
            let Some(employee) = identity_to_employee(identity, random_status()) else {
                warn!(
                    "skipping sample identity with dob `{}` and state `{}`",
                    identity.dob.date, identity.location.state
                );
                continue;
            };
            if let Err(err) = self.employees.upsert(employee) {
                error!("failed to store seeded employee: {}", err);
                return SeedOutcome::Failed;
            }
            seeded += 1;
        }

        info!("seeded {} employees", seeded);
        SeedOutcome::Seeded(seeded)
    }
}
