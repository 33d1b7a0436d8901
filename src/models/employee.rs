use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const INDIAN_STATES: &[&str] = &[
    "Andhra Pradesh",
    "Arunachal Pradesh",
    "Assam",
    "Bihar",
    "Chhattisgarh",
    "Goa",
    "Gujarat",
    "Haryana",
    "Himachal Pradesh",
    "Jharkhand",
    "Karnataka",
    "Kerala",
    "Madhya Pradesh",
    "Maharashtra",
    "Manipur",
    "Meghalaya",
    "Mizoram",
    "Nagaland",
    "Odisha",
    "Punjab",
    "Rajasthan",
    "Sikkim",
    "Tamil Nadu",
    "Telangana",
    "Tripura",
    "Uttar Pradesh",
    "Uttarakhand",
    "West Bengal",
    "Andaman and Nicobar Islands",
    "Chandigarh",
    "Dadra and Nagar Haveli and Daman and Diu",
    "Delhi",
    "Jammu and Kashmir",
    "Ladakh",
    "Lakshadweep",
    "Puducherry",
];

pub fn is_known_state(state: &str) -> bool {
    INDIAN_STATES.iter().any(|known| *known == state)
}

/// Older or alternative names still produced by identity generators.
const STATE_ALIASES: &[(&str, &str)] = &[
    ("dadra and nagar haveli", "Dadra and Nagar Haveli and Daman and Diu"),
    ("daman and diu", "Dadra and Nagar Haveli and Daman and Diu"),
    ("orissa", "Odisha"),
    ("pondicherry", "Puducherry"),
    ("uttaranchal", "Uttarakhand"),
    ("nct of delhi", "Delhi"),
    ("national capital territory of delhi", "Delhi"),
    ("andaman and nicobar", "Andaman and Nicobar Islands"),
];

/// Maps a free-form state name onto its entry in [`INDIAN_STATES`],
/// ignoring case and surrounding whitespace.
pub fn canonical_state(state: &str) -> Option<&'static str> {
    let state = state.trim();
    if let Some(known) = INDIAN_STATES
        .iter()
        .find(|known| known.eq_ignore_ascii_case(state))
    {
        return Some(*known);
    }
    let lowered = state.to_ascii_lowercase();
    STATE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lowered)
        .map(|(_, known)| *known)
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Male" => Some(Gender::Male),
            "Female" => Some(Gender::Female),
            "Other" => Some(Gender::Other),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Active,
    Inactive,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "Active",
            Status::Inactive => "Inactive",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Active" => Some(Status::Active),
            "Inactive" => Some(Status::Inactive),
            _ => None,
        }
    }
}

/// One employee record as persisted in the `employee_data` blob.
///
/// `id` is `None` only for records that have not been through
/// [`EmployeeStore::upsert`](crate::db::EmployeeStore::upsert) yet.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub full_name: String,
    pub email: String,
    pub gender: Gender,
    pub dob: NaiveDate,
    pub state: String,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmployeeStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
}

impl EmployeeStats {
    pub fn from_records(employees: &[Employee]) -> Self {
        employees.iter().fold(Self::default(), |mut stats, employee| {
            stats.total += 1;
            match employee.status {
                Status::Active => stats.active += 1,
                Status::Inactive => stats.inactive += 1,
            }
            stats
        })
    }
}
