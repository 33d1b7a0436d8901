use serde::{Deserialize, Serialize};

use crate::models::employee::Employee;

/// List filter as sent by the employee list view. Empty strings do not
/// constrain anything.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct EmployeeFilter {
    pub search: String,
    pub gender: String,
    pub status: String,
}

impl EmployeeFilter {
    pub fn matches(&self, employee: &Employee) -> bool {
        let name_matches = employee
            .full_name
            .to_lowercase()
            .contains(&self.search.to_lowercase());
        let gender_matches = self.gender.is_empty() || self.gender == employee.gender.as_str();
        let status_matches = self.status.is_empty() || self.status == employee.status.as_str();

        name_matches && gender_matches && status_matches
    }

    pub fn apply(&self, employees: &[Employee]) -> Vec<Employee> {
        employees
            .iter()
            .filter(|employee| self.matches(employee))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::employee::{Gender, Status};
    use chrono::NaiveDate;

    fn employee(name: &str, gender: Gender, status: Status) -> Employee {
        Employee {
            id: Some(name.to_lowercase()),
            full_name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            gender,
            dob: NaiveDate::from_ymd_opt(1985, 9, 9).unwrap(),
            state: "Assam".to_string(),
            status,
            image: None,
        }
    }

    fn alice_and_bob() -> Vec<Employee> {
        vec![
            employee("Alice", Gender::Female, Status::Active),
            employee("Bob", Gender::Male, Status::Inactive),
        ]
    }

    fn filter(search: &str, gender: &str, status: &str) -> EmployeeFilter {
        EmployeeFilter {
            search: search.to_string(),
            gender: gender.to_string(),
            status: status.to_string(),
        }
    }

    #[test]
    fn empty_filter_keeps_everything() {
        assert_eq!(EmployeeFilter::default().apply(&alice_and_bob()).len(), 2);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let names: Vec<String> = filter("a", "", "")
            .apply(&alice_and_bob())
            .into_iter()
            .map(|employee| employee.full_name)
            .collect();
        assert_eq!(names, vec!["Alice".to_string()]);

        assert_eq!(filter("BO", "", "").apply(&alice_and_bob())[0].full_name, "Bob");
    }

    #[test]
    fn gender_filter_is_exact() {
        let matched = filter("", "Male", "").apply(&alice_and_bob());
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].full_name, "Bob");
    }

    #[test]
    fn conditions_combine_with_and() {
        assert!(filter("alice", "Female", "Inactive").apply(&alice_and_bob()).is_empty());
        assert_eq!(filter("", "", "Inactive").apply(&alice_and_bob())[0].full_name, "Bob");
    }

    #[test]
    fn reads_partial_query() {
        let parsed: EmployeeFilter = serde_json::from_str(r#"{"status":"Active"}"#).unwrap();
        assert_eq!(parsed, filter("", "", "Active"));
    }
}
