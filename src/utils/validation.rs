use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;
use validator::{Validate, ValidationError};

use crate::errors::AppError;
use crate::models::employee::{is_known_state, Employee, Gender, Status};

/// Field name (as submitted) to a human-readable message.
pub type FieldErrors = BTreeMap<String, String>;

pub const MAX_IMAGE_BYTES: usize = 102_400;
const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Whether a profile image must accompany a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRule {
    Required,
    Optional,
}

/// An employee as submitted from the add/edit modal. Every field may be
/// blank; nothing is trusted until [`EmployeeForm::validate_fields`] passes.
#[derive(Deserialize, Serialize, Validate, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeForm {
    pub id: Option<String>,
    #[validate(custom = "validate_required")]
    pub full_name: String,
    #[validate(custom = "validate_required")]
    pub email: String,
    #[validate(custom = "validate_gender")]
    pub gender: String,
    #[validate(custom = "validate_dob")]
    pub dob: String,
    #[validate(custom = "validate_state")]
    pub state: String,
    #[validate(custom = "validate_status")]
    pub status: String,
    #[validate(custom = "validate_image")]
    pub image: Option<String>,
}

impl EmployeeForm {
    /// Checks the current field values. An empty map means the form can be
    /// persisted.
    pub fn validate_fields(&self, rule: ImageRule) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if let Err(report) = self.validate() {
            for (field, failures) in report.field_errors() {
                if let Some(failure) = failures.first() {
                    let (key, label) = field_meta(field);
                    errors.insert(key.to_string(), message_for(label, &failure.code));
                }
            }
        }

        if rule == ImageRule::Required && is_blank(self.image.as_deref()) {
            errors
                .entry("image".to_string())
                .or_insert_with(|| message_for("Image", "required"));
        }

        errors
    }

    pub fn into_employee(self, rule: ImageRule) -> Result<Employee, FieldErrors> {
        let errors = self.validate_fields(rule);
        if !errors.is_empty() {
            return Err(errors);
        }

        let gender = Gender::parse(self.gender.trim());
        let status = Status::parse(self.status.trim());
        let dob = parse_dob(&self.dob);

        match (gender, status, dob) {
            (Some(gender), Some(status), Some(dob)) => Ok(Employee {
                id: self.id.filter(|id| !id.trim().is_empty()),
                full_name: self.full_name.trim().to_string(),
                email: self.email.trim().to_string(),
                gender,
                dob,
                state: self.state.trim().to_string(),
                status,
                image: self.image.filter(|image| !image.trim().is_empty()),
            }),
            _ => {
                let mut errors = FieldErrors::new();
                errors.insert("form".to_string(), "Submitted values could not be read".to_string());
                Err(errors)
            }
        }
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |value| value.trim().is_empty())
}

fn field_meta(field: &'static str) -> (&'static str, &'static str) {
    match field {
        "full_name" | "fullName" => ("fullName", "Full Name"),
        "email" => ("email", "Email"),
        "gender" => ("gender", "Gender"),
        "dob" => ("dob", "Date of Birth"),
        "state" => ("state", "State"),
        "status" => ("status", "Status"),
        "image" => ("image", "Image"),
        other => (other, other),
    }
}

fn message_for(label: &str, code: &str) -> String {
    match code {
        "required" => format!("{} is required", label),
        "invalid_option" => format!("{} is not a recognised value", label),
        "invalid_date" => format!("{} must be a date in YYYY-MM-DD format", label),
        "out_of_range" => format!("{} must be between 1900-01-01 and today", label),
        "invalid_image" => format!("{} must be an image data URI or an http(s) URL", label),
        _ => format!("{} is invalid", label),
    }
}

fn validate_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

fn validate_gender(value: &str) -> Result<(), ValidationError> {
    validate_required(value)?;
    if Gender::parse(value.trim()).is_none() {
        return Err(ValidationError::new("invalid_option"));
    }
    Ok(())
}

fn validate_status(value: &str) -> Result<(), ValidationError> {
    validate_required(value)?;
    if Status::parse(value.trim()).is_none() {
        return Err(ValidationError::new("invalid_option"));
    }
    Ok(())
}

fn validate_state(value: &str) -> Result<(), ValidationError> {
    validate_required(value)?;
    if !is_known_state(value.trim()) {
        return Err(ValidationError::new("invalid_option"));
    }
    Ok(())
}

fn validate_dob(value: &str) -> Result<(), ValidationError> {
    validate_required(value)?;
    let dob = parse_dob(value).ok_or_else(|| ValidationError::new("invalid_date"))?;
    if !dob_in_range(dob, Local::now().date_naive()) {
        return Err(ValidationError::new("out_of_range"));
    }
    Ok(())
}

// Blank is fine here; whether an image is mandatory depends on `ImageRule`.
fn validate_image(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || is_image_reference(value) {
        return Ok(());
    }
    Err(ValidationError::new("invalid_image"))
}

fn parse_dob(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

pub fn earliest_dob() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

pub fn dob_in_range(dob: NaiveDate, today: NaiveDate) -> bool {
    dob >= earliest_dob() && dob <= today
}

/// True for `data:image/...;base64,` URIs whose payload really is an image,
/// and for plain http(s) URLs.
pub fn is_image_reference(value: &str) -> bool {
    if let Some(rest) = value.strip_prefix("data:") {
        return decode_image_payload(rest).is_some();
    }
    match Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

fn decode_image_payload(rest: &str) -> Option<Vec<u8>> {
    let (header, payload) = rest.split_once(',')?;
    let mime = header.strip_suffix(";base64")?;
    if !mime.starts_with("image/") {
        return None;
    }
    let bytes = STANDARD.decode(payload).ok()?;
    if infer::is_image(&bytes) {
        Some(bytes)
    } else {
        None
    }
}

/// Encodes an uploaded picture as a `data:` URI after checking size and type.
pub fn image_data_uri(bytes: &[u8]) -> Result<String, AppError> {
    if bytes.is_empty() {
        return Err(AppError::BadRequest("Image is required".to_string()));
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(AppError::BadRequest("File size exceeds 100KiB limit".to_string()));
    }

    let file_type = infer::get(bytes)
        .ok_or_else(|| AppError::BadRequest("Invalid file type".to_string()))?;
    if !ALLOWED_IMAGE_TYPES.contains(&file_type.mime_type()) {
        return Err(AppError::BadRequest(
            "Only JPEG, PNG, GIF and WebP images are allowed".to_string(),
        ));
    }

    Ok(format!("data:{};base64,{}", file_type.mime_type(), STANDARD.encode(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;

    const PNG_BYTES: &[u8] = &[
        0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, // signature
        0, 0, 0, 13, b'I', b'H', b'D', b'R', 0, 0, 0, 1, 0, 0, 0, 1, 8, 6, 0, 0, 0, 0x1F, 0x15, 0xC4, 0x89,
        0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82,
    ];

    fn complete_form() -> EmployeeForm {
        EmployeeForm {
            id: None,
            full_name: "Meera Nair".to_string(),
            email: "meera@example.com".to_string(),
            gender: "Female".to_string(),
            dob: "1991-06-30".to_string(),
            state: "Kerala".to_string(),
            status: "Active".to_string(),
            image: None,
        }
    }

    #[test]
    fn blank_form_reports_every_required_field() {
        let errors = EmployeeForm::default().validate_fields(ImageRule::Optional);

        assert_eq!(errors.get("fullName").map(String::as_str), Some("Full Name is required"));
        assert_eq!(errors.get("email").map(String::as_str), Some("Email is required"));
        assert_eq!(errors.get("dob").map(String::as_str), Some("Date of Birth is required"));
        assert_eq!(errors.get("state").map(String::as_str), Some("State is required"));
        assert_eq!(errors.get("gender").map(String::as_str), Some("Gender is required"));
        assert_eq!(errors.get("status").map(String::as_str), Some("Status is required"));
        assert!(!errors.contains_key("image"));
    }

    #[test]
    fn each_missing_required_field_is_reported() {
        let blankers: [(&str, fn(&mut EmployeeForm)); 6] = [
            ("fullName", |f: &mut EmployeeForm| f.full_name = "   ".to_string()),
            ("email", |f: &mut EmployeeForm| f.email.clear()),
            ("dob", |f: &mut EmployeeForm| f.dob.clear()),
            ("state", |f: &mut EmployeeForm| f.state.clear()),
            ("gender", |f: &mut EmployeeForm| f.gender.clear()),
            ("status", |f: &mut EmployeeForm| f.status.clear()),
        ];

        for (field, blank) in blankers {
            let mut form = complete_form();
            blank(&mut form);
            let errors = form.validate_fields(ImageRule::Optional);
            assert_eq!(errors.len(), 1, "unexpected errors for {}: {:?}", field, errors);
            assert!(errors.contains_key(field));
        }
    }

    #[test]
    fn complete_form_passes_without_image_when_optional() {
        assert!(complete_form().validate_fields(ImageRule::Optional).is_empty());
    }

    #[test]
    fn image_required_only_under_required_rule() {
        let errors = complete_form().validate_fields(ImageRule::Required);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("image").map(String::as_str), Some("Image is required"));

        let mut form = complete_form();
        form.image = Some(image_data_uri(PNG_BYTES).unwrap());
        assert!(form.validate_fields(ImageRule::Required).is_empty());
    }

    #[test]
    fn remote_picture_urls_are_accepted() {
        let mut form = complete_form();
        form.image = Some("https://randomuser.me/api/portraits/women/12.jpg".to_string());
        assert!(form.validate_fields(ImageRule::Required).is_empty());
    }

    #[test]
    fn non_image_payloads_are_rejected() {
        let mut form = complete_form();
        form.image = Some(format!("data:image/png;base64,{}", STANDARD.encode(b"plain text")));
        let errors = form.validate_fields(ImageRule::Optional);
        assert!(errors["image"].contains("image data URI"));

        form.image = Some("ftp://example.com/me.png".to_string());
        assert!(form.validate_fields(ImageRule::Optional).contains_key("image"));
    }

    #[test]
    fn unknown_options_are_rejected() {
        let mut form = complete_form();
        form.gender = "male".to_string();
        form.status = "Retired".to_string();
        form.state = "Atlantis".to_string();

        let errors = form.validate_fields(ImageRule::Optional);
        assert_eq!(errors["gender"], "Gender is not a recognised value");
        assert_eq!(errors["status"], "Status is not a recognised value");
        assert_eq!(errors["state"], "State is not a recognised value");
    }

    #[test]
    fn dob_must_be_a_past_date_after_1900() {
        let mut form = complete_form();
        form.dob = "30/06/1991".to_string();
        assert_eq!(
            form.validate_fields(ImageRule::Optional)["dob"],
            "Date of Birth must be a date in YYYY-MM-DD format"
        );

        form.dob = "1899-12-31".to_string();
        assert!(form.validate_fields(ImageRule::Optional)["dob"].contains("between"));

        form.dob = "2999-01-01".to_string();
        assert!(form.validate_fields(ImageRule::Optional).contains_key("dob"));

        form.dob = "1900-01-01".to_string();
        assert!(form.validate_fields(ImageRule::Optional).is_empty());
    }

    #[test]
    fn dob_range_includes_today() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert!(dob_in_range(today, today));
        assert!(!dob_in_range(today.succ_opt().unwrap(), today));
        assert!(dob_in_range(earliest_dob(), today));
    }

    #[test]
    fn into_employee_trims_and_parses() {
        let mut form = complete_form();
        form.full_name = "  Meera Nair ".to_string();
        form.id = Some(String::new());
        form.image = Some(String::new());

        let employee = form.into_employee(ImageRule::Optional).unwrap();
        assert_eq!(employee.full_name, "Meera Nair");
        assert_eq!(employee.gender, Gender::Female);
        assert_eq!(employee.status, Status::Active);
        assert_eq!(employee.dob, NaiveDate::from_ymd_opt(1991, 6, 30).unwrap());
        assert_eq!(employee.id, None);
        assert_eq!(employee.image, None);
    }

    #[test]
    fn into_employee_returns_errors_for_invalid_form() {
        let errors = EmployeeForm::default().into_employee(ImageRule::Required).unwrap_err();
        assert_eq!(errors.len(), 7);
    }

    #[test]
    fn form_reads_camel_case_json_with_missing_fields() {
        let form: EmployeeForm =
            serde_json::from_str(r#"{"fullName":"Only Name","status":"Inactive"}"#).unwrap();
        assert_eq!(form.full_name, "Only Name");
        assert_eq!(form.status, "Inactive");
        assert!(form.email.is_empty());
    }

    #[test]
    fn upload_becomes_data_uri() {
        let uri = image_data_uri(PNG_BYTES).unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
        assert!(is_image_reference(&uri));
    }

    #[test]
    fn upload_rejects_oversized_and_unknown_files() {
        let mut big = PNG_BYTES.to_vec();
        big.resize(MAX_IMAGE_BYTES + 1, 0);
        assert!(matches!(image_data_uri(&big), Err(AppError::BadRequest(_))));
        assert!(matches!(image_data_uri(b"hello world"), Err(AppError::BadRequest(_))));
        assert!(matches!(image_data_uri(&[]), Err(AppError::BadRequest(_))));
    }
}
