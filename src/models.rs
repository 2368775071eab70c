use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::actions::RemoteActions;
use crate::forms::upload::FilePayload;

#[derive(Clone)]
pub struct AppState {
    pub actions: Arc<dyn RemoteActions>,
    pub admin_passkey_hash: String,
}

/* -------------------------
   Shared response envelope
--------------------------*/

#[derive(Debug, Serialize)]
pub struct ApiOk<T> {
    pub data: T,
}

/* -------------------------
   Enums
--------------------------*/

/// Appointment lifecycle per the intake flow:
/// 0 pending (patient requested), 1 scheduled (staff confirmed), 2 cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "smallint")]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum Status {
    Pending = 0,
    Scheduled = 1,
    Cancelled = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "smallint")]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum Gender {
    Male = 0,
    Female = 1,
    Other = 2,
}

impl Gender {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "other" => Some(Gender::Other),
            _ => None,
        }
    }
}

/// Which appointment form variant is being submitted.
/// Create requests a new appointment (status pending); schedule and cancel
/// mutate an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentMode {
    Create,
    Schedule,
    Cancel,
}

impl AppointmentMode {
    pub fn status(self) -> Status {
        match self {
            AppointmentMode::Create => Status::Pending,
            AppointmentMode::Schedule => Status::Scheduled,
            AppointmentMode::Cancel => Status::Cancelled,
        }
    }
}

/* -------------------------
   Entities
--------------------------*/

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Patient {
    pub patient_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub birth_date: DateTime<Utc>,
    pub gender: Gender,
    pub address: String,
    pub occupation: String,
    pub emergency_contact_name: String,
    pub emergency_contact_number: String,
    pub primary_physician: String,
    pub insurance_provider: String,
    pub insurance_policy_number: String,
    pub allergies: Option<String>,
    pub current_medication: Option<String>,
    pub family_medical_history: Option<String>,
    pub past_medical_history: Option<String>,
    pub identification_type: Option<String>,
    pub identification_number: Option<String>,
    pub identification_file_name: Option<String>,
    pub treatment_consent: bool,
    pub disclosure_consent: bool,
    pub privacy_consent: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Appointment {
    pub appointment_id: Uuid,
    pub user_id: Uuid,
    pub patient_id: Uuid,
    pub primary_physician: String,
    pub schedule: DateTime<Utc>,
    pub reason: String,
    pub note: Option<String>,
    pub status: Status,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/* -------------------------
   Action payloads
--------------------------*/

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone)]
pub struct NewPatient {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub birth_date: DateTime<Utc>,
    pub gender: Gender,
    pub address: String,
    pub occupation: String,
    pub emergency_contact_name: String,
    pub emergency_contact_number: String,
    pub primary_physician: String,
    pub insurance_provider: String,
    pub insurance_policy_number: String,
    pub allergies: Option<String>,
    pub current_medication: Option<String>,
    pub family_medical_history: Option<String>,
    pub past_medical_history: Option<String>,
    pub identification_type: Option<String>,
    pub identification_number: Option<String>,
    pub identification_document: Option<FilePayload>,
    pub treatment_consent: bool,
    pub disclosure_consent: bool,
    pub privacy_consent: bool,
}

#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub user_id: Uuid,
    pub patient_id: Uuid,
    pub primary_physician: String,
    pub schedule: DateTime<Utc>,
    pub reason: String,
    pub note: Option<String>,
    pub status: Status,
}

#[derive(Debug, Clone)]
pub struct AppointmentPatch {
    pub primary_physician: Option<String>,
    pub schedule: Option<DateTime<Utc>>,
    pub status: Status,
    pub cancellation_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AppointmentCounts {
    pub pending: i64,
    pub scheduled: i64,
    pub cancelled: i64,
}

/* -------------------------
   Helpers
--------------------------*/

/// Human-readable date-time used on the success page and in notifications,
/// e.g. "Mar 4, 2026 9:05 AM".
pub fn format_date_time(dt: DateTime<Utc>) -> String {
    dt.format("%b %-d, %Y %-I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn mode_maps_to_status() {
        assert_eq!(AppointmentMode::Create.status(), Status::Pending);
        assert_eq!(AppointmentMode::Schedule.status(), Status::Scheduled);
        assert_eq!(AppointmentMode::Cancel.status(), Status::Cancelled);
    }

    #[test]
    fn gender_labels() {
        assert_eq!(Gender::from_label("male"), Some(Gender::Male));
        assert_eq!(Gender::from_label(" other "), Some(Gender::Other));
        assert_eq!(Gender::from_label("unknown"), None);
    }

    #[test]
    fn formats_date_time() {
        let dt = Utc.with_ymd_and_hms(2026, 3, 4, 9, 5, 0).unwrap();
        assert_eq!(format_date_time(dt), "Mar 4, 2026 9:05 AM");
    }
}
