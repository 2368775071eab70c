// Remote actions: the persistence boundary the form containers call into.
// Containers only see the trait; routes hand them the Postgres-backed
// implementation from AppState.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    Appointment, AppointmentCounts, AppointmentMode, AppointmentPatch, NewAppointment, NewPatient,
    NewUser, Patient, User, format_date_time,
};

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait RemoteActions: Send + Sync {
    async fn create_user(&self, data: NewUser) -> Result<User, ActionError>;
    async fn get_user(&self, user_id: Uuid) -> Result<User, ActionError>;
    async fn register_patient(&self, data: NewPatient) -> Result<Patient, ActionError>;
    async fn get_patient(&self, user_id: Uuid) -> Result<Patient, ActionError>;
    async fn create_appointment(&self, data: NewAppointment) -> Result<Appointment, ActionError>;
    async fn get_appointment(&self, appointment_id: Uuid) -> Result<Appointment, ActionError>;
    async fn update_appointment(
        &self,
        user_id: Uuid,
        appointment_id: Uuid,
        patch: AppointmentPatch,
        mode: AppointmentMode,
    ) -> Result<Appointment, ActionError>;
    async fn list_recent_appointments(
        &self,
    ) -> Result<(Vec<Appointment>, AppointmentCounts), ActionError>;
}

pub struct PgActions {
    pool: sqlx::PgPool,
}

impl PgActions {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str = "user_id, name, email, phone, created_at";

const PATIENT_COLUMNS: &str = "patient_id, user_id, name, email, phone, birth_date, gender, \
     address, occupation, emergency_contact_name, emergency_contact_number, primary_physician, \
     insurance_provider, insurance_policy_number, allergies, current_medication, \
     family_medical_history, past_medical_history, identification_type, identification_number, \
     identification_file_name, treatment_consent, disclosure_consent, privacy_consent, created_at";

const APPOINTMENT_COLUMNS: &str = "appointment_id, user_id, patient_id, primary_physician, \
     schedule, reason, note, status, cancellation_reason, created_at";

/// Message recorded when staff confirm or cancel an appointment; what the
/// original flow sent as an SMS.
pub fn notification_message(mode: AppointmentMode, appointment: &Appointment) -> Option<String> {
    match mode {
        AppointmentMode::Schedule => Some(format!(
            "Your appointment is confirmed for {} with Dr. {}.",
            format_date_time(appointment.schedule),
            appointment.primary_physician
        )),
        AppointmentMode::Cancel => Some(format!(
            "We regret to inform that your appointment for {} is cancelled. Reason: {}",
            format_date_time(appointment.schedule),
            appointment
                .cancellation_reason
                .as_deref()
                .unwrap_or("not given")
        )),
        AppointmentMode::Create => None,
    }
}

#[async_trait]
impl RemoteActions for PgActions {
    /// Creating a user is idempotent on email: a repeat intake with a known
    /// email returns the existing user instead of failing.
    async fn create_user(&self, data: NewUser) -> Result<User, ActionError> {
        let inserted: Option<User> = sqlx::query_as(&format!(
            r#"
            INSERT INTO intake_user (name, email, phone)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO NOTHING
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.phone)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(user) = inserted {
            return Ok(user);
        }

        let existing: User = sqlx::query_as(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM intake_user
            WHERE email = $1
            "#
        ))
        .bind(&data.email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ActionError::NotFound("user"))?;

        Ok(existing)
    }

    async fn get_user(&self, user_id: Uuid) -> Result<User, ActionError> {
        sqlx::query_as(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM intake_user
            WHERE user_id = $1
            "#
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ActionError::NotFound("user"))
    }

    async fn register_patient(&self, data: NewPatient) -> Result<Patient, ActionError> {
        let (doc_name, doc_type, doc_bytes) = match &data.identification_document {
            Some(f) => (
                Some(f.file_name.as_str()),
                Some(f.content_type.as_str()),
                Some(f.bytes.as_slice()),
            ),
            None => (None, None, None),
        };

        let patient: Patient = sqlx::query_as(&format!(
            r#"
            INSERT INTO patient (
              user_id, name, email, phone, birth_date, gender,
              address, occupation, emergency_contact_name, emergency_contact_number,
              primary_physician, insurance_provider, insurance_policy_number,
              allergies, current_medication, family_medical_history, past_medical_history,
              identification_type, identification_number,
              identification_file_name, identification_content_type, identification_document,
              treatment_consent, disclosure_consent, privacy_consent
            )
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16,$17,$18,$19,$20,$21,$22,$23,$24,$25)
            RETURNING {PATIENT_COLUMNS}
            "#
        ))
        .bind(data.user_id)
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(data.birth_date)
        .bind(data.gender)
        .bind(&data.address)
        .bind(&data.occupation)
        .bind(&data.emergency_contact_name)
        .bind(&data.emergency_contact_number)
        .bind(&data.primary_physician)
        .bind(&data.insurance_provider)
        .bind(&data.insurance_policy_number)
        .bind(data.allergies.as_deref())
        .bind(data.current_medication.as_deref())
        .bind(data.family_medical_history.as_deref())
        .bind(data.past_medical_history.as_deref())
        .bind(data.identification_type.as_deref())
        .bind(data.identification_number.as_deref())
        .bind(doc_name)
        .bind(doc_type)
        .bind(doc_bytes)
        .bind(data.treatment_consent)
        .bind(data.disclosure_consent)
        .bind(data.privacy_consent)
        .fetch_one(&self.pool)
        .await?;

        Ok(patient)
    }

    /// The first (oldest) registration linked to the user.
    async fn get_patient(&self, user_id: Uuid) -> Result<Patient, ActionError> {
        sqlx::query_as(&format!(
            r#"
            SELECT {PATIENT_COLUMNS}
            FROM patient
            WHERE user_id = $1
            ORDER BY created_at ASC
            LIMIT 1
            "#
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ActionError::NotFound("patient"))
    }

    async fn create_appointment(&self, data: NewAppointment) -> Result<Appointment, ActionError> {
        let appointment: Appointment = sqlx::query_as(&format!(
            r#"
            INSERT INTO appointment (
              user_id, patient_id, primary_physician, schedule, reason, note, status
            )
            VALUES ($1,$2,$3,$4,$5,$6,$7)
            RETURNING {APPOINTMENT_COLUMNS}
            "#
        ))
        .bind(data.user_id)
        .bind(data.patient_id)
        .bind(&data.primary_physician)
        .bind(data.schedule)
        .bind(&data.reason)
        .bind(data.note.as_deref())
        .bind(data.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(appointment)
    }

    async fn get_appointment(&self, appointment_id: Uuid) -> Result<Appointment, ActionError> {
        sqlx::query_as(&format!(
            r#"
            SELECT {APPOINTMENT_COLUMNS}
            FROM appointment
            WHERE appointment_id = $1
            "#
        ))
        .bind(appointment_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ActionError::NotFound("appointment"))
    }

    async fn update_appointment(
        &self,
        user_id: Uuid,
        appointment_id: Uuid,
        patch: AppointmentPatch,
        mode: AppointmentMode,
    ) -> Result<Appointment, ActionError> {
        let updated: Appointment = sqlx::query_as(&format!(
            r#"
            UPDATE appointment
            SET
              primary_physician   = COALESCE($3, primary_physician),
              schedule            = COALESCE($4, schedule),
              status              = $5,
              cancellation_reason = COALESCE($6, cancellation_reason)
            WHERE appointment_id = $1
              AND user_id = $2
            RETURNING {APPOINTMENT_COLUMNS}
            "#
        ))
        .bind(appointment_id)
        .bind(user_id)
        .bind(patch.primary_physician.as_deref())
        .bind(patch.schedule)
        .bind(patch.status)
        .bind(patch.cancellation_reason.as_deref())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ActionError::NotFound("appointment"))?;

        // Best-effort: the appointment change stands even when the
        // notification insert fails.
        if let Some(message) = notification_message(mode, &updated) {
            if let Err(err) = sqlx::query(
                r#"
                INSERT INTO notification (user_id, message)
                VALUES ($1, $2)
                "#,
            )
            .bind(user_id)
            .bind(&message)
            .execute(&self.pool)
            .await
            {
                tracing::warn!(error = %err, "failed to record appointment notification");
            }
        }

        Ok(updated)
    }

    async fn list_recent_appointments(
        &self,
    ) -> Result<(Vec<Appointment>, AppointmentCounts), ActionError> {
        let appointments: Vec<Appointment> = sqlx::query_as(&format!(
            r#"
            SELECT {APPOINTMENT_COLUMNS}
            FROM appointment
            ORDER BY created_at DESC
            LIMIT 50
            "#
        ))
        .fetch_all(&self.pool)
        .await?;

        let counts: AppointmentCounts = sqlx::query_as(
            r#"
            SELECT
              COUNT(*) FILTER (WHERE status = 0) AS pending,
              COUNT(*) FILTER (WHERE status = 1) AS scheduled,
              COUNT(*) FILTER (WHERE status = 2) AS cancelled
            FROM appointment
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok((appointments, counts))
    }
}
