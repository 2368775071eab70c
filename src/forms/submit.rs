// Form containers: field list + rule set + submit handler per form variant.
// Submit walks idle -> submitting -> (success | error); success yields a
// navigation intent for the caller to act on, failure logs and stays put.

use serde::Serialize;
use uuid::Uuid;

use crate::actions::RemoteActions;
use crate::constants::{DOCTORS, GENDER_OPTIONS};
use crate::forms::field::{
    Control, FieldValue, FormField, FormState, SelectOption, SkeletonRender, render,
};
use crate::forms::rules::{self, ValidationErrors};
use crate::forms::upload::{FilePayload, PreviewRegistry};
use crate::models::{
    Appointment, AppointmentMode, AppointmentPatch, NewAppointment, NewPatient, NewUser, User,
};

/// What the caller should do after a submit. Navigation is an explicit return
/// value, never a side effect of the form logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum NavigationIntent {
    Push { to: String },
    Stay,
    CloseOverlay,
}

fn opt(s: &str) -> Option<String> {
    let t = s.trim();
    if t.is_empty() { None } else { Some(t.to_string()) }
}

fn doctor_options() -> Vec<SelectOption> {
    DOCTORS.iter().map(|d| SelectOption::plain(d)).collect()
}

fn value_or_default(state: &FormState, field: &FormField) -> FieldValue {
    state
        .get(field.name)
        .cloned()
        .unwrap_or_else(|| FieldValue::default_for(&field.field_type))
}

fn gender_skeleton(field: &FormField, value: &FieldValue) -> Control {
    Control::RadioGroup {
        name: field.name,
        label: field.label,
        options: GENDER_OPTIONS.iter().map(|o| o.to_string()).collect(),
        selected: match value {
            FieldValue::Text(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        },
    }
}

fn file_skeleton(field: &FormField, value: &FieldValue) -> Control {
    Control::FileDrop {
        name: field.name,
        label: field.label,
        accepted: vec!["image/png".into(), "image/jpeg".into(), "image/svg+xml".into()],
        file_name: match value {
            FieldValue::Files(files) => files.first().map(|f| f.file_name.clone()),
            _ => None,
        },
    }
}

/* ============================================================
   Intake form (user creation)
   ============================================================ */

#[derive(Debug, Default)]
pub struct IntakeForm {
    pub state: FormState,
    pub errors: ValidationErrors,
    submitting: bool,
}

impl IntakeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields() -> Vec<FormField> {
        vec![
            FormField::input("name", "Full name", "John Doe"),
            FormField::input("email", "Email", "johndoe@example.com"),
            FormField::phone("phone", "Phone number", "(123) 456-7890"),
        ]
    }

    pub fn controls(&self) -> Vec<Control> {
        Self::fields()
            .iter()
            .map(|f| render(f, &value_or_default(&self.state, f), None))
            .collect()
    }

    pub async fn submit(&mut self, actions: &dyn RemoteActions) -> NavigationIntent {
        if self.submitting {
            return NavigationIntent::Stay;
        }
        self.errors.clear();
        if let Err(errors) = rules::evaluate(&rules::user_rules(), &self.state) {
            self.errors = errors;
            return NavigationIntent::Stay;
        }
        self.submitting = true;

        let data = NewUser {
            name: self.state.text("name").trim().to_string(),
            email: self.state.text("email").trim().to_string(),
            phone: self.state.text("phone").trim().to_string(),
        };

        match actions.create_user(data).await {
            Ok(user) => {
                self.state.reset();
                self.submitting = false;
                NavigationIntent::Push {
                    to: format!("/patients/{}/register", user.user_id),
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "intake submit failed");
                self.submitting = false;
                NavigationIntent::Stay
            }
        }
    }
}

/* ============================================================
   Registration form (patient creation)
   ============================================================ */

#[derive(Debug)]
pub struct RegisterForm {
    pub user: User,
    pub state: FormState,
    pub errors: ValidationErrors,
    pub previews: PreviewRegistry,
    submitting: bool,
}

impl RegisterForm {
    /// Prefills name/email/phone from the intake user.
    pub fn new(user: User) -> Self {
        let mut state = FormState::new();
        state.set("name", FieldValue::Text(user.name.clone()));
        state.set("email", FieldValue::Text(user.email.clone()));
        state.set("phone", FieldValue::Text(user.phone.clone()));
        Self {
            user,
            state,
            errors: ValidationErrors::new(),
            previews: PreviewRegistry::new(),
            submitting: false,
        }
    }

    /// Bind an uploaded identification document and hand back its preview
    /// URL. The previous preview, if any, is not revoked.
    pub fn attach_document(&mut self, payload: FilePayload) -> String {
        let url = self.previews.create(&payload);
        self.state
            .set("identification_document", FieldValue::Files(vec![payload]));
        url
    }

    pub fn fields() -> Vec<FormField> {
        use crate::constants::IDENTIFICATION_TYPES;
        vec![
            FormField::input("name", "Full name", "John Doe"),
            FormField::input("email", "Email address", "johndoe@gmail.com"),
            FormField::phone("phone", "Phone number", "(555) 123-4567"),
            FormField::date_picker("birth_date", "Date of birth", false, "MM/dd/yyyy"),
            FormField::skeleton("gender", "Gender"),
            FormField::input("address", "Address", "15 New Road, Kathmandu, 44600"),
            FormField::input("occupation", "Occupation", "Software Engineer"),
            FormField::input(
                "emergency_contact_name",
                "Emergency contact name",
                "Guardian's name",
            ),
            FormField::phone(
                "emergency_contact_number",
                "Emergency contact number",
                "(555) 123-4567",
            ),
            FormField::select(
                "primary_physician",
                "Primary physician",
                "Select a physician",
                doctor_options(),
            ),
            FormField::input(
                "insurance_provider",
                "Insurance provider",
                "e.g. Nepal Life Insurance",
            ),
            FormField::input(
                "insurance_policy_number",
                "Insurance policy number",
                "e.g. ABC123456789",
            ),
            FormField::textarea("allergies", "Allergies (if any)", "e.g. Peanuts, Penicillin"),
            FormField::textarea(
                "current_medication",
                "Current medication (if any)",
                "e.g. Aspirin, Ibuprofen",
            ),
            FormField::textarea(
                "family_medical_history",
                "Family medical history (if relevant)",
                "e.g. Hypertension (father)",
            ),
            FormField::textarea(
                "past_medical_history",
                "Past medical history (if relevant)",
                "e.g. Appendectomy (2019), Asthma",
            ),
            FormField::select(
                "identification_type",
                "Identification type",
                "Select an identification type",
                IDENTIFICATION_TYPES
                    .iter()
                    .map(|t| SelectOption::plain(t))
                    .collect(),
            ),
            FormField::input(
                "identification_number",
                "Identification number",
                "e.g. 123456789",
            ),
            FormField::skeleton(
                "identification_document",
                "Scanned copy of identification document",
            ),
            FormField::checkbox(
                "treatment_consent",
                "I consent to receiving treatment from the healthcare provider.",
            ),
            FormField::checkbox(
                "disclosure_consent",
                "I consent to the disclosure of my personal information for the purpose of treatment.",
            ),
            FormField::checkbox(
                "privacy_consent",
                "I acknowledge that I have reviewed and agree to the privacy policy.",
            ),
        ]
    }

    pub fn controls(&self) -> Vec<Control> {
        Self::fields()
            .iter()
            .map(|f| {
                let value = value_or_default(&self.state, f);
                let skeleton: Option<SkeletonRender> = match f.name {
                    "gender" => Some(&gender_skeleton),
                    "identification_document" => Some(&file_skeleton),
                    _ => None,
                };
                render(f, &value, skeleton)
            })
            .collect()
    }

    pub async fn submit(&mut self, actions: &dyn RemoteActions) -> NavigationIntent {
        if self.submitting {
            return NavigationIntent::Stay;
        }
        self.errors.clear();
        if let Err(errors) = rules::evaluate(&rules::registration_rules(), &self.state) {
            self.errors = errors;
            return NavigationIntent::Stay;
        }

        // Rules guarantee these; treat their absence as a field error rather
        // than panicking.
        let Some(birth_date) = self.state.timestamp("birth_date") else {
            self.errors
                .insert("birth_date", "birth date is required".into());
            return NavigationIntent::Stay;
        };
        let Some(gender) = crate::models::Gender::from_label(self.state.text("gender")) else {
            self.errors
                .insert("gender", "gender must be one of the offered options".into());
            return NavigationIntent::Stay;
        };

        self.submitting = true;

        // The first selected file becomes the named binary payload.
        let identification_document = self.state.files("identification_document").first().cloned();

        let data = NewPatient {
            user_id: self.user.user_id,
            name: self.state.text("name").trim().to_string(),
            email: self.state.text("email").trim().to_string(),
            phone: self.state.text("phone").trim().to_string(),
            birth_date,
            gender,
            address: self.state.text("address").trim().to_string(),
            occupation: self.state.text("occupation").trim().to_string(),
            emergency_contact_name: self.state.text("emergency_contact_name").trim().to_string(),
            emergency_contact_number: self
                .state
                .text("emergency_contact_number")
                .trim()
                .to_string(),
            primary_physician: self.state.text("primary_physician").trim().to_string(),
            insurance_provider: self.state.text("insurance_provider").trim().to_string(),
            insurance_policy_number: self
                .state
                .text("insurance_policy_number")
                .trim()
                .to_string(),
            allergies: opt(self.state.text("allergies")),
            current_medication: opt(self.state.text("current_medication")),
            family_medical_history: opt(self.state.text("family_medical_history")),
            past_medical_history: opt(self.state.text("past_medical_history")),
            identification_type: opt(self.state.text("identification_type")),
            identification_number: opt(self.state.text("identification_number")),
            identification_document,
            treatment_consent: self.state.flag("treatment_consent"),
            disclosure_consent: self.state.flag("disclosure_consent"),
            privacy_consent: self.state.flag("privacy_consent"),
        };

        match actions.register_patient(data).await {
            Ok(_patient) => {
                self.state.reset();
                self.submitting = false;
                NavigationIntent::Push {
                    to: format!("/patients/{}/new-appointment", self.user.user_id),
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "registration submit failed");
                self.submitting = false;
                NavigationIntent::Stay
            }
        }
    }
}

/* ============================================================
   Appointment form (create / schedule / cancel)
   ============================================================ */

#[derive(Debug)]
pub struct AppointmentForm {
    pub mode: AppointmentMode,
    pub user_id: Uuid,
    pub patient_id: Uuid,
    pub appointment: Option<Appointment>,
    pub state: FormState,
    pub errors: ValidationErrors,
    submitting: bool,
}

impl AppointmentForm {
    /// Schedule and cancel prefill from the existing appointment.
    pub fn new(
        mode: AppointmentMode,
        user_id: Uuid,
        patient_id: Uuid,
        appointment: Option<Appointment>,
    ) -> Self {
        let mut state = FormState::new();
        if let Some(a) = &appointment {
            state.set("primary_physician", FieldValue::Text(a.primary_physician.clone()));
            state.set("schedule", FieldValue::Timestamp(Some(a.schedule)));
            state.set("reason", FieldValue::Text(a.reason.clone()));
            state.set(
                "note",
                FieldValue::Text(a.note.clone().unwrap_or_default()),
            );
            state.set(
                "cancellation_reason",
                FieldValue::Text(a.cancellation_reason.clone().unwrap_or_default()),
            );
        }
        Self {
            mode,
            user_id,
            patient_id,
            appointment,
            state,
            errors: ValidationErrors::new(),
            submitting: false,
        }
    }

    pub fn fields(mode: AppointmentMode) -> Vec<FormField> {
        match mode {
            AppointmentMode::Cancel => vec![FormField::textarea(
                "cancellation_reason",
                "Reason for cancellation",
                "e.g. Urgent meeting came up",
            )],
            AppointmentMode::Create | AppointmentMode::Schedule => vec![
                FormField::select(
                    "primary_physician",
                    "Doctor",
                    "Select a doctor",
                    doctor_options(),
                ),
                FormField::date_picker(
                    "schedule",
                    "Expected appointment date",
                    true,
                    "MM/dd/yyyy - h:mm aa",
                ),
                FormField::textarea("reason", "Reason for visit", "e.g. Annual checkup"),
                FormField::textarea("note", "Additional notes", "Extra details (if any)"),
            ],
        }
    }

    pub fn controls(&self) -> Vec<Control> {
        Self::fields(self.mode)
            .iter()
            .map(|f| render(f, &value_or_default(&self.state, f), None))
            .collect()
    }

    pub async fn submit(&mut self, actions: &dyn RemoteActions) -> NavigationIntent {
        if self.submitting {
            return NavigationIntent::Stay;
        }
        self.errors.clear();
        if let Err(errors) = rules::evaluate(&rules::appointment_rules(self.mode), &self.state) {
            self.errors = errors;
            return NavigationIntent::Stay;
        }

        let status = self.mode.status();
        self.submitting = true;

        match self.mode {
            AppointmentMode::Create => {
                let Some(schedule) = self.state.timestamp("schedule") else {
                    self.errors.insert("schedule", "schedule is required".into());
                    self.submitting = false;
                    return NavigationIntent::Stay;
                };
                let data = NewAppointment {
                    user_id: self.user_id,
                    patient_id: self.patient_id,
                    primary_physician: self.state.text("primary_physician").trim().to_string(),
                    schedule,
                    reason: self.state.text("reason").trim().to_string(),
                    note: opt(self.state.text("note")),
                    status,
                };
                match actions.create_appointment(data).await {
                    Ok(appointment) => {
                        self.state.reset();
                        self.submitting = false;
                        NavigationIntent::Push {
                            to: format!(
                                "/patients/{}/new-appointment/success?appointment_id={}",
                                self.user_id, appointment.appointment_id
                            ),
                        }
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "appointment create failed");
                        self.submitting = false;
                        NavigationIntent::Stay
                    }
                }
            }
            AppointmentMode::Schedule | AppointmentMode::Cancel => {
                let Some(existing) = self.appointment.as_ref() else {
                    self.errors.insert(
                        "appointment",
                        "no appointment loaded for this form".into(),
                    );
                    self.submitting = false;
                    return NavigationIntent::Stay;
                };
                let patch = AppointmentPatch {
                    primary_physician: opt(self.state.text("primary_physician")),
                    schedule: self.state.timestamp("schedule"),
                    status,
                    cancellation_reason: opt(self.state.text("cancellation_reason")),
                };
                match actions
                    .update_appointment(self.user_id, existing.appointment_id, patch, self.mode)
                    .await
                {
                    Ok(_updated) => {
                        self.state.reset();
                        self.submitting = false;
                        NavigationIntent::CloseOverlay
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "appointment update failed");
                        self.submitting = false;
                        NavigationIntent::Stay
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{Duration, Utc};

    use crate::actions::ActionError;
    use crate::forms::upload::FilePayload;
    use crate::models::{AppointmentCounts, Patient, Status};

    #[derive(Debug)]
    enum Call {
        CreateUser(NewUser),
        RegisterPatient(NewPatient),
        CreateAppointment(NewAppointment),
        UpdateAppointment {
            appointment_id: Uuid,
            patch: AppointmentPatch,
            mode: AppointmentMode,
        },
    }

    struct RecordingActions {
        calls: Mutex<Vec<Call>>,
        next_appointment_id: Uuid,
    }

    impl RecordingActions {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                next_appointment_id: Uuid::new_v4(),
            }
        }

        fn calls(&self) -> std::sync::MutexGuard<'_, Vec<Call>> {
            self.calls.lock().unwrap()
        }
    }

    fn sample_user() -> User {
        User {
            user_id: Uuid::new_v4(),
            name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            phone: "+12025550123".into(),
            created_at: Utc::now(),
        }
    }

    fn sample_appointment(user_id: Uuid, patient_id: Uuid, status: Status) -> Appointment {
        Appointment {
            appointment_id: Uuid::new_v4(),
            user_id,
            patient_id,
            primary_physician: "John Green".into(),
            schedule: Utc::now() + Duration::days(3),
            reason: "Annual checkup".into(),
            note: None,
            status,
            cancellation_reason: None,
            created_at: Utc::now(),
        }
    }

    #[async_trait]
    impl RemoteActions for RecordingActions {
        async fn create_user(&self, data: NewUser) -> Result<User, ActionError> {
            let user = User {
                user_id: Uuid::new_v4(),
                name: data.name.clone(),
                email: data.email.clone(),
                phone: data.phone.clone(),
                created_at: Utc::now(),
            };
            self.calls().push(Call::CreateUser(data));
            Ok(user)
        }

        async fn get_user(&self, _user_id: Uuid) -> Result<User, ActionError> {
            Err(ActionError::NotFound("user"))
        }

        async fn register_patient(&self, data: NewPatient) -> Result<Patient, ActionError> {
            let patient = Patient {
                patient_id: Uuid::new_v4(),
                user_id: data.user_id,
                name: data.name.clone(),
                email: data.email.clone(),
                phone: data.phone.clone(),
                birth_date: data.birth_date,
                gender: data.gender,
                address: data.address.clone(),
                occupation: data.occupation.clone(),
                emergency_contact_name: data.emergency_contact_name.clone(),
                emergency_contact_number: data.emergency_contact_number.clone(),
                primary_physician: data.primary_physician.clone(),
                insurance_provider: data.insurance_provider.clone(),
                insurance_policy_number: data.insurance_policy_number.clone(),
                allergies: data.allergies.clone(),
                current_medication: data.current_medication.clone(),
                family_medical_history: data.family_medical_history.clone(),
                past_medical_history: data.past_medical_history.clone(),
                identification_type: data.identification_type.clone(),
                identification_number: data.identification_number.clone(),
                identification_file_name: data
                    .identification_document
                    .as_ref()
                    .map(|f| f.file_name.clone()),
                treatment_consent: data.treatment_consent,
                disclosure_consent: data.disclosure_consent,
                privacy_consent: data.privacy_consent,
                created_at: Utc::now(),
            };
            self.calls().push(Call::RegisterPatient(data));
            Ok(patient)
        }

        async fn get_patient(&self, _user_id: Uuid) -> Result<Patient, ActionError> {
            Err(ActionError::NotFound("patient"))
        }

        async fn create_appointment(
            &self,
            data: NewAppointment,
        ) -> Result<Appointment, ActionError> {
            let appointment = Appointment {
                appointment_id: self.next_appointment_id,
                user_id: data.user_id,
                patient_id: data.patient_id,
                primary_physician: data.primary_physician.clone(),
                schedule: data.schedule,
                reason: data.reason.clone(),
                note: data.note.clone(),
                status: data.status,
                cancellation_reason: None,
                created_at: Utc::now(),
            };
            self.calls().push(Call::CreateAppointment(data));
            Ok(appointment)
        }

        async fn get_appointment(&self, _appointment_id: Uuid) -> Result<Appointment, ActionError> {
            Err(ActionError::NotFound("appointment"))
        }

        async fn update_appointment(
            &self,
            user_id: Uuid,
            appointment_id: Uuid,
            patch: AppointmentPatch,
            mode: AppointmentMode,
        ) -> Result<Appointment, ActionError> {
            let updated = Appointment {
                appointment_id,
                user_id,
                patient_id: Uuid::new_v4(),
                primary_physician: patch.primary_physician.clone().unwrap_or_default(),
                schedule: patch.schedule.unwrap_or_else(Utc::now),
                reason: String::new(),
                note: None,
                status: patch.status,
                cancellation_reason: patch.cancellation_reason.clone(),
                created_at: Utc::now(),
            };
            self.calls().push(Call::UpdateAppointment {
                appointment_id,
                patch,
                mode,
            });
            Ok(updated)
        }

        async fn list_recent_appointments(
            &self,
        ) -> Result<(Vec<Appointment>, AppointmentCounts), ActionError> {
            Ok((
                Vec::new(),
                AppointmentCounts {
                    pending: 0,
                    scheduled: 0,
                    cancelled: 0,
                },
            ))
        }
    }

    #[tokio::test]
    async fn blank_intake_is_blocked_without_remote_call() {
        let actions = RecordingActions::new();
        let mut form = IntakeForm::new();

        let intent = form.submit(&actions).await;

        assert_eq!(intent, NavigationIntent::Stay);
        assert!(!form.errors.is_empty());
        assert!(actions.calls().is_empty());
    }

    #[tokio::test]
    async fn valid_intake_creates_user_and_navigates_to_register() {
        let actions = RecordingActions::new();
        let mut form = IntakeForm::new();
        form.state.set("name", FieldValue::Text("Jane Doe".into()));
        form.state
            .set("email", FieldValue::Text("jane@example.com".into()));
        form.state
            .set("phone", FieldValue::Text("+12025550123".into()));

        let intent = form.submit(&actions).await;

        match intent {
            NavigationIntent::Push { to } => {
                assert!(to.starts_with("/patients/"));
                assert!(to.ends_with("/register"));
            }
            other => panic!("expected push, got {other:?}"),
        }
        let calls = actions.calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            Call::CreateUser(data) => assert_eq!(data.email, "jane@example.com"),
            other => panic!("unexpected call {other:?}"),
        }
        // form resets on success
        drop(calls);
        assert_eq!(form.state.text("name"), "");
    }

    #[tokio::test]
    async fn registration_passes_attached_file_as_named_blob() {
        let actions = RecordingActions::new();
        let user = sample_user();
        let mut form = RegisterForm::new(user);
        form.state = crate::forms::rules::tests::valid_registration_state();
        form.attach_document(FilePayload {
            file_name: "passport.png".into(),
            content_type: "image/png".into(),
            bytes: vec![1, 2, 3, 4],
        });

        let intent = form.submit(&actions).await;

        match intent {
            NavigationIntent::Push { to } => assert!(to.ends_with("/new-appointment")),
            other => panic!("expected push, got {other:?}"),
        }
        let calls = actions.calls();
        match &calls[0] {
            Call::RegisterPatient(data) => {
                let doc = data.identification_document.as_ref().expect("document");
                assert_eq!(doc.file_name, "passport.png");
                assert_eq!(doc.bytes, vec![1, 2, 3, 4]);
            }
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[test]
    fn re_attaching_a_document_leaks_the_old_preview() {
        let mut form = RegisterForm::new(sample_user());
        let first = form.attach_document(FilePayload {
            file_name: "old.png".into(),
            content_type: "image/png".into(),
            bytes: vec![1],
        });
        form.attach_document(FilePayload {
            file_name: "new.png".into(),
            content_type: "image/png".into(),
            bytes: vec![2],
        });

        // Only the newest file is bound, but both previews stay live until
        // someone revokes them.
        assert_eq!(form.state.files("identification_document").len(), 1);
        assert_eq!(form.previews.live(), 2);
        assert!(form.previews.revoke(&first));
        assert_eq!(form.previews.live(), 1);
    }

    #[tokio::test]
    async fn registration_without_consent_is_blocked() {
        let actions = RecordingActions::new();
        let mut form = RegisterForm::new(sample_user());
        form.state = crate::forms::rules::tests::valid_registration_state();
        form.state.set("treatment_consent", FieldValue::Flag(false));

        let intent = form.submit(&actions).await;

        assert_eq!(intent, NavigationIntent::Stay);
        assert!(form.errors.contains_key("treatment_consent"));
        assert!(actions.calls().is_empty());
    }

    #[tokio::test]
    async fn create_mode_requests_pending_appointment_and_navigates_to_success() {
        let actions = RecordingActions::new();
        let user_id = Uuid::new_v4();
        let patient_id = Uuid::new_v4();
        let mut form = AppointmentForm::new(AppointmentMode::Create, user_id, patient_id, None);
        form.state
            .set("primary_physician", FieldValue::Text("John Green".into()));
        form.state.set(
            "schedule",
            FieldValue::Timestamp(Some(Utc::now() + Duration::days(7))),
        );
        form.state
            .set("reason", FieldValue::Text("Annual checkup".into()));

        let intent = form.submit(&actions).await;

        match intent {
            NavigationIntent::Push { to } => {
                assert_eq!(
                    to,
                    format!(
                        "/patients/{user_id}/new-appointment/success?appointment_id={}",
                        actions.next_appointment_id
                    )
                );
            }
            other => panic!("expected push, got {other:?}"),
        }
        let calls = actions.calls();
        match &calls[0] {
            Call::CreateAppointment(data) => {
                assert_eq!(data.status, Status::Pending);
                assert_eq!(data.patient_id, patient_id);
            }
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[tokio::test]
    async fn cancel_mode_needs_only_a_reason_and_sends_cancelled_status() {
        let actions = RecordingActions::new();
        let user_id = Uuid::new_v4();
        let patient_id = Uuid::new_v4();
        let existing = sample_appointment(user_id, patient_id, Status::Pending);
        let existing_id = existing.appointment_id;

        let mut form = AppointmentForm::new(
            AppointmentMode::Cancel,
            user_id,
            patient_id,
            Some(existing),
        );
        form.state.set(
            "cancellation_reason",
            FieldValue::Text("Urgent meeting came up".into()),
        );

        let intent = form.submit(&actions).await;

        assert_eq!(intent, NavigationIntent::CloseOverlay);
        assert!(form.errors.is_empty());
        let calls = actions.calls();
        match &calls[0] {
            Call::UpdateAppointment {
                appointment_id,
                patch,
                mode,
            } => {
                assert_eq!(*appointment_id, existing_id);
                assert_eq!(*mode, AppointmentMode::Cancel);
                assert_eq!(patch.status, Status::Cancelled);
                assert_eq!(
                    patch.cancellation_reason.as_deref(),
                    Some("Urgent meeting came up")
                );
            }
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[tokio::test]
    async fn cancel_mode_with_blank_reason_is_blocked() {
        let actions = RecordingActions::new();
        let user_id = Uuid::new_v4();
        let patient_id = Uuid::new_v4();
        let existing = sample_appointment(user_id, patient_id, Status::Pending);
        let mut form = AppointmentForm::new(
            AppointmentMode::Cancel,
            user_id,
            patient_id,
            Some(existing),
        );

        let intent = form.submit(&actions).await;

        assert_eq!(intent, NavigationIntent::Stay);
        assert!(form.errors.contains_key("cancellation_reason"));
        assert!(actions.calls().is_empty());
    }

    #[tokio::test]
    async fn schedule_mode_prefills_and_confirms() {
        let actions = RecordingActions::new();
        let user_id = Uuid::new_v4();
        let patient_id = Uuid::new_v4();
        let existing = sample_appointment(user_id, patient_id, Status::Pending);

        let mut form = AppointmentForm::new(
            AppointmentMode::Schedule,
            user_id,
            patient_id,
            Some(existing.clone()),
        );
        // Prefill covers physician/schedule/reason; no edits needed.
        let intent = form.submit(&actions).await;

        assert_eq!(intent, NavigationIntent::CloseOverlay);
        let calls = actions.calls();
        match &calls[0] {
            Call::UpdateAppointment { patch, .. } => {
                assert_eq!(patch.status, Status::Scheduled);
                assert_eq!(
                    patch.primary_physician.as_deref(),
                    Some(existing.primary_physician.as_str())
                );
                assert_eq!(patch.schedule, Some(existing.schedule));
            }
            other => panic!("unexpected call {other:?}"),
        }
    }
}
