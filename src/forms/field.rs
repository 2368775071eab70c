// Field renderer: maps a field-type tag plus a bound value to a concrete
// control description. Purely presentational; validation happens at submit
// time in forms::rules.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::forms::upload::FilePayload;

/// Enumerated tag selecting which input control a field renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldType {
    Input,
    Textarea,
    PhoneInput,
    Checkbox,
    DatePicker {
        show_time: bool,
        date_format: &'static str,
    },
    Select,
    /// Escape hatch: rendering is delegated entirely to a caller-supplied
    /// closure (radio groups, file upload).
    Skeleton,
}

/// The value bound to a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    Timestamp(Option<DateTime<Utc>>),
    Files(Vec<FilePayload>),
}

impl FieldValue {
    pub fn default_for(field_type: &FieldType) -> Self {
        match field_type {
            FieldType::Checkbox => FieldValue::Flag(false),
            FieldType::DatePicker { .. } => FieldValue::Timestamp(None),
            _ => FieldValue::Text(String::new()),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Flag(_) => false,
            FieldValue::Timestamp(t) => t.is_none(),
            FieldValue::Files(files) => files.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn plain(value: &str) -> Self {
        Self {
            value: value.to_string(),
            label: value.to_string(),
        }
    }
}

/// One field of a form: the tag plus presentation metadata. Select options
/// are caller-supplied, like option children in the source markup.
#[derive(Debug, Clone)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub field_type: FieldType,
    pub options: Vec<SelectOption>,
}

impl FormField {
    fn new(name: &'static str, label: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            label,
            placeholder: "",
            field_type,
            options: Vec::new(),
        }
    }

    pub fn input(name: &'static str, label: &'static str, placeholder: &'static str) -> Self {
        Self {
            placeholder,
            ..Self::new(name, label, FieldType::Input)
        }
    }

    pub fn textarea(name: &'static str, label: &'static str, placeholder: &'static str) -> Self {
        Self {
            placeholder,
            ..Self::new(name, label, FieldType::Textarea)
        }
    }

    pub fn phone(name: &'static str, label: &'static str, placeholder: &'static str) -> Self {
        Self {
            placeholder,
            ..Self::new(name, label, FieldType::PhoneInput)
        }
    }

    pub fn checkbox(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldType::Checkbox)
    }

    pub fn date_picker(
        name: &'static str,
        label: &'static str,
        show_time: bool,
        date_format: &'static str,
    ) -> Self {
        Self::new(
            name,
            label,
            FieldType::DatePicker {
                show_time,
                date_format,
            },
        )
    }

    pub fn select(
        name: &'static str,
        label: &'static str,
        placeholder: &'static str,
        options: Vec<SelectOption>,
    ) -> Self {
        Self {
            placeholder,
            options,
            ..Self::new(name, label, FieldType::Select)
        }
    }

    pub fn skeleton(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldType::Skeleton)
    }
}

/// Concrete control produced by the renderer. Skeleton closures return one of
/// these too (RadioGroup and FileDrop in this codebase).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "control", rename_all = "snake_case")]
pub enum Control {
    TextBox {
        name: &'static str,
        label: &'static str,
        placeholder: &'static str,
        value: String,
    },
    TextArea {
        name: &'static str,
        label: &'static str,
        placeholder: &'static str,
        value: String,
    },
    PhoneBox {
        name: &'static str,
        label: &'static str,
        placeholder: &'static str,
        value: String,
    },
    CheckBox {
        name: &'static str,
        label: &'static str,
        checked: bool,
    },
    Dropdown {
        name: &'static str,
        label: &'static str,
        placeholder: &'static str,
        options: Vec<SelectOption>,
        selected: Option<String>,
    },
    DateTimePicker {
        name: &'static str,
        label: &'static str,
        show_time: bool,
        date_format: &'static str,
        value: Option<DateTime<Utc>>,
    },
    RadioGroup {
        name: &'static str,
        label: &'static str,
        options: Vec<String>,
        selected: Option<String>,
    },
    FileDrop {
        name: &'static str,
        label: &'static str,
        accepted: Vec<String>,
        file_name: Option<String>,
    },
    Hidden {
        name: &'static str,
    },
}

pub type SkeletonRender<'a> = &'a dyn Fn(&FormField, &FieldValue) -> Control;

/// Render one field against its bound value. Never mutates state: edits flow
/// back only through `FormState::set`.
pub fn render(field: &FormField, value: &FieldValue, skeleton: Option<SkeletonRender>) -> Control {
    let text = || match value {
        FieldValue::Text(s) => s.clone(),
        _ => String::new(),
    };

    match field.field_type {
        FieldType::Input => Control::TextBox {
            name: field.name,
            label: field.label,
            placeholder: field.placeholder,
            value: text(),
        },
        FieldType::Textarea => Control::TextArea {
            name: field.name,
            label: field.label,
            placeholder: field.placeholder,
            value: text(),
        },
        FieldType::PhoneInput => Control::PhoneBox {
            name: field.name,
            label: field.label,
            placeholder: field.placeholder,
            value: text(),
        },
        FieldType::Checkbox => Control::CheckBox {
            name: field.name,
            label: field.label,
            checked: matches!(value, FieldValue::Flag(true)),
        },
        FieldType::Select => Control::Dropdown {
            name: field.name,
            label: field.label,
            placeholder: field.placeholder,
            options: field.options.clone(),
            selected: match value {
                FieldValue::Text(s) if !s.is_empty() => Some(s.clone()),
                _ => None,
            },
        },
        FieldType::DatePicker {
            show_time,
            date_format,
        } => Control::DateTimePicker {
            name: field.name,
            label: field.label,
            show_time,
            date_format,
            value: match value {
                FieldValue::Timestamp(t) => *t,
                _ => None,
            },
        },
        FieldType::Skeleton => match skeleton {
            Some(render_skeleton) => render_skeleton(field, value),
            None => Control::Hidden { name: field.name },
        },
    }
}

/// The form's value store. `set` is the single change-propagation path; the
/// revision counter lets tests assert that rendering alone never edits.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    values: BTreeMap<&'static str, FieldValue>,
    revision: u64,
}

const NO_FILES: &[FilePayload] = &[];

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &'static str, value: FieldValue) {
        self.values.insert(name, value);
        self.revision += 1;
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn text(&self, name: &str) -> &str {
        match self.values.get(name) {
            Some(FieldValue::Text(s)) => s,
            _ => "",
        }
    }

    pub fn flag(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(FieldValue::Flag(true)))
    }

    pub fn timestamp(&self, name: &str) -> Option<DateTime<Utc>> {
        match self.values.get(name) {
            Some(FieldValue::Timestamp(t)) => *t,
            _ => None,
        }
    }

    pub fn files(&self, name: &str) -> &[FilePayload] {
        match self.values.get(name) {
            Some(FieldValue::Files(files)) => files,
            _ => NO_FILES,
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn reset(&mut self) {
        self.values.clear();
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rerender_with_same_value_is_idempotent() {
        let mut state = FormState::new();
        state.set("name", FieldValue::Text("Jane Doe".into()));
        let field = FormField::input("name", "Full name", "John Doe");

        let before = state.revision();
        let first = render(&field, state.get("name").unwrap(), None);
        let second = render(&field, state.get("name").unwrap(), None);

        assert_eq!(first, second);
        assert_eq!(state.revision(), before);
    }

    #[test]
    fn checkbox_binds_flag() {
        let field = FormField::checkbox("privacy_consent", "I agree to the privacy policy.");
        let on = render(&field, &FieldValue::Flag(true), None);
        assert_eq!(
            on,
            Control::CheckBox {
                name: "privacy_consent",
                label: "I agree to the privacy policy.",
                checked: true,
            }
        );
    }

    #[test]
    fn select_reflects_bound_choice() {
        let field = FormField::select(
            "primary_physician",
            "Doctor",
            "Select a doctor",
            vec![SelectOption::plain("John Green"), SelectOption::plain("Jane Powell")],
        );
        let control = render(&field, &FieldValue::Text("Jane Powell".into()), None);
        match control {
            Control::Dropdown { selected, options, .. } => {
                assert_eq!(selected.as_deref(), Some("Jane Powell"));
                assert_eq!(options.len(), 2);
            }
            other => panic!("expected dropdown, got {other:?}"),
        }
    }

    #[test]
    fn skeleton_delegates_to_caller() {
        let field = FormField::skeleton("gender", "Gender");
        let value = FieldValue::Text("female".into());
        let control = render(
            &field,
            &value,
            Some(&|f: &FormField, v: &FieldValue| Control::RadioGroup {
                name: f.name,
                label: f.label,
                options: vec!["male".into(), "female".into(), "other".into()],
                selected: match v {
                    FieldValue::Text(s) if !s.is_empty() => Some(s.clone()),
                    _ => None,
                },
            }),
        );
        match control {
            Control::RadioGroup { selected, .. } => {
                assert_eq!(selected.as_deref(), Some("female"))
            }
            other => panic!("expected radio group, got {other:?}"),
        }
    }

    #[test]
    fn skeleton_without_renderer_stays_hidden() {
        let field = FormField::skeleton("identification_document", "Scanned copy");
        let control = render(&field, &FieldValue::Files(vec![]), None);
        assert_eq!(
            control,
            Control::Hidden {
                name: "identification_document"
            }
        );
    }

    #[test]
    fn controls_serialize_with_kind_tag() {
        let field = FormField::phone("phone", "Phone number", "(123) 456-7890");
        let control = render(&field, &FieldValue::Text("+12025550123".into()), None);
        let json = serde_json::to_value(&control).unwrap();
        assert_eq!(json["control"], "phone_box");
        assert_eq!(json["value"], "+12025550123");
    }

    #[test]
    fn set_bumps_revision() {
        let mut state = FormState::new();
        assert_eq!(state.revision(), 0);
        state.set("email", FieldValue::Text("a@b.com".into()));
        assert_eq!(state.revision(), 1);
        assert_eq!(state.text("email"), "a@b.com");
    }
}
