use serde::Deserialize;

use crate::model::{ChildEntry, FormState, YesNo};

const STORAGE_KEY: &str = "family-living-calculator";

/// Stored shape with every field optional, so a partially valid or older
/// record merges over the defaults instead of being thrown away.
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StoredForm {
    salary: Option<String>,
    wives: Option<String>,
    children_count: Option<String>,
    children: Option<Vec<ChildEntry>>,
    food: Option<String>,
    services: Option<String>,
    car: Option<YesNo>,
    taxi: Option<YesNo>,
    taxi_income: Option<String>,
}

impl StoredForm {
    fn merge_into(self, mut base: FormState) -> FormState {
        if let Some(v) = self.salary {
            base.salary = v;
        }
        if let Some(v) = self.wives {
            base.wives = v;
        }
        if let Some(v) = self.children_count {
            base.children_count = v;
        }
        if let Some(v) = self.children {
            base.children = v;
        }
        if let Some(v) = self.food {
            base.food = v;
        }
        if let Some(v) = self.services {
            base.services = v;
        }
        if let Some(v) = self.car {
            base.car = v;
        }
        if let Some(v) = self.taxi {
            base.taxi = v;
        }
        if let Some(v) = self.taxi_income {
            base.taxi_income = v;
        }
        base
    }
}

/// Parses a raw storage payload into a usable state. Corrupted JSON falls
/// back to defaults; a count that disagrees with the stored children list is
/// reconciled so the length invariant holds from the first render.
pub fn hydrate(raw: &str) -> FormState {
    let stored = serde_json::from_str::<StoredForm>(raw).unwrap_or_default();
    let mut form = stored.merge_into(FormState::default());
    form.reconcile_children();
    form
}

pub fn load_form() -> FormState {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            if let Ok(Some(raw)) = storage.get_item(STORAGE_KEY) {
                return hydrate(&raw);
            }
        }
    }
    FormState::default()
}

/// Whole-object overwrite after every mutation. A write failure must never
/// take the UI down, so errors are dropped.
pub fn save_form(form: &FormState) {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            if let Ok(raw) = serde_json::to_string(form) {
                let _ = storage.set_item(STORAGE_KEY, &raw);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ChildKind;

    #[test]
    fn round_trip_preserves_every_field() {
        let mut form = FormState::default();
        form.salary = "1200000".to_string();
        form.wives = "1".to_string();
        form.children_count = "2".to_string();
        form.reconcile_children();
        form.children[0].age = "1".to_string();
        form.children[0].doctor = "10000".to_string();
        form.children[1].kind = ChildKind::Student;
        form.children[1].school = "50000".to_string();
        form.children[1].daily = "1000".to_string();
        form.food = "300000".to_string();
        form.services = "150000".to_string();
        form.car = YesNo::Yes;
        form.taxi = YesNo::Yes;
        form.taxi_income = "400000".to_string();

        let raw = serde_json::to_string(&form).unwrap();
        assert_eq!(hydrate(&raw), form);
    }

    #[test]
    fn serialized_shape_uses_the_original_field_names() {
        let mut form = FormState::default();
        form.children_count = "1".to_string();
        form.reconcile_children();
        form.taxi_income = "5000".to_string();

        let raw = serde_json::to_string(&form).unwrap();
        assert!(raw.contains("\"childrenCount\":\"1\""));
        assert!(raw.contains("\"taxiIncome\":\"5000\""));
        assert!(raw.contains("\"type\":\"infant\""));
        assert!(raw.contains("\"car\":\"no\""));
    }

    #[test]
    fn corrupted_payload_falls_back_to_defaults() {
        assert_eq!(hydrate("not json at all"), FormState::default());
        assert_eq!(hydrate("[1, 2, 3]"), FormState::default());
        assert_eq!(hydrate(""), FormState::default());
    }

    #[test]
    fn partial_payload_merges_over_defaults() {
        let form = hydrate(r#"{"salary":"900000","food":"120000"}"#);
        assert_eq!(form.salary, "900000");
        assert_eq!(form.food, "120000");
        assert_eq!(form.wives, "0");
        assert_eq!(form.car, YesNo::No);
        assert!(form.children.is_empty());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let form = hydrate(r#"{"salary":"900000","legacyField":true}"#);
        assert_eq!(form.salary, "900000");
    }

    #[test]
    fn hydration_reconciles_count_against_stored_children() {
        let form = hydrate(r#"{"childrenCount":"2","children":[]}"#);
        assert_eq!(form.children.len(), 2);

        let form = hydrate(
            r#"{"childrenCount":"0","children":[{"age":"3","type":"infant","doctor":"","milk":"","diapers":"","school":"","transport":"","daily":"","stationery":""}]}"#,
        );
        assert!(form.children.is_empty());
    }
}
