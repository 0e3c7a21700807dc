use serde::{Deserialize, Serialize};

use crate::calc::to_number;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    Yes,
    No,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChildKind {
    Infant,
    Student,
}

/// One child's row of the form. Every cost field is kept regardless of the
/// current kind so switching between infant and student never loses data.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ChildEntry {
    pub age: String,
    #[serde(rename = "type")]
    pub kind: ChildKind,
    pub doctor: String,
    pub milk: String,
    pub diapers: String,
    pub school: String,
    pub transport: String,
    pub daily: String,
    pub stationery: String,
}

impl Default for ChildEntry {
    fn default() -> Self {
        Self {
            age: String::new(),
            kind: ChildKind::Infant,
            doctor: String::new(),
            milk: String::new(),
            diapers: String::new(),
            school: String::new(),
            transport: String::new(),
            daily: String::new(),
            stationery: String::new(),
        }
    }
}

/// The whole form, the single source of truth for the app. Money and count
/// fields stay numeric-as-text; coercion happens only at calculation time.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    pub salary: String,
    pub wives: String,
    pub children_count: String,
    pub children: Vec<ChildEntry>,
    pub food: String,
    pub services: String,
    pub car: YesNo,
    pub taxi: YesNo,
    pub taxi_income: String,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            salary: String::new(),
            wives: "0".to_string(),
            children_count: "0".to_string(),
            children: Vec::new(),
            food: String::new(),
            services: String::new(),
            car: YesNo::No,
            taxi: YesNo::No,
            taxi_income: String::new(),
        }
    }
}

pub enum FormField {
    Salary(String),
    Wives(String),
    ChildrenCount(String),
    Food(String),
    Services(String),
    Car(YesNo),
    Taxi(YesNo),
    TaxiIncome(String),
}

pub enum ChildField {
    Age(String),
    Kind(ChildKind),
    Doctor(String),
    Milk(String),
    Diapers(String),
    School(String),
    Transport(String),
    Daily(String),
    Stationery(String),
}

impl FormState {
    /// Returns a new state with exactly one top-level field updated. Changing
    /// the children count resizes the children list to match it.
    pub fn set_field(&self, field: FormField) -> FormState {
        let mut next = self.clone();
        match field {
            FormField::Salary(v) => next.salary = v,
            FormField::Wives(v) => next.wives = v,
            FormField::ChildrenCount(v) => {
                next.children_count = v;
                next.reconcile_children();
            }
            FormField::Food(v) => next.food = v,
            FormField::Services(v) => next.services = v,
            FormField::Car(v) => next.car = v,
            FormField::Taxi(v) => next.taxi = v,
            FormField::TaxiIncome(v) => next.taxi_income = v,
        }
        next
    }

    /// Returns a new state with one field of one child updated. An index past
    /// the end of the list leaves the state unchanged.
    pub fn set_child_field(&self, index: usize, field: ChildField) -> FormState {
        let mut next = self.clone();
        if let Some(child) = next.children.get_mut(index) {
            match field {
                ChildField::Age(v) => child.age = v,
                ChildField::Kind(v) => child.kind = v,
                ChildField::Doctor(v) => child.doctor = v,
                ChildField::Milk(v) => child.milk = v,
                ChildField::Diapers(v) => child.diapers = v,
                ChildField::School(v) => child.school = v,
                ChildField::Transport(v) => child.transport = v,
                ChildField::Daily(v) => child.daily = v,
                ChildField::Stationery(v) => child.stationery = v,
            }
        }
        next
    }

    /// Keeps `children.len()` equal to the coerced count: growing appends
    /// fresh entries, shrinking truncates from the end. Surviving entries
    /// keep their data.
    pub fn reconcile_children(&mut self) {
        let count = to_number(&self.children_count).max(0.0) as usize;
        if self.children.len() < count {
            self.children.resize_with(count, ChildEntry::default);
        } else {
            self.children.truncate(count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growing_count_appends_default_children() {
        let form = FormState::default();
        let next = form.set_field(FormField::ChildrenCount("3".to_string()));
        assert_eq!(next.children.len(), 3);
        assert!(next.children.iter().all(|c| *c == ChildEntry::default()));
    }

    #[test]
    fn shrinking_count_keeps_surviving_entries() {
        let mut form = FormState::default();
        form.children_count = "3".to_string();
        form.reconcile_children();
        form.children[0].doctor = "10000".to_string();
        form.children[1].milk = "5000".to_string();

        let next = form.set_field(FormField::ChildrenCount("1".to_string()));
        assert_eq!(next.children.len(), 1);
        assert_eq!(next.children[0].doctor, "10000");
    }

    #[test]
    fn negative_or_garbage_count_means_zero_children() {
        let mut form = FormState::default();
        form.children_count = "2".to_string();
        form.reconcile_children();

        let next = form.set_field(FormField::ChildrenCount("-4".to_string()));
        assert!(next.children.is_empty());

        let next = form.set_field(FormField::ChildrenCount("abc".to_string()));
        assert!(next.children.is_empty());
    }

    #[test]
    fn set_field_leaves_previous_state_untouched() {
        let form = FormState::default();
        let next = form.set_field(FormField::Salary("1000000".to_string()));
        assert_eq!(form.salary, "");
        assert_eq!(next.salary, "1000000");
    }

    #[test]
    fn set_child_field_does_not_alias_children() {
        let mut form = FormState::default();
        form.children_count = "1".to_string();
        form.reconcile_children();

        let next = form.set_child_field(0, ChildField::Milk("5000".to_string()));
        assert_eq!(form.children[0].milk, "");
        assert_eq!(next.children[0].milk, "5000");
    }

    #[test]
    fn set_child_field_out_of_range_is_a_noop() {
        let form = FormState::default();
        let next = form.set_child_field(5, ChildField::Age("4".to_string()));
        assert_eq!(next, form);
    }

    #[test]
    fn switching_kind_keeps_the_other_kinds_fields() {
        let mut form = FormState::default();
        form.children_count = "1".to_string();
        form.reconcile_children();

        let next = form
            .set_child_field(0, ChildField::Doctor("10000".to_string()))
            .set_child_field(0, ChildField::Kind(ChildKind::Student));
        assert_eq!(next.children[0].doctor, "10000");
        assert_eq!(next.children[0].kind, ChildKind::Student);
    }
}
