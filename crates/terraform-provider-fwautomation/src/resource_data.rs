//! Per-instance resource state handed to lifecycle operations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute values of one resource instance, plus the values recorded in
/// prior state so pending changes can be inspected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default)]
    values: BTreeMap<String, String>,
    #[serde(skip)]
    prior: Option<BTreeMap<String, String>>,
}

impl ResourceData {
    /// Data for an instance that does not exist yet.
    #[must_use]
    pub fn new(values: BTreeMap<String, String>) -> Self {
        Self {
            id: None,
            values,
            prior: None,
        }
    }

    /// Data for an existing instance whose state matches `values`.
    #[must_use]
    pub fn from_state(id: impl Into<String>, values: BTreeMap<String, String>) -> Self {
        Self {
            id: Some(id.into()),
            prior: Some(values.clone()),
            values,
        }
    }

    /// Replaces the planned values, keeping the current ones as prior state.
    #[must_use]
    pub fn with_planned(mut self, planned: BTreeMap<String, String>) -> Self {
        let current = std::mem::replace(&mut self.values, planned);
        self.prior.get_or_insert(current);
        self
    }

    /// Instance id; `None` once the instance is gone.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Records the instance id.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// Marks the instance as gone.
    pub fn clear_id(&mut self) {
        self.id = None;
    }

    /// Current value of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Sets `key` to `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// `(old, new)` for `key`. Without prior state the old value is `None`.
    #[must_use]
    pub fn get_change(&self, key: &str) -> (Option<&str>, Option<&str>) {
        let old = self
            .prior
            .as_ref()
            .and_then(|prior| prior.get(key))
            .map(String::as_str);
        (old, self.get(key))
    }

    /// True if `key` differs from prior state.
    #[must_use]
    pub fn has_change(&self, key: &str) -> bool {
        let (old, new) = self.get_change(key);
        old != new
    }

    /// All current values.
    #[must_use]
    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn new_instance_has_no_id_and_everything_changed() {
        let data = ResourceData::new(values(&[("group_name", "WEB")]));
        assert!(data.id().is_none());
        assert!(data.has_change("group_name"));
        assert_eq!(data.get_change("group_name"), (None, Some("WEB")));
    }

    #[test]
    fn state_without_plan_has_no_changes() {
        let data = ResourceData::from_state("abc", values(&[("group_name", "WEB")]));
        assert_eq!(data.id(), Some("abc"));
        assert!(!data.has_change("group_name"));
    }

    #[test]
    fn planned_values_keep_prior() {
        let data = ResourceData::from_state("abc", values(&[("hostname", "old.example.com")]))
            .with_planned(values(&[("hostname", "new.example.com")]));
        assert!(data.has_change("hostname"));
        assert_eq!(
            data.get_change("hostname"),
            (Some("old.example.com"), Some("new.example.com"))
        );
        assert_eq!(data.get("hostname"), Some("new.example.com"));
    }

    #[test]
    fn id_lifecycle() {
        let mut data = ResourceData::default();
        data.set_id("abc");
        assert_eq!(data.id(), Some("abc"));
        data.clear_id();
        assert!(data.id().is_none());
    }

    #[test]
    fn serialization_skips_prior_state() {
        let data = ResourceData::from_state("abc", values(&[("group_name", "WEB")]));
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "id": "abc", "values": { "group_name": "WEB" } })
        );
    }
}
