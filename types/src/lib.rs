//! Shared model types for stratfin
//!
//! This crate contains the serializable types exchanged with the modeling
//! service and shared between the presentation core, the web frontend and the
//! command-line client.

pub mod decode;

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Model (response of /api/v1/search)
// ─────────────────────────────────────────────────────────────────────────────

/// One financial projection returned by the modeling service.
///
/// Replaced wholesale on every successful search, never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    #[serde(default, deserialize_with = "decode::text_or_empty")]
    pub model_id: String,
    /// Ordered by month, starting at 1
    #[serde(default, deserialize_with = "decode::lenient_seq")]
    pub monthly_projections: Vec<Projection>,
    #[serde(default, deserialize_with = "decode::lenient_seq")]
    pub revenue_drivers: Vec<Driver>,
    /// The service sends this as `assumptions`; older payloads use `assumptions_used`.
    #[serde(default, alias = "assumptions_used")]
    pub assumptions: Assumptions,
}

impl Model {
    /// Number of projected months
    pub fn horizon_months(&self) -> usize {
        self.monthly_projections.len()
    }

    /// Total revenue of the last projected month, zero when there are no projections
    pub fn terminal_revenue(&self) -> f64 {
        self.monthly_projections
            .last()
            .map(Projection::total_revenue)
            .unwrap_or(0.0)
    }
}

/// A single month of computed metrics. Every metric may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    #[serde(default, deserialize_with = "decode::lenient_month")]
    pub month: Option<u32>,
    #[serde(default, deserialize_with = "decode::lenient_f64")]
    pub sales_people: Option<f64>,
    #[serde(default, deserialize_with = "decode::lenient_f64")]
    pub large_customers_acquired: Option<f64>,
    #[serde(default, deserialize_with = "decode::lenient_f64")]
    pub large_customers_cumulative: Option<f64>,
    #[serde(default, deserialize_with = "decode::lenient_f64")]
    pub small_customers_acquired: Option<f64>,
    #[serde(default, deserialize_with = "decode::lenient_f64")]
    pub small_customers_cumulative: Option<f64>,
    #[serde(default, deserialize_with = "decode::lenient_f64")]
    pub large_customer_revenue: Option<f64>,
    #[serde(default, deserialize_with = "decode::lenient_f64")]
    pub small_customer_revenue: Option<f64>,
    #[serde(default, deserialize_with = "decode::lenient_f64")]
    pub total_revenue: Option<f64>,
    #[serde(default, deserialize_with = "decode::lenient_f64")]
    pub marketing_spend: Option<f64>,
}

impl Projection {
    /// Month number, falling back to the 1-based position in the sequence
    pub fn month_or(&self, index: usize) -> u32 {
        self.month
            .unwrap_or_else(|| u32::try_from(index + 1).unwrap_or(u32::MAX))
    }

    /// Axis label used by every chart ("M1", "M2", ...)
    pub fn axis_label(&self, index: usize) -> String {
        format!("M{}", self.month_or(index))
    }

    pub fn sales_people(&self) -> f64 {
        self.sales_people.unwrap_or(0.0)
    }

    pub fn large_customers_cumulative(&self) -> f64 {
        self.large_customers_cumulative.unwrap_or(0.0)
    }

    pub fn small_customers_cumulative(&self) -> f64 {
        self.small_customers_cumulative.unwrap_or(0.0)
    }

    pub fn large_customer_revenue(&self) -> f64 {
        self.large_customer_revenue.unwrap_or(0.0)
    }

    pub fn small_customer_revenue(&self) -> f64 {
        self.small_customer_revenue.unwrap_or(0.0)
    }

    pub fn total_revenue(&self) -> f64 {
        self.total_revenue.unwrap_or(0.0)
    }

    pub fn marketing_spend(&self) -> f64 {
        self.marketing_spend.unwrap_or(0.0)
    }
}

/// A named factor feeding the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    #[serde(default, deserialize_with = "decode::text_or_empty")]
    pub name: String,
    /// "input" or "calculated"
    #[serde(
        default,
        rename = "type",
        deserialize_with = "decode::lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_driver_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<DriverValue>,
    #[serde(
        default,
        deserialize_with = "decode::lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub unit: Option<String>,
    #[serde(
        default,
        deserialize_with = "decode::lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub formula: Option<String>,
    #[serde(
        default,
        deserialize_with = "decode::lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub business_unit: Option<String>,
}

/// Driver values are numbers for inputs and occasionally free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DriverValue {
    Number(f64),
    Text(String),
}

fn lenient_driver_value<'de, D>(deserializer: D) -> Result<Option<DriverValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        Value::Number(n) => n.as_f64().map(DriverValue::Number),
        Value::String(s) => Some(DriverValue::Text(s)),
        other => Some(DriverValue::Text(other.to_string())),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Assumptions (ordered key/value mapping)
// ─────────────────────────────────────────────────────────────────────────────

/// Named scalar inputs used to parameterize the model, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assumptions(Vec<(String, Value)>);

impl Assumptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry. Replacing keeps the original position.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        if let Some(slot) = self.0.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.0.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Assumptions {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut out = Assumptions::new();
        for (k, v) in iter {
            out.insert(k, v);
        }
        out
    }
}

impl Serialize for Assumptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Assumptions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AssumptionsVisitor)
    }
}

/// Walks the map in document order; any non-object decodes as empty.
struct AssumptionsVisitor;

impl<'de> Visitor<'de> for AssumptionsVisitor {
    type Value = Assumptions;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of assumption names to values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut out = Assumptions::new();
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            out.insert(key, value);
        }
        Ok(out)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        while access.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Assumptions::new())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Assumptions::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Assumptions::new())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(Assumptions::new())
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Self::Value, E> {
        Ok(Assumptions::new())
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Self::Value, E> {
        Ok(Assumptions::new())
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
        Ok(Assumptions::new())
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<Self::Value, E> {
        Ok(Assumptions::new())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Result Tabs
// ─────────────────────────────────────────────────────────────────────────────

/// Result pane selection. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultTab {
    /// Month-by-month projection table
    #[default]
    Table,
    /// Revenue driver cards
    Drivers,
    /// Assumption cards
    Assumptions,
    /// Revenue charts
    Charts,
}

impl ResultTab {
    pub fn label(&self) -> &'static str {
        match self {
            ResultTab::Table => "Projections",
            ResultTab::Drivers => "Revenue Drivers",
            ResultTab::Assumptions => "Assumptions",
            ResultTab::Charts => "Charts",
        }
    }

    /// Stable identifier used for DOM ids and CLI arguments
    pub fn key(&self) -> &'static str {
        match self {
            ResultTab::Table => "table",
            ResultTab::Drivers => "drivers",
            ResultTab::Assumptions => "assumptions",
            ResultTab::Charts => "charts",
        }
    }

    pub fn all() -> &'static [ResultTab] {
        &[
            ResultTab::Table,
            ResultTab::Drivers,
            ResultTab::Assumptions,
            ResultTab::Charts,
        ]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Request Types
// ─────────────────────────────────────────────────────────────────────────────

/// Optional numeric overrides sent alongside a search query.
///
/// Only the fields that are set are sent; there are no placeholder defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub months: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_sales_people: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketing_spend_monthly: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large_customer_revenue_monthly: Option<f64>,
}

impl SearchParams {
    /// Query-string pairs for the overrides that were supplied
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(months) = self.months {
            pairs.push(("months", months.to_string()));
        }
        if let Some(people) = self.initial_sales_people {
            pairs.push(("initial_sales_people", people.to_string()));
        }
        if let Some(spend) = self.marketing_spend_monthly {
            pairs.push(("marketing_spend_monthly", spend.to_string()));
        }
        if let Some(revenue) = self.large_customer_revenue_monthly {
            pairs.push(("large_customer_revenue_monthly", revenue.to_string()));
        }
        pairs
    }

    pub fn is_empty(&self) -> bool {
        self.query_pairs().is_empty()
    }
}

/// Options for the spreadsheet export endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Ask the server to open the generated file on its own desktop
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_open: Option<bool>,
}

/// File name the exported workbook is saved under
pub fn export_file_name(model_id: &str) -> String {
    format!("financial_model_{model_id}.xlsx")
}

// ─────────────────────────────────────────────────────────────────────────────
// Service Metadata
// ─────────────────────────────────────────────────────────────────────────────

/// Response of the `/health` endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

/// Entry in the catalogue of drivers the service understands
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverSpec {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// Response of `/api/v1/revenue-drivers`, keyed by driver name
pub type DriverCatalog = BTreeMap<String, DriverSpec>;

// ─────────────────────────────────────────────────────────────────────────────
// Client Configuration
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the modeling service, without the `/api/v1` suffix
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Horizon sent with every search unless overridden
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_months: Option<u32>,
    /// Directory exported workbooks are written to (CLI only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<String>,
    #[serde(default)]
    pub auto_open_exports: bool,
}

fn default_api_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            default_months: None,
            export_dir: None,
            auto_open_exports: false,
        }
    }
}

impl ClientConfig {
    /// Export options implied by this configuration
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            auto_open: self.auto_open_exports.then_some(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn model_decodes_service_payload() {
        let model: Model = serde_json::from_str(
            r#"{
            "model_id": "abc",
            "revenue_drivers": [
                { "name": "marketing_spend", "type": "input", "value": 200000, "unit": "$" }
            ],
            "monthly_projections": [
                { "month": 1, "sales_people": 1, "total_revenue": 25000.0 },
                { "month": 2, "sales_people": 2, "total_revenue": null }
            ],
            "assumptions": { "zeta": 1, "alpha": "text", "mid": 0.45 }
        }"#,
        )
        .unwrap();

        assert_eq!(model.model_id, "abc");
        assert_eq!(model.horizon_months(), 2);
        assert_eq!(model.monthly_projections[1].total_revenue, None);
        assert_eq!(model.terminal_revenue(), 0.0);
        assert_eq!(
            model.revenue_drivers[0].value,
            Some(DriverValue::Number(200000.0))
        );

        let keys: Vec<&str> = model.assumptions.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn assumptions_used_alias_is_accepted() {
        let model: Model =
            serde_json::from_value(json!({ "model_id": "x", "assumptions_used": { "a": 1 } }))
                .unwrap();
        assert_eq!(model.assumptions.get("a"), Some(&json!(1)));
    }

    #[test]
    fn assumptions_serialize_under_service_key() {
        let model: Model =
            serde_json::from_value(json!({ "model_id": "x", "assumptions_used": { "a": 1 } }))
                .unwrap();
        let value = serde_json::to_value(&model).unwrap();
        assert_eq!(value["assumptions"], json!({ "a": 1 }));
        assert!(value.get("assumptions_used").is_none());
    }

    #[test]
    fn assumptions_non_object_is_empty() {
        let model: Model =
            serde_json::from_value(json!({ "model_id": "x", "assumptions": [1, 2] })).unwrap();
        assert!(model.assumptions.is_empty());
        let model: Model =
            serde_json::from_value(json!({ "model_id": "x", "assumptions": null })).unwrap();
        assert!(model.assumptions.is_empty());
    }

    #[test]
    fn assumptions_round_trip_keeps_order() {
        let text = r#"{"b":1,"a":2,"c":"x"}"#;
        let parsed: Assumptions = serde_json::from_str(text).unwrap();
        assert_eq!(serde_json::to_string(&parsed).unwrap(), text);
    }

    #[test]
    fn driver_value_accepts_text_and_bool() {
        let driver: Driver =
            serde_json::from_value(json!({ "name": "mode", "value": "aggressive" })).unwrap();
        assert_eq!(driver.value, Some(DriverValue::Text("aggressive".into())));
        let driver: Driver = serde_json::from_value(json!({ "name": "flag", "value": true })).unwrap();
        assert_eq!(driver.value, Some(DriverValue::Text("true".into())));
        let driver: Driver = serde_json::from_value(json!({ "name": "none", "value": null })).unwrap();
        assert_eq!(driver.value, None);
        assert_eq!(driver.kind, None);
    }

    #[test]
    fn projection_month_falls_back_to_position() {
        let p = Projection::default();
        assert_eq!(p.axis_label(4), "M5");
        let p = Projection {
            month: Some(7),
            ..Default::default()
        };
        assert_eq!(p.axis_label(0), "M7");
    }

    #[test]
    fn search_params_only_send_supplied_overrides() {
        assert!(SearchParams::default().query_pairs().is_empty());

        let params = SearchParams {
            months: Some(12),
            marketing_spend_monthly: Some(150000.0),
            ..Default::default()
        };
        assert_eq!(
            params.query_pairs(),
            vec![
                ("months", "12".to_string()),
                ("marketing_spend_monthly", "150000".to_string())
            ]
        );
    }

    #[test]
    fn export_name_embeds_model_id() {
        assert_eq!(export_file_name("42"), "financial_model_42.xlsx");
    }

    #[test]
    fn config_defaults_fill_missing_fields() {
        let config: ClientConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.export_options(), ExportOptions::default());
    }
}
