// Typed records for the Uptime Robot v2 API.
//
// Optional fields follow one convention: `None` means the key was absent
// (or null) and is skipped when serialising, so dumping a record shows the
// same keys the service returned. The keyword fields are nullable in the
// service, so they keep the absent/null/value distinction as
// `Option<Option<Value>>`.
//
// Decoding is lenient: numbers sent as strings (and the reverse) are
// accepted, and a value of the wrong shape becomes `None` instead of
// failing the whole response.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Parameters sent in a request body.
pub type Params = Map<String, Value>;

/// Monitor types known to the service. Only `Http` is created by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonitorType {
    #[default]
    Http = 1,
    Keyword = 2,
    Ping = 3,
    Port = 4,
    Heartbeat = 5,
}

impl MonitorType {
    pub fn code(self) -> i64 {
        self as i64
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Monitor {
    #[serde(deserialize_with = "required_int")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient_int",
        skip_serializing_if = "Option::is_none"
    )]
    pub monitor_type: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<String>,
    /// Sent as a number (1 = exists, 2 = not exists) or null.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub keyword_type: Option<Option<Value>>,
    /// Sent as a number (0 = case insensitive, 1 = case sensitive) or null.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub keyword_case_type: Option<Option<Value>>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub keyword_value: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub http_username: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub http_password: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(default, deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub interval: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub create_datetime: Option<i64>,
}

impl Monitor {
    pub fn label(&self) -> &str {
        self.friendly_name.as_deref().unwrap_or_default()
    }

    pub fn url_or_empty(&self) -> &str {
        self.url.as_deref().unwrap_or_default()
    }
}

/// Account details. The service returns more keys than the ones named
/// here; those land in `other`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Account {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// A public status page ("PSP").
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Dashboard {
    #[serde(deserialize_with = "required_int")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_ids")]
    pub monitors: Vec<i64>,
    #[serde(default, deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub sort: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub standard_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub custom_url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Stat {
    Ok,
    Fail,
}

impl Stat {
    /// Reads `stat` from a decoded body. Unknown values are `None`.
    pub fn of(body: &Value) -> Option<Stat> {
        body.get("stat")
            .cloned()
            .and_then(|s| serde_json::from_value(s).ok())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Pagination {
    #[serde(default, deserialize_with = "lenient_int")]
    pub offset: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub limit: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub total: Option<i64>,
}

/// Typed view of the `error` object in a failed envelope.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ApiErrorDetail {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passed_value: Option<Value>,
}

/// `{"id": ...}` echoed by mutating endpoints. The id arrives as a number or
/// a string depending on the endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct IdEcho {
    #[serde(default)]
    pub id: Option<Value>,
}

impl IdEcho {
    /// Compares the echoed id with `expected` by their string forms.
    pub fn matches(&self, expected: &str) -> bool {
        match &self.id {
            Some(Value::String(s)) => s == expected,
            Some(Value::Number(n)) => n.to_string() == expected,
            _ => false,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.id.as_ref().and_then(int_of)
    }
}

/// The wrapper every response uses. Only the keys relevant to the called
/// endpoint are present.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Envelope {
    #[serde(default, deserialize_with = "lenient")]
    pub stat: Option<Stat>,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub pagination: Option<Pagination>,
    #[serde(default, deserialize_with = "lenient")]
    pub account: Option<Account>,
    #[serde(default, deserialize_with = "lenient")]
    pub monitor: Option<IdEcho>,
    #[serde(default)]
    pub monitors: Option<Vec<Monitor>>,
    #[serde(default, deserialize_with = "lenient")]
    pub psp: Option<IdEcho>,
    #[serde(default)]
    pub psps: Option<Vec<Dashboard>>,
}

// Wraps whatever is present (including null) in `Some`; absent keys fall
// back to `default`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

// A value that does not fit `T` decodes as `None`.
fn lenient<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: DeserializeOwned,
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .and_then(|v| serde_json::from_value(v).ok()))
}

fn int_of(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(int_of))
}

fn required_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    int_of(&value).ok_or_else(|| D::Error::custom(format!("invalid id {}", value)))
}

// The service sends a list of ids, or a bare value when a page shows every
// monitor; the latter decodes as an empty list.
fn lenient_ids<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items.iter().filter_map(int_of).collect(),
        _ => Vec::new(),
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn monitor_keeps_absent_fields_absent() {
        let monitor: Monitor = serde_json::from_value(json!({"id": 1, "url": "https://example.com"})).unwrap();
        assert_eq!(monitor.id, 1);
        assert_eq!(monitor.url.as_deref(), Some("https://example.com"));
        assert_eq!(monitor.status, None);

        let back = serde_json::to_value(&monitor).unwrap();
        assert_eq!(back, json!({"id": 1, "url": "https://example.com"}));
    }

    #[test]
    fn keyword_fields_distinguish_null_from_absent() {
        let monitor: Monitor =
            serde_json::from_value(json!({"id": 3, "keyword_type": null})).unwrap();
        assert_eq!(monitor.keyword_type, Some(None));
        assert_eq!(monitor.keyword_case_type, None);

        let back = serde_json::to_value(&monitor).unwrap();
        assert_eq!(back, json!({"id": 3, "keyword_type": null}));
    }

    #[test]
    fn keyword_fields_accept_numbers() {
        let monitor: Monitor = serde_json::from_value(json!({
            "id": 2,
            "type": 2,
            "keyword_type": 2,
            "keyword_case_type": 0,
            "keyword_value": "Welcome"
        }))
        .unwrap();
        assert_eq!(monitor.keyword_type, Some(Some(json!(2))));
        assert_eq!(monitor.keyword_case_type, Some(Some(json!(0))));
        assert_eq!(monitor.monitor_type, Some(MonitorType::Keyword.code()));
    }

    #[test]
    fn port_and_sub_type_accept_numbers() {
        let monitor: Monitor =
            serde_json::from_value(json!({"id": 4, "port": 443, "sub_type": ""})).unwrap();
        assert_eq!(monitor.port.as_deref(), Some("443"));
        assert_eq!(monitor.sub_type.as_deref(), Some(""));
    }

    #[test]
    fn integer_fields_accept_strings_and_drop_garbage() {
        let monitor: Monitor = serde_json::from_value(json!({
            "id": "17",
            "interval": "300",
            "timeout": {"seconds": 30},
            "status": null
        }))
        .unwrap();
        assert_eq!(monitor.id, 17);
        assert_eq!(monitor.interval, Some(300));
        assert_eq!(monitor.timeout, None);
        assert_eq!(monitor.status, None);
    }

    #[test]
    fn monitor_without_id_is_rejected() {
        assert!(serde_json::from_value::<Monitor>(json!({"url": "https://example.com"})).is_err());
        assert!(serde_json::from_value::<Monitor>(json!({"id": "abc"})).is_err());
    }

    #[test]
    fn account_keeps_unknown_keys() {
        let account: Account = serde_json::from_value(json!({
            "email": "ops@example.com",
            "user_id": 7,
            "firstname": "Ops",
            "monitor_limit": 50
        }))
        .unwrap();
        assert_eq!(account.user_id, Some(7));
        assert_eq!(account.other.get("monitor_limit"), Some(&json!(50)));
    }

    #[test]
    fn dashboard_monitor_list_is_lenient() {
        let all: Dashboard = serde_json::from_value(json!({"id": 1, "monitors": 0})).unwrap();
        assert!(all.monitors.is_empty());

        let mixed: Dashboard =
            serde_json::from_value(json!({"id": 2, "monitors": [1, "2", null]})).unwrap();
        assert_eq!(mixed.monitors, vec![1, 2]);
    }

    #[test]
    fn id_echo_tolerates_strings_and_numbers() {
        let numeric = IdEcho { id: Some(json!(5)) };
        let text = IdEcho { id: Some(json!("5")) };
        let missing = IdEcho::default();
        assert!(numeric.matches("5"));
        assert!(text.matches("5"));
        assert!(!numeric.matches("6"));
        assert!(!missing.matches("5"));
        assert_eq!(text.as_i64(), Some(5));
    }

    #[test]
    fn partial_pagination_decodes() {
        let envelope: Envelope = serde_json::from_value(json!({
            "stat": "ok",
            "pagination": {"offset": 0, "limit": 50},
            "monitors": []
        }))
        .unwrap();
        let pagination = envelope.pagination.unwrap();
        assert_eq!(pagination.limit, Some(50));
        assert_eq!(pagination.total, None);
    }

    #[test]
    fn stat_reads_known_values() {
        assert_eq!(Stat::of(&json!({"stat": "ok"})), Some(Stat::Ok));
        assert_eq!(Stat::of(&json!({"stat": "fail"})), Some(Stat::Fail));
        assert_eq!(Stat::of(&json!({"stat": "maybe"})), None);
        assert_eq!(Stat::of(&json!({})), None);
    }

    #[test]
    fn error_detail_decodes() {
        let detail: ApiErrorDetail = serde_json::from_value(json!({
            "type": "invalid_parameter",
            "message": "monitor not found",
            "parameter_name": "id",
            "passed_value": 12
        }))
        .unwrap();
        assert_eq!(detail.kind, "invalid_parameter");
        assert_eq!(detail.parameter_name.as_deref(), Some("id"));
        assert_eq!(detail.passed_value, Some(json!(12)));
    }

    #[test]
    fn monitor_type_codes() {
        assert_eq!(MonitorType::default().code(), 1);
        assert_eq!(MonitorType::Heartbeat.code(), 5);
    }
}
