// API client module: a small blocking client for the Uptime Robot v2 API.
//
// Every endpoint is a POST of a JSON parameter object to `<base>/<endpoint>`
// with the API key injected. Responses arrive in a common envelope which is
// checked here and turned into typed records or an `UptimeError`.

use crate::config::Settings;
use crate::error::{ApiFailure, Result, UptimeError};
use crate::model::{Account, Dashboard, Envelope, IdEcho, Monitor, MonitorType, Params, Stat};
use reqwest::blocking::Client;
use serde_json::Value;
use std::fmt::Display;
use std::sync::Arc;

/// Status code and body text of an HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        RawResponse {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The wire underneath `UptimeRobot`.
pub trait Transport: Send + Sync {
    fn post(&self, url: &str, body: &Params) -> Result<RawResponse>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn post(&self, url: &str, body: &Params) -> Result<RawResponse> {
        (**self).post(url, body)
    }
}

/// reqwest-backed transport.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("uptime-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(HttpTransport { client })
    }
}

impl Transport for HttpTransport {
    fn post(&self, url: &str, body: &Params) -> Result<RawResponse> {
        let res = self.client.post(url).json(body).send()?;
        let status = res.status().as_u16();
        let body = res.text()?;
        Ok(RawResponse { status, body })
    }
}

/// Join values with `-`, the list format the service expects for id lists.
pub fn format_list<I>(values: I) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    values
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("-")
}

/// Human-readable monitor status.
pub fn format_status(status_code: i64) -> String {
    match status_code {
        0 => "paused".into(),
        1 => "not checked yet".into(),
        2 => "up".into(),
        8 => "seems down".into(),
        9 => "down".into(),
        other => format!("Unknown status '{}'!", other),
    }
}

/// Client for the Uptime Robot API.
///
/// Without an API key every operation returns an empty result without
/// touching the network.
pub struct UptimeRobot {
    transport: Box<dyn Transport>,
    settings: Settings,
}

impl UptimeRobot {
    pub fn new(settings: Settings) -> Result<Self> {
        Ok(Self::with_transport(settings, HttpTransport::new()?))
    }

    pub fn with_transport(settings: Settings, transport: impl Transport + 'static) -> Self {
        UptimeRobot {
            transport: Box::new(transport),
            settings,
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::new(Settings::from_env())
    }

    pub fn has_api_key(&self) -> bool {
        let result = self.settings.has_api_key();
        if !result {
            tracing::warn!("Uptime Robot API key empty - can't perform requests!");
        }
        result
    }

    pub fn is_verbose(&self) -> bool {
        self.settings.verbose
    }

    pub fn base_url(&self) -> &str {
        &self.settings.base_url
    }

    /// POST `params` to `endpoint` and validate the response envelope.
    pub fn post(&self, endpoint: &str, mut params: Params) -> Result<Envelope> {
        if !self.has_api_key() {
            return Ok(Envelope::default());
        }

        params
            .entry("format")
            .or_insert_with(|| Value::from("json"));
        params.insert("api_key".into(), Value::from(self.settings.api_key.clone()));

        let url = format!("{}{}", self.settings.base_url, endpoint);
        if self.settings.verbose {
            let sent = Value::Object(params.clone());
            tracing::debug!(method = "POST", %url, params = %sent, "request");
        }

        let resp = self.transport.post(&url, &params)?;

        if self.settings.verbose {
            tracing::debug!(status = resp.status, body = %resp.body, "response");
        }

        check_response(resp)
    }

    pub fn get_account_details(&self) -> Result<Account> {
        let resp = self.post("getAccountDetails", Params::new())?;
        Ok(resp.account.unwrap_or_default())
    }

    /// Monitors matching `search` (URL or friendly name) and/or `monitor_ids`.
    pub fn get_monitors<I>(&self, search: &str, monitor_ids: I) -> Result<Vec<Monitor>>
    where
        I: IntoIterator,
        I::Item: Display,
    {
        let mut data = Params::new();
        if !search.is_empty() {
            data.insert("search".into(), Value::from(search));
        }
        let ids = format_list(monitor_ids);
        if !ids.is_empty() {
            data.insert("monitors".into(), Value::from(ids));
        }

        let resp = self.post("getMonitors", data)?;
        Ok(resp.monitors.unwrap_or_default())
    }

    pub fn search_monitors(&self, search: &str) -> Result<Vec<Monitor>> {
        self.get_monitors(search, std::iter::empty::<i64>())
    }

    pub fn get_monitor(&self, monitor_id: impl Display) -> Result<Option<Monitor>> {
        let monitors = self.get_monitors("", [monitor_id])?;
        Ok(monitors.into_iter().next())
    }

    /// Create a monitor, returning its id when the service reports one.
    pub fn new_monitor(
        &self,
        friendly_name: &str,
        url: &str,
        monitor_type: MonitorType,
    ) -> Result<Option<i64>> {
        let mut data = Params::new();
        data.insert("friendly_name".into(), Value::from(friendly_name));
        data.insert("url".into(), Value::from(url));
        data.insert("type".into(), Value::from(monitor_type.code()));

        let resp = self.post("newMonitor", data)?;
        Ok(resp.monitor.and_then(|m| m.as_i64()))
    }

    pub fn edit_monitor(&self, monitor_id: i64, new_data: Params) -> Result<bool> {
        let mut data = new_data;
        data.insert("id".into(), Value::from(monitor_id));
        let resp = self.post("editMonitor", data)?;
        Ok(echoes(resp.monitor, monitor_id))
    }

    pub fn delete_monitor(&self, monitor_id: i64) -> Result<bool> {
        let resp = self.post("deleteMonitor", id_param(monitor_id))?;
        Ok(echoes(resp.monitor, monitor_id))
    }

    pub fn reset_monitor(&self, monitor_id: i64) -> Result<bool> {
        let resp = self.post("resetMonitor", id_param(monitor_id))?;
        Ok(echoes(resp.monitor, monitor_id))
    }

    pub fn get_psps(&self) -> Result<Vec<Dashboard>> {
        let resp = self.post("getPSPs", Params::new())?;
        Ok(resp.psps.unwrap_or_default())
    }

    pub fn get_psp(&self, psp_id: impl Display) -> Result<Option<Dashboard>> {
        let mut data = Params::new();
        data.insert("psps".into(), Value::from(psp_id.to_string()));
        let resp = self.post("getPSPs", data)?;
        Ok(resp.psps.and_then(|psps| psps.into_iter().next()))
    }

    /// Replace the monitor list of a status page. `extra` is merged into the
    /// request after `id` and `monitors`.
    pub fn edit_psp<I>(&self, psp_id: impl Display, monitors: I, extra: Params) -> Result<bool>
    where
        I: IntoIterator,
        I::Item: Display,
    {
        let psp_id = psp_id.to_string();
        let mut data = Params::new();
        data.insert("id".into(), Value::from(psp_id.clone()));
        data.insert("monitors".into(), Value::from(format_list(monitors)));
        data.extend(extra);

        let resp = self.post("editPSP", data)?;
        Ok(resp.psp.map(|p| p.matches(&psp_id)).unwrap_or(false))
    }
}

fn id_param(monitor_id: i64) -> Params {
    let mut data = Params::new();
    data.insert("id".into(), Value::from(monitor_id));
    data
}

fn echoes(echo: Option<IdEcho>, monitor_id: i64) -> bool {
    echo.map(|m| m.matches(&monitor_id.to_string()))
        .unwrap_or(false)
}

/// Turn a raw response into an envelope or the matching error.
fn check_response(resp: RawResponse) -> Result<Envelope> {
    if !resp.is_success() {
        let status = resp.status;
        let failure = ApiFailure::new(status, resp.body);
        return Err(match status {
            429 => UptimeError::RateLimited(failure),
            _ => UptimeError::Remote(failure),
        });
    }

    let value: Value = match serde_json::from_str(&resp.body) {
        Ok(v) => v,
        Err(e) => {
            return Err(UptimeError::Remote(
                ApiFailure::new(resp.status, resp.body).with_extra(Value::from(e.to_string())),
            ))
        }
    };

    if Stat::of(&value) == Some(Stat::Fail) {
        let extra = value.get("error").cloned().unwrap_or_else(|| value.clone());
        return Err(UptimeError::Remote(
            ApiFailure::new(resp.status, resp.body).with_extra(extra),
        ));
    }

    serde_json::from_value(value).map_err(|e| {
        UptimeError::Remote(
            ApiFailure::new(resp.status, resp.body).with_extra(Value::from(e.to_string())),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn format_list_joins_with_hyphens() {
        assert_eq!(format_list([1, 2, 3]), "1-2-3");
        assert_eq!(format_list(["7"]), "7");
        assert_eq!(format_list(Vec::<i64>::new()), "");
    }

    #[test]
    fn format_status_known_codes() {
        assert_eq!(format_status(0), "paused");
        assert_eq!(format_status(1), "not checked yet");
        assert_eq!(format_status(2), "up");
        assert_eq!(format_status(8), "seems down");
        assert_eq!(format_status(9), "down");
    }

    #[test]
    fn format_status_unknown_code_mentions_code() {
        let msg = format_status(42);
        assert!(msg.contains("42"));
        for known in ["paused", "not checked yet", "up", "seems down", "down"] {
            assert_ne!(msg, known);
        }
        assert!(format_status(-1).contains("-1"));
    }

    #[test]
    fn check_response_rate_limit_ignores_body() {
        let err = check_response(RawResponse::new(429, r#"{"stat":"ok"}"#)).unwrap_err();
        assert!(err.is_rate_limited());
        assert_eq!(err.status(), Some(429));
    }

    #[test]
    fn check_response_other_status_is_remote() {
        let err = check_response(RawResponse::new(500, "boom")).unwrap_err();
        assert!(matches!(err, UptimeError::Remote(_)));
        assert_eq!(err.body(), Some("boom"));
        assert!(err.extra().is_none());
    }

    #[test]
    fn check_response_undecodable_body_carries_message() {
        let err = check_response(RawResponse::new(200, "<html>")).unwrap_err();
        assert!(matches!(err, UptimeError::Remote(_)));
        assert!(err.extra().and_then(Value::as_str).is_some());
    }

    #[test]
    fn check_response_fail_without_error_uses_full_body() {
        let err = check_response(RawResponse::new(200, r#"{"stat":"fail"}"#)).unwrap_err();
        assert_eq!(err.extra(), Some(&json!({"stat": "fail"})));
    }

    #[test]
    fn check_response_ok_envelope_is_returned() {
        let envelope =
            check_response(RawResponse::new(200, r#"{"stat":"ok","monitors":[]}"#)).unwrap();
        assert_eq!(envelope.monitors, Some(vec![]));
    }
}
