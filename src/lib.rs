// Library root
// -----------
// This crate exposes the Uptime Robot client as a library. The binary
// (`main.rs`) wires it to the command line.
//
// Module responsibilities:
// - `api`: HTTP interactions with the Uptime Robot v2 API, envelope
//   validation and the list/status formatting helpers.
// - `model`: typed records decoded from API responses.
// - `error`: the error taxonomy surfaced by the client.
// - `config`: API key, verbosity and base URL resolution.
// - `lazy`: builds the client on first use.
// - `output`: plaintext/JSON/YAML dumpers.
// - `ui` / `commands`: terminal prompts and the CLI command handlers.
pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod lazy;
pub mod model;
pub mod output;
pub mod ui;

pub use api::{format_list, format_status, HttpTransport, RawResponse, Transport, UptimeRobot};
pub use error::{ApiFailure, UptimeError};
pub use lazy::LazyClient;
pub use model::{Account, Dashboard, Envelope, Monitor, MonitorType, Params};
