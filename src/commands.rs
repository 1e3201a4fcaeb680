// Command-line surface: argument definitions and one handler per command.
// Handlers only glue the client to the terminal; the API logic lives in
// `api`.

use crate::api::UptimeRobot;
use crate::lazy::LazyClient;
use crate::model::{Monitor, MonitorType, Params};
use crate::output::{dump, OutputFormat, DEFAULT_STRUCTURED};
use crate::ui::{confirm, select_monitor, status_line, with_spinner};
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser, Debug)]
#[command(name = "uptime", version, about = "Manage Uptime Robot monitors")]
pub struct Cli {
    /// Log requests and responses to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show monitors matching a (partial) url or label
    Status { url: String },
    /// Dump full monitor data
    Monitors {
        /// (partial) URL or monitor name to filter by
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value_t = DEFAULT_STRUCTURED, value_parser = parse_format)]
        format: OutputFormat,
    },
    /// Show the status for each monitor
    List {
        #[arg(long, default_value = "")]
        search: String,
    },
    /// List monitors that are up (probably)
    Up {
        /// Only count status 'up'
        #[arg(long)]
        strict: bool,
    },
    /// List monitors that are down (probably)
    Down {
        /// Ignore 'seems down'
        #[arg(long)]
        strict: bool,
    },
    /// Create a new monitor
    #[command(alias = "create")]
    Add {
        url: String,
        /// Human-readable label (defaults to the host name without a
        /// leading "www."; other subdomains and suffixes are kept)
        #[arg(long)]
        friendly_name: Option<String>,
    },
    /// Remove a monitor by url
    #[command(alias = "delete")]
    Remove { url: String },
    /// Edit a monitor by url
    #[command(alias = "update")]
    Edit {
        url: String,
        #[arg(long)]
        friendly_name: Option<String>,
    },
    /// Reset a monitor's statistics by url
    Reset { url: String },
    /// Show the account for the current API key
    Account {
        #[arg(long, default_value_t = DEFAULT_STRUCTURED, value_parser = parse_format)]
        format: OutputFormat,
    },
    /// Dump all public status pages
    Dashboards {
        #[arg(long, default_value_t = DEFAULT_STRUCTURED, value_parser = parse_format)]
        format: OutputFormat,
    },
    /// Dump one public status page
    Dashboard {
        id: i64,
        #[arg(long, default_value_t = DEFAULT_STRUCTURED, value_parser = parse_format)]
        format: OutputFormat,
    },
    /// Add a monitor to a public status page
    DashboardAdd { id: i64, url: String },
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    s.parse().map_err(|e: crate::output::InvalidFormat| e.to_string())
}

/// Prefix `https://` when no scheme is given and return `(url, domain)`.
pub fn normalize_url(url: &str) -> Result<(String, String)> {
    let url = if url.starts_with("https://") || url.starts_with("http://") {
        url.to_string()
    } else if let Some((protocol, _)) = url.split_once("://") {
        bail!("protocol {} not supported, please use http(s)://", protocol);
    } else {
        format!("https://{}", url)
    };

    let domain = url.split('/').nth(2).unwrap_or_default().to_string();
    Ok((url, domain))
}

/// Default label for a new monitor: the host without a leading `www.`.
pub fn friendly_name_for(url: &str) -> String {
    let host = url.split('/').nth(2).unwrap_or(url);
    host.strip_prefix("www.").unwrap_or(host).to_string()
}

/// Status range filters for `up` and `down`.
pub fn is_up(monitor: &Monitor, strict: bool) -> bool {
    let min_status = if strict { 2 } else { 0 };
    monitor
        .status
        .map(|s| (min_status..3).contains(&s))
        .unwrap_or(false)
}

pub fn is_down(monitor: &Monitor, strict: bool) -> bool {
    let min_status = if strict { 9 } else { 8 };
    monitor.status.map(|s| s >= min_status).unwrap_or(false)
}

fn print_statuses(monitors: &[Monitor]) {
    for monitor in monitors {
        println!("{}", status_line(monitor));
    }
}

fn search(api: &UptimeRobot, term: &str) -> Result<Vec<Monitor>> {
    Ok(with_spinner("Loading monitors...", || api.search_monitors(term))?)
}

pub fn run(command: Command, client: &LazyClient) -> Result<()> {
    let api = client.get()?;
    match command {
        Command::Status { url } => {
            let monitors = search(api, &url)?;
            if monitors.is_empty() {
                println!("No monitor found!");
                return Ok(());
            }
            print_statuses(&monitors);
        }
        Command::Monitors { search: term, format } => {
            dump(&search(api, &term)?, format)?;
        }
        Command::List { search: term } => {
            print_statuses(&search(api, &term)?);
        }
        Command::Up { strict } => {
            let monitors: Vec<_> = search(api, "")?
                .into_iter()
                .filter(|m| is_up(m, strict))
                .collect();
            print_statuses(&monitors);
        }
        Command::Down { strict } => {
            let monitors: Vec<_> = search(api, "")?
                .into_iter()
                .filter(|m| is_down(m, strict))
                .collect();
            print_statuses(&monitors);
        }
        Command::Add { url, friendly_name } => add(api, &url, friendly_name)?,
        Command::Remove { url } => {
            let Some(monitor) = select_monitor(&url, search(api, &url)?)? else {
                return Ok(());
            };
            if api.delete_monitor(monitor.id)? {
                println!("Monitor {} removed!", monitor.label());
            } else {
                println!("Monitor {} could not be deleted.", monitor.label());
            }
        }
        Command::Edit { url, friendly_name } => {
            let Some(monitor) = select_monitor(&url, search(api, &url)?)? else {
                return Ok(());
            };
            let (url, _domain) = normalize_url(&url)?;
            let mut new_data = Params::new();
            new_data.insert("url".into(), Value::from(url));
            new_data.insert(
                "friendly_name".into(),
                Value::from(friendly_name.unwrap_or_else(|| monitor.label().to_string())),
            );
            if api.edit_monitor(monitor.id, new_data)? {
                println!("Monitor {} updated!", monitor.label());
            } else {
                println!("Monitor {} could not be updated.", monitor.label());
            }
        }
        Command::Reset { url } => {
            let Some(monitor) = select_monitor(&url, search(api, &url)?)? else {
                return Ok(());
            };
            if api.reset_monitor(monitor.id)? {
                println!("Monitor {} reset!", monitor.label());
            } else {
                println!("Monitor {} could not be reset.", monitor.label());
            }
        }
        Command::Account { format } => {
            let account = with_spinner("Loading account...", || api.get_account_details())?;
            dump(&account, format)?;
        }
        Command::Dashboards { format } => {
            let psps = with_spinner("Loading dashboards...", || api.get_psps())?;
            dump(&psps, format)?;
        }
        Command::Dashboard { id, format } => match api.get_psp(id)? {
            Some(psp) => dump(&psp, format)?,
            None => println!("No dashboard found!"),
        },
        Command::DashboardAdd { id, url } => dashboard_add(api, id, &url)?,
    }
    Ok(())
}

fn add(api: &UptimeRobot, url: &str, friendly_name: Option<String>) -> Result<()> {
    let (url, domain) = normalize_url(url)?;

    let existing = search(api, &domain)?;
    if !existing.is_empty() {
        println!("A similar domain was already added:");
        for monitor in &existing {
            println!("{} {}", monitor.label(), monitor.url_or_empty());
        }
        if !confirm("Are you sure you want to continue?")? {
            return Ok(());
        }
    }

    let friendly_name = friendly_name.unwrap_or_else(|| friendly_name_for(&url));
    match api.new_monitor(&friendly_name, &url, MonitorType::Http)? {
        Some(monitor_id) => println!("Monitor '{}' was added: {}", friendly_name, monitor_id),
        None => println!("No monitor was added"),
    }
    Ok(())
}

fn dashboard_add(api: &UptimeRobot, psp_id: i64, url: &str) -> Result<()> {
    let Some(psp) = api.get_psp(psp_id)? else {
        println!("No dashboard found!");
        return Ok(());
    };
    let Some(monitor) = select_monitor(url, search(api, url)?)? else {
        return Ok(());
    };
    if psp.monitors.contains(&monitor.id) {
        println!("Monitor {} is already on this dashboard.", monitor.label());
        return Ok(());
    }

    let mut monitors = psp.monitors.clone();
    monitors.push(monitor.id);
    if api.edit_psp(psp_id, &monitors, Params::new())? {
        println!("Monitor {} added to dashboard {}!", monitor.label(), psp_id);
    } else {
        println!("Dashboard {} could not be updated.", psp_id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_status(status: i64) -> Monitor {
        Monitor {
            id: 1,
            status: Some(status),
            ..Default::default()
        }
    }

    #[test]
    fn normalize_adds_scheme() {
        let (url, domain) = normalize_url("example.com/health").unwrap();
        assert_eq!(url, "https://example.com/health");
        assert_eq!(domain, "example.com");
    }

    #[test]
    fn normalize_keeps_http() {
        let (url, domain) = normalize_url("http://www.example.com").unwrap();
        assert_eq!(url, "http://www.example.com");
        assert_eq!(domain, "www.example.com");
    }

    #[test]
    fn normalize_rejects_other_schemes() {
        let err = normalize_url("ftp://example.com").unwrap_err();
        assert!(err.to_string().contains("protocol ftp not supported"));
    }

    #[test]
    fn friendly_name_strips_www() {
        assert_eq!(friendly_name_for("https://www.example.com/x"), "example.com");
        assert_eq!(friendly_name_for("https://status.example.com"), "status.example.com");
    }

    #[test]
    fn up_and_down_ranges() {
        assert!(is_up(&with_status(0), false));
        assert!(!is_up(&with_status(0), true));
        assert!(is_up(&with_status(2), true));
        assert!(!is_up(&with_status(8), false));

        assert!(is_down(&with_status(8), false));
        assert!(!is_down(&with_status(8), true));
        assert!(is_down(&with_status(9), true));
        assert!(!is_down(&with_status(2), false));
    }

    #[test]
    fn cli_rejects_unknown_format() {
        let parsed = Cli::try_parse_from(["uptime", "monitors", "--format", "xml"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn friendly_name_help_describes_default() {
        use clap::CommandFactory;
        let cli = Cli::command();
        let add = cli.find_subcommand("add").unwrap();
        let arg = add
            .get_arguments()
            .find(|a| a.get_id() == "friendly_name")
            .unwrap();
        let help = arg.get_help().unwrap().to_string();
        assert!(help.contains("www."));
    }

    #[test]
    fn cli_accepts_aliases() {
        let cli = Cli::try_parse_from(["uptime", "create", "example.com"]).unwrap();
        assert!(matches!(cli.command, Command::Add { .. }));
        let cli = Cli::try_parse_from(["uptime", "delete", "example.com"]).unwrap();
        assert!(matches!(cli.command, Command::Remove { .. }));
    }
}
