// Deferred construction of the API client.
//
// Commands that never talk to the service should not resolve the API key
// (or prompt for it). `LazyClient` holds a factory and builds the client on
// first use, exactly once, then hands out the cached instance.

use crate::api::UptimeRobot;
use crate::error::Result;
use once_cell::sync::OnceCell;

type Factory = Box<dyn Fn() -> Result<UptimeRobot> + Send + Sync>;

pub struct LazyClient {
    cell: OnceCell<UptimeRobot>,
    factory: Factory,
}

impl LazyClient {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Result<UptimeRobot> + Send + Sync + 'static,
    {
        LazyClient {
            cell: OnceCell::new(),
            factory: Box::new(factory),
        }
    }

    /// Client configured from the environment on first use.
    pub fn from_env() -> Self {
        Self::new(UptimeRobot::from_env)
    }

    /// The client, constructing it on the first call. A failed construction
    /// is not cached; the next call runs the factory again.
    pub fn get(&self) -> Result<&UptimeRobot> {
        self.cell.get_or_try_init(|| {
            tracing::debug!("initialising Uptime Robot client");
            (self.factory)()
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}
