use super::{deployment_cfg_types::*, EnvVar};
use crate::err::FatalErr;

#[derive(Debug, Default)]
pub struct Deployment {
    pub env: Env,
    pub log_level: LogLevel,
    pub address: BindAddr,
    pub event_port: EventPort,
    pub client_port: ClientPort,
    pub reorder_window: ReorderWindow,
}

impl Deployment {
    pub(crate) fn from_env(env: &EnvVar) -> Result<Self, FatalErr> {
        let cfg = Self {
            env: Env::default().maybe_update(env.get("RUST_ENV"))?,
            log_level: LogLevel::default().maybe_update(env.get("RUST_LOG"))?,
            address: BindAddr::default().maybe_update(env.get("BIND"))?,
            event_port: EventPort::default().maybe_update(env.get("EVENT_PORT"))?,
            client_port: ClientPort::default().maybe_update(env.get("CLIENT_PORT"))?,
            reorder_window: ReorderWindow::default().maybe_update(env.get("REORDER_WINDOW"))?,
        };
        log::info!("Using deployment configuration:\n {:#?}", &cfg);
        Ok(cfg)
    }
}
