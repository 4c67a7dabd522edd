use crate::from_env_var;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;
use strum_macros::{EnumString, EnumVariantNames};

from_env_var!(
    /// The current environment, which controls what file to read other ENV vars from
    let name = Env;
    let default: EnvInner = EnvInner::Development;
    let (env_var, allowed_values) = ("RUST_ENV", &format!("one of: {:?}", EnvInner::variants()));
    let from_str = |s| EnvInner::from_str(s).ok();
);
from_env_var!(
    /// How verbosely to log messages
    let name = LogLevel;
    let default: LogLevelInner = LogLevelInner::Warn;
    let (env_var, allowed_values) = ("RUST_LOG", &format!("one of: {:?}", LogLevelInner::variants()));
    let from_str = |s| LogLevelInner::from_str(s).ok();
);
from_env_var!(
    /// The address to bind both listeners on
    let name = BindAddr;
    let default: IpAddr = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1));
    let (env_var, allowed_values) = ("BIND", "a valid address (e.g., 127.0.0.1)");
    let from_str = |s| match s {
        "localhost" => Some(IpAddr::V4(Ipv4Addr::LOCALHOST)),
        _ => s.parse().ok(),
    };
);
from_env_var!(
    /// The port to listen on for the event source
    let name = EventPort;
    let default: u16 = 9090;
    let (env_var, allowed_values) = ("EVENT_PORT", "a number between 0 and 65535");
    let from_str = |s| s.parse().ok();
);
from_env_var!(
    /// The port to listen on for user clients
    let name = ClientPort;
    let default: u16 = 9099;
    let (env_var, allowed_values) = ("CLIENT_PORT", "a number between 0 and 65535");
    let from_str = |s| s.parse().ok();
);
from_env_var!(
    /// How deep the reorder queue must be before the earliest event is routed.
    ///
    /// Must be at least as large as the maximum batch size used by the event
    /// source; a larger value only adds delivery delay.
    let name = ReorderWindow;
    let default: usize = 200;
    let (env_var, allowed_values) = ("REORDER_WINDOW", "a positive number");
    let from_str = |s| s.parse().ok();
);

#[derive(EnumString, EnumVariantNames, Debug, Clone)]
#[strum(serialize_all = "snake_case")]
pub enum LogLevelInner {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(EnumString, EnumVariantNames, Debug, Clone)]
#[strum(serialize_all = "snake_case")]
pub enum EnvInner {
    Production,
    Development,
}
