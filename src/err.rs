use std::fmt;
use std::io;
use std::net::SocketAddr;

/// An error that should stop the server before it starts serving traffic.
///
/// Everything that can go wrong after startup is recovered locally and logged;
/// only configuration and startup failures are allowed to kill the process.
pub enum FatalErr {
    Config {
        var: String,
        value: String,
        allowed: String,
    },
    Bind {
        addr: SocketAddr,
        inner: io::Error,
    },
    Runtime(io::Error),
    Logger(log::SetLoggerError),
}

impl FatalErr {
    pub(crate) fn config(
        var: impl fmt::Display,
        value: impl fmt::Display,
        allowed: impl fmt::Display,
    ) -> Self {
        Self::Config {
            var: var.to_string(),
            value: value.to_string(),
            allowed: allowed.to_string(),
        }
    }

    pub fn bind(addr: SocketAddr, inner: io::Error) -> Self {
        Self::Bind { addr, inner }
    }
}

impl std::error::Error for FatalErr {}

impl fmt::Display for FatalErr {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        use FatalErr::*;
        let msg = match self {
            Config {
                var,
                value,
                allowed,
            } => format!(
                "{0} is set to `{1}`, which is invalid.\n\
                 {0} must be {2}.",
                var, value, allowed
            ),
            Bind { addr, inner } => format!(
                "Could not listen on {}: {}.\n\
                 Is another instance already running on that address?",
                addr, inner
            ),
            Runtime(inner) => format!("Could not start the runtime: {}", inner),
            Logger(inner) => format!("Could not start the logger: {}", inner),
        };
        write!(f, "{}", msg)
    }
}

// `main` returns `Result<(), FatalErr>`, and the process exit path prints the
// error with `{:?}`; forwarding to `Display` keeps that output readable.
impl fmt::Debug for FatalErr {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self)
    }
}

impl From<log::SetLoggerError> for FatalErr {
    fn from(e: log::SetLoggerError) -> Self {
        Self::Logger(e)
    }
}
