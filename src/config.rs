pub use self::deployment_cfg::Deployment;

use self::environmental_variables::EnvVar;
use crate::err::FatalErr;
use hashbrown::HashMap;
use std::env;

mod deployment_cfg;
mod deployment_cfg_types;
mod environmental_variables;

type Result<T> = std::result::Result<T, FatalErr>;

pub fn merge_dotenv() -> Result<()> {
    let env_file = match env::var("ENV").ok().as_deref() {
        Some("production") => ".env.production",
        Some("development") | None => ".env",
        Some(v) => Err(FatalErr::config("ENV", v, "`production` or `development`"))?,
    };
    let res = dotenv::from_filename(env_file);

    if let Ok(log_level) = env::var("RUST_LOG") {
        if res.is_err() && ["warn", "info", "trace", "debug"].contains(&log_level.as_str()) {
            eprintln!(
                " WARN: could not load environmental variables from {:?}\n\
                 {:8}Are you in the right directory?  Proceeding with variables from the environment.",
                env::current_dir().unwrap_or_else(|_| "./".into()).join(env_file), ""
            );
        }
    }
    Ok(())
}

pub fn from_env(env_vars: HashMap<String, String>) -> Result<Deployment> {
    let env_vars = EnvVar::new(env_vars);
    log::info!(
        "Received the following environmental variables:{}",
        &env_vars
    );

    Deployment::from_env(&env_vars)
}
