use vaxel::config;
use vaxel::err::FatalErr;
use vaxel::queue::EventQueue;
use vaxel::registry::Registry;
use vaxel::{clients, source};

use env_logger::Builder;
use futures::future::Future;
use futures::sync::oneshot;
use std::env;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::runtime::Runtime;

const ENV_LOG_VARIABLE: &str = "RUST_LOG";

fn main() -> Result<(), FatalErr> {
    config::merge_dotenv()?;
    Builder::from_env(ENV_LOG_VARIABLE).try_init()?;
    let cfg = config::from_env(env::vars().collect())?;

    let event_addr = SocketAddr::new(*cfg.address, *cfg.event_port);
    let client_addr = SocketAddr::new(*cfg.address, *cfg.client_port);
    let event_listener =
        TcpListener::bind(&event_addr).map_err(|e| FatalErr::bind(event_addr, e))?;
    let client_listener =
        TcpListener::bind(&client_addr).map_err(|e| FatalErr::bind(client_addr, e))?;
    log::info!("Listening for event sources on {}", event_addr);
    log::info!("Listening for user clients on {}", client_addr);

    let registry = Registry::new().into_arc();
    let queue = EventQueue::new().into_arc();
    let (source_quit_tx, source_quit) = oneshot::channel();
    let (client_quit_tx, client_quit) = oneshot::channel();

    let mut rt = Runtime::new().map_err(FatalErr::Runtime)?;
    rt.spawn(source::run(
        event_listener,
        queue,
        registry.clone(),
        *cfg.reorder_window,
        source_quit,
    ));
    rt.spawn(clients::run(client_listener, registry, client_quit));

    // The harness signals shutdown by closing our stdin (or sending a line).
    let _ = std::io::stdin().read_line(&mut String::new());
    log::info!("Received the shutdown signal");
    let _ = source_quit_tx.send(());
    let _ = client_quit_tx.send(());
    let _ = rt.shutdown_now().wait();
    Ok(())
}
