//! Accepts user clients and keeps their connections open for outbound events.
//!
//! A client speaks exactly one line: its decimal user id.  Registration splits
//! the connection in two.  The read half stays with a reader task that waits
//! for further lines (a client may re-register, and EOF tells us the peer is
//! gone).  The write half goes to a writer task that forwards whatever the
//! router queues on the client's channel.  The router is therefore the only
//! writer any connection ever has.

use crate::event::{Event, UserId};
use crate::registry::Registry;

use futures::future::Future;
use futures::stream::Stream;
use futures::sync::oneshot;
use std::io;
use std::sync::Arc;
use tokio::codec::{Framed, LinesCodec};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// Events queued per client before `notify` starts shedding them.
const OUTBOUND_BUFFER: usize = 1024;

/// Run the client pipeline until `quit` fires.  Each accepted connection gets
/// its own reader and writer tasks; accepting never blocks on a client.
pub fn run(
    listener: TcpListener,
    registry: Arc<Registry>,
    quit: oneshot::Receiver<()>,
) -> impl Future<Item = (), Error = ()> {
    let accept = listener
        .incoming()
        .then(|res| {
            Ok::<_, ()>(
                res.map_err(|e| log::error!("error accepting client connection: {}", e))
                    .ok(),
            )
        })
        .filter_map(|conn| conn)
        .for_each(move |conn| {
            tokio::spawn(handle_client(conn, registry.clone()));
            Ok(())
        });

    accept
        .select(quit.map_err(|_| ()))
        .map(|_| log::info!("no longer listening for user clients"))
        .map_err(|_| ())
}

fn handle_client(conn: TcpStream, registry: Arc<Registry>) -> impl Future<Item = (), Error = ()> {
    let peer = conn
        .peer_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| "<unknown>".to_string());
    log::info!("accepted a client connection from {}", peer);

    let (to_client, from_client) = Framed::new(conn, LinesCodec::new()).split();
    let (tx, rx) = mpsc::channel(OUTBOUND_BUFFER);

    // Outbound half: forward routed events to the socket, verbatim.  The codec
    // restores the newline the reader stripped, so the client sees the frame
    // exactly as the producer sent it.
    let forward = rx
        .map_err(|_| -> io::Error { unreachable!() })
        .map(|event: Arc<Event>| event.raw().to_owned())
        .forward(to_client)
        .map(|_| ())
        .map_err(|e| log::info!("ending an outbound client stream: {}", e));
    tokio::spawn(forward);

    // Inbound half: each well-formed line is a registration; the last one
    // wins.  The registry entry outlives the connection on purpose.
    from_client
        .then(|res| {
            Ok::<_, ()>(
                res.map_err(|e| log::error!("error reading from a client: {}", e))
                    .ok(),
            )
        })
        .filter_map(|line| line)
        .for_each(move |line| {
            match line.trim().parse::<UserId>() {
                Ok(id) => registry.register(id, tx.clone()),
                Err(e) => log::warn!("ignoring invalid user id {:?}: {}", line, e),
            }
            Ok(())
        })
        .map(move |()| log::info!("client connection from {} closed", peer))
}
