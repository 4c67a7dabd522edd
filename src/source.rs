//! Accepts the event source, restores sequence order, and routes each event.
//!
//! Exactly one producer connection is served at a time; the accept loop only
//! advances once the previous session has ended and its queue has drained.
//! Frames the producer sends out of order are held in the `EventQueue` until
//! the queue is deeper than the reorder window, at which point every frame
//! with a lower sequence must already have arrived and the minimum can be
//! routed.  The delivery delay this introduces is bounded by the window.

use crate::event::{Event, Kind};
use crate::queue::EventQueue;
use crate::registry::Registry;

use futures::future::Future;
use futures::stream::Stream;
use futures::sync::oneshot;
use std::convert::TryFrom;
use std::sync::{Arc, Mutex};
use tokio::codec::{Framed, LinesCodec};
use tokio::net::{TcpListener, TcpStream};

/// Run the event-source pipeline until `quit` fires.
///
/// Accept errors are logged and skipped; only dropping the returned future
/// (or the quit signal) stops the listener.
pub fn run(
    listener: TcpListener,
    queue: Arc<Mutex<EventQueue>>,
    registry: Arc<Registry>,
    window: usize,
    quit: oneshot::Receiver<()>,
) -> impl Future<Item = (), Error = ()> {
    let accept = listener
        .incoming()
        .then(|res| {
            Ok::<_, ()>(
                res.map_err(|e| log::error!("error accepting event source connection: {}", e))
                    .ok(),
            )
        })
        .filter_map(|conn| conn)
        .for_each(move |conn| handle_source(conn, queue.clone(), registry.clone(), window));

    accept
        .select(quit.map_err(|_| ()))
        .map(|_| log::info!("no longer listening for event sources"))
        .map_err(|_| ())
}

/// Serve one producer session: read, reorder, route, and drain on EOF.
fn handle_source(
    conn: TcpStream,
    queue: Arc<Mutex<EventQueue>>,
    registry: Arc<Registry>,
    window: usize,
) -> impl Future<Item = (), Error = ()> {
    let peer = conn
        .peer_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| "<unknown>".to_string());
    log::info!("accepted an event source connection from {}", peer);

    let (drain_queue, drain_registry) = (queue.clone(), registry.clone());
    Framed::new(conn, LinesCodec::new())
        .then(|res| {
            // Read errors other than end-of-stream cost one frame, not the
            // session; the codec keeps the connection and we keep reading.
            Ok::<_, ()>(
                res.map_err(|e| log::error!("error reading from the event source: {}", e))
                    .ok(),
            )
        })
        .filter_map(|line| line)
        .fold(0_u64, move |received, line| {
            let event = match Event::try_from(line) {
                Ok(event) => event,
                Err(e) => {
                    log::warn!("skipping a malformed event: {}", e);
                    return Ok::<_, ()>(received);
                }
            };

            let mut queue = queue.lock().unwrap_or_else(EventQueue::recover);
            queue.push(event);
            while queue.len() > window {
                match queue.pop() {
                    Ok(event) => route(&registry, &Arc::new(event)),
                    Err(e) => {
                        log::error!("{}", e);
                        break;
                    }
                }
            }
            Ok(received + 1)
        })
        .map(move |received| {
            let mut queue = drain_queue.lock().unwrap_or_else(EventQueue::recover);
            log::info!(
                "event source at {} closed after {} events; draining {} still queued",
                peer,
                received,
                queue.len()
            );
            while let Ok(event) = queue.pop() {
                route(&drain_registry, &Arc::new(event));
            }
        })
}

/// Dispatch one event to the clients it concerns.
///
/// Follower and client snapshots are taken per event, so a registration or
/// follow that lands mid-fan-out is picked up by the next event.
fn route(registry: &Registry, event: &Arc<Event>) {
    match event.kind() {
        Kind::Follow { from, to } => {
            registry.follow(from, to);
            registry.notify(to, event);
        }
        Kind::Unfollow { from, to } => registry.unfollow(from, to),
        Kind::Broadcast => {
            for id in registry.all_ids() {
                registry.notify(id, event);
            }
        }
        Kind::PrivateMsg { to, .. } => registry.notify(to, event),
        Kind::StatusUpdate { from } => {
            for id in registry.followers_of(from) {
                registry.notify(id, event);
            }
        }
    }
}
