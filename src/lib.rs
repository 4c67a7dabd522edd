//! Message-routing server for a sequenced social event stream.
//!
//! One producer emits newline-framed events on a TCP endpoint; user clients
//! register on a second endpoint and hold their connections open.  The producer
//! may emit events out of sequence order, so the server buffers them and
//! releases them in ascending sequence order before routing each one to the
//! clients it concerns.
//!
//! # Notes on data flow
//! * **Producer → Source pipeline**:
//! The source pipeline accepts one producer connection at a time and reads
//! newline-terminated frames from it.  Each frame is parsed into an `Event` and
//! pushed into the `EventQueue`, a min-heap keyed by sequence number.  Once the
//! queue holds more events than the reorder window, the pipeline pops the
//! lowest-sequence event and routes it.  When the producer closes its
//! connection, the queue is drained in order and the pipeline goes back to
//! accepting.
//!
//! * **Source pipeline → Registry**:
//! Routing reads the `Registry` to find destination connections and mutates its
//! follower map for follow/unfollow events.  Each destination is reached
//! through a bounded channel whose receiving end is owned by that client's
//! writer task, so a slow or dead client never blocks routing.
//!
//! * **Client pipeline → Registry**:
//! The client pipeline accepts any number of concurrent client connections,
//! reads one decimal user id per connection, and installs the connection's
//! outbound channel in the `Registry`.  The connection stays open for outbound
//! writes until the peer closes it or the server shuts down.

pub mod clients;
pub mod config;
pub mod err;
pub mod event;
pub mod queue;
pub mod registry;
pub mod source;
