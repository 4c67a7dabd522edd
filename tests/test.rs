use vaxel::queue::EventQueue;
use vaxel::registry::Registry;
use vaxel::{clients, source};

use futures::sync::oneshot;
use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::runtime::Runtime;

/// A server running both pipelines on ephemeral ports.  Dropping it tears the
/// runtime down.
struct TestServer {
    _rt: Runtime,
    event_addr: SocketAddr,
    client_addr: SocketAddr,
    registry: Arc<Registry>,
    _quit: (oneshot::Sender<()>, oneshot::Sender<()>),
}

fn start_server(window: usize) -> TestServer {
    let any: SocketAddr = "127.0.0.1:0".parse().expect("in test");
    let event_listener = TcpListener::bind(&any).expect("in test");
    let client_listener = TcpListener::bind(&any).expect("in test");
    let event_addr = event_listener.local_addr().expect("in test");
    let client_addr = client_listener.local_addr().expect("in test");

    let registry = Registry::new().into_arc();
    let queue = EventQueue::new().into_arc();
    let (source_quit_tx, source_quit) = oneshot::channel();
    let (client_quit_tx, client_quit) = oneshot::channel();

    let mut rt = Runtime::new().expect("in test");
    rt.spawn(source::run(
        event_listener,
        queue,
        registry.clone(),
        window,
        source_quit,
    ));
    rt.spawn(clients::run(client_listener, registry.clone(), client_quit));

    TestServer {
        _rt: rt,
        event_addr,
        client_addr,
        registry,
        _quit: (source_quit_tx, client_quit_tx),
    }
}

/// Connect a client, register it under `id`, and hand back a reader for the
/// events the server sends it.
fn connect_client(server: &TestServer, id: i64) -> BufReader<TcpStream> {
    let mut conn = TcpStream::connect(server.client_addr).expect("in test");
    conn.write_all(format!("{}\n", id).as_bytes()).expect("in test");
    conn.set_read_timeout(Some(Duration::from_secs(5)))
        .expect("in test");
    BufReader::new(conn)
}

/// Send the given frames on one producer connection, then close it so the
/// server drains its queue.
fn send_events(server: &TestServer, frames: &[&str]) {
    let mut conn = TcpStream::connect(server.event_addr).expect("in test");
    for frame in frames {
        conn.write_all(frame.as_bytes()).expect("in test");
    }
    // Dropping `conn` here is the end-of-stream that triggers the drain.
}

fn expect_line(reader: &mut BufReader<TcpStream>, want: &str) {
    let mut line = String::new();
    reader.read_line(&mut line).expect("in test");
    assert_eq!(line, want);
}

fn expect_silence(reader: &mut BufReader<TcpStream>) {
    reader
        .get_ref()
        .set_read_timeout(Some(Duration::from_millis(400)))
        .expect("in test");
    let mut line = String::new();
    match reader.read_line(&mut line) {
        Ok(0) => (),                                  // peer closed without sending
        Ok(n) => panic!("expected no output, read {} bytes: {:?}", n, line),
        Err(_) => (),                                 // timed out with nothing to read
    }
}

/// Registrations land asynchronously; give the server a beat to process them.
fn settle() {
    sleep(Duration::from_millis(200));
}

#[test]
fn a_late_follow_is_held_until_the_window_releases_it() {
    let server = start_server(1);
    let mut user_one = connect_client(&server, 1);
    let mut user_two = connect_client(&server, 2);
    settle();

    send_events(&server, &["2|F|1|2\n", "1|B\n"]);

    expect_line(&mut user_one, "1|B\n");
    expect_line(&mut user_two, "1|B\n");
    expect_line(&mut user_two, "2|F|1|2\n");
    expect_silence(&mut user_one);
}

#[test]
fn a_status_update_reaches_followers_gained_earlier_in_the_stream() {
    let server = start_server(200);
    let mut user_one = connect_client(&server, 1);
    let mut user_two = connect_client(&server, 2);
    let mut user_three = connect_client(&server, 3);
    settle();

    send_events(&server, &["3|S|1\n", "2|F|3|1\n", "1|F|2|1\n"]);

    expect_line(&mut user_one, "1|F|2|1\n");
    expect_line(&mut user_one, "2|F|3|1\n");
    expect_line(&mut user_two, "3|S|1\n");
    expect_line(&mut user_three, "3|S|1\n");
}

#[test]
fn an_unfollow_without_a_follow_routes_nothing() {
    let server = start_server(200);
    let mut user_ten = connect_client(&server, 10);
    settle();

    send_events(&server, &["1|U|10|10\n"]);
    settle();

    assert!(server.registry.followers_of(10).is_empty());
    expect_silence(&mut user_ten);
}

#[test]
fn a_private_message_to_an_unregistered_user_is_dropped() {
    let server = start_server(200);
    let mut user_seven = connect_client(&server, 7);
    settle();

    send_events(&server, &["1|P|99|7\n", "2|P|7|99\n"]);

    expect_line(&mut user_seven, "1|P|99|7\n");
    expect_silence(&mut user_seven);
}

#[test]
fn a_malformed_frame_does_not_end_the_session() {
    let server = start_server(200);
    let mut user_five = connect_client(&server, 5);
    settle();

    send_events(&server, &["1|B\n", "garbage\n", "2|B\n"]);

    expect_line(&mut user_five, "1|B\n");
    expect_line(&mut user_five, "2|B\n");
}

#[test]
fn frames_scrambled_within_the_window_are_routed_in_sequence_order() {
    let server = start_server(3);
    let mut user_one = connect_client(&server, 1);
    settle();

    send_events(&server, &["4|B\n", "2|B\n", "1|B\n", "3|B\n"]);

    for want in &["1|B\n", "2|B\n", "3|B\n", "4|B\n"] {
        expect_line(&mut user_one, want);
    }
}
