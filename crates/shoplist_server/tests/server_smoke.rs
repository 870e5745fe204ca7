use shoplist_core::{DbError, Store};
use shoplist_server::ApiServer;
use std::io::{Read, Write};
use std::net::TcpStream;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

fn raw_request(addr: std::net::SocketAddr, request: &str) -> String {
    let mut stream = TcpStream::connect(addr).unwrap();
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    stream.write_all(request.as_bytes()).unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();
    response
}

#[test]
fn serves_requests_and_stops_on_shutdown() {
    let store = Arc::new(Store::open_in_memory().unwrap());
    let server = ApiServer::bind("127.0.0.1:0".parse().unwrap(), store, 2).unwrap();
    let addr = server.local_addr().unwrap();
    let handle = server.handle();
    let running = thread::spawn(move || server.run());

    let listed = raw_request(
        addr,
        "GET /lists HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    );
    assert!(listed.starts_with("HTTP/1.1 200"), "{listed}");
    assert!(listed.ends_with("[]"), "{listed}");

    let preflight = raw_request(
        addr,
        "OPTIONS /lists/1 HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    );
    assert!(preflight.starts_with("HTTP/1.1 200"), "{preflight}");
    assert!(preflight.contains("Access-Control-Allow-Origin: *"), "{preflight}");

    handle.shutdown();
    running.join().unwrap().unwrap();
}

#[test]
fn open_write_transaction_does_not_stall_file_store_reads() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(Store::open(dir.path().join("einkaufsliste.db")).unwrap());
    let server = ApiServer::bind("127.0.0.1:0".parse().unwrap(), Arc::clone(&store), 1).unwrap();
    let addr = server.local_addr().unwrap();
    let handle = server.handle();
    let running = thread::spawn(move || server.run());

    let warmup = raw_request(
        addr,
        "GET /articles HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    );
    assert!(warmup.starts_with("HTTP/1.1 200"), "{warmup}");

    let (held_tx, held_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let writer_store = Arc::clone(&store);
    let writer = thread::spawn(move || {
        let session = writer_store.session().unwrap();
        session
            .with_connection(|conn| {
                conn.execute_batch(
                    "BEGIN IMMEDIATE; INSERT INTO articles (name) VALUES ('Milk');",
                )?;
                held_tx.send(()).unwrap();
                release_rx.recv_timeout(Duration::from_secs(5)).ok();
                conn.execute_batch("COMMIT;")?;
                Ok::<_, DbError>(())
            })
            .unwrap();
    });

    held_rx.recv().unwrap();
    let started_at = Instant::now();
    let listed = raw_request(
        addr,
        "GET /articles HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    );
    let waited = started_at.elapsed();
    release_tx.send(()).unwrap();
    writer.join().unwrap();

    assert!(listed.starts_with("HTTP/1.1 200"), "{listed}");
    assert!(listed.ends_with("[]"), "{listed}");
    assert!(waited < Duration::from_millis(500), "read waited {waited:?}");

    handle.shutdown();
    running.join().unwrap().unwrap();
}
