// Throwaway upstream servers for exercising the HTTP clients

use axum::Router;
use tokio::net::TcpListener;

/// Serves `app` on an ephemeral local port and returns that port.
pub async fn spawn_upstream(app: Router) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    port
}

/// A port nothing is listening on.
pub async fn unused_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}
