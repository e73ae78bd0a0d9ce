//! Streaming delivery endpoint.
//!
//! Each `GET /sse` registers one [`StreamClient`] with the hub and streams the
//! events it queues as the response body. The [`Subscription`] lives inside
//! the body stream, so however the connection ends (client disconnect, write
//! error, server shutdown) dropping the body releases it exactly once.
//!
//! When the hub drops a client (closed or lagging queue), the events already
//! queued are flushed and then the response ends, closing the connection.

use std::convert::Infallible;

use async_stream::stream;
use axum::extract::State;
use axum::http::header;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use futures::Stream;
use tokio::sync::mpsc;
use tracing::debug;

use crate::broker::Subscription;
use crate::client::StreamClient;
use crate::transport::http::AppState;

pub(crate) async fn respond_sse(State(state): State<AppState>) -> Response {
    let (tx, rx) = mpsc::channel::<Event>(state.stream.buffer_capacity);
    let client = StreamClient::new(tx);
    let client_id = client.id.clone();

    let subscription = state.hub.subscribe(client);
    debug!(
        client = %client_id,
        subscriber = %subscription.id(),
        "Event stream opened"
    );

    let mut sse = Sse::new(events(client_id, subscription, rx));
    if let Some(period) = state.stream.keep_alive() {
        sse = sse.keep_alive(KeepAlive::new().interval(period));
    }

    // Sse sets the content type and disables caching.
    ([(header::CONNECTION, "keep-alive")], sse).into_response()
}

fn events(
    client_id: String,
    subscription: Subscription,
    mut rx: mpsc::Receiver<Event>,
) -> impl Stream<Item = Result<Event, Infallible>> + Send + 'static {
    let guard = StreamGuard {
        client_id,
        subscription,
    };

    stream! {
        let guard = guard;

        while let Some(event) = rx.recv().await {
            yield Ok(event);
        }

        debug!(client = %guard.client_id, "Hub released event stream, closing");
    }
}

/// Ties the subscription's lifetime to the response body.
struct StreamGuard {
    client_id: String,
    subscription: Subscription,
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        debug!(
            client = %self.client_id,
            subscriber = %self.subscription.id(),
            "Event stream closed"
        );
    }
}
