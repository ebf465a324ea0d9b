//! `GET /stream/{id}` — SSE subscription, grounded on the `Sse`/`Event`
//! construction style of `dashflow-langserve`'s `stream_handler` (§6).

use crate::error::{ApiError, Result};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{Stream, StreamExt};
use std::convert::Infallible;
use weft_stream::SessionId;

pub async fn stream(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>> {
    let session_id = SessionId::from(id);
    let subscription = state.mux.subscribe(&session_id)?;

    let events = subscription.map(|event| {
        Ok(Event::default().event(event.event.to_string()).data(event.data))
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
