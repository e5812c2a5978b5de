//! Writing replies and event streams to tiny_http requests.

use crate::reload::{LiveReloader, Reply};
use crate::utils::mime::types::{EVENT_STREAM, PLAIN};
use anyhow::Result;
use std::io::Write;
use tiny_http::{Header, Method, Request, Response, StatusCode};

/// Send a [`Reply`]; HEAD requests get the headers only.
pub fn respond(request: Request, reply: Reply) -> Result<()> {
    let mut headers = vec![header("Content-Type", reply.content_type)?];
    if let Some(location) = &reply.location {
        headers.push(header("Location", location)?);
    }

    if is_head_request(&request) {
        let mut response = Response::empty(StatusCode(reply.status));
        for h in headers {
            response.add_header(h);
        }
        request.respond(response)?;
        return Ok(());
    }

    let mut response = Response::from_data(reply.body).with_status_code(StatusCode(reply.status));
    for h in headers {
        response.add_header(h);
    }
    request.respond(response)?;
    Ok(())
}

/// Respond with 405 for anything but GET and HEAD.
pub fn respond_method_not_allowed(request: Request) -> Result<()> {
    respond(request, Reply::new(405, PLAIN, "405 Method Not Allowed"))
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    respond(request, Reply::new(503, PLAIN, "503 Service Unavailable"))
}

/// Take over the connection and stream reload events until it closes.
///
/// tiny_http buffers normal responses, so the status line and headers are
/// written by hand on the raw socket and every event is flushed.
pub fn respond_event_stream(request: Request, reloader: &LiveReloader) -> Result<()> {
    let subscription = reloader.subscribe();
    let mut w = request.into_writer();

    write!(
        w,
        "HTTP/1.1 200 OK\r\n\
         Content-Type: {EVENT_STREAM}\r\n\
         Cache-Control: no-cache\r\n\
         Connection: keep-alive\r\n\
         \r\n"
    )?;
    w.flush()?;

    // A write error here is the tab going away, not a server problem
    if let Err(e) = reloader.stream(&subscription, &mut w) {
        crate::debug!("reload"; "subscriber {} closed: {}", subscription.id(), e);
    }
    Ok(())
}

pub fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

pub fn is_get_or_head(request: &Request) -> bool {
    matches!(request.method(), Method::Get | Method::Head)
}

fn header(key: &str, value: &str) -> Result<Header> {
    Header::from_bytes(key.as_bytes(), value.as_bytes())
        .map_err(|()| anyhow::anyhow!("invalid header {key}: {value}"))
}
