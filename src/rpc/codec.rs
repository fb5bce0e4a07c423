//! Text datagram codec.
//!
//! Wire format (one UDP datagram per message, UTF-8):
//! ```text
//! request : <METHOD> <mid> <path>[?<query>]\n<payload>
//! response: <mid> <code> <format|->\n<payload>
//! ```
//!
//! `mid` is a 16-bit message id chosen by the caller and echoed by the
//! server, so a client can drop stale answers from an earlier call that
//! timed out.  The payload runs to the end of the datagram.
//!
//! A query pair whose value does not fit the query buffer keeps its key
//! with an empty value; lenient readers then treat it as unparsable.

use core::fmt::Write as _;

use heapless::String;

use super::protocol::{Code, ContentFormat, MAX_PATH, MAX_PAYLOAD, MAX_QUERY, Method, Request, Response};
use crate::error::ProtocolError;

/// Largest datagram either side will produce or accept.
pub const MAX_DATAGRAM: usize = 16 + MAX_PATH + 1 + MAX_QUERY + 1 + MAX_PAYLOAD;

pub type Datagram = String<MAX_DATAGRAM>;

pub fn encode_request(mid: u16, req: &Request) -> Result<Datagram, ProtocolError> {
    let mut out = Datagram::new();
    write!(out, "{} {} {}", req.method, mid, req.path).map_err(|_| ProtocolError::FieldTooLong)?;
    if !req.query.is_empty() {
        write!(out, "?{}", req.query).map_err(|_| ProtocolError::FieldTooLong)?;
    }
    write!(out, "\n{}", req.payload).map_err(|_| ProtocolError::FieldTooLong)?;
    Ok(out)
}

pub fn decode_request(bytes: &[u8]) -> Result<(u16, Request), ProtocolError> {
    let (header, payload) = split_frame(bytes)?;

    let mut parts = header.split(' ');
    let method = Method::parse(parts.next().unwrap_or_default())?;
    let mid = parse_mid(parts.next())?;
    let target = parts.next().ok_or(ProtocolError::MalformedFrame)?;
    if parts.next().is_some() {
        return Err(ProtocolError::MalformedFrame);
    }

    let (path, query) = target.split_once('?').unwrap_or((target, ""));
    if path.is_empty() {
        return Err(ProtocolError::MalformedFrame);
    }
    let mut req = Request::new(method, path)?.with_payload(payload)?;
    req.query = bounded_query(query);
    Ok((mid, req))
}

/// Message id of a request, readable even when the rest of the frame is
/// not, so a rejection can still be addressed to the caller.
pub fn request_mid(bytes: &[u8]) -> Option<u16> {
    let end = bytes.iter().position(|&b| b == b'\n')?;
    let header = core::str::from_utf8(&bytes[..end]).ok()?;
    header.split(' ').nth(1)?.parse().ok()
}

fn bounded_query(query: &str) -> String<MAX_QUERY> {
    let mut out = String::new();
    for pair in query.split('&') {
        let sep = if out.is_empty() { "" } else { "&" };
        let room = MAX_QUERY.saturating_sub(out.len() + sep.len());
        let key = pair.split_once('=').map_or(pair, |(k, _)| k);
        let kept = if pair.len() <= room {
            Some((pair, ""))
        } else if key.len() < room {
            Some((key, "="))
        } else {
            None
        };
        if let Some((head, tail)) = kept {
            // Lengths checked against `room` above.
            let _ = out.push_str(sep);
            let _ = out.push_str(head);
            let _ = out.push_str(tail);
        }
    }
    out
}

pub fn encode_response(mid: u16, resp: &Response) -> Result<Datagram, ProtocolError> {
    let mut out = Datagram::new();
    let format = resp.format.map_or("-", ContentFormat::as_str);
    write!(out, "{} {} {}\n{}", mid, resp.code, format, resp.payload)
        .map_err(|_| ProtocolError::FieldTooLong)?;
    Ok(out)
}

pub fn decode_response(bytes: &[u8]) -> Result<(u16, Response), ProtocolError> {
    let (header, payload) = split_frame(bytes)?;

    let mut parts = header.split(' ');
    let mid = parse_mid(parts.next())?;
    let code = Code::parse(parts.next().unwrap_or_default())?;
    let format = match parts.next() {
        Some("-") => None,
        Some(token) => Some(ContentFormat::parse(token).ok_or(ProtocolError::MalformedFrame)?),
        None => return Err(ProtocolError::MalformedFrame),
    };

    let mut resp = Response::empty(code);
    resp.format = format;
    resp.payload
        .push_str(payload)
        .map_err(|()| ProtocolError::FieldTooLong)?;
    Ok((mid, resp))
}

fn split_frame(bytes: &[u8]) -> Result<(&str, &str), ProtocolError> {
    let text = core::str::from_utf8(bytes).map_err(|_| ProtocolError::MalformedFrame)?;
    text.split_once('\n').ok_or(ProtocolError::MalformedFrame)
}

fn parse_mid(token: Option<&str>) -> Result<u16, ProtocolError> {
    token
        .and_then(|t| t.parse().ok())
        .ok_or(ProtocolError::MalformedFrame)
}
