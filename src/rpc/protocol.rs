//! Request/response model shared by both nodes.
//!
//! Three resources exist on the network:
//!
//! | Node      | Method     | Path                   | Payload            |
//! |-----------|------------|------------------------|--------------------|
//! | predictor | GET        | `autobright?lux&des_lux` | → decimal integer |
//! | lamp      | PUT / POST | `actuators/brightness` | decimal integer →  |
//! | lamp      | GET        | `status`               | → JSON object      |
//!
//! Response codes follow the CoAP numbering (`2.05` content, `2.04`
//! changed, `4.xx` client errors, `5.00` server error).  All buffers are fixed capacity.

use core::fmt;
use core::fmt::Write as _;

use heapless::String;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

pub const MAX_PATH: usize = 32;
pub const MAX_QUERY: usize = 64;
pub const MAX_PAYLOAD: usize = 128;

pub const AUTOBRIGHT_PATH: &str = "autobright";
pub const BRIGHTNESS_PATH: &str = "actuators/brightness";
pub const STATUS_PATH: &str = "status";

/// Query keys understood by the autobright resource.
pub const LUX_KEY: &str = "lux";
pub const DESIRED_LUX_KEY: &str = "des_lux";

// ---------------------------------------------------------------------------
// Method / code / format tokens
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    pub fn parse(token: &str) -> Result<Self, ProtocolError> {
        match token {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            _ => Err(ProtocolError::UnknownMethod),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code {
    /// 2.05
    Content,
    /// 2.04
    Changed,
    /// 4.00
    BadRequest,
    /// 4.04
    NotFound,
    /// 4.05
    MethodNotAllowed,
    /// 5.00
    InternalServerError,
}

impl Code {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Content => "2.05",
            Self::Changed => "2.04",
            Self::BadRequest => "4.00",
            Self::NotFound => "4.04",
            Self::MethodNotAllowed => "4.05",
            Self::InternalServerError => "5.00",
        }
    }

    pub fn parse(token: &str) -> Result<Self, ProtocolError> {
        match token {
            "2.05" => Ok(Self::Content),
            "2.04" => Ok(Self::Changed),
            "4.00" => Ok(Self::BadRequest),
            "4.04" => Ok(Self::NotFound),
            "4.05" => Ok(Self::MethodNotAllowed),
            "5.00" => Ok(Self::InternalServerError),
            _ => Err(ProtocolError::UnknownCode),
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, Self::Content | Self::Changed)
    }

    /// Answer for a request frame that failed to decode.
    pub fn for_rejection(e: ProtocolError) -> Self {
        match e {
            ProtocolError::UnknownMethod => Self::MethodNotAllowed,
            _ => Self::BadRequest,
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFormat {
    TextPlain,
    Json,
}

impl ContentFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TextPlain => "text/plain",
            Self::Json => "application/json",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "text/plain" => Some(Self::TextPlain),
            "application/json" => Some(Self::Json),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Request / response
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub path: String<MAX_PATH>,
    pub query: String<MAX_QUERY>,
    pub payload: String<MAX_PAYLOAD>,
}

impl Request {
    pub fn new(method: Method, path: &str) -> Result<Self, ProtocolError> {
        Ok(Self {
            method,
            path: bounded(path)?,
            query: String::new(),
            payload: String::new(),
        })
    }

    pub fn with_query(mut self, query: &str) -> Result<Self, ProtocolError> {
        self.query = bounded(query)?;
        Ok(self)
    }

    pub fn with_payload(mut self, payload: &str) -> Result<Self, ProtocolError> {
        self.payload = bounded(payload)?;
        Ok(self)
    }

    /// Value of `name` in an `a=1&b=2` query, if present.
    pub fn query_var(&self, name: &str) -> Option<&str> {
        self.query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v)
    }

    /// Integer query variable, 0 when missing or unparsable.
    pub fn query_int_or_zero(&self, name: &str) -> i32 {
        match self.query_var(name) {
            None => {
                warn!("query: '{}' missing, using 0", name);
                0
            }
            Some(raw) => parse_int(raw).unwrap_or_else(|_| {
                warn!("query: '{}={}' not numeric, using 0", name, raw);
                0
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub code: Code,
    pub format: Option<ContentFormat>,
    pub payload: String<MAX_PAYLOAD>,
}

impl Response {
    /// Response without a body.
    pub fn empty(code: Code) -> Self {
        Self {
            code,
            format: None,
            payload: String::new(),
        }
    }

    /// `2.05 Content` with the given body.
    pub fn content(format: ContentFormat, payload: &str) -> Result<Self, ProtocolError> {
        Ok(Self {
            code: Code::Content,
            format: Some(format),
            payload: bounded(payload)?,
        })
    }
}

fn bounded<const N: usize>(s: &str) -> Result<String<N>, ProtocolError> {
    let mut out = String::new();
    out.push_str(s).map_err(|()| ProtocolError::FieldTooLong)?;
    Ok(out)
}

/// Strict decimal integer parse (surrounding whitespace ignored).
pub fn parse_int(raw: &str) -> Result<i32, ProtocolError> {
    raw.trim().parse().map_err(|_| ProtocolError::NotNumeric)
}

// ---------------------------------------------------------------------------
// Typed messages
// ---------------------------------------------------------------------------

/// Negotiation request payload (lamp → predictor).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictionRequest {
    pub lux: i32,
    pub desired_lux: i32,
}

impl PredictionRequest {
    pub fn to_request(self) -> Result<Request, ProtocolError> {
        let mut query: String<MAX_QUERY> = String::new();
        write!(
            query,
            "{}={}&{}={}",
            LUX_KEY, self.lux, DESIRED_LUX_KEY, self.desired_lux
        )
        .map_err(|_| ProtocolError::FieldTooLong)?;
        Request::new(Method::Get, AUTOBRIGHT_PATH)?.with_query(&query)
    }

    /// Lenient decode: missing or unparsable fields become 0.
    pub fn from_request(req: &Request) -> Self {
        Self {
            lux: req.query_int_or_zero(LUX_KEY),
            desired_lux: req.query_int_or_zero(DESIRED_LUX_KEY),
        }
    }
}

/// Negotiation answer (predictor → lamp).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictionResponse {
    pub brightness_percent: i32,
}

impl PredictionResponse {
    pub fn to_response(self) -> Result<Response, ProtocolError> {
        let mut body: String<16> = String::new();
        write!(body, "{}", self.brightness_percent).map_err(|_| ProtocolError::FieldTooLong)?;
        Response::content(ContentFormat::TextPlain, &body)
    }

    /// Strict decode: a non-success code or a non-integer body is malformed.
    pub fn from_response(resp: &Response) -> Result<Self, ProtocolError> {
        if !resp.code.is_success() {
            return Err(ProtocolError::MalformedFrame);
        }
        Ok(Self {
            brightness_percent: parse_int(&resp.payload)?,
        })
    }
}

/// Broadcast actuation command for one lamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandMessage {
    pub brightness: u8,
}

impl CommandMessage {
    pub fn to_request(self) -> Result<Request, ProtocolError> {
        let mut body: String<4> = String::new();
        write!(body, "{}", self.brightness).map_err(|_| ProtocolError::FieldTooLong)?;
        Request::new(Method::Put, BRIGHTNESS_PATH)?.with_payload(&body)
    }
}

/// Body of the lamp's `status` resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub lux_perceived: i32,
    pub lux_desired: i32,
    pub brightness_percent: i32,
}

impl StatusReport {
    pub fn to_response(&self) -> Result<Response, ProtocolError> {
        let json = serde_json::to_string(self).map_err(|_| ProtocolError::MalformedFrame)?;
        Response::content(ContentFormat::Json, &json)
    }
}
