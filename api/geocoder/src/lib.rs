use log::*;
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while resolving a toponym
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// The geocoder answered with a non-success status
    #[error("Request execution: {status} ({reason}) on {url}")]
    Request {
        status: u16,
        reason: String,
        url: String,
    },

    /// The response body did not have the expected shape
    #[error("Malformed geocoder response: {0}")]
    Parse(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, GeocodeError>;

/// Geocoder HTTP API client
pub struct GeocoderAPI {
    client: Client,
    base_url: String,
    api_key: String,
}

/// Longitude/latitude pair, kept as the text tokens the geocoder returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinates {
    pub longitude: String,
    pub latitude: String,
}

impl Coordinates {
    /// Split a `"<lon> <lat>"` position string on its first space
    pub fn from_pos(pos: &str) -> Result<Self> {
        let (longitude, latitude) = pos
            .trim()
            .split_once(' ')
            .ok_or_else(|| GeocodeError::Parse(format!("position \"{}\" is not a \"<lon> <lat>\" pair", pos)))?;

        Ok(Self {
            longitude: longitude.trim().to_string(),
            latitude: latitude.trim().to_string(),
        })
    }

    /// Comma-joined form used by the `ll` and `pt` map parameters
    pub fn to_param(&self) -> String {
        format!("{},{}", self.longitude, self.latitude)
    }
}

/// Half-width and half-height of a map viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub dx: f64,
    pub dy: f64,
}

impl Span {
    /// Derive the span from an envelope's `lowerCorner` and `upperCorner` strings.
    ///
    /// With `lower = "L B"` and `upper = "R T"` this yields `(|R - L| / 2, |B - T| / 2)`.
    pub fn from_corners(lower: &str, upper: &str) -> Result<Self> {
        let (l, b) = parse_corner(lower)?;
        let (r, t) = parse_corner(upper)?;

        Ok(Self {
            dx: (r - l).abs() / 2.0,
            dy: (b - t).abs() / 2.0,
        })
    }

    /// Comma-joined form used by the `spn` map parameter
    pub fn to_param(&self) -> String {
        format!("{},{}", self.dx, self.dy)
    }
}

fn parse_corner(corner: &str) -> Result<(f64, f64)> {
    let (x, y) = corner
        .trim()
        .split_once(' ')
        .ok_or_else(|| GeocodeError::Parse(format!("corner \"{}\" is not an \"<x> <y>\" pair", corner)))?;

    let parse = |token: &str| {
        token
            .trim()
            .parse::<f64>()
            .map_err(|e| GeocodeError::Parse(format!("corner token \"{}\": {}", token, e)))
    };

    Ok((parse(x)?, parse(y)?))
}

#[derive(Debug, Deserialize)]
struct GeocoderResponse {
    response: ResponseBody,
}

#[derive(Debug, Deserialize)]
struct ResponseBody {
    #[serde(rename = "GeoObjectCollection")]
    collection: GeoObjectCollection,
}

#[derive(Debug, Deserialize)]
struct GeoObjectCollection {
    #[serde(rename = "featureMember", default)]
    feature_members: Vec<FeatureMember>,
}

#[derive(Debug, Deserialize)]
struct FeatureMember {
    #[serde(rename = "GeoObject")]
    geo_object: Toponym,
}

/// A single geocoder result
#[derive(Debug, Clone, Deserialize)]
pub struct Toponym {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "Point")]
    pub point: Point,
    #[serde(rename = "boundedBy")]
    pub bounded_by: Option<BoundedBy>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Point {
    pub pos: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoundedBy {
    #[serde(rename = "Envelope")]
    pub envelope: Envelope,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    #[serde(rename = "lowerCorner")]
    pub lower_corner: String,
    #[serde(rename = "upperCorner")]
    pub upper_corner: String,
}

impl Toponym {
    pub fn coordinates(&self) -> Result<Coordinates> {
        Coordinates::from_pos(&self.point.pos)
    }

    pub fn span(&self) -> Result<Span> {
        let envelope = &self
            .bounded_by
            .as_ref()
            .ok_or_else(|| GeocodeError::Parse("toponym has no boundedBy envelope".to_string()))?
            .envelope;

        Span::from_corners(&envelope.lower_corner, &envelope.upper_corner)
    }
}

/// Extract the first toponym from a geocoder JSON body
pub fn parse_response(body: &str) -> Result<Toponym> {
    let parsed: GeocoderResponse =
        serde_json::from_str(body).map_err(|e| GeocodeError::Parse(e.to_string()))?;

    parsed
        .response
        .collection
        .feature_members
        .into_iter()
        .next()
        .map(|member| member.geo_object)
        .ok_or_else(|| GeocodeError::Parse("no results in featureMember".to_string()))
}

/// Turn a non-success response into a `Request` error
pub fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    Err(GeocodeError::Request {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        url: response.url().to_string(),
    })
}

impl GeocoderAPI {
    /// Create a new geocoder client
    pub fn new(api_key: &str, base_url: &str) -> Result<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Look up the first toponym matching the address
    pub fn fetch_toponym(&self, address: &str) -> Result<Toponym> {
        if address.trim().is_empty() {
            warn!("Geocoding an empty address, result is up to the provider");
        }

        let params = [
            ("apikey", self.api_key.as_str()),
            ("geocode", address),
            ("format", "json"),
        ];

        info!("Geocoding \"{}\" via {}", address, self.base_url);
        let response = self.client.get(&self.base_url).query(&params).send()?;
        let response = check_status(response)?;
        let body = response.text()?;
        debug!("Geocoder returned {} bytes", body.len());

        let toponym = parse_response(&body)?;
        info!(
            "Found toponym: {} ({})",
            toponym.name.as_deref().unwrap_or("unnamed"),
            toponym.description.as_deref().unwrap_or("no description")
        );
        Ok(toponym)
    }

    /// Resolve the address to a longitude/latitude pair
    pub fn coordinates(&self, address: &str) -> Result<Coordinates> {
        self.fetch_toponym(address)?.coordinates()
    }

    /// Resolve the address to its coordinates and the viewport span of its envelope
    pub fn coordinates_and_span(&self, address: &str) -> Result<(Coordinates, Span)> {
        let toponym = self.fetch_toponym(address)?;
        Ok((toponym.coordinates()?, toponym.span()?))
    }
}
