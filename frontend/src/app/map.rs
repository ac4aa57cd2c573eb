use crate::app::config::Config;
use geocoder::{Coordinates, GeocoderAPI, Span};
use image::DynamicImage;
use static_map::{MapRequest, StaticMapAPI};
use std::path::PathBuf;

/// Static map parameters centered on the toponym with a marker on it
pub fn build_map_request(config: &Config, coords: &Coordinates, span: &Span) -> MapRequest {
    let ll = coords.to_param();

    MapRequest::new()
        .center(ll.as_str())
        .span(span.to_param())
        .layer(config.layer.as_str())
        .marker(&ll, &config.marker_style)
}

fn resolve(config: &Config, toponym: &str) -> Result<MapRequest, anyhow::Error> {
    let geocoder = GeocoderAPI::new(&config.geocoder_api_key, &config.geocoder_url)?;
    let (coords, span) = geocoder.coordinates_and_span(toponym)?;
    info!("Resolved \"{}\" to ll={} spn={}", toponym, coords.to_param(), span.to_param());

    Ok(build_map_request(config, &coords, &span))
}

/// Resolve the toponym and save its map to the configured file
pub fn save_toponym_map(config: &Config, toponym: &str) -> Result<PathBuf, anyhow::Error> {
    let request = resolve(config, toponym)?;

    let api = StaticMapAPI::new(&config.static_map_url)?;
    api.save_map_image(&request, &config.map_file)?;

    Ok(config.map_file.clone())
}

/// Resolve the toponym and decode its map in memory
pub fn fetch_toponym_map(config: &Config, toponym: &str) -> Result<DynamicImage, anyhow::Error> {
    let request = resolve(config, toponym)?;

    let api = StaticMapAPI::new(&config.image_url)?;
    Ok(api.fetch_map_image(&request)?)
}
