extern crate pretty_env_logger;
#[macro_use] extern crate log;

use geocoder::GeocoderAPI;
use std::env;

const DEFAULT_GEOCODER_URL: &str = "https://geocode-maps.yandex.ru/1.x/";

fn main() -> Result<(), anyhow::Error> {
    pretty_env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <address...>", args[0]);
        eprintln!("");
        eprintln!("Environment:");
        eprintln!("  TOPONYM_GEOCODER_API_KEY - geocoder API key (required)");
        eprintln!("  TOPONYM_GEOCODER_URL     - geocoder endpoint (default {})", DEFAULT_GEOCODER_URL);
        eprintln!("");
        eprintln!("Example:");
        eprintln!("  {} Moscow, Red Square", args[0]);
        std::process::exit(1);
    }

    let api_key = env::var("TOPONYM_GEOCODER_API_KEY")?;
    let base_url = env::var("TOPONYM_GEOCODER_URL").unwrap_or_else(|_| DEFAULT_GEOCODER_URL.to_string());
    let address = args[1..].join(" ");

    let api = GeocoderAPI::new(&api_key, &base_url)?;

    info!("Resolving \"{}\"", address);
    let (coords, span) = api.coordinates_and_span(&address)?;

    println!("ll:  {}", coords.to_param());
    println!("spn: {}", span.to_param());

    Ok(())
}
