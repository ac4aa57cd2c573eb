use static_map::{MapRequest, StaticMapAPI, DEFAULT_MAP_FILE};
use std::env;
use std::path::Path;

const DEFAULT_STATIC_MAP_URL: &str = "https://static-maps.yandex.ru/1.x/";

fn main() -> Result<(), anyhow::Error> {
    pretty_env_logger::init();

    println!("Static Map Downloader Test");

    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: {} <lon,lat> <dx,dy> [output]", args[0]);
        eprintln!("");
        eprintln!("Example:");
        eprintln!("  {} 37.620795,55.753930 0.005,0.003 {}", args[0], DEFAULT_MAP_FILE);
        std::process::exit(1);
    }

    let ll = &args[1];
    let spn = &args[2];
    let output = args.get(3).map(|s| s.as_str()).unwrap_or(DEFAULT_MAP_FILE);
    let base_url = env::var("TOPONYM_STATIC_MAP_URL").unwrap_or_else(|_| DEFAULT_STATIC_MAP_URL.to_string());

    let api = StaticMapAPI::new(&base_url)?;
    let request = MapRequest::new()
        .center(ll.as_str())
        .span(spn.as_str())
        .layer("map")
        .marker(ll, "pm2lbl57");

    println!("Center: {}", ll);
    println!("Span: {}", spn);

    api.save_map_image(&request, Path::new(output))?;
    println!("Successfully downloaded and saved map to {}", output);

    Ok(())
}
