mod app;

slint::include_modules!();

extern crate pretty_env_logger;
#[macro_use] extern crate log;

use app::config::{Config, DisplayMode};
use std::env;

fn main() -> Result<(), anyhow::Error> {
    dotenv::dotenv().ok();
    pretty_env_logger::init();

    let config = Config::from_env()?;
    let toponym = app::query::join_query(env::args().skip(1));

    info!("Looking up map for \"{}\"", toponym);

    match config.display {
        DisplayMode::Window => {
            let path = app::map::save_toponym_map(&config, &toponym)?;
            app::viewer::show_map_in_window(&path)?;
        }
        DisplayMode::Native => {
            let image = app::map::fetch_toponym_map(&config, &toponym)?;
            app::viewer::show_image(&image)?;
        }
    }

    Ok(())
}
