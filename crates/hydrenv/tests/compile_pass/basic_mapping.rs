//! Test: explicit keys and field-name fallback compile

use hydrenv::Hydrate;

#[derive(Default, Hydrate)]
struct Config {
    #[env(key = "DATABASE_URL")]
    db_url: String,

    #[env(key = "")]
    port: u16,

    verbose: bool,
}

fn main() {
    let mut config = Config::default();
    let _ = config.apply_env();
    let _ = config.apply_files(["app.env"]);

    let _: Result<Config, hydrenv::Error> = Config::from_env();
    let _ = (config.db_url, config.port, config.verbose);
}
