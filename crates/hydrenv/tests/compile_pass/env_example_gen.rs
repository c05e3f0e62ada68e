//! Test: env_example generation compiles

use hydrenv::Hydrate;

#[derive(Default, Hydrate)]
struct Config {
    #[env(key = "API_KEY", secret)]
    api_key: String,
}

fn main() {
    let example: String = Config::env_example();
    assert!(example.contains("API_KEY="));

    let free: String = hydrenv::env_example::<Config>();
    assert_eq!(example, free);
}
