use std::env;

/// Returns the value of the named environment variable if it exists or panics.
pub fn get_variable(name: &str) -> String {
    env::var(name).unwrap_or_else(|_| panic!("must define {} environment variable", name))
}

/// Reads a `0`/`1` flag from the environment, falling back to `default`
/// when the variable is unset. Any other value panics.
pub fn get_flag(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(value) => parse_flag(&value)
            .unwrap_or_else(|| panic!("{} must be 0 or 1, not {:?}", name, value)),
        Err(_) => default,
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim() {
        "1" => Some(true),
        "0" => Some(false),
        _ => None,
    }
}

/// Runtime switches for the service.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Whether `DELETE /testing/all-data` is mounted.
    pub(crate) enable_testing_routes: bool,

    /// Whether the store starts with the demo videos.
    pub(crate) seed_demo_data: bool,
}

impl Config {
    pub fn new(enable_testing_routes: bool, seed_demo_data: bool) -> Self {
        Self {
            enable_testing_routes,
            seed_demo_data,
        }
    }

    pub fn from_env() -> Self {
        Self::new(
            get_flag("BACKEND_ENABLE_TESTING_ROUTES", true),
            get_flag("BACKEND_SEED_DEMO_DATA", false),
        )
    }

    pub fn enable_testing_routes(&self) -> bool {
        self.enable_testing_routes
    }

    pub fn seed_demo_data(&self) -> bool {
        self.seed_demo_data
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(true, false)
    }
}
