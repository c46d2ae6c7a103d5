//! # Dispatch Constants
//!
//! Defaults shared by configuration, scenario generation and the binary.

/// Environment variables consulted (in order) to detect the runtime environment
pub const ENVIRONMENT_VARIABLES: &[&str] = &["DISPATCH_ENV", "APP_ENV"];

/// Prefix for configuration overrides, e.g. `DISPATCH_COURIERS__COUNT=3`
pub const CONFIG_ENV_PREFIX: &str = "DISPATCH";

/// Separator between nested keys in environment overrides
pub const CONFIG_ENV_SEPARATOR: &str = "__";

/// Base name of the configuration files under the config directory
pub const CONFIG_FILE_STEM: &str = "dispatch";

pub const DEFAULT_CONFIG_DIRECTORY: &str = "config";

pub mod defaults {
    pub const COURIER_COUNT: usize = 10;
    pub const ORDER_COUNT: u64 = 30;

    pub const DELIVERY_DELAY_MIN_MS: u64 = 1_000;
    pub const DELIVERY_DELAY_MAX_MS: u64 = 3_000;

    pub const ARRIVAL_DELAY_MIN_MS: u64 = 50;
    pub const ARRIVAL_DELAY_MAX_MS: u64 = 200;

    pub const DRAIN_TIMEOUT_MS: u64 = 120_000;
    pub const GRACE_TIMEOUT_MS: u64 = 5_000;

    /// Delivery districts cycled through when generating orders
    pub const DESTINATIONS: &[&str] = &[
        "Santiago Centro",
        "Providencia",
        "Las Condes",
        "Maipu",
        "Nunoa",
        "Recoleta",
        "La Florida",
        "San Miguel",
        "Independencia",
        "Penalolen",
    ];
}

/// Base roster for courier names
pub const COURIER_ROSTER: &[&str] = &[
    "Juan", "Camila", "Pedro", "Javiera", "Matias", "Catalina", "Felipe", "Valentina", "Nicolas",
    "Francisca", "Sebastian", "Antonia", "Diego", "Constanza", "Tomas", "Daniela", "Ignacio",
    "Fernanda", "Joaquin", "Carolina", "Gabriel", "Paula", "Andres", "Natalia", "Rodrigo",
    "Claudia", "Francisco", "Macarena", "Gonzalo", "Andrea", "Pablo", "Isidora", "Vicente",
    "Maria", "Martin", "Cecilia", "Javier", "Veronica", "Mauricio", "Patricia",
];
