pub mod driver;
pub mod ephemeris;
pub mod flux;
pub mod forces;
pub mod heat;
pub mod params;
pub mod result;

/// Stefan–Boltzmann constant [W/(m² K⁴)].
pub const SIGMA_SB: f64 = 5.670_374_419e-8;

/// Solar constant at 1 au [W/m²].
pub const SOLAR_CONSTANT: f64 = 1361.0;

/// Astronomical unit [m].
pub const AU: f64 = 1.495_978_707e11;

/// Speed of light [m/s].
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;
