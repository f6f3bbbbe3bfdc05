/// Derived indicators for stations and zones.
///
/// Submodules:
/// - `pollutants`: CO2 estimate from primary pollutant readings.
/// - `resilience`: composite 0–100 zone resilience score.
/// - `scenario`: what-if projection of congestion, response time, flood risk.

pub mod pollutants;
pub mod resilience;
pub mod scenario;
