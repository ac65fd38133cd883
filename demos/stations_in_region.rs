// demos/stations_in_region.rs
use buoydata::{Buoy, BuoyError, Region};

#[tokio::main]
async fn main() -> Result<(), BuoyError> {
    // Set RUST_LOG=info (or debug) to follow the downloads
    env_logger::init();

    // Gulf of Maine
    let region = Region::builder()
        .lon_min(-71.0)
        .lon_max(-66.0)
        .lat_min(41.0)
        .lat_max(45.0)
        .build();

    let client = Buoy::new()?;
    let stations = client.list_stations().region(region).call().await?;

    println!("{} buoys in the region", stations.len());
    for station in stations.stations() {
        if let Some((first, last)) = station.bounds.years() {
            println!(
                "{:>6}  ({:.3}, {:.3})  {}-{}",
                station.id, station.location.latitude, station.location.longitude, first, last
            );
        }
    }
    Ok(())
}
