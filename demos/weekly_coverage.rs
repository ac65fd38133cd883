// demos/weekly_coverage.rs
use buoydata::{Buoy, BuoyError, Cadence};

#[tokio::main]
async fn main() -> Result<(), BuoyError> {
    env_logger::init();

    let client = Buoy::new()?;
    let data = client
        .fetch_data()
        .stations(&["44013", "44005", "tplm2"])
        .years(&[2018, 2019, 2020])
        .cadence(Cadence::Weekly)
        .call()
        .await?;

    // Stations with no usable year are left out
    println!(
        "Fetched {:?} over {} weeks",
        data.station_ids(),
        data.time().len()
    );

    let data = client.compute_coverage(data, "WTMP")?;
    for station_id in data.station_ids() {
        if let Some(coverage) = data.coverage(station_id, "WTMP") {
            println!("{}: {:.1}% of weeks have water temperature", station_id, coverage);
        }
    }

    let df = data.to_frame()?;
    println!("{}", df.tail(Some(5)));
    Ok(())
}
