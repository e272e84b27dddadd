use vcsn::{LatLon, Vcsn, VcsnConfig, VcsnError};

// Run from a directory holding VCSN_SitesExample.csv and
// VCSNRequiredmeasurements_all.csv, with VCSN_USER / VCSN_PASSWORD set.
fn main() -> Result<(), VcsnError> {
    let config = VcsnConfig::builder().reference_dir(".").build();
    let mut client = Vcsn::with_config(config)?;

    if let (Ok(user), Ok(password)) = (std::env::var("VCSN_USER"), std::env::var("VCSN_PASSWORD")) {
        client.set_credentials(user, password);
    }

    let wellington = LatLon(-41.2865, 174.7762);
    let station = client.select_station(wellington)?;
    println!("Nearest station to {} is {}", wellington, station);

    match client
        .fetch_data()
        .measurement("rain")
        .start("2020-01-01")
        .end("2020-02-01")
        .call()?
    {
        Some(rain) => {
            println!("{}", rain.frame);
            if let Ok(records) = rain.records() {
                let total: f64 = records.iter().filter_map(|r| r.value).sum();
                println!("Total rain: {:.1} mm", total);
            }
        }
        None => println!("No data returned"),
    }

    Ok(())
}
