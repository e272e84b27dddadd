use vcsn::{Vcsn, VcsnError, Year};

fn main() -> Result<(), VcsnError> {
    let mut client = Vcsn::new()?;
    client.select_station(31001_i64)?;

    if let Some(span) = client.available_span("tmax")? {
        println!("Station 31001 holds tmax for {}", span);
    }

    let code = client.measurement_code("tmax").unwrap_or(4);
    if let Some(tmax) = client
        .fetch_data()
        .measurement(code)
        .start(Year(2019))
        .end(Year(2019))
        .call()?
    {
        println!("{} daily values of {}", tmax.len(), tmax.value_column());
        println!("{}", tmax.frame.head(Some(10)));
    }

    Ok(())
}
