use wallhaven::client::Client;

#[test]
fn impl_std_error_trait() -> Result<(), Box<dyn std::error::Error>> {
    Client::new()?;

    Ok(())
}
