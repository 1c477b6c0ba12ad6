//! The `resolve` command: one-shot reverse geocoding.

use guia::address::StandardizedAddress;
use guia::config::ConfigFile;
use guia::geocoder::{GeocodeClient, NominatimClient};

use crate::error::CliError;

/// Resolve one coordinate pair and print the standardized address.
pub async fn resolve(config: ConfigFile, lat: f64, lon: f64) -> Result<(), CliError> {
    let client = NominatimClient::new(config.geocoder.base_url.clone(), config.geocoder.timeout())?;

    println!("Resolving {}, {} ...", lat, lon);
    let payload = client.reverse(lat, lon).await?;
    let address = StandardizedAddress::from_nominatim(&payload);

    if let Some(display_name) = payload.get("display_name").and_then(|v| v.as_str()) {
        println!("  Display name: {}", display_name);
    }
    println!("  Address:      {}", address);
    if let Some(municipality) = &address.municipality {
        println!("  Municipality: {}", municipality);
    }
    if let Some(neighborhood) = &address.neighborhood {
        println!("  Neighborhood: {}", neighborhood);
    }
    if let Some(street) = &address.street {
        println!("  Street:       {}", street);
    }
    if let Some(postal_code) = &address.postal_code {
        println!("  Postal code:  {}", postal_code);
    }

    Ok(())
}
