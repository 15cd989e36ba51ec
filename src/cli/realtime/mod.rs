//! Realtime command - current snapshots printed to stdout as JSON

use std::sync::Arc;

use crate::api::types::RealtimeResponse;
use crate::domain::CityRegistry;
use crate::infrastructure::services::RealtimeService;

pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let provider = crate::create_weather_provider(&config)?;
    let cities = Arc::new(CityRegistry::new(config.cities.clone()));
    let service = RealtimeService::new(cities, provider);

    let response = RealtimeResponse {
        cities: service.realtime().await,
    };

    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
