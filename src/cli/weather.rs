//! Weather command: current conditions for a city.

use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};
use crate::weather::WeatherClient;

use super::Context;

/// Show current weather. The city comes from the argument, the config
/// file, or the profile location, in that order.
pub async fn show(ctx: &Context, city: Option<&str>) -> Result<()> {
    let api_key = ctx
        .config
        .weather
        .api_key
        .clone()
        .ok_or_else(|| Error::WeatherUnavailable("no API key configured".to_string()))?;

    let city = match city {
        Some(city) => city.to_string(),
        None => match &ctx.config.weather.city {
            Some(city) => city.clone(),
            None => profile_location(ctx).await?,
        },
    };

    let client = WeatherClient::new(api_key, ctx.config.weather.units.clone())?;
    let report = client.current(&city).await?;

    let mut human = HumanOutput::new(format!(
        "{}\u{00b0} {} in {}",
        report.temp, report.description, report.city
    ));
    human.push_summary("units", &ctx.config.weather.units);

    emit_success(ctx.options, "weather", &report, Some(&human))
}

/// Fall back to the logged-in profile's location. Only consulted when
/// neither the argument nor the config names a city, so auth problems
/// surface as "no city" rather than a login demand.
async fn profile_location(ctx: &Context) -> Result<String> {
    let client = match ctx.client() {
        Ok(client) => client,
        Err(_) => {
            return Err(Error::WeatherUnavailable(
                "no city given and not logged in".to_string(),
            ));
        }
    };

    match client.profile().await {
        Ok(user) => user.location.ok_or_else(|| {
            Error::WeatherUnavailable("no city configured and no profile location".to_string())
        }),
        Err(err) => {
            tracing::debug!(error = %err, "profile lookup for weather city failed");
            Err(Error::WeatherUnavailable(
                "no city given and the profile could not be read".to_string(),
            ))
        }
    }
}
