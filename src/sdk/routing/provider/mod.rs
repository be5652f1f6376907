pub mod local;
pub mod remote;
pub mod types;

pub use local::LocalOrsProvider;
pub use remote::RemoteOrsProvider;

use reqwest::blocking::Client;
use serde_json::json;
use std::time::Duration;

use super::error::RoutingError;
use super::route::{parse_directions, RouteSummary};
use super::service::RoutingProvider;
use crate::sdk::config::{OrsConfig, Settings};
use crate::sdk::query::GeoPoint;
use crate::sdk::util::rate_limit::Limiter;

/// Builds the provider selected by `settings`.
pub fn from_settings(settings: &Settings) -> Result<Box<dyn RoutingProvider>, RoutingError> {
    Ok(match &settings.ors {
        OrsConfig::Remote { api_key, base_url } => Box::new(RemoteOrsProvider::new(
            api_key.clone(),
            base_url.clone(),
            settings.profile.clone(),
            settings.timeout,
            Limiter::per_minute(settings.requests_per_minute),
        )?),
        OrsConfig::Local { base_url } => Box::new(LocalOrsProvider::new(
            base_url.clone(),
            settings.profile.clone(),
            settings.timeout,
        )?),
    })
}

fn build_client(timeout: Duration) -> Result<Client, RoutingError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

fn directions_url(base_url: &str, profile: &str) -> String {
    format!("{}/v2/directions/{}/geojson", base_url, profile)
}

/// POSTs one directions request and decodes the GeoJSON route.
fn request_directions(
    client: &Client,
    url: &str,
    api_key: Option<&str>,
    start: GeoPoint,
    end: GeoPoint,
) -> Result<RouteSummary, RoutingError> {
    let body = json!({ "coordinates": [start.lon_lat(), end.lon_lat()] });

    let mut request = client.post(url).json(&body);
    if let Some(key) = api_key {
        request = request.header("Authorization", key);
    }

    let response = request.send().map_err(|e| {
        log::debug!("Directions request to {} failed: {}", url, e);
        RoutingError::from(e)
    })?;
    let status = response.status();
    let text = response.text()?;

    if !status.is_success() {
        return Err(RoutingError::from_response(status, text));
    }

    parse_directions(&text).map_err(|e| {
        log::error!(
            "Failed to parse DirectionsResponse. URL: {}\nError: {}. Body: {}",
            url,
            e,
            text
        );
        e
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serves one canned HTTP response and hands back the raw request it received.
    pub(crate) fn one_shot_server(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut head = String::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if let Some(v) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                    content_length = v.trim().parse().unwrap();
                }
                head.push_str(&line);
                if line == "\r\n" {
                    break;
                }
            }
            let mut payload = vec![0u8; content_length];
            reader.read_exact(&mut payload).unwrap();
            write!(
                stream,
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            )
            .unwrap();
            head + &String::from_utf8(payload).unwrap()
        });
        (base, handle)
    }
}
