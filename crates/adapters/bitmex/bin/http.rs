// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

use bitmex_rest::{config::BitmexHttpConfig, http::client::BitmexHttpClient};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()))
        .init();

    let config = BitmexHttpConfig::from_env()?;
    tracing::info!(?config, "Loaded configuration");

    let client = BitmexHttpClient::new(&config)?;

    let announcements = client.get_announcements().await?;
    let count = announcements.as_array().map_or(0, Vec::len);
    tracing::info!(count, "Retrieved announcements");

    let instrument = client.get_instrument(None).await?;
    tracing::info!(symbol = client.symbol(), %instrument, "Retrieved instrument");

    let open_orders = client.get_open_orders(None).await?;
    tracing::info!(%open_orders, "Retrieved open orders");

    client.close();
    Ok(())
}
