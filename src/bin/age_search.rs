//! Runs a single age-match search and prints the JSON response.
//!
//! Usage: `age_search <age> [both|actors|actresses] [limit]`

use filmage_api::config::Config;
use filmage_api::handlers::SearchParams;
use filmage_api::models::SearchResponse;
use filmage_api::search::AgeMatchSearch;
use filmage_api::tmdb_client::TmdbClient;
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let params = SearchParams {
        age: args.next(),
        gender: args.next(),
        limit: args.next(),
    };

    let config = Config::from_env()?;
    let request = params
        .validate(config.search.result_limit)
        .map_err(|e| anyhow::anyhow!("{}\nUsage: age_search <age> [both|actors|actresses] [limit]", e))?;

    let client = TmdbClient::new(
        config.tmdb_base_url.clone(),
        config.tmdb_api_key.clone(),
        config.tmdb_timeout,
    )?;
    let search = AgeMatchSearch::new(client, config.search.clone());

    let matches = search
        .search(request.age, request.gender, request.limit)
        .await;
    let response = SearchResponse::new(&matches, request.age, request.gender);

    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
