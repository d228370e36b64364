//! Smoke tests against a live OData service.
//!
//! These tests need network access and are ignored by default. To run them,
//! create a `.env` file in the odata-client directory with:
//!
//! ```env
//! ODATA_SERVICE_URL=https://services.odata.org/V4/TripPinServiceRW
//! ```
//!
//! Then run: `cargo test -p odata-client -- --ignored`

use std::env;
use std::time::Duration;

use futures::StreamExt;
use serde::Deserialize;

use odata_client::query::{ExpandPath, Expr, OrderBy};
use odata_client::service::ServiceContext;

#[derive(Debug, Deserialize)]
struct Person {
    #[serde(rename = "UserName")]
    user_name: String,
    #[serde(rename = "FirstName")]
    first_name: String,
}

fn load_env() -> Option<String> {
    let _ = dotenvy::dotenv();
    env::var("ODATA_SERVICE_URL").ok()
}

fn context() -> ServiceContext {
    let url = load_env().expect("Missing ODATA_SERVICE_URL. See module docs.");
    ServiceContext::builder()
        .url(url)
        .timeout(Duration::from_secs(30))
        .build()
        .expect("Failed to build service context")
}

#[tokio::test]
#[ignore = "requires ODATA_SERVICE_URL in .env file"]
async fn test_filtered_query() {
    let context = context();

    let mut query = context.query::<Person>("People");
    query
        .filter(Expr::new("FirstName").eq("'Scott'"))
        .select("UserName,FirstName")
        .orderby(OrderBy::asc("UserName"));

    let page = query.execute_query().await.expect("Query failed");

    println!("Fetched {} people", page.len());
    assert!(page.items().iter().all(|p| p.first_name == "Scott"));
}

#[tokio::test]
#[ignore = "requires ODATA_SERVICE_URL in .env file"]
async fn test_key_with_nested_expand() {
    let context = context();

    let mut query = context.query::<Person>("People");
    query
        .key("'russellwhyte'")
        .expand(ExpandPath::new("Trips").top(1));

    let page = query.execute_query().await.expect("Query failed");

    assert_eq!(page.len(), 1);
    assert_eq!(page.items()[0].user_name, "russellwhyte");
}

#[tokio::test]
#[ignore = "requires ODATA_SERVICE_URL in .env file"]
async fn test_first_pages() {
    let context = context();

    let mut query = context.query::<Person>("People");
    query.top(4);

    let pages: Vec<_> = query.pages().take(3).collect().await;

    for page in &pages {
        let page = page.as_ref().expect("Page failed");
        println!("Page with {} people", page.len());
    }
    assert!(!pages.is_empty());
}
