//! Basic example demonstrating the CRM plugin SDK.
//!
//! Run with:
//! ```
//! CRM_APP_KEY=your-key CRM_API_URL=https://crm.example.com/api/v1.0 cargo run --example basic
//! ```

use crm_plugin_sdk::{
    Client, ClientListQuery, ClientType, CrmClient, Endpoint, Get, Insert, List, Operation,
    Surcharge, Update,
};

#[tokio::main]
async fn main() -> crm_plugin_sdk::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    // Create client from environment variables
    println!("Creating CRM client...");
    let api = CrmClient::from_env()?;
    println!("Connected to: {}", api.base_url());

    // List leads
    println!("\n--- Listing Leads ---");
    let query = ClientListQuery {
        is_lead: Some(true),
        limit: Some(10),
        ..Default::default()
    };
    let leads = Client::list(&api, &query).await?;
    println!("Found {} leads", leads.count());

    for lead in &leads {
        println!("  - {} (#{})", lead.display_name()?, lead.id().unwrap_or_default());
    }

    // Create a new client
    println!("\n--- Creating Client ---");
    let mut customer = Client::transient();
    customer
        .set_client_type(ClientType::Residential)?
        .set_first_name("Jane")?
        .set_last_name("Doe")?
        .set_city("San Jose")?;

    let report = customer.validate(Operation::Create)?;
    if !report.ignored.is_empty() {
        println!("Fields the host will ignore: {:?}", report.ignored);
    }

    customer.insert(&api).await?;
    println!("Created client #{} ({})", customer.id().unwrap_or_default(), customer.lifecycle());

    // Change one field; only that field is sent
    println!("\n--- Updating Client ---");
    customer.set_note("Created by the basic demo")?;
    println!("Dirty fields: {:?}", customer.dirty_fields());
    customer.update(&api).await?;
    println!("Now {}", customer.lifecycle());

    // Read it back
    let fresh = Client::get_by_id(&api, customer.id().unwrap_or_default()).await?;
    println!("Note on host: {:?}", fresh.note()?);

    // Surcharges under 10
    println!("\n--- Cheap Surcharges ---");
    let surcharges = Surcharge::list_all(&api).await?;
    let cheap = surcharges.filter(|s| s.price().ok().flatten().is_some_and(|p| p < 10.0));
    for surcharge in &cheap {
        println!(
            "  - {}: {:.2}",
            surcharge.name()?.unwrap_or("?"),
            surcharge.price()?.unwrap_or_default()
        );
    }

    Ok(())
}
