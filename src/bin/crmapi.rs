//! CRM API CLI binary.
//!
//! A command-line interface for inspecting a CRM host through the plugin API.

use clap::Parser;
use crm_plugin_sdk::cli::{Cli, Command, Entity};
use crm_plugin_sdk::output::PrettyPrint;
use crm_plugin_sdk::{
    current_user, Client, ClientListQuery, Collection, CrmClient, CurrentUser, Delete, Endpoint,
    Get, List, PaymentPlan, PaymentPlanListQuery, Surcharge, SurchargeListQuery,
};
use std::process::ExitCode;
use tabled::{Table, Tabled};
use tracing::Level;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let client = match CrmClient::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set CRM_APP_KEY (and CRM_API_URL) environment variables");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(client: &CrmClient, cli: Cli) -> crm_plugin_sdk::Result<()> {
    match cli.command {
        Command::Get { entity, id } => handle_get(client, entity, id, cli.json).await,
        Command::List {
            entity,
            limit,
            offset,
        } => handle_list(client, entity, limit, offset, cli.json).await,
        Command::Delete { entity, id } => handle_delete(client, entity, id).await,
        Command::Cancel { id } => handle_cancel(client, id, cli.json).await,
        Command::Whoami { session } => handle_whoami(client, &session, cli.json).await,
    }
}

async fn handle_get(
    client: &CrmClient,
    entity: Entity,
    id: i64,
    json: bool,
) -> crm_plugin_sdk::Result<()> {
    match entity {
        Entity::Client => output_single(&Client::get_by_id(client, id).await?, json),
        Entity::Surcharge => output_single(&Surcharge::get_by_id(client, id).await?, json),
        Entity::PaymentPlan => output_single(&PaymentPlan::get_by_id(client, id).await?, json),
    }
}

async fn handle_list(
    client: &CrmClient,
    entity: Entity,
    limit: Option<u32>,
    offset: Option<u32>,
    json: bool,
) -> crm_plugin_sdk::Result<()> {
    match entity {
        Entity::Client => {
            let query = ClientListQuery {
                limit,
                offset,
                ..Default::default()
            };
            let clients = Client::list(client, &query).await?;
            output_collection(&clients, json, |c| ClientRow::from(c))
        }
        Entity::Surcharge => {
            let query = SurchargeListQuery { limit, offset };
            let surcharges = Surcharge::list(client, &query).await?;
            output_collection(&surcharges, json, |s| SurchargeRow::from(s))
        }
        Entity::PaymentPlan => {
            let query = PaymentPlanListQuery {
                limit,
                offset,
                ..Default::default()
            };
            let plans = PaymentPlan::list(client, &query).await?;
            output_collection(&plans, json, |p| PaymentPlanRow::from(p))
        }
    }
}

async fn handle_delete(
    client: &CrmClient,
    entity: Entity,
    id: i64,
) -> crm_plugin_sdk::Result<()> {
    match entity {
        Entity::Client => Client::get_by_id(client, id).await?.delete(client).await?,
        Entity::Surcharge => Surcharge::get_by_id(client, id).await?.delete(client).await?,
        Entity::PaymentPlan => {
            eprintln!("Error: Payment plans cannot be deleted");
            eprintln!("Hint: Use 'crmapi cancel <id>' instead");
            return Err(crm_plugin_sdk::CrmError::InvalidArgument {
                field: "entity".to_string(),
                reason: "payment plans support cancel, not delete".to_string(),
            });
        }
    }
    println!("Deleted {entity:?} #{id}");
    Ok(())
}

async fn handle_cancel(client: &CrmClient, id: i64, json: bool) -> crm_plugin_sdk::Result<()> {
    let mut plan = PaymentPlan::get_by_id(client, id).await?;
    plan.cancel(client).await?;
    output_single(&plan, json)
}

async fn handle_whoami(
    client: &CrmClient,
    session: &str,
    json: bool,
) -> crm_plugin_sdk::Result<()> {
    match current_user(client, session).await? {
        Some(user) if json => println!("{}", serde_json::to_string_pretty(&user)?),
        Some(user) => println!("{}", Table::new([UserRow::from(&user)])),
        None => {
            eprintln!("No user is logged in with this session");
        }
    }
    Ok(())
}

fn output_single<T: Endpoint + PrettyPrint>(item: &T, json: bool) -> crm_plugin_sdk::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&item.to_json()?)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_collection<T, R, F>(
    items: &Collection<T>,
    json: bool,
    to_row: F,
) -> crm_plugin_sdk::Result<()>
where
    T: Endpoint,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        let values = items
            .iter()
            .map(|item| item.to_json())
            .collect::<crm_plugin_sdk::Result<Vec<_>>>()?;
        println!("{}", serde_json::to_string_pretty(&values)?);
    } else {
        let rows: Vec<R> = items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
        println!("\n{} item(s)", items.count());
    }
    Ok(())
}

// Table row types for non-JSON output

fn id_cell(id: Option<i64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_default()
}

#[derive(Tabled)]
struct ClientRow {
    id: String,
    name: String,
    lead: String,
    balance: String,
}

impl From<&Client> for ClientRow {
    fn from(c: &Client) -> Self {
        Self {
            id: id_cell(c.id()),
            name: c.display_name().unwrap_or_default(),
            lead: match c.is_lead() {
                Ok(Some(true)) => "yes".to_string(),
                _ => "no".to_string(),
            },
            balance: c
                .account_balance()
                .ok()
                .flatten()
                .map(|b| format!("{b:.2}"))
                .unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct SurchargeRow {
    id: String,
    name: String,
    price: String,
    taxable: String,
}

impl From<&Surcharge> for SurchargeRow {
    fn from(s: &Surcharge) -> Self {
        Self {
            id: id_cell(s.id()),
            name: s.name().ok().flatten().unwrap_or_default().to_string(),
            price: s
                .price()
                .ok()
                .flatten()
                .map(|p| format!("{p:.2}"))
                .unwrap_or_default(),
            taxable: match s.taxable() {
                Ok(Some(true)) => "yes".to_string(),
                _ => "no".to_string(),
            },
        }
    }
}

#[derive(Tabled)]
struct PaymentPlanRow {
    id: String,
    client: String,
    provider: String,
    amount: String,
    status: String,
}

impl From<&PaymentPlan> for PaymentPlanRow {
    fn from(p: &PaymentPlan) -> Self {
        Self {
            id: id_cell(p.id()),
            client: id_cell(p.client_id().ok().flatten()),
            provider: p.provider().ok().flatten().unwrap_or_default().to_string(),
            amount: p
                .amount()
                .ok()
                .flatten()
                .map(|a| format!("{a:.2}"))
                .unwrap_or_default(),
            status: p.status().ok().flatten().unwrap_or_default().to_string(),
        }
    }
}

#[derive(Tabled)]
struct UserRow {
    id: i64,
    username: String,
    #[tabled(rename = "type")]
    kind: String,
    group: String,
}

impl From<&CurrentUser> for UserRow {
    fn from(u: &CurrentUser) -> Self {
        Self {
            id: u.user_id,
            username: u.username.clone(),
            kind: if u.is_client {
                format!("client #{}", u.client_id.unwrap_or_default())
            } else {
                "staff".to_string()
            },
            group: u.user_group.clone().unwrap_or_default(),
        }
    }
}
