//! CLI output formatting tests.
//!
//! - JSON output with --json flag is the host representation
//! - Pretty-print output is the default

use crm_plugin_sdk::output::PrettyPrint;
use crm_plugin_sdk::{Client, Endpoint, PaymentPlan};
use serde_json::json;

fn make_test_client() -> Client {
    Client::from_json(json!({
        "id": 12,
        "clientType": 2,
        "companyName": "Acme Networks",
        "firstName": "Jane",
        "lastName": "Doe",
        "isLead": true,
        "street1": "2580 Orchard Parkway",
        "city": "San Jose",
        "zipCode": "95131",
        "registrationDate": "2023-04-01T00:00:00+0000",
        "accountBalance": -20.0,
        "currencyCode": "USD"
    }))
    .unwrap()
}

// ============================================================================
// JSON Output Tests
// ============================================================================

#[test]
fn test_json_output_includes_id_and_fields() {
    let client = make_test_client();
    let json_output = serde_json::to_string_pretty(&client.to_json().unwrap()).unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&json_output).unwrap();
    assert_eq!(parsed["id"], 12);
    assert_eq!(parsed["companyName"], "Acme Networks");
}

#[test]
fn test_json_output_shows_unsent_changes() {
    let mut client = make_test_client();
    client.set_note("pending").unwrap();

    assert_eq!(client.to_json().unwrap()["note"], "pending");
}

// ============================================================================
// Pretty-Print Tests
// ============================================================================

#[test]
fn test_default_output_is_not_json() {
    let pretty_output = make_test_client().pretty_print();

    let parse_result: Result<serde_json::Value, _> = serde_json::from_str(&pretty_output);
    assert!(
        parse_result.is_err(),
        "Default output should NOT be valid JSON"
    );
}

#[test]
fn test_client_pretty_print_shows_key_fields() {
    let output = make_test_client().pretty_print();

    assert!(output.contains("Client #12: Acme Networks"), "Should show company name");
    assert!(output.contains("Lead:           yes"));
    assert!(output.contains("2580 Orchard Parkway, San Jose, 95131"));
    assert!(output.contains("Balance:        -20.00 USD"));
    assert!(output.contains("Registered:     2023-04-01"));
}

#[test]
fn test_payment_plan_pretty_print() {
    let plan = PaymentPlan::from_json(json!({
        "id": 4,
        "clientId": 12,
        "provider": "paypal",
        "amount": 15.0,
        "period": 3,
        "status": "paused"
    }))
    .unwrap();

    let output = plan.pretty_print();
    assert!(output.starts_with("Payment Plan #4"));
    assert!(output.contains("Provider:       paypal"));
    assert!(output.contains("Amount:         15.00 every 3 month(s)"));
    assert!(output.contains("Status:         paused"));
}
