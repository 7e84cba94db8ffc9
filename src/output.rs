//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use crate::endpoint::Endpoint;
use crate::{Client, PaymentPlan, Surcharge};

/// Trait for human-readable key-value output.
///
/// Implemented by entity types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

fn header(title: String) -> Vec<String> {
    let divider = "─".repeat(title.chars().count().max(30));
    vec![title, divider]
}

fn id_label(id: Option<i64>) -> String {
    id.map(|id| format!("#{id}")).unwrap_or_else(|| "(new)".to_string())
}

impl PrettyPrint for Client {
    fn pretty_print(&self) -> String {
        let name = self.display_name().unwrap_or_default();
        let mut lines = header(format!("Client {}: {}", id_label(self.id()), name));

        if let Ok(Some(ident)) = self.user_ident() {
            lines.push(format!("Custom ID:      {ident}"));
        }

        let lead = self.is_lead().ok().flatten().unwrap_or(false);
        lines.push(format!("Lead:           {}", if lead { "yes" } else { "no" }));

        let address: Vec<&str> = [self.street1(), self.city(), self.zip_code()]
            .into_iter()
            .filter_map(|part| part.ok().flatten())
            .collect();
        if !address.is_empty() {
            lines.push(format!("Address:        {}", address.join(", ")));
        }

        if let Ok(Some(balance)) = self.account_balance() {
            let currency = self.currency_code().ok().flatten().unwrap_or("");
            lines.push(format!("Balance:        {balance:.2} {currency}"));
        }

        if let Ok(Some(date)) = self.registration_date() {
            lines.push(format!("Registered:     {}", date.format("%Y-%m-%d")));
        }

        if let Ok(Some(note)) = self.note() {
            lines.push(format!("Note:           {note}"));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Surcharge {
    fn pretty_print(&self) -> String {
        let name = self.name().ok().flatten().unwrap_or_default().to_string();
        let mut lines = header(format!("Surcharge {}: {}", id_label(self.id()), name));

        if let Ok(Some(price)) = self.price() {
            lines.push(format!("Price:          {price:.2}"));
        }

        if let Ok(Some(label)) = self.invoice_label() {
            lines.push(format!("Invoice Label:  {label}"));
        }

        let taxable = self.taxable().ok().flatten().unwrap_or(false);
        lines.push(format!("Taxable:        {}", if taxable { "yes" } else { "no" }));

        lines.join("\n")
    }
}

impl PrettyPrint for PaymentPlan {
    fn pretty_print(&self) -> String {
        let name = self.name().ok().flatten().unwrap_or("payment plan").to_string();
        let mut lines = header(format!("Payment Plan {}: {}", id_label(self.id()), name));

        if let Ok(Some(client_id)) = self.client_id() {
            lines.push(format!("Client:         #{client_id}"));
        }

        if let Ok(Some(provider)) = self.provider() {
            lines.push(format!("Provider:       {provider}"));
        }

        if let (Ok(Some(amount)), Ok(Some(period))) = (self.amount(), self.period()) {
            lines.push(format!("Amount:         {amount:.2} every {period} month(s)"));
        }

        if let Ok(Some(status)) = self.status() {
            lines.push(format!("Status:         {status}"));
        }

        if let Ok(Some(next)) = self.next_payment_date() {
            lines.push(format!("Next Payment:   {}", next.format("%Y-%m-%d")));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_pretty_print_format() {
        let client = Client::from_json(json!({
            "id": 12,
            "clientType": 1,
            "firstName": "Jane",
            "lastName": "Doe",
            "isLead": false,
            "city": "Prague",
            "accountBalance": 12.5,
            "currencyCode": "EUR"
        }))
        .unwrap();

        let output = client.pretty_print();
        assert!(output.starts_with("Client #12: Jane Doe"));
        assert!(output.contains("Address:        Prague"));
        assert!(output.contains("Balance:        12.50 EUR"));
    }

    #[test]
    fn test_transient_surcharge_has_no_id() {
        let mut surcharge = Surcharge::transient();
        surcharge.set_name("Router").unwrap().set_price(5.0).unwrap();

        let output = surcharge.pretty_print();
        assert!(output.starts_with("Surcharge (new): Router"));
        assert!(output.contains("Price:          5.00"));
    }
}
