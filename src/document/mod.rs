mod item;
mod party;

pub use item::{ItemId, LineItem};
pub use party::Party;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::str::FromStr;

use crate::config::Config;

/// Text fields addressable through [`Action::SetText`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    CompanyName,
    CompanyAddress,
    CompanyPhone,
    CompanyEmail,
    ClientName,
    ClientAddress,
    ClientPhone,
    ClientEmail,
    InvoiceNumber,
    Notes,
}

impl FromStr for TextField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "company-name" => Ok(Self::CompanyName),
            "company-address" => Ok(Self::CompanyAddress),
            "company-phone" => Ok(Self::CompanyPhone),
            "company-email" => Ok(Self::CompanyEmail),
            "client-name" => Ok(Self::ClientName),
            "client-address" => Ok(Self::ClientAddress),
            "client-phone" => Ok(Self::ClientPhone),
            "client-email" => Ok(Self::ClientEmail),
            "number" | "invoice-number" => Ok(Self::InvoiceNumber),
            "notes" => Ok(Self::Notes),
            _ => Err(()),
        }
    }
}

/// A single document mutation. Every user edit maps to one action applied
/// through [`InvoiceDocument::apply`]; derived values are consistent again
/// before the next read.
#[derive(Debug, Clone)]
pub enum Action {
    SetText(TextField, String),
    SetInvoiceDate(NaiveDate),
    SetDueDate(NaiveDate),
    /// Numeric pass-through: NaN and negative values are stored as-is and
    /// propagate into totals.
    SetTaxRate(f64),
    AddItem,
    /// Silent no-op if no item carries the id.
    RemoveItem(ItemId),
    SetItemDescription(ItemId, String),
    SetItemQuantity(ItemId, f64),
    SetItemRate(ItemId, f64),
    LoadLogo(Vec<u8>),
}

/// The in-memory invoice being edited. One instance per session, mutated
/// in place, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceDocument {
    pub company: Party,
    /// Company logo as a data-URL string, if one was loaded.
    pub logo: Option<String>,
    pub client: Party,
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    items: Vec<LineItem>,
    pub notes: String,
    pub tax_rate_percent: f64,
    #[serde(skip)]
    next_item_id: u64,
}

impl InvoiceDocument {
    /// Fresh session document seeded from config defaults: placeholder
    /// client, one sample line item, due date offset from today.
    pub fn from_config(config: &Config) -> Self {
        let today = Local::now().date_naive();
        let due_date = today
            .checked_add_signed(chrono::Duration::days(config.invoice.due_days))
            .unwrap_or(today);

        let mut doc = Self {
            company: Party::new(
                &config.company.name,
                &config.company.address,
                &config.company.phone,
                &config.company.email,
            ),
            logo: None,
            client: Party::new(
                "Client Name",
                "456 Client Avenue\nCity, State 67890",
                "(555) 987-6543",
                "client@email.com",
            ),
            invoice_number: config.invoice.number.clone(),
            invoice_date: today,
            due_date,
            items: Vec::new(),
            notes: config.invoice.notes.clone(),
            tax_rate_percent: config.invoice.tax_rate_percent,
            next_item_id: 1,
        };

        let sample = doc.add_item();
        doc.set_item_description(sample, "Web Development Services");
        doc.set_item_rate(sample, 1500.0);
        doc
    }

    pub fn new() -> Self {
        Self::from_config(&Config::default())
    }

    /// Apply a single mutation. Item-targeted actions with an unknown id
    /// leave the collection unchanged.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::SetText(field, value) => self.set_text(field, value),
            Action::SetInvoiceDate(date) => self.invoice_date = date,
            Action::SetDueDate(date) => self.due_date = date,
            Action::SetTaxRate(pct) => self.tax_rate_percent = pct,
            Action::AddItem => {
                self.add_item();
            }
            Action::RemoveItem(id) => self.remove_item(id),
            Action::SetItemDescription(id, text) => self.set_item_description(id, text),
            Action::SetItemQuantity(id, qty) => self.set_item_quantity(id, qty),
            Action::SetItemRate(id, rate) => self.set_item_rate(id, rate),
            Action::LoadLogo(bytes) => self.load_logo(&bytes),
        }
    }

    pub fn set_text(&mut self, field: TextField, value: impl Into<String>) {
        let value = value.into();
        match field {
            TextField::CompanyName => self.company.name = value,
            TextField::CompanyAddress => self.company.address = value,
            TextField::CompanyPhone => self.company.phone = value,
            TextField::CompanyEmail => self.company.email = value,
            TextField::ClientName => self.client.name = value,
            TextField::ClientAddress => self.client.address = value,
            TextField::ClientPhone => self.client.phone = value,
            TextField::ClientEmail => self.client.email = value,
            TextField::InvoiceNumber => self.invoice_number = value,
            TextField::Notes => self.notes = value,
        }
    }

    /// Append a new line item (empty description, qty 1, rate 0) and
    /// return its freshly generated id.
    pub fn add_item(&mut self) -> ItemId {
        let id = ItemId(self.next_item_id);
        self.next_item_id += 1;
        self.items.push(LineItem::new(id));
        id
    }

    /// Remove the item with the given id. No-op if absent; removing the
    /// last item leaves an empty list.
    pub fn remove_item(&mut self, id: ItemId) {
        self.items.retain(|item| item.id != id);
    }

    pub fn set_item_description(&mut self, id: ItemId, description: impl Into<String>) {
        if let Some(item) = self.item_mut(id) {
            item.description = description.into();
        }
    }

    pub fn set_item_quantity(&mut self, id: ItemId, quantity: f64) {
        if let Some(item) = self.item_mut(id) {
            item.quantity = quantity;
            item.recompute_amount();
        }
    }

    pub fn set_item_rate(&mut self, id: ItemId, rate: f64) {
        if let Some(item) = self.item_mut(id) {
            item.rate = rate;
            item.recompute_amount();
        }
    }

    /// Store the raw image bytes as a data-URL string, replacing any
    /// previous logo. No size or format validation.
    pub fn load_logo(&mut self, bytes: &[u8]) {
        let mime = sniff_mime(bytes);
        self.logo = Some(format!("data:{};base64,{}", mime, BASE64.encode(bytes)));
    }

    /// Items in insertion order, which is also display and print order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn has_item(&self, id: ItemId) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    fn item_mut(&mut self, id: ItemId) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    // Derived totals, recomputed on every read.

    pub fn subtotal(&self) -> f64 {
        // the empty sum's identity is -0.0; normalize so an emptied
        // invoice reads $0.00 rather than $-0.00
        self.items.iter().map(|item| item.amount).sum::<f64>() + 0.0
    }

    pub fn tax_amount(&self) -> f64 {
        self.subtotal() * self.tax_rate_percent / 100.0
    }

    pub fn total(&self) -> f64 {
        self.subtotal() + self.tax_amount()
    }
}

impl Default for InvoiceDocument {
    fn default() -> Self {
        Self::new()
    }
}

fn sniff_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if bytes.starts_with(b"GIF8") {
        "image/gif"
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else {
        // unknown bytes are passed through under the most common type
        "image/png"
    }
}
