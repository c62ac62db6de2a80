use tracing::warn;

use crate::date::Date;
use crate::limits::MAX_NOTES_CHARS;

/// A rentable listing. Loaded once at startup and never written back, so
/// in-memory edits do not survive a restart.
#[derive(Debug, Clone, PartialEq)]
pub struct Accommodation {
    pub code: String,
    pub name: String,
    pub address: String,
    pub department: String,
    pub municipality: String,
    pub kind: String,
    pub amenities: String,
    pub price_per_night: f64,
    pub host_id: String,
}

impl Accommodation {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        code: &str,
        name: &str,
        address: &str,
        department: &str,
        municipality: &str,
        kind: &str,
        amenities: &str,
        price_per_night: f64,
        host_id: &str,
    ) -> Self {
        let price_per_night = if price_per_night < 0.0 {
            warn!("negative price {price_per_night} on accommodation {code}, using 0");
            0.0
        } else {
            price_per_night
        };
        Self {
            code: code.into(),
            name: name.into(),
            address: address.into(),
            department: department.into(),
            municipality: municipality.into(),
            kind: kind.into(),
            amenities: amenities.into(),
            price_per_night,
            host_id: host_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Host {
    pub id: String,
    pub name: String,
    pub document: String,
    pub credential: String,
    pub tenure_months: u32,
    pub rating: f32,
    /// Grows only by append. Rebuilt from the accommodations dataset at load;
    /// the hosts dataset carries no code list.
    pub accommodation_codes: Vec<String>,
}

impl Host {
    pub fn new(
        id: &str,
        name: &str,
        document: &str,
        credential: &str,
        tenure_months: u32,
        rating: f32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            document: document.into(),
            credential: credential.into(),
            tenure_months,
            rating,
            accommodation_codes: Vec::new(),
        }
    }

    pub fn add_accommodation_code(&mut self, code: &str) {
        self.accommodation_codes.push(code.into());
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Guest {
    pub id: String,
    pub name: String,
    pub document: String,
    pub credential: String,
    pub tenure_months: u32,
    pub rating: f32,
    pub reservation_codes: Vec<String>,
}

impl Guest {
    pub fn new(
        id: &str,
        name: &str,
        document: &str,
        credential: &str,
        tenure_months: u32,
        rating: f32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            document: document.into(),
            credential: credential.into(),
            tenure_months,
            rating,
            reservation_codes: Vec::new(),
        }
    }

    pub fn add_reservation_code(&mut self, code: &str) {
        self.reservation_codes.push(code.into());
    }

    /// Drop the first matching code, if any.
    pub fn remove_reservation_code(&mut self, code: &str) {
        if let Some(pos) = self.reservation_codes.iter().position(|c| c == code) {
            self.reservation_codes.remove(pos);
        }
    }
}

/// One stay on one accommodation over the half-open interval
/// `[check_in, check_out)`. `active` flips to false exactly once, on
/// cancellation or archival; deactivated reservations live only in the
/// history file.
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub code: String,
    pub accommodation_code: String,
    pub guest_document: String,
    pub payment_method: String,
    pub check_in: Date,
    pub nights: u32,
    pub payment_date: Date,
    pub amount_paid: i64,
    pub notes: String,
    pub active: bool,
}

impl Reservation {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        code: &str,
        accommodation_code: &str,
        guest_document: &str,
        payment_method: &str,
        check_in: Date,
        nights: u32,
        payment_date: Date,
        amount_paid: i64,
        notes: &str,
    ) -> Self {
        Self {
            code: code.into(),
            accommodation_code: accommodation_code.into(),
            guest_document: guest_document.into(),
            payment_method: payment_method.into(),
            check_in,
            nights,
            payment_date,
            amount_paid,
            notes: truncate_notes(notes),
            active: true,
        }
    }

    /// Checkout day; the night before it is the last one covered.
    pub fn check_out(&self) -> Date {
        self.check_in.add_nights(self.nights)
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn set_notes(&mut self, notes: &str) {
        self.notes = truncate_notes(notes);
    }
}

fn truncate_notes(notes: &str) -> String {
    notes.chars().take(MAX_NOTES_CHARS).collect()
}
