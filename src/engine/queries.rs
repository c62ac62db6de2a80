use crate::date::Date;
use crate::model::{Accommodation, Guest, Host, Reservation};

use super::{Engine, EngineError};

impl Engine {
    pub fn accommodation(&self, code: &str) -> Option<&Accommodation> {
        self.accommodations.find(|a| a.code == code)
    }

    pub fn accommodations(&self) -> impl Iterator<Item = &Accommodation> {
        self.accommodations.iter()
    }

    pub fn host(&self, id: &str) -> Option<&Host> {
        self.hosts.find(|h| h.id == id)
    }

    pub fn guest(&self, id: &str) -> Option<&Guest> {
        self.guests.find(|g| g.id == id)
    }

    pub fn active_reservation(&self, code: &str) -> Option<&Reservation> {
        self.active.find(|r| r.code == code)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Active reservations on the logged-in host's accommodations whose
    /// check-in lies in the inclusive `[from, to]` range.
    pub fn reservations_for_host(
        &self,
        from: Date,
        to: Date,
    ) -> Result<Vec<&Reservation>, EngineError> {
        let host = self.current_host()?;
        Ok(self
            .active
            .iter()
            .filter(|r| {
                r.check_in.in_range(from, to)
                    && self
                        .accommodations
                        .iter()
                        .any(|a| a.code == r.accommodation_code && a.host_id == host.id)
            })
            .collect())
    }

    /// Active reservations belonging to the logged-in guest.
    pub fn reservations_for_guest(&self) -> Result<Vec<&Reservation>, EngineError> {
        let guest = self.current_guest()?;
        Ok(self
            .active
            .iter()
            .filter(|r| r.guest_document == guest.document)
            .collect())
    }
}
