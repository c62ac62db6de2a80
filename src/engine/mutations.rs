use tracing::info;

use crate::date::Date;
use crate::limits::RESERVATION_CODE_WIDTH;
use crate::model::Reservation;
use crate::observability;

use super::{Engine, EngineError, Session, conflict};

/// Outcome of an archival sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveReport {
    pub archived: usize,
    pub retained: usize,
}

impl Engine {
    /// Book an accommodation for the logged-in guest. Preconditions: a guest
    /// session, at least one night, a known accommodation code, and a free
    /// `[check_in, check_in + nights)` window. Any failure rejects the
    /// request with no state change.
    ///
    /// The amount is `floor(price_per_night × nights)` in integer currency
    /// units and the payment date stays at the sentinel; nothing here reads
    /// the system clock.
    pub fn create_reservation(
        &mut self,
        accommodation_code: &str,
        check_in: Date,
        nights: u32,
        payment_method: &str,
        notes: &str,
    ) -> Result<String, EngineError> {
        let guest_document = self.current_guest()?.document.clone();
        if nights == 0 {
            return Err(EngineError::Validation("a stay must cover at least one night"));
        }
        let price = self
            .accommodations
            .find(|a| a.code == accommodation_code)
            .ok_or_else(|| EngineError::NotFound(accommodation_code.to_string()))?
            .price_per_night;

        let check_out = check_in.add_nights(nights);
        if let Some(existing) =
            conflict::find_conflict(self.active.iter(), accommodation_code, check_in, check_out)
        {
            return Err(EngineError::Conflict(existing.code.clone()));
        }

        let amount = (price * f64::from(nights)).floor() as i64;
        let code = self.next_reservation_code();
        self.active.append(Reservation::new(
            &code,
            accommodation_code,
            &guest_document,
            payment_method,
            check_in,
            nights,
            Date::sentinel(),
            amount,
            notes,
        ));
        if let Some(guest) = self.guests.find_mut(|g| g.document == guest_document) {
            guest.add_reservation_code(&code);
        }
        self.storage.save_active(&self.active);

        metrics::counter!(observability::RESERVATIONS_CREATED_TOTAL).increment(1);
        info!("reservation {code} created on {accommodation_code}");
        Ok(code)
    }

    // Derived from the current active count, so a code can recur once
    // earlier reservations have been cancelled or archived.
    fn next_reservation_code(&self) -> String {
        format!(
            "RES{:0width$}",
            self.active.len() + 1,
            width = RESERVATION_CODE_WIDTH
        )
    }

    /// Cancel an active reservation. Allowed for the guest who owns it
    /// (matched by document) or the host responsible for its accommodation.
    /// Only a guest-initiated cancellation removes the code from the guest's
    /// own list; a host-initiated one leaves that list untouched.
    pub fn cancel_reservation(&mut self, code: &str) -> Result<(), EngineError> {
        let reservation = self
            .active
            .find(|r| r.code == code)
            .cloned()
            .ok_or_else(|| EngineError::NotFound(code.to_string()))?;

        let by_guest = match &self.session {
            Session::Guest(id) => self
                .guests
                .iter()
                .any(|g| g.id == *id && g.document == reservation.guest_document),
            _ => false,
        };
        let by_host = match &self.session {
            Session::Host(id) => self
                .accommodations
                .iter()
                .any(|a| a.code == reservation.accommodation_code && a.host_id == *id),
            _ => false,
        };
        if !by_guest && !by_host {
            return Err(EngineError::Unauthorized(
                "only the owning guest or the responsible host can cancel",
            ));
        }

        let mut archived = reservation;
        archived.deactivate();
        self.storage.append_history(&archived);
        self.active.compact(|r| r.code != code);
        self.storage.save_active(&self.active);

        if by_guest
            && let Some(guest) = self
                .guests
                .find_mut(|g| g.document == archived.guest_document)
        {
            guest.remove_reservation_code(code);
        }

        metrics::counter!(observability::RESERVATIONS_CANCELLED_TOTAL).increment(1);
        info!("reservation {code} cancelled");
        Ok(())
    }

    /// Move every active reservation whose checkout is strictly before
    /// `cutoff` to the history file, keeping the rest in their original
    /// order. Host-only. An empty store is a successful no-op.
    ///
    /// The active file is not rewritten here; the next create/cancel or the
    /// shutdown flush brings it up to date.
    pub fn archive_by_cutoff(&mut self, cutoff: Date) -> Result<ArchiveReport, EngineError> {
        self.current_host()?;

        let to_archive: Vec<Reservation> = self
            .active
            .iter()
            .filter(|r| r.check_out() < cutoff)
            .cloned()
            .collect();
        for mut reservation in to_archive.into_iter() {
            reservation.deactivate();
            self.storage.append_history(&reservation);
        }
        let archived = self.active.compact(|r| r.check_out() >= cutoff);
        let retained = self.active.len();

        metrics::counter!(observability::RESERVATIONS_ARCHIVED_TOTAL).increment(archived as u64);
        info!("archive sweep moved {archived} reservations to history, {retained} retained");
        Ok(ArchiveReport { archived, retained })
    }
}
