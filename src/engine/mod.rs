mod availability;
mod conflict;
mod error;
mod mutations;
mod queries;
mod session;
mod store;

pub use availability::SearchFilters;
pub use conflict::overlaps;
pub use error::EngineError;
pub use mutations::ArchiveReport;
pub use session::Session;
pub use store::Store;

use tracing::info;

use crate::model::{Accommodation, Guest, Host, Reservation};
use crate::storage::{LoadedData, Storage};

/// The reservation management engine. Owns the four entity stores, the
/// current session, and the persistence gateway; single-threaded, every
/// operation runs to completion.
pub struct Engine {
    accommodations: Store<Accommodation>,
    hosts: Store<Host>,
    guests: Store<Guest>,
    /// Active reservations only; anything deactivated is removed here and
    /// appended to the history file.
    active: Store<Reservation>,
    session: Session,
    storage: Storage,
}

impl Engine {
    /// Load all datasets and link the derived code lists. Unreadable files
    /// come back as empty datasets, so this never fails.
    pub fn open(storage: Storage) -> Self {
        let LoadedData {
            accommodations,
            hosts,
            guests,
            reservations,
        } = storage.load_all();
        let mut engine = Self {
            accommodations,
            hosts,
            guests,
            active: reservations,
            session: Session::None,
            storage,
        };
        engine.link_records();
        info!(
            accommodations = engine.accommodations.len(),
            hosts = engine.hosts.len(),
            guests = engine.guests.len(),
            active_reservations = engine.active.len(),
            "datasets loaded"
        );
        engine
    }

    /// Rebuild the derived code lists: hosts learn their accommodations and
    /// guests their active reservations. Neither list is carried by its
    /// dataset on disk.
    fn link_records(&mut self) {
        for accommodation in self.accommodations.iter() {
            if let Some(host) = self.hosts.find_mut(|h| h.id == accommodation.host_id) {
                host.add_accommodation_code(&accommodation.code);
            }
        }
        for reservation in self.active.iter() {
            if let Some(guest) = self
                .guests
                .find_mut(|g| g.document == reservation.guest_document)
            {
                guest.add_reservation_code(&reservation.code);
            }
        }
    }

    /// Rewrite the active-reservations file. Called by the owner at shutdown;
    /// mutating operations save on their own.
    pub fn flush(&self) {
        self.storage.save_active(&self.active);
    }
}
