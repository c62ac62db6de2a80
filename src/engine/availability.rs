use crate::date::Date;
use crate::model::Accommodation;

use super::{Engine, conflict};

/// Search criteria the console collects alongside the date window.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub municipality: Option<String>,
    pub max_price: Option<f64>,
    pub min_host_rating: Option<f32>,
}

impl Engine {
    /// True iff no active reservation on the accommodation intersects
    /// `[check_in, check_in + nights)`. Linear scan over the active store.
    pub fn is_free(&self, accommodation_code: &str, check_in: Date, nights: u32) -> bool {
        let check_out = check_in.add_nights(nights);
        conflict::find_conflict(self.active.iter(), accommodation_code, check_in, check_out)
            .is_none()
    }

    /// Every accommodation free for the window, in store order. The filters
    /// are accepted but none of the criteria are applied.
    // TODO: decide whether municipality/max_price/min_host_rating should
    // narrow the scan before wiring them in.
    pub fn list_available(
        &self,
        check_in: Date,
        nights: u32,
        _filters: &SearchFilters,
    ) -> Vec<&Accommodation> {
        let check_out = check_in.add_nights(nights);
        self.accommodations
            .iter()
            .filter(|a| {
                conflict::find_conflict(self.active.iter(), &a.code, check_in, check_out)
                    .is_none()
            })
            .collect()
    }
}
