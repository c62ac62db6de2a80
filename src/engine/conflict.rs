use crate::date::Date;
use crate::model::Reservation;

/// Half-open stay intervals `[a_in, a_out)` and `[b_in, b_out)` overlap
/// unless one ends on or before the other starts. A checkout on the same day
/// as another check-in is not a conflict.
pub fn overlaps(a_in: Date, a_out: Date, b_in: Date, b_out: Date) -> bool {
    a_in < b_out && b_in < a_out
}

/// First active reservation on `accommodation_code` whose stay intersects
/// `[check_in, check_out)`. This is the single conflict predicate behind
/// both the pre-booking check and the availability scan.
pub fn find_conflict<'a, I>(
    active: I,
    accommodation_code: &str,
    check_in: Date,
    check_out: Date,
) -> Option<&'a Reservation>
where
    I: IntoIterator<Item = &'a Reservation>,
{
    active.into_iter().find(|r| {
        r.active
            && r.accommodation_code == accommodation_code
            && overlaps(r.check_in, r.check_out(), check_in, check_out)
    })
}
