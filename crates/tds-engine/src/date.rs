//! Legacy date record.

/// Size in bytes of the engine's native legacy datetime value.
///
/// Legacy datetime cells are first converted into this form, then cracked
/// into a [`DateRecord`].
pub const LEGACY_DATETIME_SIZE: usize = 8;

/// A legacy datetime value decomposed by the engine's date-crack routine.
///
/// The month is zero-based (January is `0`), as the engine reports it.
/// Every other calendar field is one-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRecord {
    /// Calendar year.
    pub year: i32,
    /// Month, zero-based.
    pub month: i32,
    /// Day of month, one-based.
    pub day: i32,
    /// Day of year, one-based.
    pub day_of_year: i32,
    /// Day of week, zero-based from Sunday.
    pub weekday: i32,
    /// Hour (0-23).
    pub hour: i32,
    /// Minute (0-59).
    pub minute: i32,
    /// Second (0-59).
    pub second: i32,
    /// Millisecond (0-999).
    pub millisecond: i32,
}

impl DateRecord {
    /// Calendar month, one-based.
    ///
    /// `None` if the engine reported a month that cannot be shifted.
    #[must_use]
    pub const fn calendar_month(&self) -> Option<i32> {
        self.month.checked_add(1)
    }
}
