/// Price of one ticket in cents. Always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketPrice(i32);

impl TicketPrice {
    /// Applied when a fundraiser is created without a price and when backfilling legacy rows.
    pub const DEFAULT_CENTS: i32 = 1000;

    pub fn parse(cents: i64) -> Result<TicketPrice, String> {
        match i32::try_from(cents) {
            Ok(cents) if cents > 0 => Ok(Self(cents)),
            _ => Err(format!("{} is not a valid ticket price in cents.", cents)),
        }
    }

    pub fn cents(&self) -> i32 {
        self.0
    }
}

impl Default for TicketPrice {
    fn default() -> Self {
        Self(Self::DEFAULT_CENTS)
    }
}
