// Custom types that are widely used are defined here.
use sqlx::{SqliteConnection, SqlitePool};

pub type Db = SqlitePool;

// A single connection, either checked out of the pool or borrowed from an open transaction.
pub type Conn = SqliteConnection;

// Database ID types.
pub type SeasonId = u32;
pub type DivisionId = u32;
pub type TeamId = u32;
pub type GameId = u32;
pub type BlackoutId = u32;

// Regular season rounds run from 1 to 2(n-1). Playoff rounds use sentinels above that.
pub type Round = u16;
pub type Score = u8;

// Type conversions.
pub mod convert {
    use std::fmt::Display;

    // Convert between integers, saturating at the target's maximum.
    pub fn int_saturating<N1: Display + Copy, N2: TryFrom<N1> + Bounded>(num: N1) -> N2 {
        match num.try_into() {
            Ok(n) => n,
            Err(_) => N2::MAX_VALUE,
        }
    }

    pub trait Bounded {
        const MAX_VALUE: Self;
    }

    impl Bounded for u16 {
        const MAX_VALUE: Self = u16::MAX;
    }

    impl Bounded for u32 {
        const MAX_VALUE: Self = u32::MAX;
    }
}
