//! Reference catalogs and the id bands that keep their ids apart

use rust_decimal::Decimal;
use serde::Serialize;
use tandem_types::{CatalogKind, Error, Result};

/// A named work or material with its default unit and price
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub id: i64,
    pub kind: CatalogKind,
    pub name: String,
    pub unit: String,
    pub default_price: Decimal,
}

/// Entry to be added; the id is allocated by the store
#[derive(Debug, Clone, PartialEq)]
pub struct NewCatalogEntry {
    pub name: String,
    pub unit: String,
    pub default_price: Decimal,
}

/// Reserved, inclusive id range for one kind of record.
///
/// Bands are an application-level convention only; the database does not
/// enforce them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdBand {
    pub name: &'static str,
    pub floor: i64,
    pub ceiling: i64,
}

impl IdBand {
    pub const LINE_ITEMS: IdBand = IdBand {
        name: "line item",
        floor: 10_000,
        ceiling: 19_999,
    };

    pub const MATERIALS: IdBand = IdBand {
        name: "material catalog",
        floor: 20_000,
        ceiling: 29_999,
    };

    pub const WORKS: IdBand = IdBand {
        name: "work catalog",
        floor: 30_000,
        ceiling: 39_999,
    };

    pub fn for_catalog(kind: CatalogKind) -> IdBand {
        match kind {
            CatalogKind::Works => IdBand::WORKS,
            CatalogKind::Materials => IdBand::MATERIALS,
        }
    }

    pub fn contains(&self, id: i64) -> bool {
        (self.floor..=self.ceiling).contains(&id)
    }

    /// Next id after the highest one ever handed out in this band.
    ///
    /// `high_water` below the floor (or absent) starts the band at its floor.
    pub fn next_after(&self, high_water: Option<i64>) -> Result<i64> {
        let next = match high_water {
            Some(id) if id >= self.floor => id + 1,
            _ => self.floor,
        };
        if next > self.ceiling {
            return Err(Error::IdBandExhausted { band: self.name });
        }
        Ok(next)
    }
}
