use crate::AspectErrors;
use std::collections::BTreeMap;

/// STATUS2 bits that stop an event from being aspect corrected: 0, 3, 4, 5, 6, 7, 8 and 9.
pub const STATUS2_EXCLUSION_MASK: u16 = 0b0000_0011_1111_1001;

pub const ABSX: &str = "ABSX";
pub const ABSY: &str = "ABSY";
pub const TIME: &str = "TIME";
pub const STATUS: &str = "STATUS";
pub const STATUS2: &str = "STATUS2";
pub const DETQ: &str = "DETQ";
pub const DETU: &str = "DETU";

/// A 16 bit status word, bit `i` being flag `i` of the event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StatusFlags(pub u16);

impl StatusFlags {
    pub fn any(&self) -> bool {
        self.0 != 0
    }

    pub fn is_set(&self, bit: u32) -> bool {
        bit < 16 && self.0 & (1 << bit) != 0
    }

    pub fn intersects(&self, mask: u16) -> bool {
        self.0 & mask != 0
    }
}

/// One photon event as read from the event table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventRecord {
    pub time: f64,
    pub abs_x: f64,
    pub abs_y: f64,
    pub status: StatusFlags,
    pub status2: StatusFlags,
    pub detq: f64,
    pub detu: f64,
}

impl EventRecord {
    /// Events with any STATUS flag, or a STATUS2 flag in the exclusion mask, are not
    /// aspect corrected.
    pub fn is_excluded(&self) -> bool {
        self.status.any() || self.status2.intersects(STATUS2_EXCLUSION_MASK)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Float(Vec<f64>),
    Flags(Vec<u16>),
}

impl Column {
    fn len(&self) -> usize {
        match self {
            Column::Float(v) => v.len(),
            Column::Flags(v) => v.len(),
        }
    }
}

/// Named columns of an event table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventTable {
    columns: BTreeMap<String, Column>,
}

impl EventTable {
    pub const REQUIRED: [&'static str; 7] = [ABSX, ABSY, TIME, STATUS, STATUS2, DETQ, DETU];
    const FLAG_COLUMNS: [&'static str; 2] = [STATUS, STATUS2];

    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, column: Column) {
        self.columns.insert(name.into(), column);
    }

    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Self {
        self.insert(name, column);
        self
    }

    /// True for the columns that hold status words rather than numbers.
    pub fn is_flag_column(name: &str) -> bool {
        Self::FLAG_COLUMNS.contains(&name)
    }

    /// Checks the required columns and builds one record per row.
    ///
    /// # Errors
    ///
    /// `MissingColumn` naming the first absent required column, `ColumnKind` when a column
    /// holds the wrong kind of values, `ColumnLength` when the columns disagree on row count.
    pub fn records(&self) -> Result<Vec<EventRecord>, AspectErrors> {
        let abs_x = self.floats(ABSX)?;
        let abs_y = self.floats(ABSY)?;
        let time = self.floats(TIME)?;
        let status = self.flags(STATUS)?;
        let status2 = self.flags(STATUS2)?;
        let detq = self.floats(DETQ)?;
        let detu = self.floats(DETU)?;

        let rows = abs_x.len();
        for name in Self::REQUIRED {
            let found = self.columns[name].len();
            if found != rows {
                return Err(AspectErrors::ColumnLength {
                    name: name.to_string(),
                    expected: rows,
                    found,
                });
            }
        }

        Ok((0..rows)
            .map(|i| EventRecord {
                time: time[i],
                abs_x: abs_x[i],
                abs_y: abs_y[i],
                status: StatusFlags(status[i]),
                status2: StatusFlags(status2[i]),
                detq: detq[i],
                detu: detu[i],
            })
            .collect())
    }

    fn get(&self, name: &str) -> Result<&Column, AspectErrors> {
        self.columns
            .get(name)
            .ok_or_else(|| AspectErrors::MissingColumn(name.to_string()))
    }

    fn floats(&self, name: &str) -> Result<&[f64], AspectErrors> {
        match self.get(name)? {
            Column::Float(v) => Ok(v),
            Column::Flags(_) => Err(AspectErrors::ColumnKind {
                name: name.to_string(),
                expected: "floating point",
            }),
        }
    }

    fn flags(&self, name: &str) -> Result<&[u16], AspectErrors> {
        match self.get(name)? {
            Column::Flags(v) => Ok(v),
            Column::Float(_) => Err(AspectErrors::ColumnKind {
                name: name.to_string(),
                expected: "status flag",
            }),
        }
    }
}
