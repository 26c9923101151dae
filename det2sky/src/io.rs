use crate::{
    AspectErrors,
    events::{Column, EventTable},
    result::TransformResult,
};
use attitude::prelude::{AttitudeConfig, AttitudeSample, AttitudeSource};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::{
    io::{Read, Write},
    path::Path,
};

/// Columns written by the transform. Existing columns with these names are replaced.
pub const SKY_COLUMNS: [&str; 4] = ["X", "Y", "Q", "U"];
pub const SPACECRAFT_COLUMNS: [&str; 2] = ["SCX", "SCY"];

/// A header row plus raw records, kept as text so columns pass through untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn read<R: Read>(reader: R) -> Result<Self, AspectErrors> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = reader.headers()?.iter().map(String::from).collect();
        let rows = reader
            .records()
            .map(|record| Ok(record?.iter().map(String::from).collect()))
            .collect::<Result<Vec<Vec<String>>, AspectErrors>>()?;
        Ok(Self { headers, rows })
    }

    pub fn from_path(path: &Path) -> Result<Self, AspectErrors> {
        Self::read(std::fs::File::open(path)?)
    }

    /// Parses the required event columns. Absent columns are left out and reported when
    /// the records are built.
    pub fn event_table(&self) -> Result<EventTable, AspectErrors> {
        let mut table = EventTable::new();
        for name in EventTable::REQUIRED {
            let Some(index) = self.headers.iter().position(|h| h == name) else {
                continue;
            };
            let column = if EventTable::is_flag_column(name) {
                Column::Flags(self.parse_column(name, index)?)
            } else {
                Column::Float(self.parse_column(name, index)?)
            };
            table.insert(name, column);
        }
        Ok(table)
    }

    fn parse_column<T: std::str::FromStr>(
        &self,
        name: &str,
        index: usize,
    ) -> Result<Vec<T>, AspectErrors> {
        self.rows
            .iter()
            .enumerate()
            .map(|(row, record)| {
                let value = record.get(index).map(String::as_str).unwrap_or_default();
                value.parse().map_err(|_| AspectErrors::ParseValue {
                    column: name.to_string(),
                    row,
                    value: value.to_string(),
                })
            })
            .collect()
    }

    /// Writes the table with the transform output appended: the pass-through columns,
    /// then X, Y, then SCX, SCY when spacecraft output was requested, then Q, U.
    pub fn write_with_result<W: Write>(
        &self,
        writer: W,
        result: &TransformResult,
    ) -> Result<(), AspectErrors> {
        let spacecraft = match (result.scx(), result.scy()) {
            (Some(scx), Some(scy)) => Some((scx, scy)),
            _ => None,
        };
        let replaced = |h: &str| {
            SKY_COLUMNS.contains(&h) || (spacecraft.is_some() && SPACECRAFT_COLUMNS.contains(&h))
        };
        let kept: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !replaced(h))
            .map(|(i, _)| i)
            .collect();

        let mut headers: Vec<&str> = kept.iter().map(|&i| self.headers[i].as_str()).collect();
        headers.extend(["X", "Y"]);
        if spacecraft.is_some() {
            headers.extend(SPACECRAFT_COLUMNS);
        }
        headers.extend(["Q", "U"]);

        let (x, y, q, u) = (result.x(), result.y(), result.q(), result.u());
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(&headers)?;
        for (row, record) in self.rows.iter().enumerate() {
            let mut out: Vec<String> = kept
                .iter()
                .map(|&i| record.get(i).cloned().unwrap_or_default())
                .collect();
            out.push(x[row].to_string());
            out.push(y[row].to_string());
            if let Some((scx, scy)) = &spacecraft {
                out.push(scx[row].to_string());
                out.push(scy[row].to_string());
            }
            out.push(q[row].to_string());
            out.push(u[row].to_string());
            writer.write_record(&out)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Writes `table` plus the transform output to `path`, creating parent directories.
///
/// # Errors
///
/// `AspectErrors::OutputExists` if the file exists and `clobber` is false.
pub fn write_output(
    path: &Path,
    clobber: bool,
    table: &CsvTable,
    result: &TransformResult,
) -> Result<(), AspectErrors> {
    if path.exists() && !clobber {
        return Err(AspectErrors::OutputExists(path.to_path_buf()));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = std::io::BufWriter::new(std::fs::File::create(path)?);
    table.write_with_result(file, result)
}

/// An attitude file: creation date, pointing target and the sample table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttitudeFile {
    #[serde(alias = "DATE")]
    pub date: NaiveDateTime,
    /// degrees
    #[serde(alias = "RA_OBJ")]
    pub ra_obj: f64,
    /// degrees
    #[serde(alias = "DEC_OBJ")]
    pub dec_obj: f64,
    pub samples: Vec<AttitudeSample>,
}

impl AttitudeFile {
    pub fn from_ron_str(s: &str) -> Result<Self, AspectErrors> {
        Ok(ron::from_str(s)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, AspectErrors> {
        Self::from_ron_str(&std::fs::read_to_string(path)?)
    }

    pub fn into_source(self, name: impl Into<String>, config: &AttitudeConfig) -> AttitudeSource {
        AttitudeSource::new(name, self.date, (self.ra_obj, self.dec_obj), self.samples, config)
    }
}
