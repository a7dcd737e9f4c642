// schismrs-mld/src/io.rs

use crate::errors::{MldError, ProfileReadError};
use crate::mld::MldResult;
use crate::profile::{Profile, ProfileBuilder};
use csv::{ReaderBuilder, StringRecord, Trim, Writer};
use log::{debug, info};
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// A cast and the identifier it was stored under.
#[derive(Clone, Debug)]
pub struct NamedProfile {
    pub id: String,
    pub profile: Profile,
}

#[derive(Default)]
struct Columns {
    pressure: Vec<f64>,
    temperature: Vec<f64>,
    salinity: Vec<f64>,
    density: Vec<f64>,
}

struct Layout {
    profile: usize,
    pressure: usize,
    temperature: usize,
    salinity: Option<usize>,
    density: Option<usize>,
}

impl Layout {
    fn from_headers(headers: &StringRecord) -> Result<Self, ProfileReadError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|header| header.eq_ignore_ascii_case(name))
        };
        Ok(Layout {
            profile: find("profile").ok_or(ProfileReadError::MissingColumn("profile"))?,
            pressure: find("pressure").ok_or(ProfileReadError::MissingColumn("pressure"))?,
            temperature: find("temperature")
                .ok_or(ProfileReadError::MissingColumn("temperature"))?,
            salinity: find("salinity"),
            density: find("density"),
        })
    }
}

fn parse_value(record: &StringRecord, index: usize, line: u64) -> Result<f64, ProfileReadError> {
    let field = record.get(index).unwrap_or("");
    if field.is_empty() {
        return Ok(f64::NAN);
    }
    field
        .parse::<f64>()
        .map_err(|_| ProfileReadError::ParseError(field.to_string(), line))
}

/// Reads long-format casts: one row per sample with a `profile` id column.
/// Casts keep the order in which their ids first appear.
pub fn read_profiles<R: Read>(reader: R) -> Result<Vec<NamedProfile>, ProfileReadError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let layout = Layout::from_headers(reader.headers()?)?;

    let mut order: Vec<String> = Vec::new();
    let mut casts: HashMap<String, Columns> = HashMap::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |position| position.line());
        let id = record.get(layout.profile).unwrap_or("").to_string();
        let columns = casts.entry(id.clone()).or_insert_with(|| {
            order.push(id);
            Columns::default()
        });
        columns.pressure.push(parse_value(&record, layout.pressure, line)?);
        columns
            .temperature
            .push(parse_value(&record, layout.temperature, line)?);
        if let Some(index) = layout.salinity {
            columns.salinity.push(parse_value(&record, index, line)?);
        }
        if let Some(index) = layout.density {
            columns.density.push(parse_value(&record, index, line)?);
        }
    }

    let mut profiles = Vec::with_capacity(order.len());
    for id in order {
        let columns = match casts.remove(&id) {
            Some(columns) => columns,
            None => continue,
        };
        let mut builder = ProfileBuilder::default();
        builder
            .pressure(&columns.pressure)
            .temperature(&columns.temperature);
        if layout.salinity.is_some() {
            builder.salinity(&columns.salinity);
        }
        if layout.density.is_some() {
            builder.density(&columns.density);
        }
        let profile = builder.build()?;
        debug!("Read profile {} with {} samples", id, profile.len());
        profiles.push(NamedProfile { id, profile });
    }
    Ok(profiles)
}

pub fn read_profiles_csv(path: &Path) -> Result<Vec<NamedProfile>, ProfileReadError> {
    let profiles = read_profiles(File::open(path)?)?;
    info!("Read {} profiles from {}", profiles.len(), path.display());
    Ok(profiles)
}

/// Writes one row per cast. Undetermined depths are written as `NaN`, hard
/// failures leave the depth empty and put the message in `pathway`.
pub fn write_results_csv<W: Write>(
    writer: W,
    ids: &[String],
    results: &[Result<MldResult, MldError>],
) -> Result<(), csv::Error> {
    let mut writer = Writer::from_writer(writer);
    writer.write_record(["profile", "mld", "variable", "metric", "winter", "pathway"])?;
    for (id, result) in ids.iter().zip(results) {
        match result {
            Ok(mld) => {
                let winter = match mld.classification {
                    Some(classification) if classification.is_winter_like() => "true",
                    Some(_) => "false",
                    None => "",
                };
                writer.write_record([
                    id.as_str(),
                    &mld.depth_or(f64::NAN).to_string(),
                    mld.variable.map_or("", |variable| variable.name()),
                    mld.metric.map_or("", |metric| metric.name()),
                    winter,
                    &mld.pathway_summary(),
                ])?
            }
            Err(e) => writer.write_record([
                id.as_str(),
                "",
                "",
                "",
                "",
                &format!("error: {}", e),
            ])?,
        }
    }
    writer.flush()?;
    Ok(())
}
