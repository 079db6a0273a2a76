use std::fs::File;
use std::io::{BufReader, Read};
use chrono::{Datelike, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};
use sv_core::SightingRecord;
use sv_geo::{project, unproject, Crs, ProjectionError};

use crate::config::{columns, SourceConfig};
use crate::store::RecordStore;
use crate::taxonomy::{color_tag_for, common_name_for, detail_link_for};
use crate::DataError;

/// Tab-separated sightings table
pub struct TsvSource {
    config: SourceConfig,
}

/// Positions of the required columns in the header
struct ColumnIndex {
    order: usize,
    family: usize,
    species: usize,
    latitude: usize,
    longitude: usize,
    event_date: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self, DataError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|header| header.trim() == name)
                .ok_or_else(|| DataError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            order: find(columns::ORDER)?,
            family: find(columns::FAMILY)?,
            species: find(columns::SPECIES)?,
            latitude: find(columns::LATITUDE)?,
            longitude: find(columns::LONGITUDE)?,
            event_date: find(columns::EVENT_DATE)?,
        })
    }
}

impl TsvSource {
    /// Create a source for the configured file
    pub fn new(config: SourceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Load and normalize the whole table
    pub fn load(&self) -> Result<RecordStore, DataError> {
        let file = File::open(&self.config.path)?;
        let source_name = self
            .config
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown.tsv")
            .to_string();

        Self::load_from_reader(BufReader::new(file), &self.config, &source_name)
    }

    /// Load from any reader, using `config` for everything but the path
    pub fn load_from_reader<R: Read>(
        reader: R,
        config: &SourceConfig,
        source_name: &str,
    ) -> Result<RecordStore, DataError> {
        let _span = tracing::info_span!("load", source = source_name).entered();

        let mut tsv_reader = ReaderBuilder::new()
            .delimiter(config.delimiter_byte()?)
            .has_headers(true)
            .from_reader(reader);

        let headers = tsv_reader.headers()?.clone();
        let index = ColumnIndex::from_headers(&headers)?;

        let mut records = Vec::new();
        let mut dropped_rows = 0;

        for (idx, result) in tsv_reader.records().enumerate() {
            let row = idx + 1;
            let raw = result?;

            match normalize_row(row, &raw, &index, config)? {
                Some(record) => records.push(record),
                None => {
                    tracing::debug!("Dropping row {}: no event date", row);
                    dropped_rows += 1;
                }
            }
        }

        tracing::info!(
            "Loaded {} sightings from {} ({} rows without event date dropped)",
            records.len(),
            source_name,
            dropped_rows
        );

        Ok(RecordStore::new(records, source_name, dropped_rows))
    }
}

/// Normalize one data row; `Ok(None)` means the row carries no event date
fn normalize_row(
    row: usize,
    raw: &StringRecord,
    index: &ColumnIndex,
    config: &SourceConfig,
) -> Result<Option<SightingRecord>, DataError> {
    let cell = |col: usize| config.null_config.value_of(raw.get(col).unwrap_or(""));

    let Some(date_text) = cell(index.event_date) else {
        return Ok(None);
    };

    let event_date = NaiveDateTime::parse_from_str(date_text, &config.date_format).map_err(|e| {
        DataError::DataFormat {
            row,
            column: columns::EVENT_DATE,
            value: date_text.to_string(),
            reason: e.to_string(),
        }
    })?;

    let year = event_date.year();
    if !(1000..=9999).contains(&year) {
        return Err(DataError::DataFormat {
            row,
            column: columns::EVENT_DATE,
            value: date_text.to_string(),
            reason: "year is not a four digit year".to_string(),
        });
    }

    let family = cell(index.family).ok_or_else(|| DataError::DataFormat {
        row,
        column: columns::FAMILY,
        value: String::new(),
        reason: "family is required".to_string(),
    })?;
    let species = cell(index.species);

    let taxonomy = |source| DataError::UnmappedTaxonomy { row, source };
    let common_name = common_name_for(species).map_err(taxonomy)?;
    let color_tag = color_tag_for(family).map_err(taxonomy)?;

    let x = parse_coordinate(row, columns::LONGITUDE, cell(index.longitude))?;
    let y = parse_coordinate(row, columns::LATITUDE, cell(index.latitude))?;
    let (longitude, latitude, projected) =
        geographic_and_projected(x, y, config.source_crs).map_err(|source| DataError::Projection { row, source })?;

    Ok(Some(SightingRecord {
        order: cell(index.order).unwrap_or_default().to_string(),
        family: family.to_string(),
        species: species.map(str::to_string),
        common_name: common_name.to_string(),
        latitude,
        longitude,
        projected_x: projected.x,
        projected_y: projected.y,
        event_date,
        day_of_week: event_date.format("%A").to_string(),
        month: event_date.format("%B").to_string(),
        year,
        day_of_month: event_date.day(),
        color_tag,
        detail_link: detail_link_for(species),
    }))
}

fn parse_coordinate(row: usize, column: &'static str, value: Option<&str>) -> Result<f64, DataError> {
    let invalid = |value: &str, reason: String| DataError::DataFormat {
        row,
        column,
        value: value.to_string(),
        reason,
    };

    let value = value.ok_or_else(|| invalid("", "coordinate is required".to_string()))?;
    value.parse::<f64>().map_err(|e| invalid(value, e.to_string()))
}

/// Geographic degrees for distance filtering plus display coordinates.
///
/// Web Mercator input is unprojected so that distances are always computed
/// on the sphere.
fn geographic_and_projected(
    x: f64,
    y: f64,
    source: Crs,
) -> Result<(f64, f64, sv_core::ProjectedPoint), ProjectionError> {
    let projected = project(x, y, source)?;
    match source {
        Crs::Wgs84 => Ok((x, y, projected)),
        Crs::WebMercator => {
            let (longitude, latitude) = unproject(projected)?;
            Ok((longitude, latitude, projected))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use sv_core::ColorTag;
    use crate::taxonomy::{TaxonomyError, FALLBACK_DETAIL_LINK};

    const HEADER: &str = "order\tfamily\tspecies\tdecimallatitude\tdecimallongitude\teventdate\n";

    fn load(body: &str) -> Result<RecordStore, DataError> {
        let table = format!("{}{}", HEADER, body);
        TsvSource::load_from_reader(table.as_bytes(), &SourceConfig::default(), "test.tsv")
    }

    #[test]
    fn test_load_normalizes_every_field() {
        let store = load("Cetacea\tDelphinidae\tOrcinus orca\t-33.85\t151.21\t1995-07-04T13:45Z\n").unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.source_name(), "test.tsv");

        let record = &store.records()[0];
        assert_eq!(record.order, "Cetacea");
        assert_eq!(record.family, "Delphinidae");
        assert_eq!(record.species.as_deref(), Some("Orcinus orca"));
        assert_eq!(record.common_name, "killer whale");
        assert_eq!(record.color_tag, ColorTag::Red);
        assert_eq!(record.detail_link, "Orcinus_orca");
        assert_eq!(record.year, 1995);
        assert_eq!(record.month, "July");
        assert_eq!(record.day_of_week, "Tuesday");
        assert_eq!(record.day_of_month, 4);
        assert_eq!(record.event_date_text(), "1995-07-04");
        assert_eq!((record.latitude, record.longitude), (-33.85, 151.21));

        let expected = project(151.21, -33.85, Crs::Wgs84).unwrap();
        assert_eq!((record.projected_x, record.projected_y), (expected.x, expected.y));
    }

    #[test]
    fn test_rows_without_event_date_are_dropped() {
        let store = load(concat!(
            "Cetacea\tDelphinidae\tOrcinus orca\t-33.85\t151.21\t\n",
            "Cetacea\tDugongidae\tDugong dugon\t-19.2\t146.8\t2003-11-20T08:00Z\n",
            "Cetacea\tDelphinidae\tGrampus griseus\t-34.0\t151.0\t\n",
        ))
        .unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.dropped_rows(), 2);
        assert_eq!(store.records()[0].common_name, "dugong");
        assert_eq!(store.records()[0].day_of_week, "Thursday");
    }

    #[test]
    fn test_absent_species_gets_empty_name_and_fallback_link() {
        let store = load("Cetacea\tBalaenopteridae\t\t-35.0\t150.0\t1990-01-01T00:00Z\n").unwrap();
        let record = &store.records()[0];
        assert_eq!(record.species, None);
        assert_eq!(record.common_name, "");
        assert_eq!(record.detail_link, FALLBACK_DETAIL_LINK);
        assert_eq!(record.color_tag, ColorTag::Blue);
    }

    #[test]
    fn test_malformed_date_fails_with_row() {
        let err = load(concat!(
            "Cetacea\tDelphinidae\tOrcinus orca\t-33.85\t151.21\t1995-07-04T13:45Z\n",
            "Cetacea\tDelphinidae\tOrcinus orca\t-33.85\t151.21\t04/07/1995\n",
        ))
        .unwrap_err();

        match err {
            DataError::DataFormat { row, column, value, .. } => {
                assert_eq!(row, 2);
                assert_eq!(column, "eventdate");
                assert_eq!(value, "04/07/1995");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unmapped_taxonomy_aborts_load() {
        let err = load("Cetacea\tMonodontidae\tMonodon monoceros\t70.0\t-80.0\t2001-05-01T10:00Z\n").unwrap_err();
        assert!(matches!(
            err,
            DataError::UnmappedTaxonomy { row: 1, source: TaxonomyError::UnmappedSpecies(_) }
        ));

        let err = load("Cetacea\tMonodontidae\t\t70.0\t-80.0\t2001-05-01T10:00Z\n").unwrap_err();
        assert!(matches!(
            err,
            DataError::UnmappedTaxonomy { row: 1, source: TaxonomyError::UnmappedFamily(ref f) } if f == "Monodontidae"
        ));
    }

    #[test]
    fn test_missing_family_is_a_format_error() {
        let err = load("Cetacea\t\t\t-33.0\t151.0\t2001-05-01T10:00Z\n").unwrap_err();
        assert!(matches!(err, DataError::DataFormat { column: "family", .. }));
    }

    #[test]
    fn test_bad_coordinates() {
        let err = load("Cetacea\tDelphinidae\t\tsouth\t151.0\t2001-05-01T10:00Z\n").unwrap_err();
        assert!(matches!(err, DataError::DataFormat { column: "decimallatitude", .. }));

        let err = load("Cetacea\tDelphinidae\t\t-95.0\t151.0\t2001-05-01T10:00Z\n").unwrap_err();
        assert!(matches!(err, DataError::Projection { row: 1, .. }));
    }

    #[test]
    fn test_missing_column() {
        let table = "order\tfamily\tspecies\tdecimallatitude\teventdate\n";
        let err = TsvSource::load_from_reader(table.as_bytes(), &SourceConfig::default(), "t").unwrap_err();
        assert!(matches!(err, DataError::MissingColumn(ref c) if c == "decimallongitude"));
    }

    #[test]
    fn test_column_order_and_extra_columns_do_not_matter() {
        let table = concat!(
            "gbifid\teventdate\tdecimallongitude\tdecimallatitude\tspecies\tfamily\torder\n",
            "42\t2010-02-14T06:30Z\t115.86\t-31.95\tTursiops truncatus\tDelphinidae\tCetacea\n",
        );
        let store = TsvSource::load_from_reader(table.as_bytes(), &SourceConfig::default(), "t").unwrap();
        let record = &store.records()[0];
        assert_eq!(record.common_name, "common bottlenose dolphin");
        assert_eq!((record.latitude, record.longitude), (-31.95, 115.86));
    }

    #[test]
    fn test_web_mercator_source_is_unprojected_for_distances() {
        let projected = project(151.21, -33.85, Crs::Wgs84).unwrap();
        let table = format!(
            "{}Cetacea\tDelphinidae\t\t{}\t{}\t1999-12-31T23:59Z\n",
            HEADER, projected.y, projected.x
        );
        let config = SourceConfig { source_crs: Crs::WebMercator, ..SourceConfig::default() };
        let store = TsvSource::load_from_reader(table.as_bytes(), &config, "t").unwrap();

        let record = &store.records()[0];
        assert!((record.latitude - -33.85).abs() < 1e-9);
        assert!((record.longitude - 151.21).abs() < 1e-9);
        assert_eq!(record.projected_x, projected.x);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".tsv").tempfile().unwrap();
        write!(
            file,
            "{}Cetacea\tPhyseteridae\tPhyseter macrocephalus\t-35.1\t117.9\t1988-03-09T11:00Z\n",
            HEADER
        )
        .unwrap();

        let source = TsvSource::new(SourceConfig::new(file.path()));
        let store = source.load().unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.source_name().ends_with(".tsv"));
        assert_eq!(store.records()[0].color_tag, ColorTag::Yellow);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let source = TsvSource::new(SourceConfig::new("/nonexistent/sightings.tsv"));
        assert!(matches!(source.load(), Err(DataError::Io(_))));
    }

    #[test]
    fn test_control_options_from_store() {
        let store = load(concat!(
            "Cetacea\tDelphinidae\t\t-33.0\t151.0\t2001-05-01T10:00Z\n",
            "Cetacea\tBalaenopteridae\t\t-33.0\t151.0\t1994-05-01T10:00Z\n",
            "Cetacea\tDelphinidae\t\t-33.0\t151.0\t1994-06-01T10:00Z\n",
        ))
        .unwrap();

        let options = store.control_options();
        assert_eq!(options.years, vec![1994, 2001]);
        assert_eq!(options.families, vec!["Delphinidae".to_string(), "Balaenopteridae".to_string()]);
        assert_eq!(options.radius.start, 50.0);
        assert_eq!(options.radius.end, 1000.0);
    }
}
