use gdal::Dataset;
use gdal::vector::{FieldValue as GdalFieldValue, LayerAccess};
use std::collections::HashMap;
use std::path::Path;

use super::{FieldValue, ReadError, VectorRecord};

/// Reads every feature of the first layer of a GDAL vector file into memory.
pub fn read_records(path: &Path) -> Result<Vec<VectorRecord>, ReadError> {
    let gdal_err = |source| ReadError::Gdal {
        path: path.to_path_buf(),
        source,
    };

    let dataset = Dataset::open(path).map_err(gdal_err)?;
    let mut layer = dataset.layer(0).map_err(gdal_err)?;

    let mut records = Vec::new();
    for feature in layer.features() {
        let mut attributes = HashMap::new();
        for (name, value) in feature.fields() {
            let value = value.map(|v| convert(&name, v)).transpose()?;
            attributes.insert(name, value);
        }

        let geometry = feature
            .geometry()
            .map(|geometry| geometry.wkt())
            .transpose()
            .map_err(gdal_err)?;

        records.push(VectorRecord {
            attributes,
            geometry,
        });
    }

    Ok(records)
}

fn convert(field: &str, value: GdalFieldValue) -> Result<FieldValue, ReadError> {
    match value {
        GdalFieldValue::IntegerValue(v) => Ok(FieldValue::Integer(v.into())),
        GdalFieldValue::Integer64Value(v) => Ok(FieldValue::Integer(v)),
        GdalFieldValue::RealValue(v) => Ok(FieldValue::Real(v)),
        GdalFieldValue::StringValue(v) => Ok(FieldValue::String(v)),
        GdalFieldValue::DateValue(v) => Ok(FieldValue::Date(v)),
        GdalFieldValue::DateTimeValue(v) => Ok(FieldValue::DateTime(v)),
        other => Err(ReadError::UnsupportedField {
            field: field.to_string(),
            kind: format!("{:?}", other),
        }),
    }
}
