//! Decoding of the `key=value` list that follows an entity id.

use acmiview_core::RecordError;

/// Attribute list of one entity line, in line order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    pairs: Vec<(String, String)>,
}

impl Attributes {
    /// Splits on unescaped commas. `\,` stays inside the value as a plain comma.
    ///
    /// Segments without `=` are dropped.
    pub fn parse(list: &str) -> Self {
        let pairs = split_unescaped(list)
            .into_iter()
            .filter_map(|segment| {
                let (key, value) = segment.split_once('=')?;
                Some((key.trim().to_string(), value.trim().to_string()))
            })
            .collect();
        Self { pairs }
    }

    /// Value of `key`, matched exactly. Empty values count as absent and the last
    /// occurrence wins.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

fn split_unescaped(list: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = list.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => current.push(escaped),
                None => current.push('\\'),
            },
            ',' => segments.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    segments.push(current);
    segments
}

/// Raw components of a `T=` value. Empty components are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransformUpdate {
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub altitude: Option<f64>,
    /// pitch, yaw, roll in degrees
    pub orientation: [Option<f64>; 3],
}

impl TransformUpdate {
    /// Parses `lon|lat|alt[|pitch|yaw|roll]`.
    pub fn parse(value: &str) -> Result<Self, RecordError> {
        let fields: Vec<&str> = value.split('|').collect();
        if fields.len() < 3 {
            return Err(RecordError::malformed_position(
                value,
                format!("expected at least 3 fields, got {}", fields.len()),
            ));
        }

        let number = |i: usize| -> Result<Option<f64>, RecordError> {
            match fields.get(i).map(|f| f.trim()) {
                None | Some("") => Ok(None),
                Some(f) => f.parse::<f64>().map(Some).map_err(|_| {
                    RecordError::malformed_position(value, format!("invalid number '{f}'"))
                }),
            }
        };

        let mut update = Self {
            longitude: number(0)?,
            latitude: number(1)?,
            altitude: number(2)?,
            orientation: [None; 3],
        };
        if fields.len() >= 6 {
            update.orientation = [number(3)?, number(4)?, number(5)?];
        }
        Ok(update)
    }
}
