use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use gem_maze_core::{CellCoord, Grid, GridError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SNAPSHOT_DOMAIN: &str = "maze";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded snapshot payload.
pub(crate) const SNAPSHOT_HEADER: &str = "maze:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Blocked cells of a maze together with its side length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct LayoutSnapshot {
    side: u32,
    blocked: Vec<CellCoord>,
}

impl LayoutSnapshot {
    /// Captures the blocked cells of `grid`.
    #[must_use]
    pub(crate) fn capture(grid: &Grid) -> Self {
        Self {
            side: grid.side(),
            blocked: grid.blocked_cells().collect(),
        }
    }

    /// Rebuilds the grid described by the snapshot.
    pub(crate) fn into_grid(self) -> Result<Grid, LayoutTransferError> {
        Ok(Grid::from_blocked(self.side, self.blocked)?)
    }

    /// Encodes the snapshot into a single-line string suitable for clipboard transfer.
    pub(crate) fn encode(&self) -> Result<String, LayoutTransferError> {
        let payload = SerializableSnapshot {
            blocked: self.blocked.clone(),
        };
        let json = serde_json::to_vec(&payload).map_err(LayoutTransferError::InvalidPayload)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!(
            "{SNAPSHOT_HEADER}{FIELD_DELIMITER}{side}x{side}{FIELD_DELIMITER}{encoded}",
            side = self.side
        ))
    }

    /// Decodes a snapshot from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, LayoutTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LayoutTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(LayoutTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(LayoutTransferError::MissingVersion)?;
        let dimensions = parts.next().ok_or(LayoutTransferError::MissingDimensions)?;
        let payload = parts.next().ok_or(LayoutTransferError::MissingPayload)?;

        if domain != SNAPSHOT_DOMAIN {
            return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != SNAPSHOT_VERSION {
            return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
        }

        let side = parse_side(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(LayoutTransferError::InvalidEncoding)?;
        let decoded: SerializableSnapshot =
            serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;

        Ok(Self {
            side,
            blocked: decoded.blocked,
        })
    }
}

#[derive(Serialize, Deserialize)]
struct SerializableSnapshot {
    blocked: Vec<CellCoord>,
}

/// Errors that can occur while encoding or decoding layout transfer strings.
#[derive(Debug, Error)]
pub(crate) enum LayoutTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("layout string was empty")]
    EmptyPayload,
    /// The prefix segment was missing from the encoded snapshot.
    #[error("layout string is missing the prefix")]
    MissingPrefix,
    /// The encoded snapshot did not contain a version segment.
    #[error("layout string is missing the version")]
    MissingVersion,
    /// The encoded snapshot did not include grid dimensions.
    #[error("layout string is missing the grid dimensions")]
    MissingDimensions,
    /// The encoded snapshot did not include the payload segment.
    #[error("layout string is missing the payload")]
    MissingPayload,
    /// The encoded snapshot used an unexpected prefix segment.
    #[error("layout prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded snapshot used an unsupported version identifier.
    #[error("layout version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed or describe a non-square grid.
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode layout payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The payload could not be serialised or deserialised.
    #[error("could not parse layout payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
    /// The blocked cells do not fit the declared grid.
    #[error("layout does not describe a valid grid: {0}")]
    InvalidGrid(#[from] GridError),
}

fn parse_side(dimensions: &str) -> Result<u32, LayoutTransferError> {
    let invalid = || LayoutTransferError::InvalidDimensions(dimensions.to_owned());
    let (columns, rows) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;

    let columns = columns.trim().parse::<u32>().map_err(|_| invalid())?;
    let rows = rows.trim().parse::<u32>().map_err(|_| invalid())?;

    if columns == 0 || columns != rows {
        return Err(invalid());
    }

    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_empty_layout() {
        let grid = Grid::new(12).expect("grid");
        let snapshot = LayoutSnapshot::capture(&grid);

        let encoded = snapshot.encode().expect("encodes");
        assert!(encoded.starts_with(&format!("{SNAPSHOT_HEADER}:12x12:")));

        let decoded = LayoutSnapshot::decode(&encoded).expect("snapshot decodes");
        assert_eq!(snapshot, decoded);
        assert_eq!(decoded.into_grid().expect("grid"), grid);
    }

    #[test]
    fn round_trip_blocked_layout() {
        let blocked = [
            CellCoord::new(5, 7),
            CellCoord::new(12, 4),
            CellCoord::new(0, 19),
        ];
        let grid = Grid::from_blocked(20, blocked).expect("grid");

        let encoded = LayoutSnapshot::capture(&grid).encode().expect("encodes");
        assert!(encoded.starts_with(&format!("{SNAPSHOT_HEADER}:20x20:")));

        let decoded = LayoutSnapshot::decode(&format!("  {encoded}\n")).expect("decodes");
        assert_eq!(decoded.into_grid().expect("grid"), grid);
    }

    #[test]
    fn rejects_blank_input() {
        assert!(matches!(
            LayoutSnapshot::decode("   "),
            Err(LayoutTransferError::EmptyPayload)
        ));
    }

    #[test]
    fn rejects_missing_segments() {
        assert!(matches!(
            LayoutSnapshot::decode("maze"),
            Err(LayoutTransferError::MissingVersion)
        ));
        assert!(matches!(
            LayoutSnapshot::decode("maze:v1:5x5"),
            Err(LayoutTransferError::MissingPayload)
        ));
    }

    #[test]
    fn rejects_foreign_prefix_and_version() {
        assert!(matches!(
            LayoutSnapshot::decode("grid:v1:5x5:e30"),
            Err(LayoutTransferError::InvalidPrefix(prefix)) if prefix == "grid"
        ));
        assert!(matches!(
            LayoutSnapshot::decode("maze:v2:5x5:e30"),
            Err(LayoutTransferError::UnsupportedVersion(version)) if version == "v2"
        ));
    }

    #[test]
    fn rejects_non_square_dimensions() {
        assert!(matches!(
            LayoutSnapshot::decode("maze:v1:5x6:e30"),
            Err(LayoutTransferError::InvalidDimensions(_))
        ));
        assert!(matches!(
            LayoutSnapshot::decode("maze:v1:0x0:e30"),
            Err(LayoutTransferError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn rejects_corrupt_payload() {
        assert!(matches!(
            LayoutSnapshot::decode("maze:v1:5x5:!!!"),
            Err(LayoutTransferError::InvalidEncoding(_))
        ));

        let not_json = STANDARD_NO_PAD.encode(b"blocked");
        assert!(matches!(
            LayoutSnapshot::decode(&format!("maze:v1:5x5:{not_json}")),
            Err(LayoutTransferError::InvalidPayload(_))
        ));
    }

    #[test]
    fn rejects_cells_outside_the_grid() {
        let snapshot = LayoutSnapshot {
            side: 3,
            blocked: vec![CellCoord::new(3, 0)],
        };
        let encoded = snapshot.encode().expect("encodes");

        let decoded = LayoutSnapshot::decode(&encoded).expect("decodes");
        assert!(matches!(
            decoded.into_grid(),
            Err(LayoutTransferError::InvalidGrid(GridError::OutOfBounds { .. }))
        ));
    }
}
