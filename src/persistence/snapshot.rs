//! Versioned, encodable snapshots of a page stack.

use super::error::SnapshotError;
use crate::core::{PageDefinition, PageId, PageStack};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Version identifier for the snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Wire encoding of a snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    /// Human-readable JSON
    #[default]
    Json,
    /// Compact bincode
    Binary,
}

/// A stack as it is written to storage.
///
/// # Example
///
/// ```rust
/// use pageflow::core::{PageDefinition, PageStack};
/// use pageflow::persistence::{SnapshotFormat, StackSnapshot};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// struct Article(u32);
///
/// impl PageDefinition for Article {
///     fn kind(&self) -> &str {
///         "Article"
///     }
/// }
///
/// let stack = PageStack::with_page(Article(1)).push(Article(2));
/// let bytes = StackSnapshot::new(stack.clone()).encode(SnapshotFormat::Json).unwrap();
/// let restored = StackSnapshot::<Article>::decode(&bytes, SnapshotFormat::Json).unwrap();
///
/// assert_eq!(restored.stack, stack);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StackSnapshot<D: PageDefinition> {
    /// Snapshot format version
    pub version: u32,

    /// Unique snapshot identifier
    pub id: Uuid,

    /// When the snapshot was taken
    pub saved_at: DateTime<Utc>,

    /// The stack, oldest page first
    pub stack: PageStack<D>,
}

#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

impl<D: PageDefinition> StackSnapshot<D> {
    pub fn new(stack: PageStack<D>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            id: Uuid::new_v4(),
            saved_at: Utc::now(),
            stack,
        }
    }

    pub fn encode(&self, format: SnapshotFormat) -> Result<Vec<u8>, SnapshotError> {
        match format {
            SnapshotFormat::Json => serde_json::to_vec(self)
                .map_err(|e| SnapshotError::SerializationFailed(e.to_string())),
            SnapshotFormat::Binary => bincode::serialize(self)
                .map_err(|e| SnapshotError::SerializationFailed(e.to_string())),
        }
    }

    /// Decode and validate a snapshot.
    ///
    /// The version is checked before the body is decoded, so snapshots
    /// from a newer format fail with `UnsupportedVersion` rather than a
    /// decoding error.
    pub fn decode(bytes: &[u8], format: SnapshotFormat) -> Result<Self, SnapshotError> {
        let probe: VersionProbe = match format {
            SnapshotFormat::Json => serde_json::from_slice(bytes)
                .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?,
            SnapshotFormat::Binary => bincode::deserialize(bytes)
                .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?,
        };
        if probe.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: probe.version,
                supported: SNAPSHOT_VERSION,
            });
        }

        let snapshot: Self = match format {
            SnapshotFormat::Json => serde_json::from_slice(bytes)
                .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?,
            SnapshotFormat::Binary => bincode::deserialize(bytes)
                .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?,
        };
        snapshot.validate()?;
        Ok(snapshot)
    }

    fn validate(&self) -> Result<(), SnapshotError> {
        let mut seen: HashSet<PageId> = HashSet::with_capacity(self.stack.len());
        for page in self.stack.iter() {
            if !seen.insert(page.id()) {
                return Err(SnapshotError::ValidationFailed(format!(
                    "{} appears twice in {}",
                    page.id(),
                    self.stack.id()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{SavedPageState, StackId};

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestPage {
        Inbox,
        Thread { id: u64 },
    }

    impl PageDefinition for TestPage {
        fn kind(&self) -> &str {
            match self {
                Self::Inbox => "Inbox",
                Self::Thread { .. } => "Thread",
            }
        }
    }

    fn stack() -> PageStack<TestPage> {
        PageStack::with_page(TestPage::Inbox)
            .push(TestPage::Thread { id: 7 })
            .push(TestPage::Thread { id: 9 })
    }

    #[test]
    fn json_snapshot_restores_stack() {
        let original = StackSnapshot::new(stack());
        let bytes = original.encode(SnapshotFormat::Json).unwrap();
        let restored = StackSnapshot::<TestPage>::decode(&bytes, SnapshotFormat::Json).unwrap();

        assert_eq!(restored.id, original.id);
        assert_eq!(restored.stack, original.stack);
        assert_eq!(restored.stack.id(), original.stack.id());
    }

    #[test]
    fn binary_snapshot_restores_stack() {
        let original = StackSnapshot::new(stack());
        let bytes = original.encode(SnapshotFormat::Binary).unwrap();
        let restored = StackSnapshot::<TestPage>::decode(&bytes, SnapshotFormat::Binary).unwrap();

        assert_eq!(restored.stack, original.stack);
        assert_eq!(restored.saved_at, original.saved_at);
    }

    #[test]
    fn future_version_is_rejected_before_decoding_body() {
        let json = br#"{ "version": 2, "shape": "unknown" }"#;
        let result = StackSnapshot::<TestPage>::decode(json, SnapshotFormat::Json);

        assert!(matches!(
            result,
            Err(SnapshotError::UnsupportedVersion {
                found: 2,
                supported: SNAPSHOT_VERSION
            })
        ));
    }

    #[test]
    fn empty_stack_fails_to_decode() {
        let mut value = serde_json::to_value(StackSnapshot::new(stack())).unwrap();
        value["stack"]["pages"] = serde_json::json!([]);
        let bytes = serde_json::to_vec(&value).unwrap();

        let result = StackSnapshot::<TestPage>::decode(&bytes, SnapshotFormat::Json);
        assert!(matches!(result, Err(SnapshotError::DeserializationFailed(_))));
    }

    #[test]
    fn duplicate_page_ids_fail_validation() {
        let page = SavedPageState::new(TestPage::Inbox);
        let stack = PageStack::new(StackId::next(), page.clone()).added(page);
        let bytes = StackSnapshot::new(stack).encode(SnapshotFormat::Json).unwrap();

        let result = StackSnapshot::<TestPage>::decode(&bytes, SnapshotFormat::Json);
        assert!(matches!(result, Err(SnapshotError::ValidationFailed(_))));
    }

    #[test]
    fn garbage_is_a_decoding_error() {
        let result = StackSnapshot::<TestPage>::decode(b"not json", SnapshotFormat::Json);
        assert!(matches!(result, Err(SnapshotError::DeserializationFailed(_))));
    }
}
