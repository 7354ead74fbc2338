//! GitLab data models
//!
//! Domain types deserialized straight from GraphQL connection nodes, and the
//! [`IterationPayload`] the cache stores per iteration.

mod delivery;
mod issue;
mod iteration;
mod note;
mod payload;

pub use delivery::{MergeRequest, Pipeline};
pub use issue::{Incident, Issue};
pub use iteration::{Iteration, IterationMetadata};
pub use note::Note;
#[cfg(test)]
pub use note::SystemNoteMetadata;
pub use payload::IterationPayload;

use serde::{Deserialize, Deserializer};

/// Labels arrive as `{ "nodes": [{ "title": .. }] }` from GraphQL and as a
/// plain string list from the cache file.
pub(crate) fn deserialize_labels<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct LabelNode {
        title: String,
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Labels {
        Plain(Vec<String>),
        Connection { nodes: Vec<LabelNode> },
        Missing(()),
    }

    Ok(match Labels::deserialize(deserializer)? {
        Labels::Plain(labels) => labels,
        Labels::Connection { nodes } => nodes.into_iter().map(|n| n.title).collect(),
        Labels::Missing(()) => Vec::new(),
    })
}
