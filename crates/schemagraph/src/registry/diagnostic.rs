use derive_more::Display;
use serde::Serialize;
use tracing::warn;

///
/// Diagnostic
///
/// Non-fatal observation made while pairing inverse relationships.
/// Each one is also logged at `warn` level when it is recorded.
///

#[derive(Clone, Debug, Display, Eq, PartialEq, Serialize)]
#[remain::sorted]
pub enum Diagnostic {
    #[display(
        "multiple inverse candidates for '{entity}.{relationship}' ({}), using '{chosen}'; declare the inverse explicitly",
        candidates.join(", ")
    )]
    AmbiguousInverse {
        entity: String,
        relationship: String,
        candidates: Vec<String>,
        chosen: String,
    },

    #[display(
        "inverse of '{entity}.{relationship}' falls back to '{chosen}', which already has a different inverse"
    )]
    MismatchedInverse {
        entity: String,
        relationship: String,
        chosen: String,
    },

    #[display("'{entity}.{relationship}' has no inverse on '{destination}'")]
    NoInverse {
        entity: String,
        relationship: String,
        destination: String,
    },
}

impl Diagnostic {
    /// Entity owning the relationship the diagnostic is about.
    #[must_use]
    pub fn entity(&self) -> &str {
        match self {
            Self::AmbiguousInverse { entity, .. }
            | Self::MismatchedInverse { entity, .. }
            | Self::NoInverse { entity, .. } => entity,
        }
    }

    #[must_use]
    pub fn relationship(&self) -> &str {
        match self {
            Self::AmbiguousInverse { relationship, .. }
            | Self::MismatchedInverse { relationship, .. }
            | Self::NoInverse { relationship, .. } => relationship,
        }
    }

    pub(crate) fn record(self, diagnostics: &mut Vec<Self>) {
        warn!(
            entity = self.entity(),
            relationship = self.relationship(),
            "{self}"
        );
        diagnostics.push(self);
    }
}
