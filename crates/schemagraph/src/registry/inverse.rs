//! Inverse relationship pairing.
//!
//! For every relationship `R` on a source entity `E` with destination `T`:
//! 1. an explicit inverse token with a name already set is paired; skip
//! 2. an explicit inverse token without a name is looked up on `T` by
//!    accessor; missing is fatal
//! 3. a relationship on `T` whose own inverse token is `R`'s accessor is an
//!    exact match
//! 4. otherwise the first relationship on `T` pointing back at `E` wins,
//!    preferring ones with no inverse yet; ties and fallbacks are reported
//! 5. no candidate at all leaves `R` one-directional
//!
//! Pairing writes both sides.

use crate::{
    finalize::Finalizable,
    model::AccessorToken,
    node::{Entity, EntityId, Relationship, RelationshipRef},
    registry::{Diagnostic, RegistryError},
};

/// Pair inverses for every relationship of the `touched` entities.
pub(super) fn pair(
    entities: &mut [Entity],
    touched: &[EntityId],
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<(), RegistryError> {
    for &source in touched {
        let count = entities[source.index()].relationships().len();

        for index in 0..count {
            pair_one(entities, RelationshipRef::new(source, index), diagnostics)?;
        }
    }

    Ok(())
}

fn pair_one(
    entities: &mut [Entity],
    at: RelationshipRef,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<(), RegistryError> {
    let source = &entities[at.entity.index()];
    let relationship = &source.relationships()[at.index];
    let entity_name = source.name().to_string();
    let relationship_name = relationship.name().to_string();

    let Some(target) = relationship.destination_entity() else {
        return Err(RegistryError::UnresolvedDestination {
            entity: entity_name,
            relationship: relationship_name,
        });
    };

    // steps 1 and 2
    if let Some(token) = relationship.inverse_accessor() {
        if relationship.inverse_name().is_some() {
            return Ok(());
        }

        let Some(partner) = find_by_accessor(&entities[target.index()], token) else {
            return Err(RegistryError::InverseNotFound {
                entity: entity_name,
                relationship: relationship_name,
                destination: entities[target.index()].name().to_string(),
                token: token.to_string(),
            });
        };

        return link(entities, at, RelationshipRef::new(target, partner));
    }

    let accessor = relationship.accessor();
    let target_entity = &entities[target.index()];

    let mut without_inverse = Vec::new();
    let mut with_inverse = Vec::new();

    for (index, candidate) in target_entity.relationships().iter().enumerate() {
        // step 3
        if accessor.is_some() && candidate.inverse_accessor() == accessor {
            return link(entities, at, RelationshipRef::new(target, index));
        }

        if candidate.destination() != entity_name {
            continue;
        }

        if candidate.inverse_accessor().is_none() {
            without_inverse.push(index);
        } else {
            with_inverse.push(index);
        }
    }

    // step 4
    if let Some(&first) = without_inverse.first() {
        if without_inverse.len() > 1 {
            Diagnostic::AmbiguousInverse {
                entity: entity_name,
                relationship: relationship_name,
                candidates: names(target_entity, &without_inverse),
                chosen: target_entity.relationships()[first].name().to_string(),
            }
            .record(diagnostics);
        }

        return link(entities, at, RelationshipRef::new(target, first));
    }

    if let Some(&first) = with_inverse.first() {
        Diagnostic::MismatchedInverse {
            entity: entity_name,
            relationship: relationship_name,
            chosen: target_entity.relationships()[first].name().to_string(),
        }
        .record(diagnostics);

        return link(entities, at, RelationshipRef::new(target, first));
    }

    // step 5
    Diagnostic::NoInverse {
        entity: entity_name,
        relationship: relationship_name,
        destination: target_entity.name().to_string(),
    }
    .record(diagnostics);

    Ok(())
}

fn find_by_accessor(entity: &Entity, token: AccessorToken) -> Option<usize> {
    entity
        .relationships()
        .iter()
        .position(|relationship| relationship.accessor() == Some(token))
}

fn names(entity: &Entity, indices: &[usize]) -> Vec<String> {
    indices
        .iter()
        .map(|&index| entity.relationships()[index].name().to_string())
        .collect()
}

///
/// Side
/// What one end of a pairing needs to know about the other.
///

struct Side {
    at: RelationshipRef,
    entity: String,
    name: String,
    accessor: Option<AccessorToken>,
}

impl Side {
    fn read(entities: &[Entity], at: RelationshipRef) -> Result<Self, RegistryError> {
        let entity = &entities[at.entity.index()];
        let relationship = &entity.relationships()[at.index];

        if entity.is_finalized() || relationship.is_finalized() {
            return Err(RegistryError::Finalized {
                entity: entity.name().to_string(),
                relationship: relationship.name().to_string(),
            });
        }

        Ok(Self {
            at,
            entity: entity.name().to_string(),
            name: relationship.name().to_string(),
            accessor: relationship.accessor(),
        })
    }

    // point `relationship` at `self`
    fn apply_to(&self, relationship: &mut Relationship) {
        relationship.set_inverse_relationship(Some(self.at));
        relationship.set_inverse_name(Some(self.name.clone()));
        relationship.set_inverse_accessor(self.accessor);

        if relationship.destination_entity().is_none() {
            relationship.set_destination(self.entity.clone(), self.at.entity);
        }
    }
}

// Symmetric pairing of `a` and `b`; both may be the same relationship.
fn link(entities: &mut [Entity], a: RelationshipRef, b: RelationshipRef) -> Result<(), RegistryError> {
    let side_a = Side::read(entities, a)?;
    let side_b = Side::read(entities, b)?;

    if let Some(relationship) = entities[a.entity.index()].relationship_mut(a.index) {
        side_b.apply_to(relationship);
    }
    if let Some(relationship) = entities[b.entity.index()].relationship_mut(b.index) {
        side_a.apply_to(relationship);
    }

    Ok(())
}
