//! Schema registry: resolves model types into frozen, cross-linked entities.
//!
//! One mutex guards the entity arena, the per-type cache and the frozen set.
//! Public entry points take it once for the whole call; everything below
//! them works on `&mut RegistryState` and never locks again.

mod diagnostic;
mod inverse;

pub use diagnostic::Diagnostic;

use crate::{
    Error,
    build::build_entity,
    model::ModelType,
    node::{Entity, EntityId},
};
use std::{
    any::TypeId,
    collections::{HashMap, HashSet, VecDeque},
    sync::{LazyLock, Mutex, MutexGuard},
};
use thiserror::Error as ThisError;
use tracing::debug;

///
/// RegistryError
///

#[derive(Debug, ThisError)]
pub enum RegistryError {
    #[error("entity name '{name}' is produced by both {first} and {second}")]
    DuplicateEntityName {
        name: String,
        first: &'static str,
        second: &'static str,
    },

    #[error("cannot pair '{entity}.{relationship}': it was finalized by an earlier resolution")]
    Finalized { entity: String, relationship: String },

    #[error(
        "inverse {token} declared on '{entity}.{relationship}' not found on entity '{destination}'"
    )]
    InverseNotFound {
        entity: String,
        relationship: String,
        destination: String,
        token: String,
    },

    #[error("relationship '{entity}.{relationship}' has no resolvable destination type")]
    UnresolvedDestination { entity: String, relationship: String },
}

///
/// Resolution
/// Root entities of one `try_resolve` call and what was observed on the way.
///

#[derive(Debug)]
pub struct Resolution {
    pub entities: Vec<Entity>,
    pub diagnostics: Vec<Diagnostic>,
}

///
/// RegistryState
///

#[derive(Debug, Default)]
struct RegistryState {
    entities: Vec<Entity>,
    by_type: HashMap<TypeId, EntityId>,
    frozen: HashSet<TypeId>,
}

impl RegistryState {
    fn lookup(&self, model: ModelType) -> Option<EntityId> {
        self.by_type.get(&model.id()).copied()
    }

    fn get(&self, id: EntityId) -> &Entity {
        &self.entities[id.index()]
    }

    // build one skeleton and cache it under its type
    fn process_model(&mut self, model: ModelType) -> Result<EntityId, Error> {
        let entity = build_entity(model)?;
        let id = EntityId(self.entities.len());

        self.entities.push(entity);
        self.by_type.insert(model.id(), id);

        Ok(id)
    }

    // drop everything a failed pass inserted
    fn rollback(&mut self, mark: usize) {
        self.entities.truncate(mark);
        self.by_type.retain(|_, id| id.index() < mark);
    }
}

///
/// SchemaRegistry
///

#[derive(Debug, Default)]
pub struct SchemaRegistry {
    state: Mutex<RegistryState>,
}

impl SchemaRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn shared() -> &'static Self {
        static SHARED: LazyLock<SchemaRegistry> = LazyLock::new(SchemaRegistry::new);

        &SHARED
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().expect("schema registry mutex poisoned")
    }

    /// Resolve `roots` and return their frozen entities, in order.
    ///
    /// # Panics
    /// Panics with the error message when the declarations are malformed.
    pub fn resolve(&self, roots: &[ModelType]) -> Vec<Entity> {
        match self.try_resolve(roots) {
            Ok(resolution) => resolution.entities,
            Err(err) => panic!("schema resolution failed: {err}"),
        }
    }

    /// Resolve `roots`, reporting malformed declarations as errors.
    pub fn try_resolve(&self, roots: &[ModelType]) -> Result<Resolution, Error> {
        let mut state = self.lock();
        let diagnostics = run_pass(&mut state, roots)?;

        let entities = roots
            .iter()
            .filter_map(|&model| state.lookup(model))
            .map(|id| state.get(id).clone())
            .collect();

        Ok(Resolution {
            entities,
            diagnostics,
        })
    }

    /// The frozen entity for `model`, resolving it first if needed.
    ///
    /// # Panics
    /// Panics with the error message when the declarations are malformed.
    #[must_use]
    pub fn entity_for(&self, model: ModelType) -> Entity {
        match self.try_entity_for(model) {
            Ok(entity) => entity,
            Err(err) => panic!("schema resolution failed for {model}: {err}"),
        }
    }

    pub fn try_entity_for(&self, model: ModelType) -> Result<Entity, Error> {
        let mut state = self.lock();

        if !state.frozen.contains(&model.id()) {
            run_pass(&mut state, &[model])?;
        }

        match state.lookup(model) {
            Some(id) => Ok(state.get(id).clone()),
            None => unreachable!("a successful pass caches every root"),
        }
    }

    /// Navigate an `EntityId` from a destination or inverse link.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<Entity> {
        self.lock().entities.get(id.index()).cloned()
    }

    /// True once `model` has been resolved and frozen.
    #[must_use]
    pub fn is_resolved(&self, model: ModelType) -> bool {
        self.lock().frozen.contains(&model.id())
    }

    /// Resolve `roots`, then return them followed by every entity reachable
    /// through destination links, in discovery order.
    pub fn resolve_closure(&self, roots: &[ModelType]) -> Result<Vec<Entity>, Error> {
        let mut state = self.lock();
        run_pass(&mut state, roots)?;

        let mut seen = HashSet::new();
        let mut queue: VecDeque<EntityId> = roots
            .iter()
            .filter_map(|&model| state.lookup(model))
            .collect();
        let mut closure = Vec::new();

        while let Some(id) = queue.pop_front() {
            if !seen.insert(id) {
                continue;
            }

            let entity = state.get(id);
            queue.extend(
                entity
                    .relationships()
                    .iter()
                    .filter_map(|relationship| relationship.destination_entity()),
            );
            closure.push(entity.clone());
        }

        Ok(closure)
    }
}

// One resolution pass under the registry lock. Rolls back on failure.
fn run_pass(state: &mut RegistryState, roots: &[ModelType]) -> Result<Vec<Diagnostic>, Error> {
    let mark = state.entities.len();

    match build_pass(state, roots) {
        Ok((created, diagnostics)) => {
            for &id in &created {
                let entity = state.get(id);
                entity.finalize();
                let type_id = entity.backing_type().id();
                state.frozen.insert(type_id);
            }

            debug!(
                roots = roots.len(),
                created = created.len(),
                frozen = state.frozen.len(),
                diagnostics = diagnostics.len(),
                "schema resolution pass complete"
            );

            Ok(diagnostics)
        }
        Err(err) => {
            state.rollback(mark);
            debug!(error = %err, "schema resolution pass rolled back");

            Err(err)
        }
    }
}

fn build_pass(
    state: &mut RegistryState,
    roots: &[ModelType],
) -> Result<(Vec<EntityId>, Vec<Diagnostic>), Error> {
    let mut created = Vec::new();

    for &model in roots {
        if state.lookup(model).is_none() {
            created.push(state.process_model(model)?);
        }
    }

    discover(state, &mut created)?;
    check_entity_names(state, &created)?;
    fill_destinations(state, &created)?;

    let mut diagnostics = Vec::new();
    inverse::pair(&mut state.entities, &created, &mut diagnostics)?;

    Ok((created, diagnostics))
}

// Worklist over `created`; stops when no relationship names an unknown type.
fn discover(state: &mut RegistryState, created: &mut Vec<EntityId>) -> Result<(), Error> {
    let mut cursor = 0;

    while cursor < created.len() {
        let targets: Vec<ModelType> = state
            .get(created[cursor])
            .relationships()
            .iter()
            .filter_map(|relationship| relationship.target_model())
            .collect();

        for model in targets {
            if state.lookup(model).is_none() {
                created.push(state.process_model(model)?);
            }
        }

        cursor += 1;
    }

    Ok(())
}

fn check_entity_names(state: &RegistryState, created: &[EntityId]) -> Result<(), RegistryError> {
    let mut seen: HashMap<&str, ModelType> = HashMap::new();

    for &id in created {
        let entity = state.get(id);

        if let Some(first) = seen.insert(entity.name(), entity.backing_type()) {
            return Err(RegistryError::DuplicateEntityName {
                name: entity.name().to_string(),
                first: first.type_name(),
                second: entity.backing_type().type_name(),
            });
        }
    }

    Ok(())
}

fn fill_destinations(state: &mut RegistryState, created: &[EntityId]) -> Result<(), RegistryError> {
    for &id in created {
        let mut fills = Vec::new();

        for (index, relationship) in state.get(id).relationships().iter().enumerate() {
            if relationship.destination_entity().is_some() {
                continue;
            }

            let Some(target) = relationship
                .target_model()
                .and_then(|model| state.lookup(model))
            else {
                return Err(RegistryError::UnresolvedDestination {
                    entity: state.get(id).name().to_string(),
                    relationship: relationship.name().to_string(),
                });
            };

            fills.push((index, target, state.get(target).name().to_string()));
        }

        let entity = &mut state.entities[id.index()];
        for (index, target, name) in fills {
            if let Some(relationship) = entity.relationship_mut(index) {
                relationship.set_destination(name, target);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        finalize::Finalizable,
        node::{Attribute, AttributeOptions},
        test_fixtures::{
            ambiguous::{Department, Employee},
            broken::{Dangling, DuplicateName, SameNameLeft},
            graph::Node,
            no_inverse,
            person_address::{Address, Person},
            todo::{Tag, ToDo, ToDoList},
            unique::Badge,
        },
        types::AttributeKind,
    };
    use proptest::prelude::*;

    fn model<M: crate::model::PersistentModel>() -> ModelType {
        ModelType::of::<M>()
    }

    #[test]
    fn person_address_inverse_is_symmetric() {
        let registry = SchemaRegistry::new();
        let person = registry.entity_for(model::<Person>());

        let addresses = person
            .relationship("addresses")
            .expect("Person should declare addresses");
        assert_eq!(addresses.inverse_name(), Some("person"));
        assert_eq!(addresses.destination(), "Address");

        let destination = registry
            .entity(addresses.destination_entity().expect("destination should be set"))
            .expect("destination should be in the arena");
        assert_eq!(destination.name(), "Address");

        let back = destination
            .relationship("person")
            .expect("Address should declare person");
        assert_eq!(back.inverse_name(), Some("addresses"));
        assert_eq!(back.destination(), "Person");

        let inverse = back
            .inverse_relationship()
            .expect("inverse link should be set");
        let owner = registry
            .entity(inverse.entity)
            .expect("inverse owner should be in the arena");
        assert_eq!(owner.name(), "Person");
    }

    #[test]
    fn resolving_person_discovers_address() {
        let registry = SchemaRegistry::new();
        let resolved = registry.resolve(&[model::<Person>()]);

        assert_eq!(resolved.len(), 1);
        assert!(registry.is_resolved(model::<Address>()));

        let address = registry.entity_for(model::<Address>());
        assert_eq!(address.attributes().len(), 2);
        assert!(address.attribute("appartment").is_some_and(Attribute::is_optional));
    }

    #[test]
    fn resolve_is_idempotent() {
        let registry = SchemaRegistry::new();
        let roots = [model::<Person>(), model::<Address>()];

        let first = registry.resolve(&roots);
        let second = registry.resolve(&roots);

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.name(), b.name());
            assert_eq!(a.attributes().len(), b.attributes().len());
            assert_eq!(a.relationships().len(), b.relationships().len());
            assert_eq!(a.object_id(), b.object_id());
        }
    }

    #[test]
    fn second_pass_reports_no_diagnostics_for_frozen_types() {
        let registry = SchemaRegistry::new();
        registry.resolve(&[model::<ToDoList>()]);

        let resolution = registry
            .try_resolve(&[model::<ToDo>(), model::<Tag>()])
            .expect("cached types should resolve");

        assert!(resolution.diagnostics.is_empty());
        assert_eq!(resolution.entities.len(), 2);
    }

    #[test]
    fn resolved_entities_are_finalized() {
        let registry = SchemaRegistry::new();
        let person = registry.entity_for(model::<Person>());

        assert!(person.is_finalized());
        assert!(person.attributes().iter().all(Finalizable::is_finalized));
        assert!(person.relationships().iter().all(Finalizable::is_finalized));
    }

    #[test]
    #[should_panic(expected = "attempt to modify finalized relationship 'addresses'")]
    fn resolved_relationships_reject_writes() {
        let registry = SchemaRegistry::new();
        let person = registry.entity_for(model::<Person>());
        let mut addresses = person.relationships()[0].clone();

        addresses.set_inverse_name(None);
    }

    #[test]
    #[should_panic(expected = "attempt to modify finalized attribute 'code'")]
    fn resolved_attributes_reject_writes() {
        let registry = SchemaRegistry::new();
        let badge = registry.entity_for(model::<Badge>());
        let mut code = badge
            .attribute("code")
            .expect("code should be resolved")
            .clone();

        code.set_options(AttributeOptions::default());
    }

    #[test]
    fn attribute_options_survive_resolution() {
        let registry = SchemaRegistry::new();
        let badge = registry.entity_for(model::<Badge>());

        let code = badge.attribute("code").expect("code should be resolved");
        assert!(code.options().external_storage);
        assert!(code.options().allows_cloud_encryption);
        assert_eq!(badge.uniqueness_constraints(), &[vec!["holder".to_string()]]);

        let holder = badge.relationship("holder").expect("holder should be resolved");
        assert_eq!(holder.destination(), "UniquePerson");
    }

    #[test]
    #[should_panic(expected = "attempt to modify finalized entity 'Person'")]
    fn resolved_entities_reject_writes() {
        let registry = SchemaRegistry::new();
        let mut person = registry.entity_for(model::<Person>());

        person.push_property(crate::node::Property::Attribute(Attribute::new(
            "nickname",
            AttributeKind::String,
            true,
        )));
    }

    #[test]
    fn missing_inverse_is_a_warning_only() {
        let registry = SchemaRegistry::new();
        let resolution = registry
            .try_resolve(&[model::<no_inverse::Address>()])
            .expect("one-directional relationships are valid");

        let address = &resolution.entities[0];
        let person = address.relationship("person").expect("person relationship");
        assert_eq!(person.inverse_name(), None);
        assert!(person.inverse_relationship().is_none());
        assert_eq!(person.destination(), "Person");

        assert_eq!(
            resolution.diagnostics,
            vec![Diagnostic::NoInverse {
                entity: "Address".to_string(),
                relationship: "person".to_string(),
                destination: "Person".to_string(),
            }]
        );
    }

    #[test]
    fn ambiguous_candidates_pick_the_first_declared() {
        let registry = SchemaRegistry::new();
        let resolution = registry
            .try_resolve(&[model::<Department>()])
            .expect("ambiguity is not fatal");

        let department = &resolution.entities[0];
        let employees = department.relationship("employees").expect("employees");
        assert_eq!(employees.inverse_name(), Some("managed"));

        let employee = registry.entity_for(model::<Employee>());
        assert_eq!(
            employee.relationship("department").and_then(|r| r.inverse_name()),
            Some("employees")
        );

        assert!(matches!(
            &resolution.diagnostics[..],
            [
                Diagnostic::AmbiguousInverse { chosen, candidates, .. },
                Diagnostic::MismatchedInverse { relationship, .. },
            ] if chosen == "department"
                && candidates.len() == 2
                && relationship == "managed"
        ));
    }

    #[test]
    fn todo_list_pairs_entries_and_leaves_tags_one_directional() {
        let registry = SchemaRegistry::new();
        let resolution = registry
            .try_resolve(&[model::<ToDoList>()])
            .expect("todo schema should resolve");

        let list = &resolution.entities[0];
        assert_eq!(
            list.relationship("entries").and_then(|r| r.inverse_name()),
            Some("list")
        );

        let todo = registry.entity_for(model::<ToDo>());
        let tags = todo.relationship("tags").expect("tags");
        assert!(tags.is_ordered());
        assert_eq!(tags.destination(), "Tag");
        assert_eq!(tags.inverse_name(), None);

        assert_eq!(resolution.diagnostics.len(), 1);
        assert_eq!(resolution.diagnostics[0].relationship(), "tags");
    }

    #[test]
    fn self_referential_relationships_pair_within_one_entity() {
        let registry = SchemaRegistry::new();
        let node = registry.entity_for(model::<Node>());

        let parent = node.relationship("parent").expect("parent");
        let children = node.relationship("children").expect("children");

        assert_eq!(parent.inverse_name(), Some("children"));
        assert_eq!(children.inverse_name(), Some("parent"));
        assert_eq!(parent.destination(), "Node");
        assert!(parent.is_optional());
        assert!(children.is_to_many());
    }

    #[test]
    fn missing_explicit_inverse_fails_and_rolls_back() {
        let registry = SchemaRegistry::new();
        let err = registry
            .try_resolve(&[model::<Dangling>()])
            .expect_err("unknown inverse token should fail");

        assert!(matches!(
            err,
            Error::RegistryError(RegistryError::InverseNotFound { ref destination, .. })
                if destination == "Tag"
        ));
        assert!(!registry.is_resolved(model::<Dangling>()));
        assert!(!registry.is_resolved(model::<Tag>()));
        assert!(registry.entity(EntityId(0)).is_none());
    }

    #[test]
    fn build_errors_surface_through_the_registry() {
        let registry = SchemaRegistry::new();
        registry.resolve(&[model::<Person>()]);

        let err = registry
            .try_resolve(&[model::<DuplicateName>()])
            .expect_err("duplicate property should fail");

        assert!(matches!(err, Error::BuildError(_)));
        assert!(registry.entity(EntityId(2)).is_none());
        assert!(registry.is_resolved(model::<Person>()));
    }

    #[test]
    fn duplicate_entity_names_in_one_pass_fail() {
        let registry = SchemaRegistry::new();
        let err = registry
            .try_resolve(&[model::<SameNameLeft>()])
            .expect_err("two types named Shadow should fail");

        assert!(err.to_string().contains("entity name 'Shadow'"));
    }

    #[test]
    #[should_panic(expected = "schema resolution failed")]
    fn resolve_panics_on_malformed_declarations() {
        let registry = SchemaRegistry::new();

        let _ = registry.resolve(&[model::<Dangling>()]);
    }

    #[test]
    fn closure_follows_destination_links() {
        let registry = SchemaRegistry::new();
        let closure = registry
            .resolve_closure(&[model::<ToDoList>()])
            .expect("todo schema should resolve");

        let names: Vec<&str> = closure.iter().map(Entity::name).collect();
        assert_eq!(names, ["ToDoList", "ToDo", "Tag"]);
    }

    #[test]
    fn every_resolved_relationship_has_a_destination_entity() {
        let registry = SchemaRegistry::new();
        let closure = registry
            .resolve_closure(&[model::<ToDoList>(), model::<Node>()])
            .expect("schemas should resolve");

        for entity in &closure {
            for relationship in entity.relationships() {
                let target = relationship
                    .destination_entity()
                    .expect("destination entity should be filled");
                let destination = registry
                    .entity(target)
                    .expect("destination should be in the arena");
                assert_eq!(destination.name(), relationship.destination());
            }
        }
    }

    #[test]
    fn uniqueness_survives_fresh_registries() {
        for _ in 0..2 {
            let registry = SchemaRegistry::new();
            let tag = registry.entity_for(model::<Tag>());

            assert_eq!(tag.uniqueness_constraints(), &[vec!["label".to_string()]]);
        }
    }

    fn inverse_names(registry: &SchemaRegistry) -> Vec<(String, String, Option<String>)> {
        [
            model::<Person>(),
            model::<Address>(),
            model::<ToDoList>(),
            model::<ToDo>(),
            model::<Tag>(),
        ]
        .into_iter()
        .flat_map(|model| {
            let entity = registry.entity_for(model);
            entity
                .relationships()
                .iter()
                .map(|r| {
                    (
                        entity.name().to_string(),
                        r.name().to_string(),
                        r.inverse_name().map(str::to_string),
                    )
                })
                .collect::<Vec<_>>()
        })
        .collect()
    }

    proptest! {
        #[test]
        fn pairing_does_not_depend_on_root_order(
            roots in Just(vec![
                model::<Person>(),
                model::<Address>(),
                model::<ToDoList>(),
                model::<ToDo>(),
                model::<Tag>(),
            ])
            .prop_shuffle()
        ) {
            let baseline = SchemaRegistry::new();
            baseline.resolve(&[model::<Person>(), model::<ToDoList>()]);

            let shuffled = SchemaRegistry::new();
            shuffled.resolve(&roots);

            prop_assert_eq!(inverse_names(&baseline), inverse_names(&shuffled));
        }
    }
}
