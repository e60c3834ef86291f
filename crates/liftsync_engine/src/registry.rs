//! Registry of entity pipelines in dependency order.

use crate::error::{SyncError, SyncResult};
use crate::pipeline::{EntityPipeline, EntitySync};
use crate::remote::RemoteStore;
use liftsync_convert::{
    BodyMeasurementConverter, ExerciseConverter, ExerciseLogConverter, ExerciseUsageConverter,
    PersonalRecordConverter, ProgrammeConverter, ProgrammeExerciseConverter,
    ProgrammeProgressConverter, ProgrammeWeekConverter, ProgrammeWorkoutConverter,
    SetLogConverter, UserProfileConverter, WorkoutConverter,
};
use liftsync_core::{EntityType, ScopeKind};
use liftsync_store::LocalCollections;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::debug;

/// Sorts entity types so that every type follows its dependencies.
///
/// `nodes` pairs each type with its dependencies. Among types whose
/// dependencies are satisfied, the one declared first goes first.
///
/// # Errors
///
/// Returns [`SyncError::Registry`] for duplicate types, dependencies on
/// undeclared types, and cycles.
pub fn dependency_order(nodes: &[(EntityType, Vec<EntityType>)]) -> SyncResult<Vec<EntityType>> {
    let mut position = HashMap::with_capacity(nodes.len());
    for (index, (entity_type, _)) in nodes.iter().enumerate() {
        if position.insert(*entity_type, index).is_some() {
            return Err(SyncError::Registry(format!("{entity_type} registered twice")));
        }
    }

    let mut indegree = vec![0usize; nodes.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    for (index, (entity_type, dependencies)) in nodes.iter().enumerate() {
        for dependency in dependencies {
            let Some(&dep_index) = position.get(dependency) else {
                return Err(SyncError::Registry(format!(
                    "{entity_type} depends on unregistered {dependency}"
                )));
            };
            indegree[index] += 1;
            dependents[dep_index].push(index);
        }
    }

    let mut ready: BTreeSet<usize> = (0..nodes.len()).filter(|&i| indegree[i] == 0).collect();
    let mut order = Vec::with_capacity(nodes.len());
    while let Some(index) = ready.pop_first() {
        order.push(nodes[index].0);
        for &dependent in &dependents[index] {
            indegree[dependent] -= 1;
            if indegree[dependent] == 0 {
                ready.insert(dependent);
            }
        }
    }

    if order.len() != nodes.len() {
        let stuck: Vec<String> = nodes
            .iter()
            .enumerate()
            .filter(|(index, _)| indegree[*index] > 0)
            .map(|(_, (entity_type, _))| entity_type.to_string())
            .collect();
        return Err(SyncError::Registry(format!(
            "dependency cycle among {}",
            stuck.join(", ")
        )));
    }
    Ok(order)
}

/// Dependency order of every built-in entity type.
pub fn standard_order() -> SyncResult<Vec<EntityType>> {
    let nodes: Vec<_> = EntityType::ALL
        .iter()
        .map(|entity_type| (*entity_type, entity_type.dependencies().to_vec()))
        .collect();
    dependency_order(&nodes)
}

/// Pipelines partitioned by scope, each partition in dependency order.
pub struct SyncRegistry {
    system: Vec<Arc<dyn EntitySync>>,
    user: Vec<Arc<dyn EntitySync>>,
}

impl SyncRegistry {
    /// Starts an empty registry.
    pub fn builder() -> SyncRegistryBuilder {
        SyncRegistryBuilder::default()
    }

    /// Builds the registry of every built-in entity type.
    pub fn standard(remote: Arc<dyn RemoteStore>, local: &LocalCollections) -> SyncResult<Self> {
        Self::builder()
            .register(EntityPipeline::new(
                ExerciseConverter::catalog(),
                remote.clone(),
                local.exercises.clone(),
            ))
            .register(EntityPipeline::new(
                UserProfileConverter,
                remote.clone(),
                local.user_profiles.clone(),
            ))
            .register(EntityPipeline::new(
                ExerciseConverter::custom(),
                remote.clone(),
                local.custom_exercises.clone(),
            ))
            .register(EntityPipeline::new(
                BodyMeasurementConverter,
                remote.clone(),
                local.body_measurements.clone(),
            ))
            .register(EntityPipeline::new(
                ProgrammeConverter,
                remote.clone(),
                local.programmes.clone(),
            ))
            .register(EntityPipeline::new(
                ProgrammeWeekConverter,
                remote.clone(),
                local.programme_weeks.clone(),
            ))
            .register(EntityPipeline::new(
                ProgrammeWorkoutConverter,
                remote.clone(),
                local.programme_workouts.clone(),
            ))
            .register(EntityPipeline::new(
                ProgrammeExerciseConverter,
                remote.clone(),
                local.programme_exercises.clone(),
            ))
            .register(EntityPipeline::new(
                ProgrammeProgressConverter,
                remote.clone(),
                local.programme_progress.clone(),
            ))
            .register(EntityPipeline::new(
                WorkoutConverter,
                remote.clone(),
                local.workouts.clone(),
            ))
            .register(EntityPipeline::new(
                ExerciseLogConverter,
                remote.clone(),
                local.exercise_logs.clone(),
            ))
            .register(EntityPipeline::new(
                SetLogConverter,
                remote.clone(),
                local.set_logs.clone(),
            ))
            .register(EntityPipeline::new(
                PersonalRecordConverter,
                remote.clone(),
                local.personal_records.clone(),
            ))
            .register(EntityPipeline::new(
                ExerciseUsageConverter,
                remote,
                local.exercise_usage.clone(),
            ))
            .build()
    }

    /// System-scope pipelines in run order.
    pub fn system(&self) -> &[Arc<dyn EntitySync>] {
        &self.system
    }

    /// User-scope pipelines in run order.
    pub fn user(&self) -> &[Arc<dyn EntitySync>] {
        &self.user
    }

    /// Every entity type, system partition first.
    pub fn entity_types(&self) -> Vec<EntityType> {
        self.system
            .iter()
            .chain(&self.user)
            .map(|pipeline| pipeline.entity_type())
            .collect()
    }
}

/// Collects pipelines for a [`SyncRegistry`].
#[derive(Default)]
pub struct SyncRegistryBuilder {
    pipelines: Vec<Arc<dyn EntitySync>>,
}

impl SyncRegistryBuilder {
    /// Adds a pipeline. Declaration order breaks dependency ties.
    pub fn register(self, pipeline: impl EntitySync + 'static) -> Self {
        self.register_arc(Arc::new(pipeline))
    }

    /// Adds a shared pipeline.
    pub fn register_arc(mut self, pipeline: Arc<dyn EntitySync>) -> Self {
        self.pipelines.push(pipeline);
        self
    }

    /// Sorts the pipelines and splits them by scope.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Registry`] if the dependency graph is invalid or
    /// a system-scope type depends on a user-scope type.
    pub fn build(self) -> SyncResult<SyncRegistry> {
        let nodes: Vec<_> = self
            .pipelines
            .iter()
            .map(|pipeline| (pipeline.entity_type(), pipeline.dependencies()))
            .collect();
        let order = dependency_order(&nodes)?;

        for (entity_type, dependencies) in &nodes {
            if entity_type.scope_kind() != ScopeKind::System {
                continue;
            }
            if let Some(user_dep) = dependencies
                .iter()
                .find(|dependency| dependency.scope_kind() == ScopeKind::User)
            {
                return Err(SyncError::Registry(format!(
                    "system entity {entity_type} depends on user entity {user_dep}"
                )));
            }
        }

        let mut by_type: HashMap<EntityType, Arc<dyn EntitySync>> = self
            .pipelines
            .into_iter()
            .map(|pipeline| (pipeline.entity_type(), pipeline))
            .collect();

        let mut system = Vec::new();
        let mut user = Vec::new();
        for entity_type in order {
            let Some(pipeline) = by_type.remove(&entity_type) else {
                continue;
            };
            match entity_type.scope_kind() {
                ScopeKind::System => system.push(pipeline),
                ScopeKind::User => user.push(pipeline),
            }
        }

        debug!(system = system.len(), user = user.len(), "registry built");
        Ok(SyncRegistry { system, user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{PipelineContext, PipelineReport};
    use async_trait::async_trait;

    struct Declared {
        entity_type: EntityType,
        dependencies: Vec<EntityType>,
    }

    #[async_trait]
    impl EntitySync for Declared {
        fn entity_type(&self) -> EntityType {
            self.entity_type
        }

        fn dependencies(&self) -> Vec<EntityType> {
            self.dependencies.clone()
        }

        async fn run(&self, _ctx: &PipelineContext<'_>) -> SyncResult<PipelineReport> {
            unreachable!("registry tests never run pipelines")
        }
    }

    fn declared(entity_type: EntityType, dependencies: &[EntityType]) -> Declared {
        Declared {
            entity_type,
            dependencies: dependencies.to_vec(),
        }
    }

    #[test]
    fn standard_order_respects_dependencies() {
        let order = standard_order().unwrap();
        assert_eq!(order.len(), EntityType::ALL.len());
        for (index, entity_type) in order.iter().enumerate() {
            for dependency in entity_type.dependencies() {
                let dep_index = order.iter().position(|t| t == dependency).unwrap();
                assert!(dep_index < index, "{dependency} must precede {entity_type}");
            }
        }
    }

    #[test]
    fn ties_follow_declaration_order() {
        let nodes = vec![
            (EntityType::SetLog, vec![EntityType::Workout]),
            (EntityType::Programme, vec![]),
            (EntityType::Workout, vec![]),
        ];
        assert_eq!(
            dependency_order(&nodes).unwrap(),
            vec![EntityType::Programme, EntityType::Workout, EntityType::SetLog]
        );
    }

    #[test]
    fn cycles_are_rejected() {
        let result = SyncRegistry::builder()
            .register(declared(EntityType::Workout, &[EntityType::SetLog]))
            .register(declared(EntityType::SetLog, &[EntityType::Workout]))
            .register(declared(EntityType::Programme, &[]))
            .build();
        let Err(SyncError::Registry(message)) = result else {
            panic!("expected a registry error");
        };
        assert!(message.contains("cycle"));
        assert!(message.contains("workout"));
        assert!(!message.contains("programme"));
    }

    #[test]
    fn unknown_dependencies_are_rejected() {
        let result = SyncRegistry::builder()
            .register(declared(EntityType::SetLog, &[EntityType::ExerciseLog]))
            .build();
        assert!(matches!(result, Err(SyncError::Registry(_))));
    }

    #[test]
    fn duplicates_are_rejected() {
        let result = SyncRegistry::builder()
            .register(declared(EntityType::Workout, &[]))
            .register(declared(EntityType::Workout, &[]))
            .build();
        assert!(matches!(result, Err(SyncError::Registry(_))));
    }

    #[test]
    fn partitions_by_scope() {
        let registry = SyncRegistry::builder()
            .register(declared(EntityType::ExerciseLog, &[EntityType::Exercise]))
            .register(declared(EntityType::Exercise, &[]))
            .build()
            .unwrap();

        assert_eq!(registry.system().len(), 1);
        assert_eq!(registry.user().len(), 1);
        assert_eq!(
            registry.entity_types(),
            vec![EntityType::Exercise, EntityType::ExerciseLog]
        );
    }

    #[test]
    fn system_types_cannot_depend_on_user_types() {
        let result = SyncRegistry::builder()
            .register(declared(EntityType::Workout, &[]))
            .register(declared(EntityType::Exercise, &[EntityType::Workout]))
            .build();
        assert!(matches!(result, Err(SyncError::Registry(_))));
    }
}
