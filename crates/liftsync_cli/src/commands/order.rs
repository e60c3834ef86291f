//! Order command implementation.

use crate::ScopeArg;
use liftsync_core::{EntityType, ScopeKind};
use liftsync_engine::standard_order;

/// Entity types synchronized for `scope`, in run order.
pub fn entity_order(scope: ScopeArg) -> Result<Vec<EntityType>, Box<dyn std::error::Error>> {
    let order = standard_order()?;
    let keep = |entity_type: &EntityType| match scope {
        ScopeArg::System => entity_type.scope_kind() == ScopeKind::System,
        ScopeArg::User => entity_type.scope_kind() == ScopeKind::User,
        ScopeArg::All => true,
    };
    let mut system: Vec<EntityType> = order
        .iter()
        .copied()
        .filter(|t| t.scope_kind() == ScopeKind::System && keep(t))
        .collect();
    let user = order
        .iter()
        .copied()
        .filter(|t| t.scope_kind() == ScopeKind::User && keep(t));
    system.extend(user);
    Ok(system)
}

/// Runs the order command.
pub fn run(scope: ScopeArg) -> Result<(), Box<dyn std::error::Error>> {
    for (position, entity_type) in entity_order(scope)?.into_iter().enumerate() {
        println!(
            "{:>2}. {:<20} {:<7} {}",
            position + 1,
            entity_type.as_str(),
            match entity_type.scope_kind() {
                ScopeKind::System => "system",
                ScopeKind::User => "user",
            },
            entity_type.collection()
        );
    }
    Ok(())
}
