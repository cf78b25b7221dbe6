use crate::precondition::Precondition;
use crate::recipe::{CATALOG, Recipe, lookup_recipe};
use retype_types::TypeInterner;
use std::time::Duration;

#[test]
fn test_catalog_lookup() {
    assert_eq!(CATALOG.len(), 3);
    for spec in CATALOG {
        assert_eq!(lookup_recipe(spec.id).map(|s| s.id), Some(spec.id));
    }
    assert!(lookup_recipe("no-such-recipe").is_none());
}

#[test]
fn test_builtin_recipe_metadata() {
    let types = TypeInterner::new();
    let recipe = Recipe::builtin(&types, "no-guava-immutable-list-of").expect("builtin");

    assert_eq!(recipe.display_name(), "Prefer `List.of(..)` in Java 9 or higher");
    assert_eq!(
        recipe.description(),
        "Replaces `ImmutableList.of(..)` if the returned type is immediately down-cast."
    );
    assert_eq!(
        recipe.estimated_effort_per_occurrence(),
        Duration::from_secs(600)
    );
    assert_eq!(
        &*recipe.rule.source_name(&types),
        "com.google.common.collect.ImmutableList"
    );
    assert_eq!(&*recipe.rule.target_name(&types), "java.util.List");
    assert!(!recipe.rule.strict_outer_calls);
}

#[test]
fn test_short_names_are_derived_independently() {
    let types = TypeInterner::new();
    let recipe = Recipe::custom(&types, "custom", "org.legacy.collect.OldList", "java.util.List")
        .with_min_java_version(11)
        .with_factory_method(&types, "copyOf");

    assert_eq!(recipe.display_name(), "Prefer `List.copyOf(..)` in Java 11 or higher");
    assert_eq!(
        recipe.description(),
        "Replaces `OldList.copyOf(..)` if the returned type is immediately down-cast."
    );
    assert_eq!(recipe.rule.factory_method, types.intern_name("copyOf"));
}

#[test]
fn test_recipe_precondition_combines_version_and_type() {
    let types = TypeInterner::new();
    let recipe = Recipe::builtin(&types, "no-guava-immutable-set-of").expect("builtin");
    assert_eq!(
        recipe.precondition().describe(&types),
        "uses Java 9 or higher and uses type com.google.common.collect.ImmutableSet"
    );
}
