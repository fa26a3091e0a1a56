//! Integration-level settings with default fallback.

mod common;

use common::RecordingSink;
use config_resolver::{
    CacheNormalizer, Descriptor, IntegrationConfiguration, Pattern, PatternResolver, Resolver,
    StructuralResolver,
};
use regex::Regex;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq)]
struct TracingSettings {
    service_name: Option<String>,
    split_by_instance: bool,
}

#[test]
fn exact_integration_round_trip() {
    let integration: IntegrationConfiguration<Resolver<String, Arc<TracingSettings>>, _> =
        IntegrationConfiguration::new("exact", Resolver::new());

    integration.configure(Some("orders".to_string()), |settings: &mut TracingSettings| {
        settings.service_name = Some("orders-service".to_string());
    });

    assert_eq!(
        integration
            .configuration(Some("orders".to_string()))
            .service_name
            .as_deref(),
        Some("orders-service")
    );
    assert_eq!(
        *integration.configuration(Some("billing".to_string())),
        TracingSettings::default()
    );
    assert_eq!(integration.name(), "exact");
}

#[test]
fn pattern_integration_with_default_override() {
    let resolver: PatternResolver<Arc<TracingSettings>> = PatternResolver::new();
    let integration: IntegrationConfiguration<_, TracingSettings> =
        IntegrationConfiguration::new("http", resolver);

    integration.configure(None, |settings| settings.split_by_instance = true);
    integration.configure(
        Some(Pattern::regex(Regex::new(r"\.internal$").unwrap())),
        |settings| settings.service_name = Some("internal-http".to_string()),
    );

    let internal = integration.resolve("billing.internal");
    let external = integration.resolve("example.com");

    assert_eq!(internal.service_name.as_deref(), Some("internal-http"));
    assert!(!internal.split_by_instance);
    assert!(external.split_by_instance);
    assert!(integration.configuration_for("billing.internal"));
    assert!(!integration.configuration_for("example.com"));
}

#[test]
fn structural_integration_reset() {
    let sink = RecordingSink::shared();
    let integration: IntegrationConfiguration<_, TracingSettings> = IntegrationConfiguration::new(
        "cache",
        StructuralResolver::new(CacheNormalizer::new()).with_sink(sink.clone()),
    );

    integration.configure(Some(Descriptor::url("redis://sessions:6379/1")), |settings| {
        settings.service_name = Some("sessions-cache".to_string());
    });
    let default = integration.default_configuration();

    let probe = Descriptor::fields([("host", "sessions"), ("db", "1")]);
    assert_eq!(
        integration.resolve(&probe).service_name.as_deref(),
        Some("sessions-cache")
    );

    // a probe that fails to normalize falls back to the default
    let fallback = integration.resolve(&Descriptor::url("http://sessions"));
    assert!(Arc::ptr_eq(&fallback, &default));
    assert_eq!(sink.errors().len(), 1);

    integration.reset();
    assert!(integration.configurations().is_empty());
    assert!(!Arc::ptr_eq(&integration.default_configuration(), &default));
    assert_eq!(integration.resolve(&probe).service_name, None);
}

#[test]
fn unnormalizable_matcher_is_reported_once() {
    let sink = RecordingSink::shared();
    let integration: IntegrationConfiguration<_, TracingSettings> = IntegrationConfiguration::new(
        "cache",
        StructuralResolver::new(CacheNormalizer::new()).with_sink(sink.clone()),
    );

    let configured = integration.configure(Some(Descriptor::url("://bad")), |settings| {
        settings.split_by_instance = true;
    });

    assert!(configured.split_by_instance);
    assert!(integration.configurations().is_empty());

    let errors = sink.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].operation, "update");
}

#[test]
fn configure_twice_updates_in_place() {
    let sink = RecordingSink::shared();
    let integration: IntegrationConfiguration<_, TracingSettings> = IntegrationConfiguration::new(
        "cache",
        StructuralResolver::new(CacheNormalizer::new()).with_sink(sink.clone()),
    );
    let matcher = || Descriptor::url("redis://sessions:6379/1");

    integration.configure(Some(matcher()), |settings| {
        settings.service_name = Some("sessions".to_string());
    });
    let updated = integration.configure(Some(matcher()), |settings| {
        settings.split_by_instance = true;
    });

    assert_eq!(updated.service_name.as_deref(), Some("sessions"));
    assert!(updated.split_by_instance);
    assert_eq!(integration.configurations().len(), 1);
    assert!(sink.errors().is_empty());

    let messages: Vec<_> = sink.debugs().into_iter().map(|d| d.message).collect();
    assert_eq!(messages, ["Registered matcher", "Replaced existing matcher"]);
}
