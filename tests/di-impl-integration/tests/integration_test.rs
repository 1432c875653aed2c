//! 注册扫描的端到端集成测试
//!
//! 有效样例和无效样例各自使用独立的命名空间，彼此之间不共享服务类型。

use di_abstractions::{
    CandidateClass, KeyedComponentFactory, RegistrationAttribute, COMPONENT_FACTORY_CONTRACT,
};
use di_impl::{
    InMemoryTypeCatalog, InterceptorChain, KeyComparison, RegistrationError, RegistrationFailure,
};
use infrastructure_common::{Lifetime, TrackerError, TypeDefinition, TypeRef, ValidationError};
use infrastructure_composition::{
    CompositionError, ErrorPolicy, RegistrationManifest, RegistrationOptions, RegistrationPlan,
    RegistrationScanner,
};
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

fn init_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

fn named(path: &str) -> TypeRef {
    TypeRef::named(path)
}

fn generic(path: &str, argument: TypeRef) -> TypeRef {
    TypeRef::generic(path, [argument])
}

fn t() -> TypeRef {
    TypeRef::param("T")
}

fn implementing(class: &str, interfaces: &[&str]) -> TypeDefinition {
    interfaces
        .iter()
        .fold(TypeDefinition::class(named(class)), |definition, interface| {
            definition.with_interface(named(interface))
        })
}

fn interfaces(paths: &[&str]) -> Vec<TypeDefinition> {
    paths
        .iter()
        .map(|path| TypeDefinition::interface(named(path)))
        .collect()
}

/// 名称以 Intercepted 开头的实现类型会被拦截
fn interceptors() -> Arc<InterceptorChain<String>> {
    let mut chain = InterceptorChain::new();
    chain.register_interceptor(
        |service: &TypeRef, instance: String| format!("{}({})", service.short_name(), instance),
        |_: &RegistrationAttribute, implementation: &TypeRef| {
            implementation.short_name().starts_with("Intercepted")
        },
    );
    Arc::new(chain)
}

fn scanner(catalog: InMemoryTypeCatalog, options: RegistrationOptions) -> RegistrationScanner {
    init_logger();
    RegistrationScanner::new(Arc::new(catalog), options).with_interceptors(interceptors())
}

// ---------------------------------------------------------------------------
// 有效样例
// ---------------------------------------------------------------------------

fn valid_catalog() -> InMemoryTypeCatalog {
    let mut catalog: InMemoryTypeCatalog = interfaces(&[
        "valid::IService",
        "valid::IServiceWithMock",
        "valid::IFirstFor",
        "valid::ISecondFor",
        "valid::IDisposableService",
        "std::io::Write",
        "valid::IPlugin",
        "valid::IHandler",
        "valid::IConcreteService",
        "valid::IKeyedService",
        "valid::IProduct",
        "valid::IMultiple",
        "valid::IInterceptedService",
    ])
    .into_iter()
    .collect();

    for definition in [
        implementing("valid::Service", &["valid::IService"]),
        implementing("valid::ServiceWithMock", &["valid::IServiceWithMock"]),
        implementing("valid::MockServiceWithMock", &["valid::IServiceWithMock"]),
        implementing("valid::ServiceWithExplicitFor", &["valid::IFirstFor", "valid::ISecondFor"]),
        implementing("valid::DisposableService", &["valid::IDisposableService", "std::io::Write"]),
        TypeDefinition::class(named("valid::MyBaseClass")),
        TypeDefinition::class(named("valid::MyInheritedClass")).with_base(named("valid::MyBaseClass")),
        implementing("valid::PluginA", &["valid::IPlugin"]),
        implementing("valid::PluginB", &["valid::IPlugin"]),
        implementing("valid::PluginC", &["valid::IPlugin"]),
        implementing("valid::HandlerA", &["valid::IHandler"]),
        implementing("valid::HandlerB", &["valid::IHandler"]),
        implementing("valid::ConcreteService", &["valid::IConcreteService"]),
        implementing("valid::KeyedService1", &["valid::IKeyedService"]),
        implementing("valid::KeyedService2", &["valid::IKeyedService"]),
        implementing("valid::Product", &["valid::IProduct"]),
        TypeDefinition::class(named("valid::ProductFactory"))
            .with_interface(generic(COMPONENT_FACTORY_CONTRACT, named("valid::IProduct"))),
        implementing("valid::MultipleAttributes", &["valid::IMultiple"]),
        implementing("valid::InterceptedService", &["valid::IInterceptedService"]),
        // 开放泛型
        TypeDefinition::interface(generic("valid::IRepository", t())),
        TypeDefinition::class(generic("valid::Repository", t()))
            .with_interface(generic("valid::IRepository", t())),
        // 通过 GenericArgument 封闭的泛型
        TypeDefinition::interface(generic("valid::ICache", t())),
        TypeDefinition::class(generic("valid::Cache", t()))
            .with_interface(generic("valid::ICache", t())),
        // 泛型工厂
        TypeDefinition::interface(generic("valid::IGenericWithFactory", t())),
        TypeDefinition::class(generic("valid::GenericWithFactory", t()))
            .with_interface(generic("valid::IGenericWithFactory", t())),
        TypeDefinition::class(generic("valid::GenericWithFactoryFactory", t())).with_interface(
            generic(
                COMPONENT_FACTORY_CONTRACT,
                generic("valid::IGenericWithFactory", t()),
            ),
        ),
    ] {
        catalog.register(definition);
    }
    catalog
}

fn valid_candidates() -> Vec<CandidateClass> {
    vec![
        CandidateClass::new(named("valid::Service"))
            .with_attribute(RegistrationAttribute::per_request()),
        CandidateClass::new(named("valid::ServiceWithMock")).with_attribute(
            RegistrationAttribute::singleton().with_mock(named("valid::MockServiceWithMock")),
        ),
        CandidateClass::new(named("valid::ServiceWithExplicitFor"))
            .with_attribute(RegistrationAttribute::transient().with_for(named("valid::ISecondFor"))),
        CandidateClass::new(named("valid::DisposableService"))
            .with_attribute(RegistrationAttribute::singleton()),
        CandidateClass::new(named("valid::MyInheritedClass"))
            .with_attribute(RegistrationAttribute::scoped()),
        CandidateClass::new(named("valid::PluginA"))
            .with_attribute(RegistrationAttribute::singleton().in_collection().with_order(2)),
        CandidateClass::new(named("valid::PluginB"))
            .with_attribute(RegistrationAttribute::singleton().in_collection().with_order(1)),
        CandidateClass::new(named("valid::PluginC"))
            .with_attribute(RegistrationAttribute::singleton().in_collection()),
        CandidateClass::new(named("valid::HandlerA"))
            .with_attribute(RegistrationAttribute::transient().in_collection()),
        CandidateClass::new(named("valid::HandlerB"))
            .with_attribute(RegistrationAttribute::transient().in_collection()),
        CandidateClass::new(named("valid::ConcreteService"))
            .with_attribute(RegistrationAttribute::singleton().as_concrete()),
        CandidateClass::new(named("valid::KeyedService1"))
            .with_attribute(RegistrationAttribute::singleton().with_key("Service_1")),
        CandidateClass::new(named("valid::KeyedService2"))
            .with_attribute(RegistrationAttribute::singleton().with_key("Service_2")),
        CandidateClass::new(named("valid::Product")).with_attribute(
            RegistrationAttribute::singleton().with_factory(named("valid::ProductFactory")),
        ),
        CandidateClass::new(named("valid::MultipleAttributes"))
            .with_attribute(RegistrationAttribute::singleton().with_key("first"))
            .with_attribute(RegistrationAttribute::transient().with_key("second")),
        CandidateClass::new(generic("valid::Repository", t()))
            .with_attribute(RegistrationAttribute::transient()),
        CandidateClass::new(generic("valid::Cache", t())).with_attribute(
            RegistrationAttribute::singleton().with_generic_argument(named("valid::Order")),
        ),
        CandidateClass::new(generic("valid::GenericWithFactory", t())).with_attribute(
            RegistrationAttribute::singleton()
                .with_factory(generic("valid::GenericWithFactoryFactory", t()))
                .with_generic_argument(named("valid::Payload")),
        ),
        CandidateClass::new(named("valid::InterceptedService"))
            .with_attribute(RegistrationAttribute::singleton()),
        // 没有注册属性的类型不参与扫描
        CandidateClass::new(named("valid::Unmarked")),
    ]
}

fn valid_plan(options: RegistrationOptions) -> RegistrationPlan {
    scanner(valid_catalog(), options)
        .scan_strict(&valid_candidates())
        .unwrap_or_else(|error| panic!("有效样例不应失败:\n{}", error))
}

#[test]
fn test_valid_samples_scan_cleanly() {
    let plan = valid_plan(RegistrationOptions::default());

    assert_eq!(plan.failure_count, 0);
    assert_eq!(plan.registrations.len(), 11);
    assert_eq!(plan.collections.len(), 2);
    assert_eq!(plan.keyed.len(), 2);
    assert_eq!(plan.len(), 20);
}

#[test]
fn test_service_infers_single_interface() {
    let plan = valid_plan(RegistrationOptions::default());
    let registration = plan.registration(&named("valid::IService")).unwrap();

    assert_eq!(registration.to_type(), &named("valid::Service"));
    assert_eq!(registration.lifetime(), Lifetime::Scoped);
    assert!(!registration.is_concrete());
}

#[test]
fn test_explicit_for_and_excluded_namespaces() {
    let plan = valid_plan(RegistrationOptions::default());

    let explicit = plan.registration(&named("valid::ISecondFor")).unwrap();
    assert_eq!(explicit.to_type(), &named("valid::ServiceWithExplicitFor"));
    assert!(plan.registration(&named("valid::IFirstFor")).is_none());

    // std 命名空间中的接口不作为候选基类型
    let disposable = plan.registration(&named("valid::IDisposableService")).unwrap();
    assert_eq!(disposable.base_types(), &[named("valid::IDisposableService")]);
    assert!(plan.registration(&named("std::io::Write")).is_none());
}

#[test]
fn test_inherited_class_registers_base_class() {
    let plan = valid_plan(RegistrationOptions::default());
    let registration = plan.registration(&named("valid::MyBaseClass")).unwrap();

    assert_eq!(registration.to_type(), &named("valid::MyInheritedClass"));
    assert_eq!(registration.lifetime(), Lifetime::Scoped);
}

#[test]
fn test_concrete_registers_itself() {
    let plan = valid_plan(RegistrationOptions::default());
    let registration = plan.registration(&named("valid::ConcreteService")).unwrap();

    assert!(registration.is_concrete());
    assert_eq!(registration.from_type(), registration.to_type());
    assert!(plan.registration(&named("valid::IConcreteService")).is_none());
}

#[test]
fn test_singleton_collection_resolves_in_order() -> anyhow::Result<()> {
    let plan = valid_plan(RegistrationOptions::default());
    let plugins = plan.collection(&named("valid::IPlugin")).unwrap();
    assert_eq!(plugins.lifetime(), Lifetime::Singleton);
    assert_eq!(plugins.registered_orders(), vec![2, 1]);

    let resolve = || plugins.resolve_all(|member| Ok(member.implementation.short_name().to_string()));
    let first = resolve()?;
    assert_eq!(first, vec!["PluginB", "PluginA", "PluginC"]);
    assert_eq!(resolve()?, first);
    Ok(())
}

#[test]
fn test_transient_collection() {
    let plan = valid_plan(RegistrationOptions::default());
    let handlers = plan.collection(&named("valid::IHandler")).unwrap();

    assert_eq!(handlers.lifetime(), Lifetime::Transient);
    assert_eq!(handlers.members().len(), 2);
    assert!(handlers.registered_orders().is_empty());
}

#[test]
fn test_keyed_registrations() -> anyhow::Result<()> {
    let plan = valid_plan(RegistrationOptions::default());

    let factory = plan
        .keyed_registration(&named("valid::IKeyedService"))
        .cloned()
        .unwrap()
        .into_factory();
    assert_eq!(factory.get_by_key("Service_1")?, named("valid::KeyedService1"));
    assert_eq!(factory.get_by_key("Service_2")?, named("valid::KeyedService2"));
    assert!(factory.try_get_by_key("Service_3").is_none());
    assert!(factory.get_by_key("service_1").is_err());

    // 同一类型上的多个属性各自保留生命周期
    let multiple = plan.keyed_registration(&named("valid::IMultiple")).unwrap();
    assert_eq!(multiple.member("first").unwrap().lifetime, Lifetime::Singleton);
    assert_eq!(multiple.member("second").unwrap().lifetime, Lifetime::Transient);
    assert_eq!(multiple.keys().collect::<Vec<_>>(), vec!["first", "second"]);
    Ok(())
}

#[test]
fn test_factory_registrations() {
    let plan = valid_plan(RegistrationOptions::default());

    let product = plan.registration(&named("valid::IProduct")).unwrap();
    assert_eq!(product.factory_type(), Some(&named("valid::ProductFactory")));

    let closed = plan
        .registration(&generic("valid::IGenericWithFactory", named("valid::Payload")))
        .unwrap();
    assert_eq!(
        closed.factory_type(),
        Some(&generic("valid::GenericWithFactoryFactory", named("valid::Payload")))
    );
    assert_eq!(
        closed.to_type(),
        &generic("valid::GenericWithFactory", named("valid::Payload"))
    );
}

#[test]
fn test_open_and_closed_generics() {
    let plan = valid_plan(RegistrationOptions::default());

    let open = plan.registration(&generic("valid::IRepository", t())).unwrap();
    assert!(open.to_type().contains_generic_parameters());

    let closed = plan
        .registration(&generic("valid::ICache", named("valid::Order")))
        .unwrap();
    assert_eq!(closed.to_type().to_string(), "valid::Cache<valid::Order>");
    assert_eq!(closed.original_to_type(), &generic("valid::Cache", t()));
}

#[test]
fn test_interceptor_marks_registration() {
    let plan = valid_plan(RegistrationOptions::default());
    let registration = plan.registration(&named("valid::IInterceptedService")).unwrap();

    assert!(registration.is_intercepted());
    assert_eq!(
        interceptors().wrap("instance".to_string(), registration),
        "IInterceptedService(instance)"
    );
    assert!(!plan.registration(&named("valid::IService")).unwrap().is_intercepted());
}

#[test]
fn test_mock_mode_constructs_mock() {
    let live = valid_plan(RegistrationOptions::default());
    let registration = live.registration(&named("valid::IServiceWithMock")).unwrap();
    assert_eq!(registration.construction_type(), &named("valid::ServiceWithMock"));

    let mocked = valid_plan(RegistrationOptions::default().with_mock_mode(true));
    let registration = mocked.registration(&named("valid::IServiceWithMock")).unwrap();
    assert_eq!(registration.construction_type(), &named("valid::MockServiceWithMock"));
}

#[test]
fn test_no_excluded_namespaces_makes_disposable_ambiguous() {
    let options = RegistrationOptions {
        excluded_namespace_prefixes: Vec::new(),
        ..RegistrationOptions::default()
    };
    let error = scanner(valid_catalog(), options)
        .scan_strict(&valid_candidates())
        .unwrap_err();

    assert_eq!(error.failures().len(), 1);
    assert!(matches!(
        &error.failures()[0].error,
        RegistrationError::Validation(ValidationError::AmbiguousBaseType { candidates, .. })
            if candidates.len() == 2
    ));
}

// ---------------------------------------------------------------------------
// 无效样例
// ---------------------------------------------------------------------------

fn invalid_catalog() -> InMemoryTypeCatalog {
    let mut catalog: InMemoryTypeCatalog = interfaces(&[
        "invalid::IConcreteWithMock",
        "invalid::IKeyAndCollection",
        "invalid::IIncompatible",
        "invalid::IOrderWithoutCollection",
        "invalid::IMismatched",
        "invalid::IDuplicateOrder",
        "invalid::ILive",
        "invalid::IInterfaceMock",
        "invalid::IAmbiguousA",
        "invalid::IAmbiguousB",
        "invalid::IDuplicate",
    ])
    .into_iter()
    .collect();

    for definition in [
        implementing("invalid::ConcreteWithMock", &["invalid::IConcreteWithMock"]),
        implementing("invalid::KeyAndCollection", &["invalid::IKeyAndCollection"]),
        implementing("invalid::IncompatibleMock", &["invalid::IIncompatible"]),
        implementing("invalid::OrderWithoutCollection", &["invalid::IOrderWithoutCollection"]),
        implementing("invalid::MismatchedA", &["invalid::IMismatched"]),
        implementing("invalid::MismatchedB", &["invalid::IMismatched"]),
        implementing("invalid::DuplicateOrderA", &["invalid::IDuplicateOrder"]),
        implementing("invalid::DuplicateOrderB", &["invalid::IDuplicateOrder"]),
        implementing("invalid::LiveService", &["invalid::ILive"]),
        TypeDefinition::class(named("invalid::DerivedMock")).with_base(named("invalid::LiveService")),
        implementing("invalid::InterfaceMockService", &["invalid::IInterfaceMock"]),
        TypeDefinition::class(named("invalid::Recursive")),
        TypeDefinition::class(named("invalid::AmbiguousBase")),
        implementing("invalid::AmbiguousService", &["invalid::IAmbiguousA", "invalid::IAmbiguousB"])
            .with_base(named("invalid::AmbiguousBase")),
        TypeDefinition::class(named("invalid::InterceptedBase")),
        TypeDefinition::class(named("invalid::InterceptedBaseOnly"))
            .with_base(named("invalid::InterceptedBase")),
        implementing("invalid::DuplicateA", &["invalid::IDuplicate"]),
        implementing("invalid::DuplicateB", &["invalid::IDuplicate"]),
        TypeDefinition::interface(generic("invalid::IGenericNoArg", t())),
        TypeDefinition::class(generic("invalid::GenericNoArg", t()))
            .with_interface(generic("invalid::IGenericNoArg", t())),
    ] {
        catalog.register(definition);
    }
    catalog
}

fn invalid_candidates() -> Vec<CandidateClass> {
    vec![
        CandidateClass::new(named("invalid::ConcreteWithMock")).with_attribute(
            RegistrationAttribute::singleton()
                .as_concrete()
                .with_mock(named("invalid::MockConcrete")),
        ),
        CandidateClass::new(named("invalid::KeyAndCollection"))
            .with_attribute(RegistrationAttribute::singleton().in_collection().with_key("k")),
        CandidateClass::new(named("invalid::IncompatibleMock")).with_attribute(
            RegistrationAttribute::singleton().with_mock(named("invalid::UnrelatedMock")),
        ),
        CandidateClass::new(named("invalid::OrderWithoutCollection"))
            .with_attribute(RegistrationAttribute::singleton().with_order(3)),
        CandidateClass::new(named("invalid::MismatchedA"))
            .with_attribute(RegistrationAttribute::singleton().in_collection()),
        CandidateClass::new(named("invalid::MismatchedB"))
            .with_attribute(RegistrationAttribute::transient().in_collection()),
        CandidateClass::new(named("invalid::DuplicateOrderA"))
            .with_attribute(RegistrationAttribute::singleton().in_collection().with_order(1)),
        CandidateClass::new(named("invalid::DuplicateOrderB"))
            .with_attribute(RegistrationAttribute::singleton().in_collection().with_order(1)),
        CandidateClass::new(named("invalid::LiveService")).with_attribute(
            RegistrationAttribute::singleton().with_mock(named("invalid::DerivedMock")),
        ),
        CandidateClass::new(named("invalid::InterfaceMockService")).with_attribute(
            RegistrationAttribute::singleton().with_mock(named("invalid::IInterfaceMock")),
        ),
        CandidateClass::new(named("invalid::Recursive"))
            .with_attribute(RegistrationAttribute::singleton().with_for(named("invalid::Recursive"))),
        CandidateClass::new(named("invalid::AmbiguousService"))
            .with_attribute(RegistrationAttribute::singleton()),
        CandidateClass::new(named("invalid::InterceptedBaseOnly"))
            .with_attribute(RegistrationAttribute::singleton()),
        CandidateClass::new(named("invalid::DuplicateA"))
            .with_attribute(RegistrationAttribute::singleton()),
        CandidateClass::new(named("invalid::DuplicateB"))
            .with_attribute(RegistrationAttribute::transient()),
        CandidateClass::new(generic("invalid::GenericNoArg", t())).with_attribute(
            RegistrationAttribute::singleton()
                .with_factory(generic("invalid::GenericNoArgFactory", t())),
        ),
    ]
}

fn lenient_invalid_scan() -> (RegistrationPlan, Vec<RegistrationFailure>) {
    let scanner = scanner(
        invalid_catalog(),
        RegistrationOptions::default().with_error_policy(ErrorPolicy::Lenient),
    );
    let mut failures = Vec::new();
    let plan = scanner.scan_lenient(&invalid_candidates(), |failure| failures.push(failure));
    (plan, failures)
}

fn failure_for<'a>(failures: &'a [RegistrationFailure], short_name: &str) -> &'a RegistrationError {
    &failures
        .iter()
        .find(|failure| failure.directive.original_to_type().short_name() == short_name)
        .unwrap_or_else(|| panic!("{} 应当注册失败", short_name))
        .error
}

fn validation_for<'a>(failures: &'a [RegistrationFailure], short_name: &str) -> &'a ValidationError {
    match failure_for(failures, short_name) {
        RegistrationError::Validation(error) => error,
        other => panic!("{} 应当是校验错误: {}", short_name, other),
    }
}

fn tracker_for<'a>(failures: &'a [RegistrationFailure], short_name: &str) -> &'a TrackerError {
    match failure_for(failures, short_name) {
        RegistrationError::Tracker(error) => error,
        other => panic!("{} 应当是跟踪错误: {}", short_name, other),
    }
}

#[test]
fn test_lenient_scan_reports_every_invalid_sample() {
    let (plan, failures) = lenient_invalid_scan();

    assert_eq!(failures.len(), 13);
    assert_eq!(plan.failure_count, 13);
    // MismatchedA、DuplicateOrderA 和 DuplicateA 仍然有效
    assert_eq!(plan.len(), 3);
}

#[test]
fn test_directive_validation_failures() {
    let (_, failures) = lenient_invalid_scan();

    assert!(matches!(
        validation_for(&failures, "ConcreteWithMock"),
        ValidationError::ConcreteWithMock { .. }
    ));
    assert!(matches!(
        validation_for(&failures, "KeyAndCollection"),
        ValidationError::OverlyComplexRegistration { .. }
    ));
    assert!(matches!(
        validation_for(&failures, "IncompatibleMock"),
        ValidationError::IncompatibleMock { .. }
    ));
    assert!(matches!(
        validation_for(&failures, "OrderWithoutCollection"),
        ValidationError::OrderWithoutCollection { order: 3, .. }
    ));
    assert!(matches!(
        validation_for(&failures, "LiveService"),
        ValidationError::MockDerivesFromLive { .. }
    ));
    assert!(matches!(
        validation_for(&failures, "InterfaceMockService"),
        ValidationError::AbstractMock { .. }
    ));
    assert!(matches!(
        validation_for(&failures, "Recursive"),
        ValidationError::RecursiveRegistration { .. }
    ));
    assert!(matches!(
        validation_for(&failures, "InterceptedBaseOnly"),
        ValidationError::InterceptedNotInterface { .. }
    ));
    assert!(matches!(
        validation_for(&failures, "GenericNoArg"),
        ValidationError::MissingGenericArgument { .. }
    ));
}

#[test]
fn test_ambiguous_base_type_lists_candidates() {
    let (_, failures) = lenient_invalid_scan();
    let error = validation_for(&failures, "AmbiguousService");

    let ValidationError::AmbiguousBaseType { candidates, .. } = error else {
        panic!("应当是基类型歧义错误: {}", error);
    };
    assert_eq!(candidates.len(), 3);

    let message = error.to_string();
    assert!(message.starts_with("invalid::AmbiguousService: "));
    assert!(message.contains("\n - For = IAmbiguousA"));
    assert!(message.contains("#[RegisterSingleton(For = AmbiguousBase)]"));
    assert!(message.ends_with("pub struct AmbiguousService ..."));
}

#[test]
fn test_tracker_failures() {
    let (plan, failures) = lenient_invalid_scan();

    assert!(matches!(
        tracker_for(&failures, "MismatchedB"),
        TrackerError::MismatchedLifetime { .. }
    ));
    assert!(matches!(
        tracker_for(&failures, "DuplicateOrderB"),
        TrackerError::DuplicateOrder { order: 1, .. }
    ));
    let duplicate = tracker_for(&failures, "DuplicateB");
    assert!(matches!(
        duplicate,
        TrackerError::AlreadyRegistered { type_name, existing, .. }
            if type_name == "invalid::DuplicateB" && existing == "invalid::DuplicateA"
    ));
    assert!(duplicate.to_string().starts_with("invalid::DuplicateB: "));

    let mismatched = plan.collection(&named("invalid::IMismatched")).unwrap();
    assert_eq!(mismatched.members().len(), 1);
    assert_eq!(mismatched.lifetime(), Lifetime::Singleton);
}

#[test]
fn test_strict_scan_combines_all_messages() {
    let error = scanner(invalid_catalog(), RegistrationOptions::default())
        .scan_strict(&invalid_candidates())
        .unwrap_err();
    let message = error.to_string();

    assert_eq!(error.failures().len(), 13);
    assert!(message.starts_with("注册组件时共遇到 13 个错误。"));
    let divider = format!("\n\n{}\n\n", "-".repeat(62));
    let pieces: Vec<&str> = message.trim_end_matches('\n').split(&divider).collect();
    assert_eq!(pieces.len(), 14);
    assert_eq!(pieces[0], "注册组件时共遇到 13 个错误。");
    assert_eq!(message.matches(&divider).count(), 13);
    assert!(message.ends_with('\n'));
}

// ---------------------------------------------------------------------------
// 选项
// ---------------------------------------------------------------------------

fn keyed_catalog() -> InMemoryTypeCatalog {
    InMemoryTypeCatalog::new()
        .with_type(TypeDefinition::interface(named("keys::IStore")))
        .with_type(implementing("keys::PrimaryStore", &["keys::IStore"]))
        .with_type(implementing("keys::BackupStore", &["keys::IStore"]))
}

fn keyed_candidates() -> Vec<CandidateClass> {
    vec![
        CandidateClass::new(named("keys::PrimaryStore"))
            .with_attribute(RegistrationAttribute::singleton().with_key("Primary")),
        CandidateClass::new(named("keys::BackupStore"))
            .with_attribute(RegistrationAttribute::singleton().with_key("PRIMARY")),
    ]
}

#[test]
fn test_key_comparison_option() {
    let sensitive = scanner(keyed_catalog(), RegistrationOptions::default())
        .scan_strict(&keyed_candidates())
        .unwrap();
    assert_eq!(
        sensitive.keyed_registration(&named("keys::IStore")).map(|keyed| keyed.len()),
        Some(2)
    );

    let insensitive = scanner(
        keyed_catalog(),
        RegistrationOptions::default().with_key_comparison(KeyComparison::CaseInsensitive),
    )
    .scan_strict(&keyed_candidates())
    .unwrap_err();
    assert!(matches!(
        &insensitive.failures()[0].error,
        RegistrationError::Tracker(TrackerError::DuplicateKey { key, .. }) if key == "PRIMARY"
    ));
}

#[test]
fn test_hosted_services_sharing_interface_register_separately() {
    let catalog = InMemoryTypeCatalog::new()
        .with_type(TypeDefinition::interface(named("hosting::IHostedService")))
        .with_type(implementing("app::TimedA", &["hosting::IHostedService"]))
        .with_type(implementing("app::TimedB", &["hosting::IHostedService"]));
    let candidates = vec![
        CandidateClass::new(named("app::TimedA"))
            .with_attribute(RegistrationAttribute::hosted_service()),
        CandidateClass::new(named("app::TimedB"))
            .with_attribute(RegistrationAttribute::hosted_service()),
    ];

    let plan = scanner(catalog, RegistrationOptions::default())
        .scan_strict(&candidates)
        .unwrap();

    assert_eq!(plan.registrations.len(), 2);
    for name in ["app::TimedA", "app::TimedB"] {
        let registration = plan.registration(&named(name)).unwrap();
        assert!(registration.is_concrete());
        assert_eq!(registration.to_type(), &named(name));
        assert_eq!(registration.lifetime(), Lifetime::HostedService);
    }
    assert!(plan.registration(&named("hosting::IHostedService")).is_none());
}

#[test]
fn test_replace_services() {
    let catalog = InMemoryTypeCatalog::new()
        .with_type(TypeDefinition::interface(named("replace::IClock")))
        .with_type(implementing("replace::SystemClock", &["replace::IClock"]))
        .with_type(implementing("replace::FixedClock", &["replace::IClock"]));
    let candidates = vec![
        CandidateClass::new(named("replace::SystemClock"))
            .with_attribute(RegistrationAttribute::singleton()),
        CandidateClass::new(named("replace::FixedClock"))
            .with_attribute(RegistrationAttribute::singleton().replacing_services()),
    ];

    let plan = scanner(catalog, RegistrationOptions::default())
        .scan_strict(&candidates)
        .unwrap();
    assert_eq!(plan.registrations.len(), 1);
    assert_eq!(
        plan.registration(&named("replace::IClock")).unwrap().to_type(),
        &named("replace::FixedClock")
    );
}

#[test]
fn test_manifest_source_end_to_end() -> anyhow::Result<()> {
    let manifest = RegistrationManifest {
        name: "manifest".to_string(),
        types: vec![
            TypeDefinition::interface(named("manifest::IService")),
            implementing("manifest::Service", &["manifest::IService"]),
        ],
        candidates: vec![CandidateClass::new(named("manifest::Service"))
            .with_attribute(RegistrationAttribute::transient())
            .with_attribute(RegistrationAttribute::singleton().with_order(4))],
    };
    let json = serde_json_roundtrip(&manifest)?;

    let strict = scanner(json.catalog(), RegistrationOptions::default());
    assert!(matches!(
        strict.scan(&json),
        Err(CompositionError::Registration(_))
    ));

    let lenient = scanner(
        json.catalog(),
        RegistrationOptions::default().with_error_policy(ErrorPolicy::Lenient),
    );
    let plan = lenient.scan(&json)?;
    assert_eq!(plan.failure_count, 1);
    assert_eq!(
        plan.registration(&named("manifest::IService")).map(|registration| registration.lifetime()),
        Some(Lifetime::Transient)
    );
    Ok(())
}

fn serde_json_roundtrip(manifest: &RegistrationManifest) -> anyhow::Result<RegistrationManifest> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("manifest.json");
    std::fs::write(&path, serde_json::to_string_pretty(manifest)?)?;

    Ok(RegistrationManifest::load(&path)?)
}
