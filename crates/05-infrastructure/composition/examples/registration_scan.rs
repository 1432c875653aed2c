//! 注册扫描示例
//!
//! 运行: `cargo run -p infrastructure-composition --example registration_scan`

use di_abstractions::{CandidateClass, CandidateSource, RegistrationAttribute, StaticCandidateSource};
use di_impl::InMemoryTypeCatalog;
use infrastructure_common::{TypeDefinition, TypeRef};
use infrastructure_composition::{
    initialize_logging, ErrorPolicy, LoggingConfig, RegistrationOptions, RegistrationScanner,
};
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    initialize_logging(&LoggingConfig::development())?;

    let catalog = InMemoryTypeCatalog::new()
        .with_type(TypeDefinition::interface(TypeRef::named("demo::IGreeter")))
        .with_type(
            TypeDefinition::class(TypeRef::named("demo::EnglishGreeter"))
                .with_interface(TypeRef::named("demo::IGreeter")),
        )
        .with_type(
            TypeDefinition::class(TypeRef::named("demo::ChineseGreeter"))
                .with_interface(TypeRef::named("demo::IGreeter")),
        );

    let source = StaticCandidateSource::new("demo")
        .with_candidate(
            CandidateClass::new(TypeRef::named("demo::EnglishGreeter"))
                .with_attribute(RegistrationAttribute::singleton().in_collection().with_order(1)),
        )
        .with_candidate(
            CandidateClass::new(TypeRef::named("demo::ChineseGreeter"))
                .with_attribute(RegistrationAttribute::singleton().in_collection().with_order(2))
                // 非集合注册不能指定 Order
                .with_attribute(RegistrationAttribute::transient().with_order(7)),
        );

    let options = RegistrationOptions::load()?.with_error_policy(ErrorPolicy::Lenient);
    let scanner = RegistrationScanner::new(Arc::new(catalog), options);

    let mut failures = Vec::new();
    let plan = scanner.scan_lenient(&source.scan()?, |failure| {
        failures.push(failure.message())
    });

    for collection in &plan.collections {
        println!("集合 {} ({}):", collection.service(), collection.lifetime());
        for member in collection.ordered_members() {
            println!("  [{}] {}", member.order, member.implementation);
        }
    }
    for message in failures {
        println!("失败: {}", message);
    }
    Ok(())
}
