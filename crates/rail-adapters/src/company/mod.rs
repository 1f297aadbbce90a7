//! Operaciones Company: definición y registro.
//!
//! ```text
//! CompanyCreate: model.build → policy.authorize(create?) → contract.validate(create)
//!                → persist.save → notify.created        | audit.rejection
//! CompanyUpdate: contract.validate(update) → model.find → policy.authorize(update?)
//!                → model.assign → persist.save          | audit.rejection
//! CompanyNew:    model.build → policy.authorize(create?)
//! ```

pub mod contract;
pub mod effects;
pub mod policy;
pub mod steps;

use std::sync::Arc;

use rail_contracts::ContractSet;
use rail_core::{OperationDefinition, OperationRegistry, PipelineExecutor};
use rail_domain::{Actor, Company};
use rail_persistence::{CompanyRepository, InMemoryCompanyRepository};
use rail_policies::Policy;

use self::effects::{AuditLog, InMemoryOutbox, Notifier};
use self::steps::{AssignAttributes, AuditRejection, BuildCompany, FindCompany, NotifyCreated, SaveCompany};
use crate::steps::{AuthorizeStep, ContractStep};
use crate::AdapterError;

pub const CREATE_OP: &str = "CompanyCreate";
pub const UPDATE_OP: &str = "CompanyUpdate";
pub const NEW_OP: &str = "CompanyNew";

pub const DEFAULT_NOTIFY_FROM: &str = "noreply@railflow.local";

pub type CompanyDefinition = OperationDefinition<Company, Actor>;
pub type CompanyRegistry = OperationRegistry<Company, Actor>;

/// Colaboradores que las operaciones Company reciben explícitamente.
#[derive(Clone)]
pub struct CompanyDeps {
    pub repo: Arc<dyn CompanyRepository>,
    pub notifier: Arc<dyn Notifier>,
    pub audit: Arc<AuditLog>,
    pub contracts: Arc<ContractSet>,
    pub policy: Arc<dyn Policy<Actor, Company>>,
    pub notify_from: String,
}

impl CompanyDeps {
    /// Dependencias en memoria con el contrato y la política por defecto.
    pub fn in_memory(repo: Arc<dyn CompanyRepository>) -> Result<Self, AdapterError> {
        Ok(Self { repo,
                  notifier: Arc::new(InMemoryOutbox::new()),
                  audit: Arc::new(AuditLog::new()),
                  contracts: Arc::new(contract::company_contracts()?),
                  policy: Arc::new(policy::company_policy()),
                  notify_from: DEFAULT_NOTIFY_FROM.to_string() })
    }

    pub fn in_memory_default() -> Result<Self, AdapterError> {
        Self::in_memory(Arc::new(InMemoryCompanyRepository::new()))
    }

    fn authorize(&self, action: &str) -> AuthorizeStep<Company, Actor, dyn Policy<Actor, Company>> {
        AuthorizeStep::new("policy.authorize", self.policy.clone(), action)
    }

    fn validate(&self, scope: &str) -> ContractStep<Company, Actor> {
        ContractStep::new("contract.validate", self.contracts.clone(), contract::SCHEMA, scope)
    }
}

pub fn company_create(deps: &CompanyDeps) -> Result<CompanyDefinition, AdapterError> {
    Ok(CompanyDefinition::builder(CREATE_OP).step(BuildCompany)
                                            .step(deps.authorize(policy::CREATE))
                                            .step(deps.validate(contract::CREATE))
                                            .step(SaveCompany::new(deps.repo.clone()))
                                            .step(NotifyCreated::new(deps.notifier.clone(), deps.notify_from.clone()))
                                            .step(AuditRejection::new(deps.audit.clone()))
                                            .build()?)
}

pub fn company_update(deps: &CompanyDeps) -> Result<CompanyDefinition, AdapterError> {
    Ok(CompanyDefinition::builder(UPDATE_OP).step(deps.validate(contract::UPDATE))
                                            .step(FindCompany::new(deps.repo.clone()))
                                            .step(deps.authorize(policy::UPDATE))
                                            .step(AssignAttributes)
                                            .step(SaveCompany::new(deps.repo.clone()))
                                            .step(AuditRejection::new(deps.audit.clone()))
                                            .build()?)
}

/// Presenta una Company sin guardar (formulario "new").
pub fn company_new(deps: &CompanyDeps) -> Result<CompanyDefinition, AdapterError> {
    Ok(CompanyDefinition::builder(NEW_OP).step(BuildCompany)
                                         .step(deps.authorize(policy::CREATE))
                                         .build()?)
}

/// Registro con las tres operaciones Company.
pub fn build_registry(deps: &CompanyDeps, executor: PipelineExecutor) -> Result<CompanyRegistry, AdapterError> {
    let mut registry = CompanyRegistry::with_executor(executor);
    registry.register(company_create(deps)?)?;
    registry.register(company_update(deps)?)?;
    registry.register(company_new(deps)?)?;
    Ok(registry)
}
