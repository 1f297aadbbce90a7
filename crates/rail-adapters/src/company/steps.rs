//! Steps específicos de Company.

use std::sync::Arc;

use chrono::Utc;
use log::{debug, info};
use rail_contracts::messages;
use rail_core::{ErrorMap, RunContext, StepDefinition, StepFault, StepOutcome, StepRunResult, Track};
use rail_domain::{Actor, Company};
use rail_persistence::CompanyRepository;
use uuid::Uuid;

use super::effects::{AuditEntry, AuditLog, Notification, Notifier};

pub type CompanyCtx = RunContext<Company, Actor>;

/// `model.build`: Company nueva (sin guardar) a partir del payload; el
/// actor queda como dueño. Los atributos con tipo incorrecto se descartan
/// aquí; el contrato "company" rechaza esos mismos valores, así que nunca
/// llegan a `persist.save`.
#[derive(Debug, Default)]
pub struct BuildCompany;

impl StepDefinition<Company, Actor> for BuildCompany {
    fn name(&self) -> &str {
        "model.build"
    }

    fn run(&self, ctx: &mut CompanyCtx) -> StepRunResult {
        let mut company = Company { owner_id: ctx.actor().map(|a| a.id),
                                    ..Company::new() };
        for rejected in company.assign_lenient(&ctx.params) {
            debug!("run {}: {rejected}", ctx.run_id());
        }
        ctx.set_model(company);
        Ok(StepOutcome::Success)
    }
}

/// `model.find`: carga la Company indicada por `params.id`.
pub struct FindCompany {
    repo: Arc<dyn CompanyRepository>,
}

impl FindCompany {
    pub fn new(repo: Arc<dyn CompanyRepository>) -> Self {
        Self { repo }
    }
}

impl StepDefinition<Company, Actor> for FindCompany {
    fn name(&self) -> &str {
        "model.find"
    }

    fn run(&self, ctx: &mut CompanyCtx) -> StepRunResult {
        let Some(raw) = ctx.param("id") else {
            return Ok(StepOutcome::invalid(attribute_error(Some("id"), messages::BLANK)));
        };
        let Some(id) = raw.as_str().and_then(|s| Uuid::parse_str(s.trim()).ok()) else {
            return Ok(StepOutcome::invalid(attribute_error(Some("id"), messages::INVALID)));
        };
        match self.repo.find(id).map_err(StepFault::collaborator)? {
            Some(company) => {
                ctx.set_model(company);
                Ok(StepOutcome::Success)
            }
            None => Ok(StepOutcome::invalid(attribute_error(Some("id"), messages::NOT_FOUND))),
        }
    }
}

/// `model.assign`: aplica los atributos del payload al modelo cargado.
#[derive(Debug, Default)]
pub struct AssignAttributes;

impl StepDefinition<Company, Actor> for AssignAttributes {
    fn name(&self) -> &str {
        "model.assign"
    }

    fn run(&self, ctx: &mut CompanyCtx) -> StepRunResult {
        let company = ctx.model.as_mut().ok_or_else(|| StepFault::MissingModel(self.name().to_string()))?;
        match company.assign(&ctx.params) {
            Ok(()) => Ok(StepOutcome::Success),
            Err(e) => Ok(StepOutcome::invalid(attribute_error(e.field(), messages::INVALID))),
        }
    }
}

/// `persist.save`: guarda el modelo y lo sustituye por la fila guardada.
pub struct SaveCompany {
    repo: Arc<dyn CompanyRepository>,
}

impl SaveCompany {
    pub fn new(repo: Arc<dyn CompanyRepository>) -> Self {
        Self { repo }
    }
}

impl StepDefinition<Company, Actor> for SaveCompany {
    fn name(&self) -> &str {
        "persist.save"
    }

    fn run(&self, ctx: &mut CompanyCtx) -> StepRunResult {
        let company = ctx.require_model(self.name())?.clone();
        let saved = self.repo.save(company).map_err(StepFault::collaborator)?;
        debug!("run {}: saved {saved}", ctx.run_id());
        ctx.set_model(saved);
        Ok(StepOutcome::Success)
    }
}

/// `notify.created`: avisa de la alta de una Company.
pub struct NotifyCreated {
    notifier: Arc<dyn Notifier>,
    from: String,
}

impl NotifyCreated {
    pub fn new(notifier: Arc<dyn Notifier>, from: impl Into<String>) -> Self {
        Self { notifier,
               from: from.into() }
    }
}

impl StepDefinition<Company, Actor> for NotifyCreated {
    fn name(&self) -> &str {
        "notify.created"
    }

    fn run(&self, ctx: &mut CompanyCtx) -> StepRunResult {
        let company = ctx.require_model(self.name())?;
        let subject = format!("Company {} created", company.name.as_deref().unwrap_or("(unnamed)"));
        let notification = Notification { from: self.from.clone(),
                                          subject,
                                          company_id: company.id };
        self.notifier.notify(notification).map_err(StepFault::collaborator)?;
        Ok(StepOutcome::Success)
    }
}

/// `audit.rejection`: deja constancia de un rechazo. Corre en la vía de
/// fallo y también tras un fallo fatal.
pub struct AuditRejection {
    audit: Arc<AuditLog>,
}

impl AuditRejection {
    pub fn new(audit: Arc<AuditLog>) -> Self {
        Self { audit }
    }
}

impl StepDefinition<Company, Actor> for AuditRejection {
    fn name(&self) -> &str {
        "audit.rejection"
    }

    fn track(&self) -> Track {
        Track::Failure
    }

    fn on_fatal(&self) -> bool {
        true
    }

    fn run(&self, ctx: &mut CompanyCtx) -> StepRunResult {
        let entry = AuditEntry { run_id: ctx.run_id(),
                                 operation: ctx.operation().to_string(),
                                 actor_id: ctx.actor().map(|a| a.id),
                                 messages: ctx.errors().full_messages(),
                                 at: Utc::now() };
        info!("run {}: audit rejection of '{}' {:?}", entry.run_id, entry.operation, entry.messages);
        self.audit.record(entry).map_err(StepFault::collaborator)?;
        Ok(StepOutcome::Success)
    }
}

fn attribute_error(field: Option<&str>, message: &str) -> ErrorMap {
    let mut errors = ErrorMap::new();
    match field {
        Some(field) => errors.add(field, message),
        None => errors.add_base(message),
    }
    errors
}
