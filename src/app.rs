//! Montaje de la aplicación: colaboradores en memoria, registro de
//! operaciones Company y utilidades de invocación.

use std::sync::Arc;

use rail_adapters::company::effects::{AuditLog, InMemoryOutbox};
use rail_adapters::{build_registry, AdapterError, CompanyDeps, CompanyRegistry};
use rail_core::{CoreEngineError, OperationResult, Params, PipelineExecutor, Track};
use rail_domain::{Actor, Company, DomainError, Role};
use rail_persistence::InMemoryCompanyRepository;
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Adapter(#[from] AdapterError),
    #[error(transparent)]
    Engine(#[from] CoreEngineError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl AppError {
    /// true si el error es un fallo de infraestructura durante un run.
    pub fn is_fault(&self) -> bool {
        matches!(self, AppError::Engine(e) if e.is_fault())
    }
}

/// Una invocación pendiente: operación, payload y actor.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub operation: String,
    pub params: Params,
    pub actor: Option<Actor>,
}

impl Invocation {
    pub fn new(operation: impl Into<String>, params: Params, actor: Option<Actor>) -> Self {
        Self { operation: operation.into(),
               params,
               actor }
    }
}

/// Resumen de una operación registrada, para `railflow list`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OperationSummary {
    pub name: String,
    pub definition_hash: String,
    pub steps: Vec<StepSummary>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StepSummary {
    pub name: String,
    pub track: Track,
    pub on_fatal: bool,
}

pub struct App {
    registry: CompanyRegistry,
    repo: Arc<InMemoryCompanyRepository>,
    outbox: Arc<InMemoryOutbox>,
    audit: Arc<AuditLog>,
}

impl App {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        Self::with_executor(config, PipelineExecutor::new())
    }

    pub fn with_executor(config: &AppConfig, executor: PipelineExecutor) -> Result<Self, AppError> {
        let repo = Arc::new(InMemoryCompanyRepository::with_config(config.store.clone()));
        let outbox = Arc::new(InMemoryOutbox::new());
        let audit = Arc::new(AuditLog::new());
        let mut deps = CompanyDeps::in_memory(repo.clone())?;
        deps.notifier = outbox.clone();
        deps.audit = audit.clone();
        deps.notify_from = config.notify_from.clone();
        let registry = build_registry(&deps, executor)?;
        Ok(Self { registry,
                  repo,
                  outbox,
                  audit })
    }

    pub fn registry(&self) -> &CompanyRegistry {
        &self.registry
    }

    pub fn repository(&self) -> &InMemoryCompanyRepository {
        &self.repo
    }

    pub fn outbox(&self) -> &InMemoryOutbox {
        &self.outbox
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    pub fn run(&self,
               operation: &str,
               params: Params,
               actor: Option<Actor>)
               -> Result<OperationResult<Company>, CoreEngineError> {
        self.registry.run(operation, params, actor)
    }

    /// Ejecuta varias invocaciones en paralelo. Cada una tiene su propio
    /// contexto; el orden de salida es el de entrada.
    pub fn run_batch(&self, invocations: Vec<Invocation>) -> Vec<Result<OperationResult<Company>, CoreEngineError>> {
        invocations.into_par_iter()
                   .map(|inv| self.registry.run(&inv.operation, inv.params, inv.actor))
                   .collect()
    }

    pub fn describe(&self) -> Vec<OperationSummary> {
        self.registry
            .names()
            .into_iter()
            .filter_map(|name| self.registry.get(name))
            .map(|def| OperationSummary { name: def.name().to_string(),
                                          definition_hash: def.definition_hash().to_string(),
                                          steps: def.steps()
                                                    .iter()
                                                    .map(|s| StepSummary { name: s.name().to_string(),
                                                                           track: s.track(),
                                                                           on_fatal: s.on_fatal() })
                                                    .collect() })
            .collect()
    }
}

/// Interpreta `clave=valor`. El valor se lee como JSON si lo es (números,
/// booleanos, null, cadenas entre comillas); si no, como cadena literal.
pub fn parse_param(raw: &str) -> Result<(String, Value), AppError> {
    let (key, value) = raw.split_once('=')
                          .ok_or_else(|| AppError::InvalidArgument(format!("expected key=value, got '{raw}'")))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(AppError::InvalidArgument(format!("empty key in '{raw}'")));
    }
    let value = serde_json::from_str::<Value>(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

pub fn params_from_pairs<I, S>(pairs: I) -> Result<Params, AppError>
    where I: IntoIterator<Item = S>,
          S: AsRef<str>
{
    let mut params = Params::new();
    for raw in pairs {
        let (k, v) = parse_param(raw.as_ref())?;
        params.insert(k, v);
    }
    Ok(params)
}

/// Actor a partir de las opciones de línea de comandos. Sin rol ni id la
/// invocación es anónima; con sólo id el rol es `member`.
pub fn actor_from_args(role: Option<&str>, id: Option<Uuid>) -> Result<Option<Actor>, AppError> {
    let role = role.map(str::parse::<Role>).transpose()?;
    Ok(match (role, id) {
        (None, None) => None,
        (role, id) => Some(Actor::new(id.unwrap_or_else(Uuid::new_v4), role.unwrap_or(Role::Member))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_param_reads_json_or_string() {
        assert_eq!(parse_param("employees=12").unwrap(), ("employees".into(), json!(12)));
        assert_eq!(parse_param("name=Acme Inc").unwrap(), ("name".into(), json!("Acme Inc")));
        assert_eq!(parse_param("name=\"42\"").unwrap(), ("name".into(), json!("42")));
        assert_eq!(parse_param("email=").unwrap(), ("email".into(), json!("")));
        assert!(matches!(parse_param("novalue"), Err(AppError::InvalidArgument(_))));
        assert!(matches!(parse_param("=x"), Err(AppError::InvalidArgument(_))));
    }

    #[test]
    fn later_pairs_override_earlier_ones() {
        let params = params_from_pairs(["name=A", "name=B"]).unwrap();
        assert_eq!(params.get("name"), Some(&json!("B")));
    }

    #[test]
    fn actor_args() {
        assert!(actor_from_args(None, None).unwrap().is_none());
        let id = Uuid::new_v4();
        let a = actor_from_args(None, Some(id)).unwrap().unwrap();
        assert_eq!((a.id, a.role), (id, Role::Member));
        assert!(actor_from_args(Some("admin"), None).unwrap().unwrap().is_admin());
        assert!(matches!(actor_from_args(Some("root"), None), Err(AppError::Domain(_))));
    }

    #[test]
    fn describe_lists_operations_and_tracks() {
        let app = App::new(&AppConfig::default()).unwrap();
        let ops = app.describe();
        assert_eq!(ops.iter().map(|o| o.name.as_str()).collect::<Vec<_>>(),
                   vec!["CompanyCreate", "CompanyNew", "CompanyUpdate"]);
        let audit = ops[0].steps.last().unwrap();
        assert_eq!((audit.name.as_str(), audit.track, audit.on_fatal), ("audit.rejection", Track::Failure, true));
    }
}
