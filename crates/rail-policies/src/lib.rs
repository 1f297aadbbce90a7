//! rail-policies: predicados de autorización.
//!
//! Una política es una función pura `(actor, subject, action) -> Allow | Deny`
//! sin efectos secundarios. La decisión se registra como
//! `AuthorizationDecision` para auditoría; el step que la consulta convierte
//! un `Deny` en el error base "not authorized".

use std::collections::BTreeMap;

use log::debug;
use rail_core::hashing::hash_value;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Authorization {
    Allow,
    Deny,
}

impl Authorization {
    pub fn is_allowed(self) -> bool {
        matches!(self, Authorization::Allow)
    }

    pub fn from_bool(allowed: bool) -> Self {
        if allowed {
            Authorization::Allow
        } else {
            Authorization::Deny
        }
    }
}

/// Contrato de políticas de autorización.
pub trait Policy<A, S>: Send + Sync {
    /// id estático de la política (p. ej. "company").
    fn id(&self) -> &str;
    fn check(&self, actor: Option<&A>, subject: Option<&S>, action: &str) -> Authorization;
}

/// Registro de una decisión.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthorizationDecision {
    pub policy_id: String,
    pub action: String,
    pub verdict: Authorization,
}

impl AuthorizationDecision {
    pub fn is_allowed(&self) -> bool {
        self.verdict.is_allowed()
    }

    /// Hash estable de la decisión (JSON canónico).
    pub fn fingerprint(&self) -> String {
        hash_value(&json!({"policy_id": self.policy_id, "action": self.action, "verdict": self.verdict}))
    }
}

/// Evalúa `policy` una única vez, sin reintentos ni caché.
pub fn authorize<A, S, P>(policy: &P, actor: Option<&A>, subject: Option<&S>, action: &str) -> Authorization
    where P: Policy<A, S> + ?Sized
{
    decide(policy, actor, subject, action).verdict
}

/// Igual que `authorize` pero devuelve la decisión completa.
pub fn decide<A, S, P>(policy: &P, actor: Option<&A>, subject: Option<&S>, action: &str) -> AuthorizationDecision
    where P: Policy<A, S> + ?Sized
{
    let verdict = policy.check(actor, subject, action);
    debug!("policy '{}' {action}: {verdict:?} (actor present: {})", policy.id(), actor.is_some());
    AuthorizationDecision { policy_id: policy.id().to_string(),
                            action: action.to_string(),
                            verdict }
}

type Rule<A, S> = Box<dyn Fn(Option<&A>, Option<&S>) -> bool + Send + Sync>;

/// Tabla acción → predicado. Las acciones sin regla se deniegan.
pub struct RulePolicy<A, S> {
    id: String,
    rules: BTreeMap<String, Rule<A, S>>,
}

impl<A, S> RulePolicy<A, S> {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(),
               rules: BTreeMap::new() }
    }

    /// Permite `action` cuando `predicate` devuelve true. Reemplaza una
    /// regla previa para la misma acción.
    pub fn allow_if<F>(mut self, action: impl Into<String>, predicate: F) -> Self
        where F: Fn(Option<&A>, Option<&S>) -> bool + Send + Sync + 'static
    {
        self.rules.insert(action.into(), Box::new(predicate));
        self
    }

    pub fn actions(&self) -> Vec<&str> {
        self.rules.keys().map(String::as_str).collect()
    }
}

impl<A, S> Policy<A, S> for RulePolicy<A, S> {
    fn id(&self) -> &str {
        &self.id
    }

    fn check(&self, actor: Option<&A>, subject: Option<&S>, action: &str) -> Authorization {
        match self.rules.get(action) {
            Some(rule) => Authorization::from_bool(rule(actor, subject)),
            None => Authorization::Deny,
        }
    }
}

impl<A, S> std::fmt::Debug for RulePolicy<A, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RulePolicy")
         .field("id", &self.id)
         .field("actions", &self.actions())
         .finish()
    }
}

/// Política a partir de un closure.
pub struct FnPolicy<F> {
    id: String,
    f: F,
}

impl<F> FnPolicy<F> {
    pub fn new(id: impl Into<String>, f: F) -> Self {
        Self { id: id.into(), f }
    }
}

impl<A, S, F> Policy<A, S> for FnPolicy<F>
    where F: Fn(Option<&A>, Option<&S>, &str) -> Authorization + Send + Sync
{
    fn id(&self) -> &str {
        &self.id
    }

    fn check(&self, actor: Option<&A>, subject: Option<&S>, action: &str) -> Authorization {
        (self.f)(actor, subject, action)
    }
}

/// Composición: permite sólo si todas permiten. Se detiene en el primer
/// `Deny`.
pub struct AllOf<A, S> {
    id: String,
    policies: Vec<Box<dyn Policy<A, S>>>,
}

impl<A, S> AllOf<A, S> {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(),
               policies: Vec::new() }
    }

    pub fn with<P>(mut self, policy: P) -> Self
        where P: Policy<A, S> + 'static
    {
        self.policies.push(Box::new(policy));
        self
    }
}

impl<A, S> Policy<A, S> for AllOf<A, S> {
    fn id(&self) -> &str {
        &self.id
    }

    fn check(&self, actor: Option<&A>, subject: Option<&S>, action: &str) -> Authorization {
        for p in &self.policies {
            if p.check(actor, subject, action) == Authorization::Deny {
                debug!("policy '{}' denied '{action}' via '{}'", self.id, p.id());
                return Authorization::Deny;
            }
        }
        Authorization::Allow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug)]
    struct User {
        admin: bool,
        id: u32,
    }

    struct Doc {
        owner: u32,
    }

    fn doc_policy() -> RulePolicy<User, Doc> {
        RulePolicy::<User, Doc>::new("doc").allow_if("create?", |a, _| a.is_some_and(|u| u.admin))
                                           .allow_if("update?", |a, s| match (a, s) {
                                               (Some(u), Some(d)) => u.admin || u.id == d.owner,
                                               _ => false,
                                           })
    }

    #[test]
    fn rule_policy_allows_and_denies() {
        let p = doc_policy();
        let admin = User { admin: true, id: 1 };
        let member = User { admin: false, id: 2 };
        let own = Doc { owner: 2 };
        assert_eq!(authorize(&p, Some(&admin), None, "create?"), Authorization::Allow);
        assert_eq!(authorize(&p, Some(&member), None, "create?"), Authorization::Deny);
        assert_eq!(authorize(&p, Some(&member), Some(&own), "update?"), Authorization::Allow);
        assert_eq!(authorize(&p, Some(&member), Some(&Doc { owner: 9 }), "update?"), Authorization::Deny);
        assert_eq!(authorize(&p, None, Some(&own), "update?"), Authorization::Deny);
    }

    #[test]
    fn unknown_action_is_denied() {
        let p = doc_policy();
        let admin = User { admin: true, id: 1 };
        assert_eq!(authorize(&p, Some(&admin), None, "destroy?"), Authorization::Deny);
        assert_eq!(p.actions(), vec!["create?", "update?"]);
    }

    #[test]
    fn all_of_short_circuits_at_first_deny() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        let counting = FnPolicy::new("counting", move |_: Option<&User>, _: Option<&Doc>, _: &str| {
            c.fetch_add(1, Ordering::SeqCst);
            Authorization::Allow
        });
        let p = AllOf::new("combined").with(doc_policy()).with(counting);
        let member = User { admin: false, id: 2 };
        assert_eq!(authorize(&p, Some(&member), None, "create?"), Authorization::Deny);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let admin = User { admin: true, id: 1 };
        assert_eq!(authorize(&p, Some(&admin), None, "create?"), Authorization::Allow);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn decision_is_deterministic() {
        let p = doc_policy();
        let admin = User { admin: true, id: 1 };
        let a = decide(&p, Some(&admin), None, "create?");
        let b = decide(&p, Some(&admin), None, "create?");
        assert_eq!(a, b);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.policy_id, "doc");
        assert!(a.is_allowed());
        let denied = decide(&p, None, None, "create?");
        assert_ne!(a.fingerprint(), denied.fingerprint());
    }
}
