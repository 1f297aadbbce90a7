//! Política "company".

use rail_domain::{Actor, Company};
use rail_policies::RulePolicy;

pub const POLICY_ID: &str = "company";
pub const CREATE: &str = "create?";
pub const UPDATE: &str = "update?";

/// `create?` sólo admin; `update?` admin o dueño. `CompanyNew` usa `create?`.
pub fn company_policy() -> RulePolicy<Actor, Company> {
    RulePolicy::<Actor, Company>::new(POLICY_ID)
        .allow_if(CREATE, |actor, _| actor.is_some_and(Actor::is_admin))
        .allow_if(UPDATE, |actor, company| match (actor, company) {
            (Some(a), _) if a.is_admin() => true,
            (Some(a), Some(c)) => c.is_owned_by(a.id),
            _ => false,
        })
}
