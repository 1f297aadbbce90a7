use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use rail_core::{params_from_value, CoreEngineError, ErrorMap, OperationDefinition, PipelineExecutor, RunContext,
                StepFault, StepOutcome, StepRunResult, Track};
use serde_json::json;

#[derive(Debug, Clone, PartialEq)]
struct Company {
    name: Option<String>,
    saved: bool,
}

#[derive(Debug, Clone)]
struct Actor {
    admin: bool,
}

type Ctx = RunContext<Company, Actor>;

fn build_model(ctx: &mut Ctx) -> StepRunResult {
    let name = ctx.param_str("name").map(str::to_string);
    ctx.set_model(Company { name, saved: false });
    Ok(StepOutcome::Success)
}

fn authorize_create(ctx: &mut Ctx) -> StepRunResult {
    match ctx.actor() {
        Some(a) if a.admin => Ok(StepOutcome::Success),
        _ => Ok(StepOutcome::denied("company", "create?")),
    }
}

fn validate_update(ctx: &mut Ctx) -> StepRunResult {
    let mut errors = ErrorMap::new();
    let name = ctx.param_str("name").unwrap_or("");
    if name.is_empty() {
        errors.add("name", "can't be blank");
    }
    if name.chars().count() < 6 {
        errors.add("name", "too short");
    } else if name.chars().count() > 20 {
        errors.add("name", "too long");
    }
    Ok(StepOutcome::from_errors(errors))
}

fn admin() -> Option<Actor> {
    Some(Actor { admin: true })
}

#[test]
fn scenario_a_create_without_required_fields_succeeds() {
    let def = OperationDefinition::builder("CompanyCreate").step_fn("model.build", build_model)
                                                           .step_fn("policy.authorize", authorize_create)
                                                           .build()
                                                           .unwrap();
    let res = PipelineExecutor::new().run(&def, params_from_value(json!({})).unwrap(), admin())
                                     .unwrap();
    assert!(res.is_success());
    assert!(res.errors().is_empty());
    assert_eq!(res.model(), Some(&Company { name: None, saved: false }));
}

#[test]
fn scenario_b_update_with_short_name_fails_on_name() {
    let def = OperationDefinition::builder("CompanyUpdate").step_fn("contract.validate", validate_update)
                                                           .step_fn("model.build", build_model)
                                                           .build()
                                                           .unwrap();
    let res = PipelineExecutor::new().run(&def, params_from_value(json!({"name": "ab"})).unwrap(), admin())
                                     .unwrap();
    assert!(res.is_failure());
    assert_eq!(serde_json::to_value(res.errors()).unwrap(), json!({"name": ["too short"]}));
    assert!(res.model().is_none());
}

#[test]
fn scenario_c_denied_create_never_persists() {
    let saves = Arc::new(AtomicUsize::new(0));
    let s = saves.clone();
    let def = OperationDefinition::builder("CompanyCreate")
        .step_fn("model.build", build_model)
        .step_fn("policy.authorize", authorize_create)
        .step_fn("persist.save", move |ctx: &mut Ctx| {
            s.fetch_add(1, Ordering::SeqCst);
            ctx.require_model("persist.save")?.saved = true;
            Ok(StepOutcome::Success)
        })
        .build()
        .unwrap();
    let res = PipelineExecutor::new().run(&def,
                                          params_from_value(json!({"name": "Acme Inc"})).unwrap(),
                                          Some(Actor { admin: false }))
                                     .unwrap();
    assert!(res.is_failure());
    assert_eq!(serde_json::to_value(res.errors()).unwrap(), json!({"base": ["not authorized"]}));
    assert_eq!(saves.load(Ordering::SeqCst), 0);
    assert_eq!(res.model().map(|c| c.saved), Some(false));
}

#[test]
fn scenario_d_fault_is_propagated_not_encoded() {
    let def = OperationDefinition::builder("CompanyCreate")
        .step_fn("model.build", build_model)
        .step_fn("persist.save", |_ctx: &mut Ctx| Err(StepFault::message("storage unavailable")))
        .step_fn("notify", |_ctx: &mut Ctx| Ok(StepOutcome::Success))
        .build()
        .unwrap();
    let err = PipelineExecutor::new().run(&def, params_from_value(json!({"name": "Acme"})).unwrap(), admin())
                                     .unwrap_err();
    match err {
        CoreEngineError::StepFault { operation, step, source, .. } => {
            assert_eq!(operation, "CompanyCreate");
            assert_eq!(step, "persist.save");
            assert_eq!(source.to_string(), "storage unavailable");
        }
        other => panic!("expected StepFault, got {other:?}"),
    }
}

#[test]
fn missing_model_is_a_fault() {
    let def = OperationDefinition::builder("CompanyCreate")
        .step_fn("persist.save", |ctx: &mut Ctx| {
            ctx.require_model("persist.save")?;
            Ok(StepOutcome::Success)
        })
        .build()
        .unwrap();
    let err = PipelineExecutor::new().run(&def, Default::default(), None).unwrap_err();
    assert!(err.is_fault());
}

#[test]
fn only_on_fatal_steps_run_after_a_fault() {
    let ran = Arc::new(Mutex::new(Vec::<&'static str>::new()));
    let (r1, r2, r3) = (ran.clone(), ran.clone(), ran.clone());
    let def = OperationDefinition::builder("Op")
        .cleanup_fn("release_early", move |_ctx: &mut Ctx| {
            r1.lock().unwrap().push("release_early");
            Ok(StepOutcome::Success)
        })
        .step_fn("explode", |_ctx: &mut Ctx| Err(StepFault::message("boom")))
        .failure_fn("audit", move |_ctx: &mut Ctx| {
            r2.lock().unwrap().push("audit");
            Ok(StepOutcome::Success)
        })
        .cleanup_fn("release", move |_ctx: &mut Ctx| {
            r3.lock().unwrap().push("release");
            Err(StepFault::message("cleanup also failed"))
        })
        .build()
        .unwrap();
    let err = PipelineExecutor::new().run(&def, Default::default(), None).unwrap_err();
    assert!(matches!(err, CoreEngineError::StepFault { ref step, .. } if step == "explode"));
    assert_eq!(*ran.lock().unwrap(), vec!["release"]);
}

#[test]
fn fault_on_failure_track_is_still_fatal() {
    let def = OperationDefinition::builder("Op")
        .step_fn("validate", |_ctx: &mut Ctx| Ok(StepOutcome::invalid([("name", "is invalid")].into_iter().collect())))
        .failure_fn("notify_failure", |_ctx: &mut Ctx| Err(StepFault::message("mailer down")))
        .build()
        .unwrap();
    let err = PipelineExecutor::new().run(&def, Default::default(), None).unwrap_err();
    assert!(matches!(err, CoreEngineError::StepFault { ref step, .. } if step == "notify_failure"));
}

#[test]
fn identical_inputs_yield_identical_outcomes() {
    let def = OperationDefinition::builder("CompanyUpdate").step_fn("contract.validate", validate_update)
                                                           .step_fn("model.build", build_model)
                                                           .step_fn("policy.authorize", authorize_create)
                                                           .build()
                                                           .unwrap();
    let exec = PipelineExecutor::new();
    for payload in [json!({"name": "ab"}), json!({"name": "Acme Widgets"}), json!({})] {
        for actor in [admin(), Some(Actor { admin: false }), None] {
            let a = exec.run(&def, params_from_value(payload.clone()).unwrap(), actor.clone()).unwrap();
            let b = exec.run(&def, params_from_value(payload.clone()).unwrap(), actor).unwrap();
            assert_eq!(a.status(), b.status());
            assert_eq!(a.errors(), b.errors());
            assert_ne!(a.run_id(), b.run_id());
        }
    }
}

/// Recorre todas las permutaciones de un conjunto de steps y comprueba que
/// ningún step `Success` se ejecuta después del primer fallo.
#[test]
fn no_success_step_runs_after_failure_for_any_ordering() {
    let specs: Vec<(&str, Track, bool)> = vec![("ok_a", Track::Success, false),
                                               ("fail", Track::Success, true),
                                               ("ok_b", Track::Success, false),
                                               ("on_fail", Track::Failure, false),
                                               ("both", Track::Both, false)];

    fn permutations(items: Vec<usize>) -> Vec<Vec<usize>> {
        if items.len() <= 1 {
            return vec![items];
        }
        let mut out = Vec::new();
        for i in 0..items.len() {
            let mut rest = items.clone();
            let head = rest.remove(i);
            for mut tail in permutations(rest) {
                tail.insert(0, head);
                out.push(tail);
            }
        }
        out
    }

    let exec = PipelineExecutor::new();
    for order in permutations((0..specs.len()).collect()) {
        let mut builder = OperationDefinition::<Company, Actor>::builder("Perm");
        for &i in &order {
            let (name, track, fails) = specs[i];
            let step = rail_core::FnStep::new(name, track, move |_ctx: &mut Ctx| {
                if fails {
                    Ok(StepOutcome::halt())
                } else {
                    Ok(StepOutcome::Success)
                }
            });
            builder = builder.step(step);
        }
        let def = builder.build().unwrap();
        let res = exec.run(&def, Default::default(), None).unwrap();
        assert!(res.is_failure());

        let executed = res.executed_steps();
        let fail_pos = executed.iter().position(|s| *s == "fail").unwrap();
        for later in &executed[fail_pos + 1..] {
            assert!(*later == "on_fail" || *later == "both",
                    "success-only step '{later}' ran after failure in order {order:?}");
        }
        for earlier in &executed[..fail_pos] {
            assert_ne!(*earlier, "on_fail", "failure step ran on success track in order {order:?}");
        }
        assert!(executed.contains(&"both"));
    }
}

#[test]
fn concurrent_runs_share_definition_without_interference() {
    let def = Arc::new(OperationDefinition::builder("CompanyUpdate").step_fn("contract.validate", validate_update)
                                                                    .step_fn("model.build", build_model)
                                                                    .build()
                                                                    .unwrap());
    let exec = Arc::new(PipelineExecutor::new());
    std::thread::scope(|scope| {
        for i in 0..16 {
            let def = def.clone();
            let exec = exec.clone();
            scope.spawn(move || {
                let name = if i % 2 == 0 { "ab".to_string() } else { format!("Company {i:03}") };
                let res = exec.run(&def, params_from_value(json!({"name": name})).unwrap(), None)
                              .unwrap();
                if i % 2 == 0 {
                    assert!(res.is_failure());
                    assert!(res.model().is_none());
                } else {
                    assert!(res.is_success());
                    assert_eq!(res.model().and_then(|c| c.name.clone()), Some(name));
                }
            });
        }
    });
}
