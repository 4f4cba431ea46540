use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use criterion::{criterion_group, criterion_main, Criterion};
use formgate::{
    ButtonInput, FormContext, RenderButton, RenderContext, RoleTask, Rule, RuleCode, RuleStore,
};

const BUTTONS: &[&str] = &["save", "modify", "delete", "print", "approve"];

fn build_shared_store() -> (Arc<RuleStore>, Arc<FormContext>, Arc<RoleTask>) {
    let mut rules = Vec::new();
    for (i, code) in BUTTONS.iter().enumerate() {
        rules.push(
            Rule::new(RuleCode::Visibility)
                .with("component_event", "on_change")
                .with("component_action", "status")
                .with("component_result", *code)
                .with("ena_dis", if i % 2 == 0 { "true" } else { "false" }),
        );
        rules.push(
            Rule::new(RuleCode::VisibilityButton)
                .with("component_action", "modify")
                .with("component_result", *code)
                .with("ena_dis", "false"),
        );
    }
    rules.push(
        Rule::new(RuleCode::Other("layout".into()))
            .with("component_manager", r#"{"delete": "!!", "approve": "!!!"}"#),
    );

    let form = FormContext::new()
        .modify(true)
        .with_id("42")
        .with_role("teller");
    let roles = RoleTask::new().set("teller", "btn_print", false);

    (Arc::new(RuleStore::new(rules)), Arc::new(form), Arc::new(roles))
}

fn bench_throughput(c: &mut Criterion) {
    let thread_counts = [1, 2, 4, 8];

    let mut group = c.benchmark_group("throughput");
    group.measurement_time(Duration::from_secs(5));

    for &threads in &thread_counts {
        let (store, form, roles) = build_shared_store();

        group.bench_function(&format!("{threads}_threads"), |b| {
            b.iter_custom(|iters| {
                let per_thread = iters / threads as u64;
                let handles: Vec<_> = (0..threads)
                    .map(|_| {
                        let store = Arc::clone(&store);
                        let form = Arc::clone(&form);
                        let roles = Arc::clone(&roles);
                        thread::spawn(move || {
                            let buttons: Vec<_> = BUTTONS
                                .iter()
                                .map(|code| {
                                    RenderButton::new(
                                        ButtonInput::new(*code).code_hidden(format!("btn_{code}")),
                                    )
                                })
                                .collect();
                            let cx = RenderContext {
                                rules: &store,
                                form: &form,
                                role_task: &roles,
                            };
                            let start = Instant::now();
                            for _ in 0..per_thread {
                                for button in &buttons {
                                    let _ = button.view(&cx);
                                }
                            }
                            start.elapsed()
                        })
                    })
                    .collect();

                let mut max_elapsed = Duration::ZERO;
                for h in handles {
                    let elapsed = h.join().unwrap();
                    if elapsed > max_elapsed {
                        max_elapsed = elapsed;
                    }
                }
                max_elapsed
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_throughput);
criterion_main!(benches);
