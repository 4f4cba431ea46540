use std::sync::Arc;
use std::thread;

use formgate::{ButtonInput, FormContext, RenderButton, RenderContext, RoleTask, RuleStore};

#[test]
fn render_across_threads() {
    let store = Arc::new(
        RuleStore::from_json(
            r#"[
                {"code": "visibility", "inUse": true, "config": {
                    "component_event": "on_change", "component_action": "status",
                    "component_result": "approve", "ena_dis": "true"}},
                {"code": "visibilitybutton", "inUse": true, "config": {
                    "component_action": "modify", "component_result": "save", "ena_dis": "false"}},
                {"code": "layout", "inUse": true, "config": {
                    "component_manager": {"create": "!!!", "print": "!!"}}}
            ]"#,
        )
        .unwrap(),
    );
    let roles = Arc::new(RoleTask::new().set("auditor", "btn_save", false));

    let cases: Vec<(&'static str, FormContext)> = vec![
        // Editing: save is explicitly allowed
        ("save", FormContext::new().modify(true).with_id("1")),
        // Editing: print has no override
        ("print", FormContext::new().modify(true).with_id("1")),
        // Approve is disabled by an on_change rule
        ("approve", FormContext::new()),
        // Auditor may not save
        ("save", FormContext::new().modify(true).with_id("1").with_role("auditor")),
        // Create is hidden once a record exists
        ("create", FormContext::new().with_id("1")),
    ];

    let handles: Vec<_> = cases
        .into_iter()
        .map(|(code, form)| {
            let store = Arc::clone(&store);
            let roles = Arc::clone(&roles);
            thread::spawn(move || {
                let button =
                    RenderButton::new(ButtonInput::new(code).code_hidden(format!("btn_{code}")));
                let cx = RenderContext {
                    rules: &store,
                    form: &form,
                    role_task: &roles,
                };
                let view = button.view(&cx);
                (view.visible(), view.enabled())
            })
        })
        .collect();

    let results: Vec<(bool, bool)> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(results[0], (true, true));
    assert_eq!(results[1], (true, false));
    assert_eq!(results[2], (true, false));
    assert_eq!(results[3], (true, false));
    assert_eq!(results[4], (false, true));
}
