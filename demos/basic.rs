use formgate::{ButtonInput, FormContext, RenderButton, RenderContext, RoleTask, RuleStore};

const RULES: &str = r#"{
    "rules": [
        {
            "code": "visibility",
            "inUse": true,
            "order": 1,
            "config": {
                "component_event": "on_change",
                "component_action": "status",
                "component_result": "approve ; reject",
                "ena_dis": "true"
            }
        },
        {
            "code": "visibilitybutton",
            "inUse": true,
            "order": 2,
            "config": {
                "component_action": "modify",
                "component_result": "save",
                "ena_dis": "false"
            }
        },
        {
            "code": "layout",
            "inUse": true,
            "config": {"component_manager": {"create": "!!!", "print": "!!"}}
        }
    ]
}"#;

fn main() {
    let rules = RuleStore::from_json(RULES).expect("failed to load rules");
    rules.validate().expect("invalid rules");
    println!("{rules}");

    let roles = RoleTask::new().set("auditor", "btn_delete", false);
    let buttons: Vec<_> = ["create", "save", "print", "approve", "delete"]
        .into_iter()
        .map(|code| RenderButton::new(ButtonInput::new(code).code_hidden(format!("btn_{code}"))))
        .collect();

    let new_record = FormContext::new();
    let editing = FormContext::new()
        .modify(true)
        .with_id("42")
        .with_role("auditor")
        .with_selected(vec![serde_json::json!({"id": 42})]);

    for (label, form) in [("new record", &new_record), ("editing #42", &editing)] {
        println!("-- {label}");
        let cx = RenderContext {
            rules: &rules,
            form,
            role_task: &roles,
        };
        for button in &buttons {
            println!("{}", button.view(&cx));
        }
    }
}
