use async_trait::async_trait;
use formgate::{
    ButtonInput, ButtonSettings, Collaborators, FormContext, FormHost, RenderButton,
    RenderContext, RoleTask, Rule, RuleCode, RuleStore, TracingReporter, TransactionError,
    TransactionExecutor, TransactionRequest, TxDescriptor, TxResult, ValidationErrors,
};
use serde_json::{Value as Json, json};

/// Prints every UI side effect instead of touching a page.
struct ConsoleHost;

#[async_trait]
impl FormHost for ConsoleHost {
    async fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }

    fn show_field_errors(&self, errors: &ValidationErrors) {
        println!("field errors: {errors}");
    }

    fn alert(&self, message: &str) {
        println!("alert: {message}");
    }

    fn reset_form(&self) {
        println!("form reset");
    }

    fn open_preview(&self, descriptor: &TxDescriptor) {
        println!("preview {}", descriptor.txcode);
    }

    fn open_url(&self, url: &str) {
        println!("open {url}");
    }

    fn set_is_modify(&self, is_modify: bool) {
        println!("is_modify = {is_modify}");
    }

    fn set_search_results(&self, page: Json, descriptor: &TxDescriptor) {
        println!("{} returned {page}", descriptor.txcode);
    }
}

/// Answers every search with a single row.
struct StaticBackend;

#[async_trait]
impl TransactionExecutor for StaticBackend {
    async fn perform(&self, request: TransactionRequest) -> Result<TxResult, TransactionError> {
        Ok(TxResult::Search(json!({
            "rows": [{"id": 42, "query": request.searchtext}],
            "total": 1
        })))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let rules = RuleStore::new(vec![Rule::new(RuleCode::Calculator)
        .with("component_event", "on_click")
        .with("component_action", "edit")
        .with("function_cal", "has_id AND NOT is_modify")]);
    let roles = RoleTask::new();
    let mut form = FormContext::new().with_id("42");
    form.search_text = Some("contract".into());
    let cx = RenderContext {
        rules: &rules,
        form: &form,
        role_task: &roles,
    };
    let with = Collaborators {
        executor: &StaticBackend,
        host: &ConsoleHost,
        reporter: &TracingReporter,
    };
    let settings = ButtonSettings::default().with_grace_period(std::time::Duration::ZERO);

    let edit = RenderButton::with_settings(
        ButtonInput::new("edit").use_action("true"),
        settings.clone(),
    );
    println!("edit: {:?}", edit.handle_click(&cx, &with).await);

    let search = RenderButton::with_settings(
        ButtonInput::new("search")
            .use_action("false")
            .tx_fo(r#"[{"txcode": "BO_CONTRACT_SEARCH", "txtype": "search"}]"#),
        settings,
    );
    println!("search: {:?}", search.handle_click(&cx, &with).await);
}
