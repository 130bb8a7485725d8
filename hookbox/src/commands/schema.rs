use anyhow::Result;
use hookbox_core::protocol::LintRequest;
use serde_json::json;

/// Example requests, one whole-repo run and one narrowed run.
pub fn examples() -> Vec<LintRequest> {
    let mut whole_repo = LintRequest::new("~/src/my-project");
    whole_repo.relative_virtualenv_path = Some(".venv".to_string());

    let mut narrowed = LintRequest::new("~/src/my-project");
    narrowed.files_to_check = Some(vec!["src/app.py".to_string(), "tests/test_app.py".to_string()]);
    narrowed.select_hooks = Some(vec!["ruff".to_string()]);

    vec![whole_repo, narrowed]
}

pub fn cmd_schema() -> Result<()> {
    let out = json!({ "examples": examples() });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_examples_are_valid_requests() {
        for example in examples() {
            let text = serde_json::to_string(&example).unwrap();
            let back: LintRequest = serde_json::from_str(&text).unwrap();
            assert_eq!(back, example);
        }
    }
}
