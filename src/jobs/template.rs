/*!
 * Command Templates
 * Literal placeholder substitution for the run command
 */

use super::types::JobSpec;

/// Placeholder replaced by the space-joined positional arguments
pub const ARGS_TOKEN: &str = "{args}";
/// Placeholder replaced by the rendered `--name value` pairs
pub const KWARGS_TOKEN: &str = "{kwargs}";

/// A shell command template carrying `{args}` / `{kwargs}` placeholders
///
/// Substitution is exact-token replacement of the literal placeholder text,
/// never pattern matching, so surrounding text can't match incidentally.
#[derive(Debug, Clone)]
pub struct CommandTemplate {
    raw: String,
}

impl CommandTemplate {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// Whether the template references either placeholder
    pub fn has_placeholders(&self) -> bool {
        self.raw.contains(ARGS_TOKEN) || self.raw.contains(KWARGS_TOKEN)
    }

    /// Render the command line for one job
    pub fn render(&self, job: &JobSpec) -> String {
        self.raw
            .replace(ARGS_TOKEN, &job.args_fragment())
            .replace(KWARGS_TOKEN, &job.kwargs_fragment())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn job(body: &str) -> JobSpec {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_render_both_placeholders() {
        let template = CommandTemplate::new("python worker.py {args} {kwargs}");
        let rendered = template.render(&job(r#"{"args": [1, "a"], "kwargs": {"n": 2}}"#));

        assert_eq!(rendered, "python worker.py 1 a --n 2");
    }

    #[test]
    fn test_render_empty_job() {
        let template = CommandTemplate::new("run.sh {args} {kwargs}");
        assert_eq!(template.render(&job("{}")), "run.sh  ");
    }

    #[test]
    fn test_similar_text_is_not_substituted() {
        let template = CommandTemplate::new("echo {argsx} {args}");
        let rendered = template.render(&job(r#"{"args": ["ok"]}"#));

        assert_eq!(rendered, "echo {argsx} ok");
    }

    #[test]
    fn test_template_without_placeholders() {
        let template = CommandTemplate::new("true");
        assert!(!template.has_placeholders());
        assert_eq!(template.render(&job("{}")), "true");
    }

    #[test]
    fn test_repeated_placeholder() {
        let template = CommandTemplate::new("{args} {args}");
        assert_eq!(template.render(&job(r#"{"args": [7]}"#)), "7 7");
    }
}
